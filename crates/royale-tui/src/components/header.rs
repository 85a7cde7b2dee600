//! Header component — channel banner with the chat launcher.
//!
//! Row 1: brand mark, channel title, `[c] Chat with CasTo` button (right aligned).
//! Row 2: host line and the uplink readiness badge.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_BADGE_LIVE, C_CYAN, C_MUTED, C_PRIMARY, C_SECONDARY, C_TOAST_WARNING},
};

const BRAND: &str = " ✦ COSMIC ROYALE ";
pub const CHAT_BUTTON: &str = "[c] Chat with CasTo ";

pub struct Header {
    /// Where the chat button was last drawn, for click hit-testing.
    chat_button: Rect,
}

impl Header {
    pub fn new() -> Self {
        Self {
            chat_button: Rect::default(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Header {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if contains(self.chat_button, event.column, event.row) {
                return vec![Action::OpenChat];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        self.chat_button = button_rect(rows[0]);
        frame.render_widget(Paragraph::new(build_row1(state, rows[0].width)), rows[0]);

        if area.height >= 2 {
            frame.render_widget(Paragraph::new(build_row2(state)), rows[1]);
        }
    }
}

fn build_row1(state: &AppState, width: u16) -> Line<'static> {
    let title = state.channel.title.clone();
    let used = BRAND.width() + 1 + title.width() + CHAT_BUTTON.width();
    let pad = (width as usize).saturating_sub(used);

    Line::from(vec![
        Span::styled(
            BRAND,
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            title,
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(pad)),
        Span::styled(
            CHAT_BUTTON,
            Style::default().fg(C_CYAN).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn build_row2(state: &AppState) -> Line<'static> {
    let (badge, color) = if state.has_credential {
        ("● uplink ready", C_BADGE_LIVE)
    } else {
        ("○ no API key", C_TOAST_WARNING)
    };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(
            format!("HOSTED BY {}", state.channel.author.to_uppercase()),
            Style::default().fg(C_SECONDARY),
        ),
        Span::styled("  ·  ", Style::default().fg(C_MUTED)),
        Span::styled(badge, Style::default().fg(color)),
    ])
}

fn button_rect(row: Rect) -> Rect {
    let w = (CHAT_BUTTON.width() as u16).min(row.width);
    Rect {
        x: row.x + row.width - w,
        y: row.y,
        width: w,
        height: 1,
    }
}

fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use royale_core::{PlaybackSimulator, PodcastChannel};
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::new(
            PodcastChannel::builtin(),
            PlaybackSimulator::default(),
            PathBuf::from("royale.log"),
        )
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_button_sits_at_right_edge() {
        let r = button_rect(Rect::new(0, 0, 80, 1));
        assert_eq!(r.x + r.width, 80);
        assert_eq!(r.width as usize, CHAT_BUTTON.width());
    }

    #[test]
    fn test_click_on_button_opens_chat() {
        let s = state();
        let mut header = Header::new();
        header.chat_button = button_rect(Rect::new(0, 0, 80, 1));
        let actions = header.handle_mouse(click(78, 0), Rect::new(0, 0, 80, 2), &s);
        assert!(matches!(actions.as_slice(), [Action::OpenChat]));
        assert!(header
            .handle_mouse(click(2, 0), Rect::new(0, 0, 80, 2), &s)
            .is_empty());
    }

    #[test]
    fn test_host_line_is_uppercased() {
        let line = build_row2(&state());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("HOSTED BY CASTO"));
        assert!(text.contains("no API key"));
    }
}
