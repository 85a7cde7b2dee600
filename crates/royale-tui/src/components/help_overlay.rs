//! HelpOverlay component — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpOverlay {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            // Visibility flips when ToggleHelp comes back through on_action.
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume everything else while open
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(60, 27, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " cosmic royale · keyboard",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" playback"),
            help_row("enter / space", "play or pause the selected episode"),
            help_row("h", "play or pause the latest transmission"),
            help_row("↑ / ↓  or  j / k", "move through the archive"),
            help_row("g / G", "first / last episode"),
            help_row("y", "copy the selected episode title"),
            Line::from(""),
            section(" casto uplink"),
            help_row("c", "open the chat panel"),
            help_row("enter", "transmit the query"),
            help_row("↑ / ↓  pg up / dn", "scroll the transcript"),
            help_row("ctrl+y", "copy CasTo's last reply"),
            help_row("esc", "close the chat panel"),
            Line::from(""),
            section(" panes & ui"),
            help_row("tab / shift-tab", "focus next / previous pane"),
            help_row("K / L", "toggle keys bar / log panel"),
            help_row("?", "toggle this help overlay"),
            help_row("q / ctrl+c", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(Color::Rgb(18, 18, 26))),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<20}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use royale_core::{PlaybackSimulator, PodcastChannel};
    use std::path::PathBuf;

    #[test]
    fn test_closing_keys_only_when_visible() {
        let s = AppState::new(
            PodcastChannel::builtin(),
            PlaybackSimulator::default(),
            PathBuf::from("royale.log"),
        );
        let mut help = HelpOverlay::new();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(help.handle_key(esc, &s).is_empty());

        help.on_action(&Action::ToggleHelp, &s);
        assert!(help.visible);
        assert!(matches!(help.handle_key(esc, &s).as_slice(), [Action::ToggleHelp]));
        let other = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(help.handle_key(other, &s).is_empty());
    }

    #[test]
    fn test_centered_rect_fits() {
        let r = centered_rect(60, 10, Rect::new(0, 0, 100, 40));
        assert_eq!(r.height, 10);
        assert_eq!(r.width, 60);
        assert_eq!(r.y, 15);
    }
}
