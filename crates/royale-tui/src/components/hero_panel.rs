//! HeroPanel component — "Latest Transmission" card for the newest episode.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_CYAN, C_EXPLICIT, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub const PLAY_LABEL: &str = " ▶ Initialize Playback ";
pub const PAUSE_LABEL: &str = " ❚❚ Pause Signal ";

pub struct HeroPanel {
    button: Rect,
}

impl HeroPanel {
    pub fn new() -> Self {
        Self {
            button: Rect::default(),
        }
    }
}

impl Default for HeroPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Label of the hero play control for the current playback state.
pub fn button_label(state: &AppState) -> &'static str {
    match state.latest_episode() {
        Some(ep) if state.is_playing_episode(&ep.id) => PAUSE_LABEL,
        _ => PLAY_LABEL,
    }
}

impl Component for HeroPanel {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => vec![Action::ToggleLatest],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let b = self.button;
            if event.column >= b.x
                && event.column < b.x + b.width
                && event.row >= b.y
                && event.row < b.y + b.height
            {
                return vec![Action::ToggleLatest];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = state.latest_episode().filter(|e| e.explicit).map(|_| Badge {
            text: "E",
            color: C_EXPLICIT,
        });
        let block = pane_chrome("Latest Transmission", Some('h'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ep) = state.latest_episode() else {
            self.button = Rect::default();
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no transmissions yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        };
        if inner.height == 0 {
            return;
        }

        // Button and metadata pinned to the bottom, text above.
        let footer_h = 2.min(inner.height);
        let text_area = Rect {
            height: inner.height - footer_h,
            ..inner
        };
        let lines = vec![
            Line::from(Span::styled(
                format!(" {}", ep.title),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(" {}", ep.description),
                Style::default().fg(C_SECONDARY),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            text_area,
        );

        let label = button_label(state);
        let button_y = inner.y + inner.height - footer_h;
        self.button = Rect {
            x: inner.x + 1,
            y: button_y,
            width: (label.chars().count() as u16).min(inner.width.saturating_sub(1)),
            height: 1,
        };
        let button_style = if state.is_playing_episode(&ep.id) {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(C_CYAN).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(label, button_style),
            ])),
            Rect {
                y: button_y,
                height: 1,
                ..inner
            },
        );

        if footer_h == 2 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" ◷ {}  ·  {}", ep.duration, ep.pub_date),
                    Style::default().fg(C_MUTED),
                )),
                Rect {
                    y: button_y + 1,
                    height: 1,
                    ..inner
                },
            );
        }
    }
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

    #[test]
    fn test_label_follows_latest_episode() {
        let mut s = state();
        assert_eq!(button_label(&s), PLAY_LABEL);
        s.playback.toggle_play("episode1");
        assert_eq!(button_label(&s), PAUSE_LABEL);
        // Another episode playing leaves the hero idle.
        s.playback.toggle_play("episode2");
        assert_eq!(button_label(&s), PLAY_LABEL);
    }

    #[test]
    fn test_enter_and_space_toggle_latest() {
        let s = state();
        let mut hero = HeroPanel::new();
        for code in [KeyCode::Enter, KeyCode::Char(' ')] {
            let actions = hero.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &s);
            assert!(matches!(actions.as_slice(), [Action::ToggleLatest]));
        }
        assert!(hero
            .handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE), &s)
            .is_empty());
    }
}
