//! AboutCard component — "The Frequency" sidebar card.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
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
    theme::{C_CYAN, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

pub const NEURAL_LINK: &str = "Access CasTo Neural Link ->";

pub struct AboutCard {
    link_row: Option<u16>,
}

impl AboutCard {
    pub fn new() -> Self {
        Self { link_row: None }
    }
}

impl Default for AboutCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for AboutCard {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            if self.link_row == Some(event.row) {
                return vec![Action::OpenChat];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("The Frequency", None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            self.link_row = None;
            return;
        }

        let body = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                state.channel.description.clone(),
                Style::default().fg(C_SECONDARY),
            ))
            .wrap(Wrap { trim: true }),
            body,
        );

        let row = inner.y + inner.height - 1;
        self.link_row = Some(row);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                NEURAL_LINK,
                Style::default()
                    .fg(C_CYAN)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))),
            Rect {
                y: row,
                height: 1,
                ..inner
            },
        );
    }
}
