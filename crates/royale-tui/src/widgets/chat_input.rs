//! ChatInput — single-line composer wrapping tui-input.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_ACCENT, C_INPUT_BG, C_MUTED, C_PRIMARY};

pub const CHAT_PLACEHOLDER: &str = "Transmit your query...";

#[derive(Debug, PartialEq)]
pub enum InputAction {
    /// Enter pressed; carries the text exactly as typed.
    Submit(String),
    Changed,
    Cancelled,
    None,
}

pub struct ChatInput {
    input: Input,
    placeholder: String,
}

impl ChatInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        self.input.value()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Esc => InputAction::Cancelled,
            KeyCode::Enter => InputAction::Submit(self.input.value().to_string()),
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(_) => InputAction::Changed,
                None => InputAction::None,
            },
        }
    }

    /// Render into a one-row `area`. `enabled` dims the send marker while a
    /// transmission is in flight.
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool, enabled: bool) {
        if area.width < 6 || area.height == 0 {
            return;
        }
        let text_w = area.width.saturating_sub(6) as usize;
        let scroll = self.input.visual_scroll(text_w);
        let value = self.input.value();

        let body = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_MUTED))
        } else {
            Span::styled(
                value.chars().skip(scroll).collect::<String>(),
                Style::default().fg(C_PRIMARY),
            )
        };
        let send_color = if enabled && !value.trim().is_empty() {
            C_ACCENT
        } else {
            C_MUTED
        };

        let text_area = Rect {
            width: area.width.saturating_sub(3),
            ..area
        };
        let send_area = Rect {
            x: area.x + area.width.saturating_sub(3),
            width: 3,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::raw(" › "), body]))
                .style(Style::default().bg(C_INPUT_BG)),
            text_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(" ➤ ", Style::default().fg(send_color)))
                .style(Style::default().bg(C_INPUT_BG)),
            send_area,
        );

        if focused {
            let cursor_x = area.x + 3 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 4), area.y));
        }
    }
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new(CHAT_PLACEHOLDER)
    }
}
