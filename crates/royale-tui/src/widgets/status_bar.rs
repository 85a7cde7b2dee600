//! Status bar — bottom line with input mode and keybindings, or the footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_CHAT, C_MODE_NORMAL, C_MUTED, C_PLAYING, C_SEPARATOR};

pub const FOOTER_TEXT: &str = "© 2025 CasTo Cosmic Distributor. All Realities Reserved.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Keys go to the chat input line.
    Chat,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "ROYALE",
            Self::Chat => "UPLINK",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Chat => C_MODE_CHAT,
        }
    }

    pub fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ↑↓/jk select  Enter/Space play  h latest  c chat  Tab panes  K keys  L logs  ? help  q quit"
            }
            Self::Chat => " type to compose  Enter transmit  ↑↓ scroll  Ctrl+Y copy reply  Tab panes  Esc close",
        }
    }
}

/// Draw the keybindings bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, is_playing: bool) {
    let bulb = if is_playing { C_PLAYING } else { C_MUTED };
    let spans = vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled("●", Style::default().fg(bulb).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centered copyright footer, shown when the keys bar is hidden.
pub fn draw_footer(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            FOOTER_TEXT,
            Style::default().fg(C_MUTED),
        )))
        .centered(),
        area,
    );
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
