//! Color palette and style constants for the Cosmic Royale TUI.

use ratatui::style::{Color, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(5, 5, 10);
pub const C_PANEL_BG: Color = Color::Rgb(15, 23, 42);
pub const C_ACCENT: Color = Color::Rgb(217, 70, 239); // fuchsia
pub const C_CYAN: Color = Color::Rgb(34, 211, 238);
pub const C_PLAYING: Color = Color::Rgb(217, 70, 239);
pub const C_EXPLICIT: Color = Color::Rgb(248, 113, 113);
pub const C_MUTED: Color = Color::Rgb(71, 85, 105);
pub const C_SEPARATOR: Color = Color::Rgb(30, 41, 59);
pub const C_SECONDARY: Color = Color::Rgb(148, 163, 184);
pub const C_PRIMARY: Color = Color::Rgb(241, 245, 249);
pub const C_SELECTION_BG: Color = Color::Rgb(30, 41, 59);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 44, 64);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(192, 38, 211);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_INPUT_BG: Color = Color::Rgb(30, 41, 59);
pub const C_USER_BUBBLE: Color = Color::Rgb(240, 171, 252);
pub const C_TOAST_INFO: Color = Color::Rgb(34, 211, 238);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(74, 222, 128);
pub const C_TOAST_WARNING: Color = Color::Rgb(251, 191, 36);
pub const C_TOAST_ERROR: Color = Color::Rgb(248, 113, 113);
pub const C_BADGE_LIVE: Color = Color::Rgb(74, 222, 128);
pub const C_MODE_NORMAL: Color = Color::Rgb(148, 163, 184);
pub const C_MODE_CHAT: Color = Color::Rgb(217, 70, 239);

/// Visualizer bar gradient, bottom to top.
pub const C_BAR_LOW: Color = Color::Rgb(192, 38, 211);
pub const C_BAR_HIGH: Color = Color::Rgb(34, 211, 238);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
