//! LogPanel component — tail of royale.log at the bottom of the screen.
//!
//! Follows new lines while scrolled to the end; scrolling up pins the view.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_SECONDARY, C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_WARNING},
    widgets::pane_chrome::pane_chrome,
};

/// Scroll sentinel: stick to the newest line.
const FOLLOW: usize = usize::MAX;

pub struct LogPanel {
    /// First visible line, or `FOLLOW`.
    scroll: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self { scroll: FOLLOW }
    }

    fn scroll_by(&mut self, delta: isize, total: usize, height: usize) {
        let max = total.saturating_sub(height);
        let current = self.scroll.min(max);
        let next = current.saturating_add_signed(delta).min(max);
        self.scroll = if next >= max { FOLLOW } else { next };
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LogPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let total = state.tui_log_lines.len();
        // Page size is unknown here; 8 rows matches the default panel height.
        let page = 8;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1, total, page),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1, total, page),
            KeyCode::PageUp => self.scroll_by(-(page as isize), total, page),
            KeyCode::PageDown => self.scroll_by(page as isize, total, page),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll = FOLLOW,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        let total = state.tui_log_lines.len();
        let height = area.height.saturating_sub(2) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-3, total, height),
            MouseEventKind::ScrollDown => self.scroll_by(3, total, height),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleLogs = action {
            self.scroll = FOLLOW;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);
        let title = state
            .tui_log_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("log");
        let block = pane_chrome(title, Some('L'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let logs = &state.tui_log_lines;
        if logs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no log entries yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let start = self.scroll.min(logs.len().saturating_sub(height));
        let lines: Vec<Line> = logs
            .iter()
            .skip(start)
            .take(height)
            .map(|raw| render_line(&LogLine::parse(raw)))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Log line formatting ───────────────────────────────────────────────────────

/// One `tracing_subscriber::fmt` line split into its parts.
#[derive(Debug, PartialEq)]
pub struct LogLine<'a> {
    /// Local `HH:MM:SS` (or `MM-DD HH:MM` for older days).
    pub time: Option<String>,
    pub level: Option<&'a str>,
    pub message: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut rest = raw.trim();

        let time = split_token(rest).and_then(|(tok, rem)| {
            let t = short_time(tok)?;
            rest = rem;
            Some(t)
        });

        let level = split_token(rest).and_then(|(tok, rem)| {
            matches!(tok, "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR").then(|| {
                rest = rem;
                tok
            })
        });

        // Drop the `crate::module: ` target prefix.
        if let Some((target, msg)) = rest.split_once(": ") {
            if !target.is_empty()
                && target
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'))
            {
                rest = msg;
            }
        }

        Self {
            time,
            level,
            message: rest.trim_start(),
        }
    }
}

fn render_line(line: &LogLine) -> Line<'static> {
    let mut spans = Vec::with_capacity(4);
    if let Some(t) = &line.time {
        spans.push(Span::styled(format!(" {t} "), Style::default().fg(C_MUTED)));
    }
    if let Some(level) = line.level {
        spans.push(Span::styled(
            format!("{:<5} ", level),
            Style::default()
                .fg(level_color(level))
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        line.message.to_string(),
        Style::default().fg(C_SECONDARY),
    ));
    Line::from(spans)
}

fn level_color(level: &str) -> Color {
    match level {
        "ERROR" => C_TOAST_ERROR,
        "WARN" => C_TOAST_WARNING,
        "INFO" => C_TOAST_INFO,
        _ => C_MUTED,
    }
}

fn short_time(token: &str) -> Option<String> {
    let dt = chrono::DateTime::parse_from_rfc3339(token).ok()?;
    let local = dt.with_timezone(&chrono::Local);
    let fmt = if local.date_naive() == chrono::Local::now().date_naive() {
        "%H:%M:%S"
    } else {
        "%m-%d %H:%M"
    };
    Some(local.format(fmt).to_string())
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let (first, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
    (!first.is_empty()).then_some((first, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let raw = "2025-12-01T10:15:30.123456Z  WARN royale_core::dispatcher: API_KEY is not set";
        let line = LogLine::parse(raw);
        assert!(line.time.is_some());
        assert_eq!(line.level, Some("WARN"));
        assert_eq!(line.message, "API_KEY is not set");
    }

    #[test]
    fn test_parse_keeps_plain_text() {
        let line = LogLine::parse("something odd: with a colon");
        assert_eq!(line.time, None);
        assert_eq!(line.level, None);
        assert_eq!(line.message, "something odd: with a colon");
    }

    #[test]
    fn test_parse_message_without_target() {
        let line = LogLine::parse("INFO ready");
        assert_eq!(line.level, Some("INFO"));
        assert_eq!(line.message, "ready");
    }

    #[test]
    fn test_scroll_returns_to_follow_at_bottom() {
        let mut panel = LogPanel::new();
        panel.scroll_by(-2, 20, 5);
        assert_eq!(panel.scroll, 13);
        panel.scroll_by(1, 20, 5);
        assert_eq!(panel.scroll, 14);
        panel.scroll_by(1, 20, 5);
        assert_eq!(panel.scroll, FOLLOW);
        panel.scroll_by(-100, 20, 5);
        assert_eq!(panel.scroll, 0);
    }
}
