//! ChatPanel component — the CasTo uplink side panel.
//!
//! Owns the input line and the transcript scroll position. The transcript
//! itself lives in `AppState::chat`; submitting emits `Action::SubmitChat`
//! and the App performs the turn.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use royale_core::{ChatMessage, Role};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_BADGE_LIVE, C_MUTED, C_SECONDARY, C_USER_BUBBLE},
    widgets::{
        chat_input::{ChatInput, InputAction},
        pane_chrome::{pane_chrome, Badge},
        status_bar::draw_separator,
    },
};

pub const MODEL_LABEL: &str = "✦ CasTo AI";
const USER_LABEL: &str = "You";

pub struct ChatPanel {
    pub input: ChatInput,
    /// Lines scrolled up from the newest message. 0 = pinned to the bottom.
    scroll_from_bottom: usize,
    /// Transcript length at last draw; growth snaps back to the bottom.
    last_len: usize,
    last_loading: bool,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            input: ChatInput::default(),
            scroll_from_bottom: 0,
            last_len: 0,
            last_loading: false,
        }
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(n);
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(n);
    }

    fn submit(&mut self, text: String, state: &AppState) -> Vec<Action> {
        if text.trim().is_empty() || state.chat.is_loading() {
            return vec![];
        }
        self.input.clear();
        self.scroll_from_bottom = 0;
        vec![Action::SubmitChat(text)]
    }
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChatPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('y') {
            return vec![Action::CopyLastReply];
        }
        match key.code {
            KeyCode::Up => {
                self.scroll_up(1);
                return vec![];
            }
            KeyCode::Down => {
                self.scroll_down(1);
                return vec![];
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                return vec![];
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                return vec![];
            }
            _ => {}
        }
        match self.input.handle_key(key) {
            InputAction::Submit(text) => self.submit(text, state),
            InputAction::Cancelled => vec![Action::CloseChat],
            InputAction::Changed | InputAction::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_up(3),
            MouseEventKind::ScrollDown => self.scroll_down(3),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        frame.render_widget(Clear, area);
        let block = pane_chrome(
            "Ask CasTo",
            None,
            focused,
            Some(Badge {
                text: "● LIVE",
                color: C_BADGE_LIVE,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 4 || inner.width < 8 {
            return;
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                " Live Uplink",
                Style::default().fg(C_MUTED).add_modifier(Modifier::ITALIC),
            )),
            Rect { height: 1, ..inner },
        );

        let input_y = inner.y + inner.height - 1;
        let transcript_area = Rect {
            y: inner.y + 1,
            height: inner.height - 3,
            ..inner
        };
        draw_separator(
            frame,
            Rect {
                y: input_y - 1,
                height: 1,
                ..inner
            },
        );

        let chat = &state.chat;
        let len = chat.transcript().len();
        if len != self.last_len || chat.is_loading() != self.last_loading {
            self.scroll_from_bottom = 0;
            self.last_len = len;
            self.last_loading = chat.is_loading();
        }

        let mut lines = transcript_lines(chat.transcript().messages(), inner.width as usize);
        if chat.is_loading() {
            lines.push(Line::from(Span::styled(
                format!(" {MODEL_LABEL}"),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!(" {}", typing_dots(state.frame)),
                Style::default().fg(C_ACCENT),
            )));
        }

        let height = transcript_area.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
        let start = max_scroll - self.scroll_from_bottom;
        let visible: Vec<Line> = lines.into_iter().skip(start).take(height).collect();
        frame.render_widget(Paragraph::new(visible), transcript_area);

        self.input.draw(
            frame,
            Rect {
                y: input_y,
                height: 1,
                ..inner
            },
            focused,
            !chat.is_loading(),
        );
    }
}

/// Three dots bouncing in turn.
pub fn typing_dots(frame: u64) -> &'static str {
    match (frame / 3) % 3 {
        0 => "•··",
        1 => "·•·",
        _ => "··•",
    }
}

/// Render the transcript as display lines for a panel `width` columns wide.
/// Model turns are left aligned under a label; user turns hug the right edge.
pub fn transcript_lines(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
    let body_w = (width.saturating_sub(2) * 4 / 5).max(8);
    let mut lines = Vec::new();

    for msg in messages {
        let stamp = clock(msg.timestamp);
        match msg.role {
            Role::Model => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {MODEL_LABEL}"),
                        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {stamp}"), Style::default().fg(C_MUTED)),
                ]));
                for row in wrap_text(&msg.text, body_w) {
                    lines.push(Line::from(Span::styled(
                        format!(" {row}"),
                        Style::default().fg(C_SECONDARY),
                    )));
                }
            }
            Role::User => {
                let label = format!("{stamp}  {USER_LABEL} ");
                lines.push(right_aligned(
                    label,
                    width,
                    Style::default().fg(C_MUTED),
                ));
                for row in wrap_text(&msg.text, body_w) {
                    lines.push(right_aligned(
                        format!("{row} "),
                        width,
                        Style::default().fg(C_USER_BUBBLE),
                    ));
                }
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

fn right_aligned(text: String, width: usize, style: Style) -> Line<'static> {
    let pad = width.saturating_sub(text.width());
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(text, style),
    ])
}

fn clock(epoch_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_millis)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Word-wrap `text` to `width` display columns. Words wider than a line are
/// split; explicit newlines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for para in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0;
        for word in para.split_whitespace() {
            let word_w = word.width();
            let sep = usize::from(!line.is_empty());
            if line_w + sep + word_w <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += sep + word_w;
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_w = 0;
            }
            if word_w <= width {
                line.push_str(word);
                line_w = word_w;
                continue;
            }
            for ch in word.chars() {
                let cw = ch.width().unwrap_or(0);
                if line_w + cw > width {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(ch);
                line_w += cw;
            }
        }
        out.push(line);
    }
    out
}
