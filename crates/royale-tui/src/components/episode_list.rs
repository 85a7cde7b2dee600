//! EpisodeList component — the "Transmission Archive" pane.
//!
//! Each episode takes `ROWS_PER_ITEM` terminal rows: title line with the
//! play/pause glyph, a one-line description, date and duration, and a spacer.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use royale_core::{Episode, PodcastChannel};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{
        C_ACCENT, C_EXPLICIT, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub const ROWS_PER_ITEM: usize = 4;
/// Columns (from the inner left edge) that count as the play glyph.
const GLYPH_COLS: u16 = 4;

pub struct EpisodeList {
    /// Episode ids in catalog order.
    pub list: ScrollableList<String>,
    last_click: Option<(usize, Instant)>,
}

impl EpisodeList {
    pub fn new(channel: &PodcastChannel) -> Self {
        Self {
            list: ScrollableList::new(channel.episodes.iter().map(|e| e.id.clone()).collect()),
            last_click: None,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.list.selected_item().map(String::as_str)
    }

    fn select_id(&mut self, id: &str) {
        if let Some(pos) = self.list.items.iter().position(|x| x == id) {
            self.list.select(pos);
        }
    }

    fn toggle_selected(&self) -> Vec<Action> {
        match self.selected_id() {
            Some(id) => vec![Action::TogglePlay(id.to_string())],
            None => vec![],
        }
    }

    fn render_item(
        &self,
        ep: &Episode,
        is_selected: bool,
        state: &AppState,
        width: usize,
    ) -> Vec<Line<'static>> {
        let is_current = state.playback.is_current(&ep.id);
        let is_playing = state.is_playing_episode(&ep.id);

        let (glyph, glyph_color): (&str, Color) = if is_playing {
            (" ❚❚ ", C_PLAYING)
        } else if is_current {
            (" ▶  ", C_ACCENT)
        } else {
            (" ▶  ", C_MUTED)
        };
        let title_color = if is_current {
            C_ACCENT
        } else if is_selected {
            C_PRIMARY
        } else {
            C_SECONDARY
        };
        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        let text_w = width.saturating_sub(GLYPH_COLS as usize + 1);

        let mut meta = vec![
            Span::raw("    "),
            Span::styled(
                format!("{} • {}", ep.pub_date, ep.duration),
                Style::default().fg(C_MUTED),
            ),
        ];
        if ep.explicit {
            meta.push(Span::raw("  "));
            meta.push(Span::styled(
                " E ",
                Style::default()
                    .fg(C_EXPLICIT)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ));
        }

        vec![
            Line::from(vec![
                Span::styled(
                    glyph,
                    Style::default().fg(glyph_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    truncate(&ep.title, text_w),
                    Style::default().fg(title_color).add_modifier(Modifier::BOLD),
                ),
            ])
            .style(bg),
            Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    truncate(&ep.description, text_w),
                    Style::default().fg(C_SECONDARY),
                ),
            ])
            .style(bg),
            Line::from(meta).style(bg),
            Line::from(""),
        ]
    }
}

impl Component for EpisodeList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => return self.toggle_selected(),
            KeyCode::Char('y') => {
                if let Some(ep) = self.selected_id().and_then(|id| state.channel.episode(id)) {
                    return vec![Action::CopyToClipboard(ep.title.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for border
        let slot = rel_row / ROWS_PER_ITEM;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(s, t)| s == slot && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);
                let on_glyph = rel_row % ROWS_PER_ITEM == 0
                    && event.column < area.x + 1 + GLYPH_COLS;

                if self.list.handle_click(slot) {
                    if on_glyph || is_double {
                        self.last_click = None;
                        return self.toggle_selected();
                    }
                    self.last_click = Some((slot, now));
                } else {
                    self.last_click = None;
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SelectEpisode(id) | Action::TogglePlay(id) => self.select_id(id),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let count = format!("{} episodes", state.channel.episodes.len());
        let block = pane_chrome(
            "Transmission Archive",
            None,
            focused,
            Some(Badge {
                text: &count,
                color: C_MUTED,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  the archive is empty",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let slots = (inner.height as usize / ROWS_PER_ITEM).max(1);
        self.list.ensure_visible(slots);

        let mut lines: Vec<Line> = Vec::with_capacity(slots * ROWS_PER_ITEM);
        for (idx, id) in self.list.visible_items(slots) {
            if let Some(ep) = state.channel.episode(id) {
                let is_selected = idx == self.list.selected;
                lines.extend(self.render_item(ep, is_selected, state, inner.width as usize));
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut w = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if w + cw + 1 > max {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use royale_core::PlaybackSimulator;
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::new(
            PodcastChannel::builtin(),
            PlaybackSimulator::default(),
            PathBuf::from("royale.log"),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
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
    fn test_keys_move_selection_and_toggle() {
        let s = state();
        let mut list = EpisodeList::new(&s.channel);
        assert_eq!(list.selected_id(), Some("episode1"));
        list.handle_key(key(KeyCode::Char('j')), &s);
        assert_eq!(list.selected_id(), Some("episode2"));
        let actions = list.handle_key(key(KeyCode::Enter), &s);
        assert!(matches!(actions.as_slice(), [Action::TogglePlay(id)] if id == "episode2"));
        list.handle_key(key(KeyCode::Char('g')), &s);
        assert_eq!(list.selected_id(), Some("episode1"));
    }

    #[test]
    fn test_click_selects_and_glyph_toggles() {
        let s = state();
        let mut list = EpisodeList::new(&s.channel);
        let area = Rect::new(0, 0, 60, 20);

        // Second item, description row, away from the glyph.
        let actions = list.handle_mouse(click(20, 1 + ROWS_PER_ITEM as u16 + 1), area, &s);
        assert!(actions.is_empty());
        assert_eq!(list.selected_id(), Some("episode2"));

        // First item's glyph.
        let actions = list.handle_mouse(click(2, 1), area, &s);
        assert!(matches!(actions.as_slice(), [Action::TogglePlay(id)] if id == "episode1"));
    }

    #[test]
    fn test_double_click_toggles() {
        let s = state();
        let mut list = EpisodeList::new(&s.channel);
        let area = Rect::new(0, 0, 60, 20);
        assert!(list.handle_mouse(click(30, 2), area, &s).is_empty());
        let actions = list.handle_mouse(click(30, 2), area, &s);
        assert!(matches!(actions.as_slice(), [Action::TogglePlay(_)]));
    }

    #[test]
    fn test_toggle_elsewhere_moves_selection() {
        let s = state();
        let mut list = EpisodeList::new(&s.channel);
        list.on_action(&Action::SelectEpisode("episode2".into()), &s);
        assert_eq!(list.selected_id(), Some("episode2"));
        list.on_action(&Action::SelectEpisode("missing".into()), &s);
        assert_eq!(list.selected_id(), Some("episode2"));
    }

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }
}
