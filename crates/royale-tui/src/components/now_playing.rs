//! NowPlaying component — "Signal Status" sidebar widget.
//!
//! Shows the loaded episode, the broadcast state, the simulated progress bar
//! and a small level visualizer. Levels are rolled by the App on its own
//! interval; this module only provides the roll and the drawing.

use rand::Rng;
use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    app_state::{AppState, VISUALIZER_BARS},
    component::Component,
    components::episode_list::truncate,
    theme::{C_ACCENT, C_BAR_HIGH, C_BAR_LOW, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{pane_chrome::pane_chrome, progress_bar::draw_progress},
};

/// Bar height while paused or idle, in percent.
pub const IDLE_LEVEL: u8 = 10;
/// Lowest bar height while playing, in percent.
pub const MIN_ACTIVE_LEVEL: u8 = 20;

const VERTICAL: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Roll a fresh set of bar heights (percent).
pub fn roll_levels<R: Rng + ?Sized>(rng: &mut R, playing: bool) -> [u8; VISUALIZER_BARS] {
    let mut levels = [IDLE_LEVEL; VISUALIZER_BARS];
    if playing {
        for level in levels.iter_mut() {
            *level = rng.gen_range(0..=100u8).max(MIN_ACTIVE_LEVEL);
        }
    }
    levels
}

/// Cells of one bar, top to bottom, for a column `height` rows tall.
pub fn bar_column(level: u8, height: usize) -> Vec<char> {
    let eighths = (level.min(100) as usize * height * 8) / 100;
    (0..height)
        .map(|row_from_top| {
            let row = height - 1 - row_from_top;
            let filled = eighths.saturating_sub(row * 8).min(8);
            VERTICAL[filled]
        })
        .collect()
}

pub struct NowPlaying;

impl NowPlaying {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NowPlaying {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("Signal Status", None, focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let playing = state.playback.is_playing();
        let current = state.current_episode();

        // Dot pulses every ~500ms while broadcasting.
        let dot_color = if playing && (state.frame / 5) % 2 == 0 {
            C_PLAYING
        } else if playing {
            C_ACCENT
        } else {
            C_MUTED
        };
        let status = if playing { "Now Broadcasting" } else { "Offline" };
        let title = current
            .map(|e| e.title.as_str())
            .unwrap_or("Waiting for signal...");
        let text_w = inner.width.saturating_sub(2) as usize;

        let lines = vec![
            Line::from(vec![
                Span::styled(" ● ", Style::default().fg(dot_color).add_modifier(Modifier::BOLD)),
                Span::styled(status, Style::default().fg(C_SECONDARY)),
            ]),
            Line::from(Span::styled(
                format!(" {}", truncate(title, text_w)),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
        ];
        let head_h = 2.min(inner.height);
        frame.render_widget(
            Paragraph::new(lines),
            Rect {
                height: head_h,
                ..inner
            },
        );
        if inner.height <= head_h {
            return;
        }

        let duration = current.map(|e| e.duration.as_str()).unwrap_or("--:--");
        let bar_area = Rect {
            x: inner.x + 1,
            y: inner.y + head_h,
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        draw_progress(frame, bar_area, state.playback.fraction(), "00:00", duration);

        let viz_top = inner.y + head_h + 1;
        let viz_h = (inner.y + inner.height).saturating_sub(viz_top).min(4);
        if viz_h > 0 {
            draw_visualizer(
                frame,
                Rect {
                    x: inner.x + 1,
                    y: viz_top,
                    width: inner.width.saturating_sub(2),
                    height: viz_h,
                },
                &state.visualizer,
            );
        }
    }
}

fn draw_visualizer(frame: &mut Frame, area: Rect, levels: &[u8; VISUALIZER_BARS]) {
    let height = area.height as usize;
    let columns: Vec<Vec<char>> = levels.iter().map(|&l| bar_column(l, height)).collect();

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            // Top rows lean toward the high color.
            let t = 1.0 - row as f32 / height.max(1) as f32;
            let color = lerp_color(C_BAR_LOW, C_BAR_HIGH, t);
            let mut spans = Vec::with_capacity(VISUALIZER_BARS * 2);
            for col in &columns {
                let c = col[row];
                spans.push(Span::styled(
                    format!("{c}{c}"),
                    Style::default().fg(color),
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let (ar, ag, ab) = match a {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    };
    let (br, bg, bb) = match b {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    };
    let tt = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * tt).round() as u8;
    Color::Rgb(mix(ar, br), mix(ag, bg), mix(ab, bb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_idle_levels_are_flat() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(roll_levels(&mut rng, false), [IDLE_LEVEL; VISUALIZER_BARS]);
    }

    #[test]
    fn test_playing_levels_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            for level in roll_levels(&mut rng, true) {
                assert!((MIN_ACTIVE_LEVEL..=100).contains(&level));
            }
        }
    }

    #[test]
    fn test_bar_column_fills_from_bottom() {
        assert_eq!(bar_column(100, 2), vec!['█', '█']);
        assert_eq!(bar_column(50, 2), vec![' ', '█']);
        assert_eq!(bar_column(0, 3), vec![' ', ' ', ' ']);
        // 10% of 4 rows = 3.2 eighths, rounded down.
        assert_eq!(bar_column(10, 4), vec![' ', ' ', ' ', '▃']);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_color(C_BAR_LOW, C_BAR_HIGH, 0.0), C_BAR_LOW);
        assert_eq!(lerp_color(C_BAR_LOW, C_BAR_HIGH, 1.0), C_BAR_HIGH);
    }
}
