//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it; the App event-loop is the only
//! writer.

use std::path::PathBuf;

use royale_core::{ChatSession, Episode, PlaybackSimulator, PodcastChannel};

use crate::widgets::status_bar::InputMode;

pub const VISUALIZER_BARS: usize = 8;

pub struct AppState {
    // ── Catalog ─────────────────────────────────────────────────────────────
    pub channel: PodcastChannel,

    // ── Playback ────────────────────────────────────────────────────────────
    pub playback: PlaybackSimulator,
    /// Bar heights in percent (20..=100 while playing, 10 when idle).
    pub visualizer: [u8; VISUALIZER_BARS],

    // ── Chat ────────────────────────────────────────────────────────────────
    pub chat: ChatSession,
    pub has_credential: bool,

    // ── UI ──────────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    /// Monotonic UI tick counter; drives small animations.
    pub frame: u64,

    // ── Logs ────────────────────────────────────────────────────────────────
    pub tui_log_path: PathBuf,
    /// Cached tail of royale.log, refreshed while the log panel is open.
    pub tui_log_lines: Vec<String>,
}

impl AppState {
    pub fn new(channel: PodcastChannel, playback: PlaybackSimulator, tui_log_path: PathBuf) -> Self {
        Self {
            channel,
            playback,
            visualizer: [10; VISUALIZER_BARS],
            chat: ChatSession::default(),
            has_credential: false,
            input_mode: InputMode::Normal,
            frame: 0,
            tui_log_path,
            tui_log_lines: Vec::new(),
        }
    }

    /// The episode loaded into the player, if any.
    pub fn current_episode(&self) -> Option<&Episode> {
        self.playback
            .current_episode_id()
            .and_then(|id| self.channel.episode(id))
    }

    pub fn latest_episode(&self) -> Option<&Episode> {
        self.channel.latest()
    }

    pub fn is_playing_episode(&self, id: &str) -> bool {
        self.playback.is_playing_episode(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            PodcastChannel::builtin(),
            PlaybackSimulator::default(),
            PathBuf::from("royale.log"),
        )
    }

    #[test]
    fn test_current_episode_follows_playback() {
        let mut s = state();
        assert!(s.current_episode().is_none());
        s.playback.toggle_play("episode2");
        assert_eq!(s.current_episode().map(|e| e.id.as_str()), Some("episode2"));
        assert!(s.is_playing_episode("episode2"));
        assert!(!s.is_playing_episode("episode1"));
    }

    #[test]
    fn test_latest_is_first_episode() {
        let s = state();
        assert_eq!(s.latest_episode().map(|e| e.id.as_str()), Some("episode1"));
    }
}
