//! Simulated playback: which episode is loaded, whether it is "playing", and
//! a cosmetic progress percentage advanced by a periodic tick.
//!
//! Nothing is decoded or streamed. The owner drives `tick()` from a timer.

use crate::config::PlaybackConfig;

pub const PROGRESS_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSimulator {
    current_episode_id: Option<String>,
    is_playing: bool,
    /// Always within `0.0..=PROGRESS_MAX`.
    progress: f64,
    step: f64,
}

impl PlaybackSimulator {
    pub fn new(step: f64) -> Self {
        Self {
            current_episode_id: None,
            is_playing: false,
            progress: 0.0,
            step: step.max(0.0),
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.step_percent)
    }

    /// Same episode flips play/pause and keeps progress. A different episode
    /// becomes current, starts playing, and restarts from zero.
    pub fn toggle_play(&mut self, episode_id: &str) {
        if self.is_current(episode_id) {
            self.is_playing = !self.is_playing;
        } else {
            self.current_episode_id = Some(episode_id.to_string());
            self.is_playing = true;
            self.progress = 0.0;
        }
    }

    /// Advance one period. Returns `true` if anything changed.
    ///
    /// Progress that has reached the end stops playback and rewinds on the
    /// following tick, so a full bar is visible for one frame.
    pub fn tick(&mut self) -> bool {
        if !self.is_playing {
            return false;
        }
        if self.progress >= PROGRESS_MAX {
            self.is_playing = false;
            self.progress = 0.0;
            tracing::debug!(
                "playback finished: {}",
                self.current_episode_id.as_deref().unwrap_or("-")
            );
            return true;
        }
        self.progress = (self.progress + self.step).min(PROGRESS_MAX);
        true
    }

    pub fn current_episode_id(&self) -> Option<&str> {
        self.current_episode_id.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress as a 0.0..=1.0 fraction for bar widgets.
    pub fn fraction(&self) -> f64 {
        self.progress / PROGRESS_MAX
    }

    pub fn is_current(&self, episode_id: &str) -> bool {
        self.current_episode_id.as_deref() == Some(episode_id)
    }

    /// Current and playing: decides the pause glyph / "Pause Signal" label.
    pub fn is_playing_episode(&self, episode_id: &str) -> bool {
        self.is_playing && self.is_current(episode_id)
    }
}

impl Default for PlaybackSimulator {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(sim: &mut PlaybackSimulator, n: usize) {
        for _ in 0..n {
            sim.tick();
        }
    }

    #[test]
    fn first_toggle_starts_from_zero() {
        let mut sim = PlaybackSimulator::default();
        assert_eq!(sim.current_episode_id(), None);
        sim.toggle_play("episode1");
        assert_eq!(sim.current_episode_id(), Some("episode1"));
        assert!(sim.is_playing());
        assert_eq!(sim.progress(), 0.0);
    }

    #[test]
    fn toggling_current_episode_pauses_without_reset() {
        let mut sim = PlaybackSimulator::new(1.0);
        sim.toggle_play("episode1");
        run_ticks(&mut sim, 5);
        assert_eq!(sim.progress(), 5.0);

        sim.toggle_play("episode1");
        assert!(!sim.is_playing());
        assert_eq!(sim.progress(), 5.0);

        // Paused: ticks are no-ops.
        assert!(!sim.tick());
        assert_eq!(sim.progress(), 5.0);

        sim.toggle_play("episode1");
        assert!(sim.is_playing());
        assert_eq!(sim.progress(), 5.0);
    }

    #[test]
    fn toggling_other_episode_resets_and_plays() {
        let mut sim = PlaybackSimulator::new(1.0);
        sim.toggle_play("episode1");
        run_ticks(&mut sim, 30);
        sim.toggle_play("episode1"); // pause

        sim.toggle_play("episode2");
        assert_eq!(sim.current_episode_id(), Some("episode2"));
        assert!(sim.is_playing());
        assert_eq!(sim.progress(), 0.0);
        assert!(sim.is_playing_episode("episode2"));
        assert!(!sim.is_playing_episode("episode1"));
    }

    #[test]
    fn reaching_end_stops_and_rewinds_on_next_tick() {
        let mut sim = PlaybackSimulator::new(30.0);
        sim.toggle_play("episode1");
        run_ticks(&mut sim, 3);
        assert_eq!(sim.progress(), 90.0);

        // Clamped, never overshoots.
        sim.tick();
        assert_eq!(sim.progress(), PROGRESS_MAX);
        assert!(sim.is_playing());

        assert!(sim.tick());
        assert!(!sim.is_playing());
        assert_eq!(sim.progress(), 0.0);
        assert_eq!(sim.current_episode_id(), Some("episode1"));
    }

    #[test]
    fn progress_stays_in_range_with_default_step() {
        let mut sim = PlaybackSimulator::default();
        sim.toggle_play("episode1");
        for _ in 0..2_500 {
            sim.tick();
            assert!((0.0..=PROGRESS_MAX).contains(&sim.progress()));
            if sim.progress() >= PROGRESS_MAX {
                assert!(sim.is_playing());
            }
        }
        // 0.1 per tick: the run finished well before 2500 ticks.
        assert!(!sim.is_playing());
        assert_eq!(sim.progress(), 0.0);
    }

    #[test]
    fn negative_step_is_treated_as_zero() {
        let mut sim = PlaybackSimulator::new(-5.0);
        sim.toggle_play("episode1");
        sim.tick();
        assert_eq!(sim.progress(), 0.0);
    }
}
