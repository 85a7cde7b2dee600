//! Static podcast catalog: one channel and its ordered episodes.
//!
//! The catalog is loaded once at startup and never mutated. The built-in
//! channel ships with the binary; a `catalog.toml` can replace it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display string, e.g. "Mon, 01 Dec 2025".
    pub pub_date: String,
    /// Display string, e.g. "10:00".
    pub duration: String,
    /// Placeholder; playback is simulated and never fetches this.
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastChannel {
    pub title: String,
    pub description: String,
    pub author: String,
    pub image: String,
    pub episodes: Vec<Episode>,
}

impl PodcastChannel {
    /// The channel compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            title: "Cosmic Royale with CasTo".to_string(),
            description: "The cosmic audio realm where CasTo breaks minds, flips realities, and drops raw truth with neon energy.".to_string(),
            author: "CasTo".to_string(),
            image: "https://picsum.photos/seed/cosmicroyale/800/800".to_string(),
            episodes: vec![
                Episode {
                    id: "episode1".to_string(),
                    title: "Why You Feel Stuck (And How To Break Through)".to_string(),
                    description: "You’re not broken — you're blocked. This episode clears the fog and resets your momentum. We dive deep into the energetic stagnation that plagues modern creators.".to_string(),
                    pub_date: "Mon, 01 Dec 2025".to_string(),
                    duration: "10:00".to_string(),
                    audio_url: String::new(),
                    explicit: true,
                },
                Episode {
                    id: "episode2".to_string(),
                    title: "The Hidden Signs You’re Sabotaging Yourself".to_string(),
                    description: "Laziness is a myth — self-sabotage is real. This episode exposes your internal traps, the shadow self, and the subconscious wiring keeping you tethered to the ground.".to_string(),
                    pub_date: "Tue, 02 Dec 2025".to_string(),
                    duration: "12:20".to_string(),
                    audio_url: String::new(),
                    explicit: true,
                },
            ],
        }
    }

    /// Newest episode; shown in the hero pane.
    pub fn latest(&self) -> Option<&Episode> {
        self.episodes.first()
    }

    pub fn episode(&self, id: &str) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.episodes.iter().position(|e| e.id == id)
    }

    /// Reject catalogs the UI cannot render: no episodes, or ids that collide.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.episodes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for episode in &self.episodes {
            if !seen.insert(episode.id.as_str()) {
                return Err(CatalogError::DuplicateEpisodeId(episode.id.clone()));
            }
        }
        Ok(())
    }
}

// ── TOML catalog loader ───────────────────────────────────────────────────────

/// Mirrors the on-disk layout: a `[channel]` table plus `[[episode]]` tables.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    channel: TomlChannel,
    #[serde(default)]
    episode: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
struct TomlChannel {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    image: String,
}

pub fn parse_catalog_from_toml_str(content: &str) -> Result<PodcastChannel, CatalogError> {
    let file: TomlCatalogFile = toml::from_str(content)?;
    let channel = PodcastChannel {
        title: file.channel.title,
        description: file.channel.description,
        author: file.channel.author,
        image: file.channel.image,
        episodes: file.episode,
    };
    channel.validate()?;
    Ok(channel)
}

pub fn load_catalog_from_toml(path: &Path) -> Result<PodcastChannel, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_from_toml_str(&content)
}

/// Use `path` when it exists and parses; otherwise the built-in channel.
pub fn load_catalog(path: &Path) -> PodcastChannel {
    if !path.exists() {
        return PodcastChannel::builtin();
    }
    match load_catalog_from_toml(path) {
        Ok(channel) => {
            tracing::info!(
                "loaded catalog from {} ({} episodes)",
                path.display(),
                channel.episodes.len()
            );
            channel
        }
        Err(e) => {
            tracing::warn!(
                "ignoring catalog {}: {}; using built-in catalog",
                path.display(),
                e
            );
            PodcastChannel::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_EPISODES: &str = r#"
        [channel]
        title = "Night Shift"
        author = "Vee"

        [[episode]]
        id = "ep-a"
        title = "Alpha"
        description = "first"
        pub_date = "Wed, 03 Dec 2025"
        duration = "05:00"

        [[episode]]
        id = "ep-b"
        title = "Beta"
        description = "second"
        pub_date = "Thu, 04 Dec 2025"
        duration = "06:30"
        explicit = true
    "#;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let channel = PodcastChannel::builtin();
        assert!(channel.validate().is_ok());
        let ids: HashSet<_> = channel.episodes.iter().map(|e| &e.id).collect();
        assert_eq!(ids.len(), channel.episodes.len());
        assert_eq!(channel.latest().map(|e| e.id.as_str()), Some("episode1"));
    }

    #[test]
    fn parses_toml_catalog_in_file_order() {
        let channel = parse_catalog_from_toml_str(TWO_EPISODES).unwrap();
        assert_eq!(channel.title, "Night Shift");
        assert_eq!(channel.episodes.len(), 2);
        assert_eq!(channel.episodes[0].id, "ep-a");
        assert!(!channel.episodes[0].explicit);
        assert!(channel.episodes[1].explicit);
        assert_eq!(channel.episodes[1].audio_url, "");
        assert_eq!(channel.position("ep-b"), Some(1));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dup = TWO_EPISODES.replace("ep-b", "ep-a");
        match parse_catalog_from_toml_str(&dup) {
            Err(CatalogError::DuplicateEpisodeId(id)) => assert_eq!(id, "ep-a"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn catalog_without_episodes_is_rejected() {
        let empty = "[channel]\ntitle = \"Void\"\n";
        assert!(matches!(
            parse_catalog_from_toml_str(empty),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn load_catalog_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("catalog.toml");
        assert_eq!(load_catalog(&missing), PodcastChannel::builtin());

        let mut broken = std::fs::File::create(&missing).unwrap();
        broken.write_all(b"[channel\n").unwrap();
        assert_eq!(load_catalog(&missing), PodcastChannel::builtin());
    }

    #[test]
    fn load_catalog_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, TWO_EPISODES).unwrap();
        let channel = load_catalog(&path);
        assert_eq!(channel.author, "Vee");
        assert_eq!(channel.episode("ep-b").map(|e| e.title.as_str()), Some("Beta"));
    }
}
