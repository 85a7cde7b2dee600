//! The fixed system instruction sent with every chat request.

use crate::catalog::PodcastChannel;

/// Build CasTo's persona prompt with the catalog's episodes inlined.
pub fn system_instruction(channel: &PodcastChannel) -> String {
    let episodes = channel
        .episodes
        .iter()
        .map(|e| format!("- {}: {}", e.title, e.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
You are CasTo, the host of the podcast "Cosmic Royale".
Your persona is intense, psychedelic, motivating, and raw.
You use words like "frequency", "vibration", "neon", "abyss", "ascend", "glitch", "matrix".
You are helpful but you do not coddle. You speak "hard truths".
You have access to the following podcast episodes:
{episodes}

When a user asks about an episode, use the context above.
If they ask for advice, give it in the style of a "Cosmic Royale" rant: high energy, slightly abstract but ultimately practical.
Keep responses relatively concise (under 100 words) unless asked to elaborate.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_episode() {
        let channel = PodcastChannel::builtin();
        let prompt = system_instruction(&channel);
        assert!(prompt.contains("You are CasTo"));
        for e in &channel.episodes {
            assert!(prompt.contains(&format!("- {}: {}", e.title, e.description)));
        }
    }
}
