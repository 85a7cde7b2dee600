pub mod catalog;
pub mod chat;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gemini;
pub mod persona;
pub mod platform;
pub mod playback;
pub mod transcript;

pub use catalog::{Episode, PodcastChannel};
pub use chat::{ChatSession, OutboundTurn};
pub use config::Config;
pub use dispatcher::ChatDispatcher;
pub use playback::PlaybackSimulator;
pub use transcript::{ChatMessage, Role, Transcript};
