pub mod about_card;
pub mod chat_panel;
pub mod episode_list;
pub mod header;
pub mod help_overlay;
pub mod hero_panel;
pub mod log_panel;
pub mod now_playing;
