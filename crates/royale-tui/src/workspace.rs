//! WorkspaceManager — which overlays are open and who has focus.
//!
//! Tracks:
//! - the chat side panel and its epoch (bumped on every close)
//! - help overlay, log panel and keys bar visibility
//! - the FocusRing for whatever panes are currently on screen

use crate::action::ComponentId;
use crate::focus::FocusRing;

pub struct WorkspaceManager {
    pub show_chat: bool,
    /// Incremented whenever the chat panel closes. A reply tagged with an
    /// older epoch belongs to a panel the user already dismissed.
    pub chat_epoch: u64,

    pub show_log_panel: bool,
    pub show_help: bool,
    pub show_keys_bar: bool,

    pub focus: FocusRing,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        let mut wm = Self {
            show_chat: false,
            chat_epoch: 0,
            show_log_panel: false,
            show_help: false,
            show_keys_bar: true,
            focus: FocusRing::default(),
        };
        wm.rebuild_focus_ring();
        wm.focus.set(ComponentId::EpisodeList);
        wm
    }

    pub fn rebuild_focus_ring(&mut self) {
        let mut items = vec![ComponentId::HeroPanel, ComponentId::EpisodeList];
        if self.show_chat {
            items.push(ComponentId::ChatPanel);
        }
        if self.show_log_panel {
            items.push(ComponentId::LogPanel);
        }
        self.focus.set_items(items);
    }

    /// Open the chat panel and move focus into it.
    pub fn open_chat(&mut self) {
        if !self.show_chat {
            self.show_chat = true;
            self.rebuild_focus_ring();
        }
        self.focus.set(ComponentId::ChatPanel);
    }

    /// Close the chat panel. Returns the new epoch.
    pub fn close_chat(&mut self) -> u64 {
        if self.show_chat {
            self.show_chat = false;
            self.chat_epoch += 1;
            self.rebuild_focus_ring();
            self.focus.set(ComponentId::EpisodeList);
        }
        self.chat_epoch
    }

    pub fn toggle_log_panel(&mut self) {
        self.show_log_panel = !self.show_log_panel;
        self.rebuild_focus_ring();
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.current()
    }

    pub fn focus_next(&mut self) -> Option<ComponentId> {
        self.focus.next()
    }

    pub fn focus_prev(&mut self) -> Option<ComponentId> {
        self.focus.prev()
    }

    pub fn focus_set(&mut self, id: ComponentId) {
        self.focus.set(id);
    }
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}
