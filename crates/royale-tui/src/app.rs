//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message or timer.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Chat turns run on spawned tasks and come back as `AppMessage::ChatReply`.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use royale_core::{ChatDispatcher, Config, PlaybackSimulator, PodcastChannel};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        about_card::AboutCard, chat_panel::ChatPanel, episode_list::EpisodeList, header::Header,
        help_overlay::HelpOverlay, hero_panel::HeroPanel, log_panel::LogPanel,
        now_playing::{roll_levels, NowPlaying},
    },
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
    workspace::WorkspaceManager,
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A finished chat turn, tagged with the panel epoch it was sent from.
    ChatReply { epoch: u64, reply: String },
}

const UI_TICK: Duration = Duration::from_millis(100);
const VISUALIZER_TICK: Duration = Duration::from_millis(300);
const LOG_REFRESH: Duration = Duration::from_secs(2);
const LOG_TAIL_LINES: usize = 500;
const CHAT_PANEL_MIN_WIDTH: u16 = 44;

/// Last-drawn layout rects, used by `handle_mouse` for hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    header: Rect,
    hero: Rect,
    episode_list: Rect,
    about: Rect,
    now_playing: Rect,
    chat_panel: Rect,
    log_panel: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    state: AppState,
    wm: WorkspaceManager,
    toast: ToastManager,
    dispatcher: ChatDispatcher,
    /// Env var holding the API key, for user-facing hints.
    api_key_env: String,
    playback_tick: Duration,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    hero: HeroPanel,
    episode_list: EpisodeList,
    about: AboutCard,
    now_playing: NowPlaying,
    chat_panel: ChatPanel,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,

    pane_areas: PaneAreas,
    msg_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(
        channel: PodcastChannel,
        config: &Config,
        dispatcher: ChatDispatcher,
        tui_log_path: PathBuf,
    ) -> Self {
        let playback = PlaybackSimulator::from_config(&config.playback);
        let episode_list = EpisodeList::new(&channel);
        let mut state = AppState::new(channel, playback, tui_log_path);
        state.has_credential = dispatcher.has_credential();

        Self {
            state,
            wm: WorkspaceManager::new(),
            toast: ToastManager::new(),
            dispatcher,
            api_key_env: config.chat.api_key_env.clone(),
            playback_tick: Duration::from_millis(config.playback.tick_millis.max(10)),
            header: Header::new(),
            hero: HeroPanel::new(),
            episode_list,
            about: AboutCard::new(),
            now_playing: NowPlaying::new(),
            chat_panel: ChatPanel::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            pane_areas: PaneAreas::default(),
            msg_tx: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.msg_tx = Some(tx.clone());

        info!(
            "cosmic royale started: {} episodes, model {}",
            self.state.channel.episodes.len(),
            self.dispatcher.model()
        );
        if !self.state.has_credential {
            self.toast.warning(format!(
                "{} not set: the CasTo uplink is offline",
                self.api_key_env
            ));
        }

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut playback_tick = tokio::time::interval(self.playback_tick);
        playback_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry, typing dots, pulsing dot.
        let mut ui_tick = tokio::time::interval(UI_TICK);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut viz_tick = tokio::time::interval(VISUALIZER_TICK);
        viz_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // royale.log tail refresh: every 2s, only when the log panel is open
        let mut log_refresh = tokio::time::interval(LOG_REFRESH);
        log_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = playback_tick.tick() => {
                    needs_redraw = self.state.playback.tick();
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    self.state.frame = self.state.frame.wrapping_add(1);
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.hero.tick(s));
                        all.extend(self.episode_list.tick(s));
                        all.extend(self.chat_panel.tick(s));
                        all.extend(self.log_panel.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw = true;
                }

                _ = viz_tick.tick() => {
                    self.reroll_visualizer();
                    needs_redraw = true;
                }

                _ = log_refresh.tick() => {
                    self.state.has_credential = self.dispatcher.has_credential();
                    if self.wm.show_log_panel {
                        self.reload_tui_log();
                    }
                    needs_redraw = true;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Returns true when the screen should be redrawn.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(..) => {}
                _ => return false,
            },
            AppMessage::ChatReply { epoch, reply } => self.on_chat_reply(epoch, reply),
        }
        true
    }

    /// Land a finished turn, unless the panel it belongs to was closed.
    fn on_chat_reply(&mut self, epoch: u64, reply: String) {
        if epoch != self.wm.chat_epoch {
            debug!(
                "chat: dropping reply from epoch {} (now {})",
                epoch, self.wm.chat_epoch
            );
            self.state.chat.abandon();
            self.toast.warning("uplink closed before CasTo replied");
            return;
        }
        self.state.chat.complete(reply);
    }

    // ── Keyboard handling ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.wm.show_help {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        // Chat mode: everything else belongs to the input line.
        if self.state.input_mode == InputMode::Chat {
            return self.chat_panel.handle_key(key, &self.state);
        }

        if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('L') => return vec![Action::ToggleLogs],
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                KeyCode::Char('c') => return vec![Action::OpenChat],
                KeyCode::Char('h') => return vec![Action::ToggleLatest],
                KeyCode::Esc if self.wm.show_chat => return vec![Action::CloseChat],
                _ => {}
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.wm.focused() {
            Some(ComponentId::HeroPanel) => self.hero.handle_key(key, s),
            Some(ComponentId::EpisodeList) => self.episode_list.handle_key(key, s),
            Some(ComponentId::ChatPanel) => self.chat_panel.handle_key(key, s),
            Some(ComponentId::LogPanel) => self.log_panel.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.wm.show_help {
            return vec![];
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;

        // Focusable panes: focus follows the click.
        macro_rules! click_pane {
            ($id:expr, $component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if self.wm.focused() != Some($id) {
                    actions.insert(0, Action::FocusPane($id));
                }
                return actions;
            }};
        }

        // Front to back: the chat panel overlays the body.
        if hit(areas.chat_panel, col, row) {
            click_pane!(ComponentId::ChatPanel, self.chat_panel, areas.chat_panel);
        }
        if hit(areas.header, col, row) {
            return self.header.handle_mouse(event, areas.header, s);
        }
        if hit(areas.hero, col, row) {
            click_pane!(ComponentId::HeroPanel, self.hero, areas.hero);
        }
        if hit(areas.episode_list, col, row) {
            click_pane!(ComponentId::EpisodeList, self.episode_list, areas.episode_list);
        }
        if hit(areas.about, col, row) {
            return self.about.handle_mouse(event, areas.about, s);
        }
        if hit(areas.now_playing, col, row) {
            return self.now_playing.handle_mouse(event, areas.now_playing, s);
        }
        if hit(areas.log_panel, col, row) {
            click_pane!(ComponentId::LogPanel, self.log_panel, areas.log_panel);
        }

        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first, then the App applies it.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.hero.on_action(&action, s));
            out.extend(self.episode_list.on_action(&action, s));
            out.extend(self.about.on_action(&action, s));
            out.extend(self.now_playing.on_action(&action, s));
            out.extend(self.chat_panel.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are applied once, not re-broadcast.
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Playback ──────────────────────────────────────────────────────
            Action::TogglePlay(id) => self.toggle_episode(&id),
            Action::ToggleLatest => {
                if let Some(id) = self.state.latest_episode().map(|e| e.id.clone()) {
                    self.episode_list
                        .on_action(&Action::SelectEpisode(id.clone()), &self.state);
                    self.toggle_episode(&id);
                }
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.wm.focus_next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.wm.focus_prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.wm.focus_set(id);
                self.sync_input_mode();
            }
            Action::SelectEpisode(_) => {}

            // ── Chat ──────────────────────────────────────────────────────────
            Action::OpenChat => {
                self.wm.open_chat();
                self.sync_input_mode();
            }
            Action::CloseChat => {
                let epoch = self.wm.close_chat();
                if self.state.chat.is_loading() {
                    debug!("chat: panel closed with a turn in flight (epoch now {})", epoch);
                }
                self.sync_input_mode();
            }
            Action::SubmitChat(text) => self.submit_chat(&text),
            Action::CopyLastReply => {
                match self.state.chat.transcript().last_model_text() {
                    Some(text) => self.copy_to_clipboard(text.to_string()),
                    None => self.toast.info("nothing to copy yet"),
                }
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleLogs => {
                self.wm.toggle_log_panel();
                if self.wm.show_log_panel {
                    self.reload_tui_log();
                    self.wm.focus_set(ComponentId::LogPanel);
                }
                self.sync_input_mode();
            }
            Action::ToggleHelp => {
                self.wm.show_help = !self.wm.show_help;
            }
            Action::ToggleKeys => {
                self.wm.show_keys_bar = !self.wm.show_keys_bar;
            }
            Action::CopyToClipboard(text) => self.copy_to_clipboard(text),

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
        }
    }

    fn toggle_episode(&mut self, id: &str) {
        if self.state.channel.episode(id).is_none() {
            warn!("toggle_play: unknown episode {}", id);
            return;
        }
        self.state.playback.toggle_play(id);
        info!(
            "playback: {} {}",
            if self.state.playback.is_playing() { "playing" } else { "paused" },
            id
        );
        self.reroll_visualizer();
    }

    fn submit_chat(&mut self, text: &str) {
        let Some(turn) = self.state.chat.begin_send(text) else {
            return;
        };
        let Some(tx) = self.msg_tx.clone() else {
            warn!("chat: event loop not running, dropping turn");
            self.state.chat.abandon();
            return;
        };
        let epoch = self.wm.chat_epoch;
        let dispatcher = self.dispatcher.clone();
        debug!("chat: sending turn (epoch {}, {} history entries)", epoch, turn.history.len());
        tokio::spawn(async move {
            let reply = dispatcher.resolve(&turn).await;
            let _ = tx.send(AppMessage::ChatReply { epoch, reply }).await;
        });
    }

    fn copy_to_clipboard(&mut self, text: String) {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
            Ok(()) => {
                let display = if text.chars().count() > 40 {
                    format!("{}…", text.chars().take(40).collect::<String>())
                } else {
                    text
                };
                self.toast.success(format!("copied: {}", display));
            }
            Err(e) => {
                warn!("clipboard error: {}", e);
                self.toast.error(format!("clipboard error: {}", e));
            }
        }
    }

    fn reroll_visualizer(&mut self) {
        self.state.visualizer = roll_levels(&mut rand::thread_rng(), self.state.playback.is_playing());
    }

    /// Read the last lines of royale.log into state.tui_log_lines.
    fn reload_tui_log(&mut self) {
        if let Ok(content) = std::fs::read_to_string(&self.state.tui_log_path) {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(LOG_TAIL_LINES);
            self.state.tui_log_lines = lines[start..].iter().map(|l| l.to_string()).collect();
        }
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.wm.focused() == Some(ComponentId::ChatPanel) {
            InputMode::Chat
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: header | body | (log) | status ──────────────────────
        let log_h = if self.wm.show_log_panel { 10u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(log_h),
                Constraint::Length(1),
            ])
            .split(area);
        let (header_area, body_area, log_area, status_area) = (outer[0], outer[1], outer[2], outer[3]);

        self.header.draw(frame, header_area, false, &self.state);
        self.pane_areas.header = header_area;

        // ── Body: main column | sidebar ───────────────────────────────────────
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(body_area);
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(columns[0]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(columns[1]);

        let focus = &self.wm.focus;
        self.hero
            .draw(frame, main[0], focus.is_focused(ComponentId::HeroPanel), &self.state);
        self.episode_list.draw(
            frame,
            main[1],
            focus.is_focused(ComponentId::EpisodeList),
            &self.state,
        );
        self.about.draw(frame, side[0], false, &self.state);
        self.now_playing.draw(frame, side[1], false, &self.state);
        self.pane_areas.hero = main[0];
        self.pane_areas.episode_list = main[1];
        self.pane_areas.about = side[0];
        self.pane_areas.now_playing = side[1];

        // ── Chat panel slides over the right side of the body ─────────────────
        if self.wm.show_chat {
            let chat_area = chat_panel_rect(body_area);
            self.chat_panel.draw(
                frame,
                chat_area,
                focus.is_focused(ComponentId::ChatPanel),
                &self.state,
            );
            self.pane_areas.chat_panel = chat_area;
        } else {
            self.pane_areas.chat_panel = Rect::default();
        }

        // ── Log panel ─────────────────────────────────────────────────────────
        if self.wm.show_log_panel {
            self.log_panel.draw(
                frame,
                log_area,
                focus.is_focused(ComponentId::LogPanel),
                &self.state,
            );
            self.pane_areas.log_panel = log_area;
        } else {
            self.pane_areas.log_panel = Rect::default();
        }

        // ── Status bar / footer ───────────────────────────────────────────────
        if self.wm.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                status_area,
                self.state.input_mode,
                self.state.playback.is_playing(),
            );
        } else {
            status_bar::draw_footer(frame, status_area);
        }

        if self.wm.show_help {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        self.toast.draw(frame, area);
    }
}

/// Right-hand slice of `body` for the chat panel: 40% wide, at least
/// `CHAT_PANEL_MIN_WIDTH` columns, never wider than the body.
fn chat_panel_rect(body: Rect) -> Rect {
    let width = (body.width * 2 / 5).max(CHAT_PANEL_MIN_WIDTH).min(body.width);
    Rect {
        x: body.x + body.width - width,
        width,
        ..body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use royale_core::dispatcher::{CredentialSource, EMPTY_RESPONSE_FALLBACK};
    use royale_core::gemini::GeminiBackend;
    use royale_core::Role;
    use std::sync::Arc;

    fn app() -> App {
        let channel = PodcastChannel::builtin();
        let dispatcher = ChatDispatcher::new(
            Arc::new(GeminiBackend::new()),
            CredentialSource::Fixed(None),
            "gemini-2.5-flash",
            "persona",
        );
        App::new(channel, &Config::default(), dispatcher, PathBuf::from("royale.log"))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        for a in app.handle_key(key(code)) {
            app.dispatch(a);
        }
    }

    #[test]
    fn test_enter_toggles_selected_episode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(app.state.is_playing_episode("episode2"));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.state.playback.is_playing());
        assert_eq!(app.state.playback.current_episode_id(), Some("episode2"));
    }

    #[test]
    fn test_h_toggles_latest_and_selects_it() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('h'));
        assert!(app.state.is_playing_episode("episode1"));
        assert_eq!(app.episode_list.selected_id(), Some("episode1"));
    }

    #[test]
    fn test_chat_mode_routes_letters_to_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert!(app.wm.show_chat);
        assert_eq!(app.state.input_mode, InputMode::Chat);

        // 'q' and 'h' are text here, not commands.
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('h'));
        assert!(!app.should_quit);
        assert!(!app.state.playback.is_playing());
        assert_eq!(app.chat_panel.input.text(), "qh");

        press(&mut app, KeyCode::Esc);
        assert!(!app.wm.show_chat);
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_tab_out_of_chat_returns_to_normal_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.wm.focused(), Some(ComponentId::HeroPanel));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reply_lands_in_open_panel() {
        let mut app = app();
        app.wm.open_chat();
        let turn = app.state.chat.begin_send("hi");
        assert!(turn.is_some());
        let epoch = app.wm.chat_epoch;
        app.on_chat_reply(epoch, "hello".into());

        let messages = app.state.chat.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, Role::Model);
        assert_eq!(messages[2].text, "hello");
        assert!(!app.state.chat.is_loading());
    }

    #[test]
    fn test_reply_after_close_is_discarded() {
        let mut app = app();
        app.wm.open_chat();
        app.state.chat.begin_send("hi");
        let epoch = app.wm.chat_epoch;
        app.dispatch(Action::CloseChat);
        app.on_chat_reply(epoch, EMPTY_RESPONSE_FALLBACK.into());

        assert_eq!(app.state.chat.transcript().len(), 2);
        assert!(!app.state.chat.is_loading());
        assert!(!app.toast.is_empty());

        // Transcript survives close and reopen.
        app.dispatch(Action::OpenChat);
        assert_eq!(app.state.chat.transcript().len(), 2);
    }

    #[test]
    fn test_help_consumes_keys_until_closed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.wm.show_help);
        assert!(app.help_overlay.visible);

        // Other keys are consumed and leave help open.
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(app.wm.show_help);
        assert!(app.help_overlay.visible);
        assert!(!app.state.playback.is_playing());
        assert_eq!(app.episode_list.selected_id(), Some("episode1"));

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert!(!app.wm.show_help);
        assert!(!app.help_overlay.visible);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        let actions = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(actions.as_slice(), [Action::Quit]));
    }

    #[test]
    fn test_chat_panel_rect() {
        let body = Rect::new(0, 2, 120, 30);
        let r = chat_panel_rect(body);
        assert_eq!(r.width, 48);
        assert_eq!(r.x + r.width, 120);

        let narrow = chat_panel_rect(Rect::new(0, 0, 60, 10));
        assert_eq!(narrow.width, 44);
        let tiny = chat_panel_rect(Rect::new(0, 0, 30, 10));
        assert_eq!(tiny.width, 30);
    }
}
