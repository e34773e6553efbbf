// ABOUTME: App orchestrator. Wires together the REST client, connection manager, preferences, and TUI.
// ABOUTME: Runs the ratatui event loop and turns key actions into sessions and background fetches.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::prefs::{SearchPreferences, default_request, load_preferences, save_preferences};
use crate::stream::{ConnectionManager, SessionRequest, SessionUpdate};
use crate::tui::input::{Action, handle_key};
use crate::tui::state::{ApiEvent, AppState, Screen, ToastKind};
use crate::tui::text_input::TextInput;
use crate::tui::ui;

/// Which screen the TUI opens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartScreen {
    Landing,
    User(String),
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    start: StartScreen,
}

impl App {
    pub fn new(config: Config, start: StartScreen) -> Self {
        Self { config, start }
    }

    /// Set up subsystems, then drive the TUI until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let api = ApiClient::new(&self.config.service)?;
        let (session_tx, mut session_rx) = mpsc::channel::<SessionUpdate>(64);
        let (api_tx, mut api_rx) = mpsc::channel::<ApiEvent>(16);

        let mut state = AppState::new(
            self.config.ui.theme,
            Duration::from_secs(self.config.ui.toast_seconds),
            self.config.service.api_url.clone(),
        );
        let mut controller = Controller {
            api,
            api_tx,
            manager: ConnectionManager::new(session_tx),
            ws_url: self.config.service.ws_url.clone(),
        };

        controller.load_search_options(&mut state);
        if let StartScreen::User(username) = &self.start {
            let request = controller.cached_request(username);
            controller.start_session(&mut state, username, request);
        }

        info!(api_url = %self.config.service.api_url, "starting tui");
        let mut terminal = ratatui::init();
        let tick = Duration::from_millis(self.config.ui.tick_millis.max(16));
        let result = event_loop(
            &mut terminal,
            &mut state,
            &mut controller,
            &mut session_rx,
            &mut api_rx,
            tick,
        )
        .await;

        controller.manager.shutdown().await;
        ratatui::restore();
        result
    }
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    controller: &mut Controller,
    session_rx: &mut mpsc::Receiver<SessionUpdate>,
    api_rx: &mut mpsc::Receiver<ApiEvent>,
    tick: Duration,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick);

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    let action = handle_key(state, key);
                    if controller.execute(state, action).is_break() {
                        return Ok(());
                    }
                }
                // Resize and focus events only need a redraw.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(update) = session_rx.recv() => {
                if controller.manager.accepts(update.connection) {
                    state.apply_session_update(update, Instant::now());
                }
            }
            Some(event) = api_rx.recv() => state.apply_api_event(event, Instant::now()),
            _ = ticker.tick() => state.expire_toasts(Instant::now()),
        }
    }
}

/// Side-effecting half of the app: sessions, persistence, and REST fetches.
struct Controller {
    api: ApiClient,
    api_tx: mpsc::Sender<ApiEvent>,
    manager: ConnectionManager,
    ws_url: String,
}

impl Controller {
    fn execute(&mut self, state: &mut AppState, action: Action) -> ControlFlow<()> {
        match action {
            Action::None => {}
            Action::Quit => return ControlFlow::Break(()),
            Action::Submit { username } => {
                let prefs = SearchPreferences::for_submission(&username, &state.landing.options);
                if let Err(e) = save_preferences(&prefs) {
                    warn!(error = %e, "failed to save search preferences");
                    state.push_toast(
                        ToastKind::Error,
                        "Error",
                        "Could not save search preferences.",
                        Instant::now(),
                    );
                }
                let request = prefs.request_for(&username);
                self.start_session(state, &username, request);
            }
            Action::OpenLeaderboard => {
                self.leave_user_screen(state);
                state.open_leaderboard();
                if state.leaderboard.users.is_empty() && !state.leaderboard.loading {
                    let page = state.leaderboard.pagination.current;
                    self.load_leaderboard(state, page);
                }
            }
            Action::OpenLanding => {
                self.leave_user_screen(state);
                state.go_landing();
            }
            Action::LoadLeaderboardPage(page) => self.load_leaderboard(state, page),
            Action::Refresh => {
                if let Some(username) = state.user.as_ref().map(|u| u.username.clone()) {
                    let request = self.cached_request(&username);
                    let id = self.manager.open_refresh(&self.api, request);
                    info!(connection = %id, username = %username, "refresh started");
                    state.begin_refresh(id);
                }
            }
            Action::CancelSession => {
                self.manager.cancel();
                state.cancel_session();
            }
        }
        ControlFlow::Continue(())
    }

    /// Tear down the live session when navigating away from the user screen.
    fn leave_user_screen(&mut self, state: &mut AppState) {
        if state.screen == Screen::User {
            self.manager.cancel();
            state.cancel_session();
        }
    }

    /// Session request built from the cached ignore lists, or sentinels when
    /// nothing has been cached yet.
    fn cached_request(&self, username: &str) -> SessionRequest {
        match load_preferences() {
            Ok(Some(prefs)) => prefs.request_for(username),
            Ok(None) => default_request(username),
            Err(e) => {
                warn!(error = %e, "unreadable search preferences; using defaults");
                default_request(username)
            }
        }
    }

    fn start_session(&mut self, state: &mut AppState, username: &str, request: SessionRequest) {
        let id = self.manager.open_socket(&self.ws_url, request);
        info!(connection = %id, username, "analysis started");
        state.open_user(username, id);
        self.fetch_profile(username.to_string());
    }

    /// Fill the customize panel from the cache, falling back to the backend defaults.
    fn load_search_options(&self, state: &mut AppState) {
        match load_preferences() {
            Ok(Some(prefs)) => {
                state.landing.options = prefs.options();
                state.landing.username = TextInput::with_value(prefs.username);
                return;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "unreadable search preferences; fetching defaults"),
        }

        state.landing.options_loading = true;
        let api = self.api.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.search_options().await.map_err(|e| {
                warn!(error = %e, "failed to fetch search options");
                e.to_string()
            });
            let _ = tx.send(ApiEvent::SearchOptions(result)).await;
        });
    }

    fn load_leaderboard(&self, state: &mut AppState, page: u32) {
        state.leaderboard.request(page);
        let page = state.leaderboard.pagination.current;
        let api = self.api.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.leaderboard(page).await.map_err(|e| {
                warn!(page, error = %e, "failed to fetch leaderboard");
                e.to_string()
            });
            let _ = tx.send(ApiEvent::Leaderboard { page, result }).await;
        });
    }

    fn fetch_profile(&self, username: String) {
        let api = self.api.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.profile(&username).await.map_err(|e| {
                warn!(username = %username, error = %e, "failed to fetch profile");
                e.to_string()
            });
            let _ = tx.send(ApiEvent::Profile { username, result }).await;
        });
    }
}
