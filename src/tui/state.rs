// ABOUTME: TUI state: screens, the live session view, leaderboard page, and toasts.
// ABOUTME: Session snapshots and REST results are folded in here; rendering only reads it.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::api::{GitHubUser, LeaderboardResponse, Pagination, SearchOptions, UserRecord};
use crate::prefs::IgnoreList;
use crate::stream::{
    CONNECT_FAILED, ConnectionId, DerivedMetrics, LanguageLines, Lifecycle, SessionUpdate,
    SessionView, project,
};
use crate::theme::Theme;
use crate::tui::text_input::TextInput;

/// Shown when the ignore-list defaults cannot be fetched.
pub const SEARCH_OPTIONS_FAILED: &str = "Failed to fetch search options. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    User,
    Leaderboard,
}

/// Which landing field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingFocus {
    #[default]
    Username,
    NewItem,
}

/// Search form plus the customize panel for the ignore lists.
#[derive(Debug, Default)]
pub struct LandingState {
    pub username: TextInput,
    pub new_item: TextInput,
    pub focus: LandingFocus,
    pub customize_open: bool,
    pub active_list: IgnoreList,
    pub selected_item: usize,
    pub options: SearchOptions,
    pub options_loading: bool,
}

impl LandingState {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            LandingFocus::Username => &mut self.username,
            LandingFocus::NewItem => &mut self.new_item,
        }
    }

    pub fn toggle_customize(&mut self) {
        self.customize_open = !self.customize_open;
        self.focus = if self.customize_open {
            LandingFocus::NewItem
        } else {
            LandingFocus::Username
        };
    }

    pub fn switch_list(&mut self) {
        self.active_list = self.active_list.toggled();
        self.selected_item = 0;
    }

    pub fn active_items(&self) -> &[String] {
        self.options.list(self.active_list)
    }

    pub fn select_next(&mut self) {
        let len = self.active_items().len();
        if len > 0 {
            self.selected_item = (self.selected_item + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    /// Add the pending item to the active list.
    pub fn add_item(&mut self) -> bool {
        let Some(item) = self.new_item.submit() else {
            return false;
        };
        let added = self.options.add(self.active_list, &item);
        if added {
            self.selected_item = self.active_items().len().saturating_sub(1);
        }
        added
    }

    pub fn remove_selected(&mut self) -> Option<String> {
        let removed = self.options.remove_at(self.active_list, self.selected_item);
        self.clamp_selection();
        removed
    }

    pub fn clear_active(&mut self) {
        self.options.clear(self.active_list);
        self.selected_item = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.active_items().len();
        self.selected_item = self.selected_item.min(len.saturating_sub(1));
    }
}

/// Public profile lookup state for the user screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    Loading,
    Loaded(GitHubUser),
    NotFound,
    Unavailable,
}

/// Everything shown on the user statistics screen.
#[derive(Debug)]
pub struct UserScreen {
    pub username: String,
    /// The session whose updates this screen accepts.
    pub connection: Option<ConnectionId>,
    pub session: SessionView,
    pub languages: Vec<LanguageLines>,
    pub metrics: Option<DerivedMetrics>,
    pub profile: ProfileState,
    pub refreshing: bool,
}

impl UserScreen {
    pub fn new(username: impl Into<String>, connection: ConnectionId) -> Self {
        Self {
            username: username.into(),
            connection: Some(connection),
            session: SessionView::connecting(),
            languages: Vec::new(),
            metrics: None,
            profile: ProfileState::Loading,
            refreshing: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.connection.is_some() && !self.session.lifecycle.is_terminal()
    }

    fn reproject(&mut self) {
        match &self.session.result {
            Some(result) => {
                self.languages = project(&result.lines_per_language);
                self.metrics = Some(DerivedMetrics::from_lines(result.total_lines));
            }
            None => {
                self.languages.clear();
                self.metrics = None;
            }
        }
    }
}

/// One leaderboard page and its loading state.
#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub pagination: Pagination,
    pub users: Vec<UserRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LeaderboardState {
    /// Mark `page` as requested.
    pub fn request(&mut self, page: u32) {
        self.pagination.current = page.max(1);
        self.loading = true;
        self.error = None;
    }

    fn apply(&mut self, page: u32, response: LeaderboardResponse) {
        self.pagination = Pagination::new(page, response.count);
        self.users = response.users;
        self.loading = false;
        self.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient notification drawn over the bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub expires_at: Instant,
}

/// Results of background REST calls, delivered to the UI loop.
#[derive(Debug)]
pub enum ApiEvent {
    SearchOptions(Result<SearchOptions, String>),
    Leaderboard {
        page: u32,
        result: Result<LeaderboardResponse, String>,
    },
    Profile {
        username: String,
        result: Result<Option<GitHubUser>, String>,
    },
}

/// Full TUI application state.
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub theme: Theme,
    pub landing: LandingState,
    pub user: Option<UserScreen>,
    pub leaderboard: LeaderboardState,
    pub toasts: Vec<Toast>,
    pub toast_ttl: Duration,
    /// Backend address shown in the status bar.
    pub service: String,
}

impl AppState {
    pub fn new(theme: Theme, toast_ttl: Duration, service: impl Into<String>) -> Self {
        Self {
            screen: Screen::Landing,
            theme,
            landing: LandingState::default(),
            user: None,
            leaderboard: LeaderboardState::default(),
            toasts: Vec::new(),
            toast_ttl,
            service: service.into(),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Switch to the user screen for a freshly opened session.
    pub fn open_user(&mut self, username: &str, connection: ConnectionId) {
        self.user = Some(UserScreen::new(username, connection));
        self.screen = Screen::User;
    }

    /// Point the current user screen at a refresh session, keeping the profile.
    pub fn begin_refresh(&mut self, connection: ConnectionId) {
        if let Some(user) = self.user.as_mut() {
            user.connection = Some(connection);
            user.session = SessionView::connecting();
            user.refreshing = true;
            user.reproject();
        }
    }

    /// Stop accepting updates for the user screen's session.
    pub fn cancel_session(&mut self) {
        if let Some(user) = self.user.as_mut()
            && user.is_busy()
        {
            user.connection = None;
            user.refreshing = false;
            user.session = user.session.clone().failed("Analysis cancelled");
        }
    }

    pub fn go_landing(&mut self) {
        self.user = None;
        self.screen = Screen::Landing;
    }

    pub fn open_leaderboard(&mut self) {
        self.screen = Screen::Leaderboard;
    }

    /// Fold a session snapshot into the user screen. Snapshots from any
    /// connection other than the current one are dropped. Returns whether
    /// the update was applied.
    pub fn apply_session_update(&mut self, update: SessionUpdate, now: Instant) -> bool {
        let Some(user) = self.user.as_mut() else {
            return false;
        };
        if user.connection != Some(update.connection) {
            debug!(connection = %update.connection, "stale session update dropped");
            return false;
        }

        let was_terminal = user.session.lifecycle.is_terminal();
        let result_changed = user.session.result != update.view.result;
        user.session = update.view;
        if result_changed {
            user.reproject();
        }

        let mut toast = None;
        if !was_terminal {
            match &user.session.lifecycle {
                Lifecycle::Completed => {
                    if user.refreshing {
                        toast = Some((
                            ToastKind::Success,
                            "Refreshed",
                            "Statistics are up to date.".to_string(),
                        ));
                    }
                    user.refreshing = false;
                }
                Lifecycle::Failed(reason) => {
                    let title = if reason == CONNECT_FAILED {
                        "Connection error"
                    } else {
                        "Analysis failed"
                    };
                    toast = Some((ToastKind::Error, title, reason.clone()));
                    user.refreshing = false;
                }
                _ => {}
            }
        }
        if let Some((kind, title, message)) = toast {
            self.push_toast(kind, title, message, now);
        }
        true
    }

    pub fn apply_api_event(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::SearchOptions(Ok(options)) => {
                self.landing.options = options;
                self.landing.options_loading = false;
                self.landing.clamp_selection();
            }
            ApiEvent::SearchOptions(Err(_)) => {
                self.landing.options_loading = false;
                self.push_toast(ToastKind::Error, "Error", SEARCH_OPTIONS_FAILED, now);
            }
            ApiEvent::Leaderboard { page, result } => {
                if page != self.leaderboard.pagination.current {
                    debug!(page, "stale leaderboard page dropped");
                    return;
                }
                match result {
                    Ok(response) => self.leaderboard.apply(page, response),
                    Err(e) => {
                        self.leaderboard.loading = false;
                        self.leaderboard.error = Some(e);
                        self.push_toast(
                            ToastKind::Error,
                            "Error",
                            "Failed to load the leaderboard.",
                            now,
                        );
                    }
                }
            }
            ApiEvent::Profile { username, result } => {
                let Some(user) = self.user.as_mut().filter(|u| u.username == username) else {
                    return;
                };
                user.profile = match result {
                    Ok(Some(profile)) => ProfileState::Loaded(profile),
                    Ok(None) => ProfileState::NotFound,
                    Err(_) => ProfileState::Unavailable,
                };
            }
        }
    }

    pub fn push_toast(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.toasts.push(Toast {
            kind,
            title: title.into(),
            message: message.into(),
            expires_at: now + self.toast_ttl,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }
}
