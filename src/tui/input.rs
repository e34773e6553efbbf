// ABOUTME: Keyboard input handling for the TUI. Translates key events into actions.
// ABOUTME: Global shortcuts first, then per-screen bindings for landing, user, and leaderboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::state::{AppState, LandingFocus, Screen};

/// Work the app loop must do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Persist preferences and start a session for this username.
    Submit { username: String },
    OpenLeaderboard,
    OpenLanding,
    LoadLeaderboardPage(u32),
    Refresh,
    CancelSession,
}

/// Process a key event against the current state and return the resulting action.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('t') => {
                state.toggle_theme();
                return Action::None;
            }
            KeyCode::Char('l') => return Action::OpenLeaderboard,
            _ => {}
        }
    }

    match state.screen {
        Screen::Landing => handle_landing_key(state, key),
        Screen::User => handle_user_key(state, key),
        Screen::Leaderboard => handle_leaderboard_key(state, key),
    }
}

fn handle_landing_key(state: &mut AppState, key: KeyEvent) -> Action {
    let landing = &mut state.landing;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('o') => landing.toggle_customize(),
            KeyCode::Char('e') if landing.customize_open => landing.switch_list(),
            KeyCode::Char('d') if landing.customize_open => {
                landing.remove_selected();
            }
            KeyCode::Char('x') if landing.customize_open => landing.clear_active(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc if landing.customize_open => {
            landing.toggle_customize();
            Action::None
        }
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::BackTab if landing.customize_open => {
            landing.focus = match landing.focus {
                LandingFocus::Username => LandingFocus::NewItem,
                LandingFocus::NewItem => LandingFocus::Username,
            };
            Action::None
        }
        KeyCode::Up if landing.customize_open => {
            landing.select_prev();
            Action::None
        }
        KeyCode::Down if landing.customize_open => {
            landing.select_next();
            Action::None
        }
        KeyCode::Enter => match landing.focus {
            LandingFocus::Username => {
                if landing.username.is_blank() {
                    Action::None
                } else {
                    Action::Submit {
                        username: landing.username.value().trim().to_string(),
                    }
                }
            }
            LandingFocus::NewItem => {
                landing.add_item();
                Action::None
            }
        },
        code => {
            edit_text(landing.focused_input(), code);
            Action::None
        }
    }
}

fn handle_user_key(state: &mut AppState, key: KeyEvent) -> Action {
    let busy = state.user.as_ref().is_some_and(|u| u.is_busy());
    match key.code {
        KeyCode::Esc => Action::OpenLanding,
        KeyCode::Char('c') if busy => Action::CancelSession,
        KeyCode::Char('r') if !busy && state.user.is_some() => Action::Refresh,
        _ => Action::None,
    }
}

fn handle_leaderboard_key(state: &mut AppState, key: KeyEvent) -> Action {
    let board = &state.leaderboard;
    if board.loading {
        return match key.code {
            KeyCode::Esc => Action::OpenLanding,
            _ => Action::None,
        };
    }
    let pagination = board.pagination;
    let target = match key.code {
        KeyCode::Esc => return Action::OpenLanding,
        KeyCode::Home | KeyCode::Char('f') => pagination.first(),
        KeyCode::Left | KeyCode::Char('p') => pagination.prev(),
        KeyCode::Right | KeyCode::Char('n') => pagination.next(),
        KeyCode::End | KeyCode::Char('l') => pagination.last(),
        KeyCode::Char('r') => Some(pagination.current),
        _ => None,
    };
    match target {
        Some(page) => Action::LoadLeaderboardPage(page),
        None => Action::None,
    }
}

fn edit_text(input: &mut crate::tui::text_input::TextInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::api::Pagination;
    use crate::prefs::IgnoreList;
    use crate::stream::ConnectionId;
    use crate::theme::Theme;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn state() -> AppState {
        AppState::new(Theme::Dark, Duration::from_secs(5), "svc")
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(state, make_key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_then_enter_submits_trimmed_username() {
        let mut s = state();
        type_str(&mut s, " octocat ");
        assert_eq!(
            handle_key(&mut s, make_key(KeyCode::Enter)),
            Action::Submit {
                username: "octocat".to_string()
            }
        );
    }

    #[test]
    fn enter_on_blank_username_does_nothing() {
        let mut s = state();
        type_str(&mut s, "   ");
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn global_shortcuts() {
        let mut s = state();
        assert_eq!(handle_key(&mut s, ctrl('c')), Action::Quit);
        assert_eq!(handle_key(&mut s, ctrl('q')), Action::Quit);
        assert_eq!(handle_key(&mut s, ctrl('l')), Action::OpenLeaderboard);
        assert_eq!(handle_key(&mut s, ctrl('t')), Action::None);
        assert_eq!(s.theme, Theme::Light);
    }

    #[test]
    fn esc_closes_customize_before_quitting() {
        let mut s = state();
        handle_key(&mut s, ctrl('o'));
        assert!(s.landing.customize_open);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Esc)), Action::None);
        assert!(!s.landing.customize_open);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn customize_panel_keys_edit_lists() {
        let mut s = state();
        handle_key(&mut s, ctrl('o'));
        type_str(&mut s, "node_modules");
        handle_key(&mut s, make_key(KeyCode::Enter));
        type_str(&mut s, "dist");
        handle_key(&mut s, make_key(KeyCode::Enter));
        assert_eq!(s.landing.options.ignore_dirs, vec!["node_modules", "dist"]);

        handle_key(&mut s, make_key(KeyCode::Up));
        handle_key(&mut s, ctrl('d'));
        assert_eq!(s.landing.options.ignore_dirs, vec!["dist"]);

        handle_key(&mut s, ctrl('e'));
        assert_eq!(s.landing.active_list, IgnoreList::Extensions);
        type_str(&mut s, ".md");
        handle_key(&mut s, make_key(KeyCode::Enter));
        handle_key(&mut s, ctrl('x'));
        assert!(s.landing.options.ignore_extensions.is_empty());
        assert_eq!(s.landing.options.ignore_dirs, vec!["dist"]);
    }

    #[test]
    fn tab_moves_focus_back_to_username() {
        let mut s = state();
        handle_key(&mut s, ctrl('o'));
        handle_key(&mut s, make_key(KeyCode::Tab));
        type_str(&mut s, "octocat");
        assert_eq!(s.landing.username.value(), "octocat");
        assert_eq!(s.landing.new_item.value(), "");
    }

    #[test]
    fn user_screen_cancel_and_refresh_depend_on_session() {
        let mut s = state();
        s.open_user("octocat", ConnectionId(1));
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Char('r'))), Action::None);
        assert_eq!(
            handle_key(&mut s, make_key(KeyCode::Char('c'))),
            Action::CancelSession
        );

        s.cancel_session();
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Char('c'))), Action::None);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Esc)), Action::OpenLanding);
    }

    #[test]
    fn leaderboard_keys_respect_disabled_controls() {
        let mut s = state();
        s.open_leaderboard();
        s.leaderboard.pagination = Pagination::new(1, 45);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Left)), Action::None);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Home)), Action::None);
        assert_eq!(
            handle_key(&mut s, make_key(KeyCode::Right)),
            Action::LoadLeaderboardPage(2)
        );
        assert_eq!(
            handle_key(&mut s, make_key(KeyCode::End)),
            Action::LoadLeaderboardPage(3)
        );

        s.leaderboard.pagination = Pagination::new(3, 45);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Right)), Action::None);
        assert_eq!(
            handle_key(&mut s, make_key(KeyCode::Char('p'))),
            Action::LoadLeaderboardPage(2)
        );
    }

    #[test]
    fn leaderboard_ignores_paging_while_loading() {
        let mut s = state();
        s.open_leaderboard();
        s.leaderboard.pagination = Pagination::new(1, 45);
        s.leaderboard.request(1);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Right)), Action::None);
        assert_eq!(handle_key(&mut s, make_key(KeyCode::Esc)), Action::OpenLanding);
    }
}
