// ABOUTME: E2E tests for TUI rendering using ratatui's TestBackend.
// ABOUTME: Verifies each screen renders from AppState: landing, live progress, stats, leaderboard, toasts.

use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use ghdev::api::{LeaderboardResponse, UserRecord};
use ghdev::stream::{
    ConnectionId, Lifecycle, ProgressSnapshot, ResultSnapshot, SessionUpdate, SessionView,
};
use ghdev::theme::Theme;
use ghdev::tui::state::{ApiEvent, AppState, Screen};
use ghdev::tui::ui;

/// Extract a single row of text from the terminal buffer as a String.
fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    let width = buf.area.width;
    (0..width)
        .map(|x| {
            buf.cell((x, y))
                .map(|c| c.symbol().chars().next().unwrap_or(' '))
                .unwrap_or(' ')
        })
        .collect()
}

/// Extract all text from the terminal buffer as a single string (rows joined by newlines).
fn all_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let height = buf.area.height;
    (0..height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn state() -> AppState {
    AppState::new(Theme::Dark, Duration::from_secs(5), "http://localhost:8000")
}

fn draw(state: &AppState, width: u16, height: u16) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, state)).unwrap();
    terminal
}

fn update(id: u64, view: SessionView) -> SessionUpdate {
    SessionUpdate {
        connection: ConnectionId(id),
        view,
    }
}

#[test]
fn renders_landing_screen() {
    let terminal = draw(&state(), 100, 30);

    assert!(row_text(&terminal, 0).contains("ghdev"));
    let text = all_text(&terminal);
    assert!(text.contains("GitHub Lines of Code"), "got:\n{}", text);
}

/// A streaming session shows the analysis heading and repository counts.
#[test]
fn renders_live_progress() {
    let mut state = state();
    state.open_user("octocat", ConnectionId(1));
    let applied = state.apply_session_update(
        update(
            1,
            SessionView {
                lifecycle: Lifecycle::Streaming,
                progress: ProgressSnapshot {
                    current_repo: "r1".to_string(),
                    processed: 1,
                    total: 4,
                    percentage: 25.0,
                },
                result: None,
            },
        ),
        Instant::now(),
    );
    assert!(applied);

    let terminal = draw(&state, 100, 30);
    let text = all_text(&terminal);
    assert!(row_text(&terminal, 0).contains("octocat"));
    assert!(text.contains("Analyzing Repositories"), "got:\n{}", text);
    assert!(text.contains("Processed: 1 / 4 repositories"), "got:\n{}", text);
}

#[test]
fn renders_completed_statistics() {
    let mut state = state();
    state.open_user("octocat", ConnectionId(1));
    state.apply_session_update(
        update(
            1,
            SessionView {
                lifecycle: Lifecycle::Completed,
                progress: ProgressSnapshot {
                    current_repo: "r1".to_string(),
                    processed: 4,
                    total: 4,
                    percentage: 100.0,
                },
                result: Some(ResultSnapshot {
                    total_lines: 12_345,
                    lines_per_language: [(".ts".to_string(), 10_000), (".css".to_string(), 2_345)]
                        .into_iter()
                        .collect(),
                }),
            },
        ),
        Instant::now(),
    );
    state.apply_api_event(
        ApiEvent::Profile {
            username: "octocat".to_string(),
            result: Ok(None),
        },
        Instant::now(),
    );

    let terminal = draw(&state, 120, 40);
    let text = all_text(&terminal);
    assert!(text.contains("12,345"), "got:\n{}", text);
    assert!(text.contains("Lines of Code"));
    assert!(text.contains("ts"));
    assert!(text.contains("css"));
    assert!(text.contains("User not found"));
}

#[test]
fn renders_failure_with_reason() {
    let mut state = state();
    state.open_user("ghost", ConnectionId(3));
    state.apply_session_update(
        update(3, SessionView::connecting().failed("user has no public repositories")),
        Instant::now(),
    );

    let text = all_text(&draw(&state, 100, 30));
    assert!(text.contains("Could not analyze ghost"), "got:\n{}", text);
    assert!(text.contains("user has no public repositories"));
    assert!(text.contains("Analysis failed"), "error toast should be visible");
}

#[test]
fn stale_updates_do_not_reach_the_screen() {
    let mut state = state();
    state.open_user("octocat", ConnectionId(2));
    let applied = state.apply_session_update(
        update(1, SessionView::connecting().failed("old session")),
        Instant::now(),
    );
    assert!(!applied);

    let text = all_text(&draw(&state, 100, 30));
    assert!(!text.contains("old session"));
}

#[test]
fn renders_leaderboard_page_controls() {
    let mut state = state();
    state.open_leaderboard();
    state.leaderboard.request(2);
    state.apply_api_event(
        ApiEvent::Leaderboard {
            page: 2,
            result: Ok(LeaderboardResponse {
                users: vec![UserRecord {
                    id: 1,
                    username: "torvalds".to_string(),
                    lines_of_code: 1_234_567,
                    date_requested: None,
                }],
                count: 45,
            }),
        },
        Instant::now(),
    );
    assert_eq!(state.screen, Screen::Leaderboard);

    let text = all_text(&draw(&state, 100, 30));
    assert!(text.contains("torvalds"), "got:\n{}", text);
    assert!(text.contains("#21"));
    assert!(text.contains("1,234,567"));
    assert!(text.contains("Page 2 of 3"));
}

#[test]
fn renders_toast_message() {
    let mut state = state();
    state.apply_api_event(ApiEvent::SearchOptions(Err("timeout".to_string())), Instant::now());

    let text = all_text(&draw(&state, 100, 30));
    assert!(text.contains("Error"), "got:\n{}", text);
}

#[test]
fn expired_toasts_are_not_drawn() {
    let mut state = state();
    let now = Instant::now();
    state.apply_api_event(ApiEvent::SearchOptions(Err("timeout".to_string())), now);
    state.expire_toasts(now + Duration::from_secs(6));

    assert!(state.toasts.is_empty());
}
