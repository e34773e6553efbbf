// ABOUTME: Non-interactive commands: stream one analysis, print a leaderboard page, edit preferences.
// ABOUTME: Progress goes to stderr, results to stdout, and failures become a non-zero exit.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::{ApiClient, LeaderboardResponse, Pagination};
use crate::config::Config;
use crate::format::{percent, thousands};
use crate::prefs::{
    IgnoreList, SearchPreferences, default_request, load_preferences, load_preferences_from,
    save_preferences_to,
};
use crate::stream::{
    ConnectionManager, DerivedMetrics, Lifecycle, ResultSnapshot, SessionUpdate, SessionView,
    project,
};
use crate::tui::widgets::stats::stat_cards;

/// Stream an analysis for `username` and print the summary.
pub async fn stats(config: &Config, username: &str, refresh: bool) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.service)?;
    let request = match load_preferences() {
        Ok(Some(prefs)) => prefs.request_for(username),
        Ok(None) => default_request(username),
        Err(e) => {
            warn!(error = %e, "unreadable search preferences; using defaults");
            default_request(username)
        }
    };

    let (tx, mut rx) = mpsc::channel(64);
    let mut manager = ConnectionManager::new(tx);
    let id = if refresh {
        manager.open_refresh(&api, request)
    } else {
        manager.open_socket(&config.service.ws_url, request)
    };
    info!(connection = %id, username, refresh, "headless analysis started");

    let view = {
        let mut stderr = std::io::stderr();
        follow_session(&mut manager, &mut rx, tokio::signal::ctrl_c(), &mut stderr).await?
    };
    manager.shutdown().await;

    match (&view.lifecycle, &view.result) {
        (Lifecycle::Completed, Some(result)) => {
            let mut stdout = std::io::stdout().lock();
            write_summary(&mut stdout, username, result)?;
            Ok(())
        }
        (Lifecycle::Completed, None) => bail!("analysis completed without a result"),
        (Lifecycle::Failed(reason), _) => bail!("{}", reason),
        _ => bail!("analysis ended in state {}", view.lifecycle.label()),
    }
}

/// Print progress for the manager's current session until it reaches a
/// terminal state. `interrupt` is polled for the whole run; when it fires the
/// session is shut down and the run fails as cancelled.
async fn follow_session<F: Future>(
    manager: &mut ConnectionManager,
    rx: &mut mpsc::Receiver<SessionUpdate>,
    interrupt: F,
    progress: &mut impl Write,
) -> anyhow::Result<SessionView> {
    tokio::pin!(interrupt);
    let mut last = SessionView::default();
    loop {
        tokio::select! {
            _ = &mut interrupt => {
                manager.shutdown().await;
                bail!("analysis cancelled");
            }
            update = rx.recv() => {
                let Some(update) = update else {
                    bail!("analysis ended without a result");
                };
                if !manager.accepts(update.connection) {
                    continue;
                }
                if update.view.progress != last.progress
                    || update.view.lifecycle != last.lifecycle
                {
                    writeln!(progress, "{}", progress_line(&update.view))?;
                }
                last = update.view;
                if last.lifecycle.is_terminal() {
                    return Ok(last);
                }
            }
        }
    }
}

fn progress_line(view: &SessionView) -> String {
    match &view.lifecycle {
        Lifecycle::Connecting => "connecting...".to_string(),
        Lifecycle::Completed => "complete".to_string(),
        Lifecycle::Failed(reason) => format!("failed: {}", reason),
        _ => {
            let p = &view.progress;
            let repo = if p.current_repo.is_empty() {
                "Preparing..."
            } else {
                p.current_repo.as_str()
            };
            format!(
                "[{}/{}] {} {}",
                p.processed,
                p.total,
                percent(p.percentage),
                repo
            )
        }
    }
}

/// Totals, fun metrics, and the top languages.
pub fn write_summary(
    out: &mut impl Write,
    username: &str,
    result: &ResultSnapshot,
) -> anyhow::Result<()> {
    writeln!(out, "{}", username)?;
    for card in stat_cards(&DerivedMetrics::from_lines(result.total_lines)) {
        writeln!(out, "  {:<14} {}", card.title, card.value)?;
    }
    let languages = project(&result.lines_per_language);
    if !languages.is_empty() {
        writeln!(out)?;
        writeln!(out, "  {:<16} {:>8} {:>12}", "Language", "Share", "Lines")?;
        for lang in languages {
            writeln!(
                out,
                "  {:<16} {:>8} {:>12}",
                lang.language,
                percent(lang.share),
                thousands(lang.lines)
            )?;
        }
    }
    Ok(())
}

/// Fetch and print one leaderboard page.
pub async fn leaderboard(config: &Config, page: u32) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.service)?;
    let page = page.max(1);
    let response = api
        .leaderboard(page)
        .await
        .with_context(|| format!("failed to load leaderboard page {}", page))?;
    let mut stdout = std::io::stdout().lock();
    write_leaderboard(&mut stdout, page, &response)?;
    Ok(())
}

pub fn write_leaderboard(
    out: &mut impl Write,
    page: u32,
    response: &LeaderboardResponse,
) -> anyhow::Result<()> {
    let pagination = Pagination::new(page, response.count);
    writeln!(out, "{:>6}  {:<24} {:>14}", "Rank", "Username", "Lines of Code")?;
    for (i, user) in response.users.iter().enumerate() {
        writeln!(
            out,
            "{:>6}  {:<24} {:>14}",
            format!("#{}", pagination.rank(i)),
            user.username,
            thousands(user.lines_of_code)
        )?;
    }
    if pagination.shows_controls() {
        writeln!(out)?;
        writeln!(out, "Page {} of {}", pagination.current, pagination.total_pages)?;
    }
    Ok(())
}

/// One edit to the cached ignore lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefsEdit {
    Show,
    Add(IgnoreList, String),
    Remove(IgnoreList, String),
    /// Clear one list, or both when `None`.
    Clear(Option<IgnoreList>),
}

/// Apply `edit` to the preferences file at `path` and print the resulting lists.
pub fn edit_preferences(path: &Path, edit: PrefsEdit, out: &mut impl Write) -> anyhow::Result<()> {
    let stored = load_preferences_from(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let username = stored.as_ref().map(|p| p.username.clone()).unwrap_or_default();
    let mut options = stored.as_ref().map(|p| p.options()).unwrap_or_default();

    let changed = match &edit {
        PrefsEdit::Show => false,
        PrefsEdit::Add(list, item) => {
            if !options.add(*list, item) {
                bail!("'{}' is blank, reserved, or already in {}", item.trim(), list);
            }
            true
        }
        PrefsEdit::Remove(list, item) => {
            if !options.remove(*list, item) {
                bail!("'{}' is not in {}", item.trim(), list);
            }
            true
        }
        PrefsEdit::Clear(Some(list)) => {
            options.clear(*list);
            true
        }
        PrefsEdit::Clear(None) => {
            options.clear(IgnoreList::Dirs);
            options.clear(IgnoreList::Extensions);
            true
        }
    };

    if changed {
        let prefs = SearchPreferences::for_submission(&username, &options);
        save_preferences_to(path, &prefs)?;
    }

    if !username.is_empty() {
        writeln!(out, "Last search: {}", username)?;
    }
    for list in [IgnoreList::Dirs, IgnoreList::Extensions] {
        let items = options.list(list);
        if items.is_empty() {
            writeln!(out, "{}: (none)", list)?;
        } else {
            writeln!(out, "{}: {}", list, items.join(", "))?;
        }
    }
    Ok(())
}
