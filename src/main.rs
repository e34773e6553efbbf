// ABOUTME: Entry point for ghdev, a terminal client for GitHub lines-of-code statistics.
// ABOUTME: Parses CLI args, loads config, initializes logging, and launches the TUI or a headless command.

use clap::{Parser, Subcommand};

use ghdev::app::{App, StartScreen};
use ghdev::config::Config;
use ghdev::headless::{self, PrefsEdit};
use ghdev::logging;
use ghdev::prefs::IgnoreList;
use ghdev::theme::Theme;

#[derive(Parser)]
#[command(name = "ghdev", version, about = "GitHub lines-of-code statistics in your terminal")]
struct Cli {
    /// Statistics service base URL (overrides config and GHDEV_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Streaming endpoint base URL (overrides config and GHDEV_WS_URL)
    #[arg(long, global = true)]
    ws_url: Option<String>,

    /// Color theme
    #[arg(long, global = true, value_enum)]
    theme: Option<Theme>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the TUI directly on a user's statistics
    User { username: String },
    /// Stream an analysis without the TUI and print the summary
    Stats {
        username: String,
        /// Ask the backend to recount instead of using cached totals
        #[arg(long)]
        refresh: bool,
    },
    /// Print one page of the leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show or edit the cached ignore lists
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    Show,
    AddDir { dir: String },
    AddExt { ext: String },
    RemoveDir { dir: String },
    RemoveExt { ext: String },
    /// Clear one list, or both when --list is omitted
    Clear {
        #[arg(long, value_enum)]
        list: Option<IgnoreList>,
    },
}

impl From<PrefsAction> for PrefsEdit {
    fn from(action: PrefsAction) -> Self {
        match action {
            PrefsAction::Show => PrefsEdit::Show,
            PrefsAction::AddDir { dir } => PrefsEdit::Add(IgnoreList::Dirs, dir),
            PrefsAction::AddExt { ext } => PrefsEdit::Add(IgnoreList::Extensions, ext),
            PrefsAction::RemoveDir { dir } => PrefsEdit::Remove(IgnoreList::Dirs, dir),
            PrefsAction::RemoveExt { ext } => PrefsEdit::Remove(IgnoreList::Extensions, ext),
            PrefsAction::Clear { list } => PrefsEdit::Clear(list),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Env files must be loaded before config so GHDEV_* overrides apply.
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_path(Config::secrets_env_path());

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.service.api_url = url;
    }
    if let Some(url) = cli.ws_url {
        config.service.ws_url = url;
    }
    if let Some(theme) = cli.theme {
        config.ui.theme = theme;
    }

    match cli.command {
        None => {
            logging::init_file(&config)?;
            App::new(config, StartScreen::Landing).run().await
        }
        Some(Command::User { username }) => {
            logging::init_file(&config)?;
            App::new(config, StartScreen::User(username.trim().to_string()))
                .run()
                .await
        }
        Some(Command::Stats { username, refresh }) => {
            logging::init_stderr(&config)?;
            headless::stats(&config, username.trim(), refresh).await
        }
        Some(Command::Leaderboard { page }) => {
            logging::init_stderr(&config)?;
            headless::leaderboard(&config, page).await
        }
        Some(Command::Prefs { action }) => {
            logging::init_stderr(&config)?;
            let edit = action.map(PrefsEdit::from).unwrap_or(PrefsEdit::Show);
            let mut stdout = std::io::stdout().lock();
            headless::edit_preferences(&Config::preferences_path(), edit, &mut stdout)
        }
    }
}
