use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lexicard_config::Config;
use tracing_subscriber::EnvFilter;

pub mod app;
pub mod events;
pub mod input;
pub mod state;
pub mod tui;

use self::app::App;
use self::state::AppState;
use self::tui::Tui;


const LOG_ENV: &str = "LEXICARD_LOG";
const LOG_FILE: &str = "lexicard.log";

/// Look words up in online dictionaries and turn definitions into Anki cards.
#[derive(Parser, Debug)]
#[command(name = "lexicard", version, about)]
struct Args {
    /// Search to run at startup, e.g. "mint -f, coin"
    query: Option<String>,

    /// Profile to load and save instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

/// Log to a file; the terminal belongs to the pages.
fn init_logging(debug: bool) -> anyhow::Result<PathBuf> {
    let dir = lexicard_config::data_dir().unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;

    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let log_path = init_logging(args.debug)?;
    tracing::info!("lexicard {} logging to {}", env!("CARGO_PKG_VERSION"), log_path.display());

    let profile_path = args.config.or_else(lexicard_config::default_profile_path);
    let config = match &profile_path {
        Some(path) => Config::load(path).with_context(|| format!("load profile {}", path.display()))?,
        None => Config::new(),
    };

    let state = AppState::new(config, profile_path);
    let tui = Tui::enter()?;
    let result = App::new(state, tui).run(args.query).await;

    if let Err(e) = &result {
        tracing::error!("lexicard exited: {e:#}");
    }
    result
}
