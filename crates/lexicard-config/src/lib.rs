use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::card::CardConfig;
use self::colors::Colors;
use self::dictionary::DictionaryConfig;
use self::ui::UiConfig;

pub mod anki;
pub mod card;
pub mod colors;
pub mod dictionary;
pub mod error;
pub mod options;
pub mod ui;

pub use error::ConfigError;
pub use options::OPTION_NAMES;

const APP_DIR: &str = "lexicard";

fn default_enabled() -> bool {
    true
}

/// Process-wide option snapshot. Read during draw and dispatch, written only
/// by the command prompt and the Anki walkthrough between frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub card: CardConfig,
    pub anki: AnkiConfig,
    pub ui: UiConfig,
    #[serde(rename = "c")]
    pub colors: Colors,

    /// Append successful queries to the history file
    #[serde(default = "default_enabled")]
    pub histsave: bool,
    /// Offer history entries in the search prompt's completion menu
    #[serde(default = "default_enabled")]
    pub histshow: bool,
    /// Persist the dictionary cache between runs
    pub cachefile: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: DictionaryConfig::default(),
            card: CardConfig::default(),
            anki: AnkiConfig::default(),
            ui: UiConfig::default(),
            colors: Colors::default(),
            histsave: default_enabled(),
            histshow: default_enabled(),
            cachefile: false,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(primary) = env::var("LEXICARD_PRIMARY") {
            self.dictionary.primary = primary;
        }
        if let Ok(secondary) = env::var("LEXICARD_SECONDARY") {
            self.dictionary.secondary = secondary;
        }
        if let Ok(url) = env::var("ANKI_CONNECT_URL") {
            self.anki.url = url;
        }
        if let Some(timeout) = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.dictionary.timeout_seconds = timeout;
        }
    }

    /// Load a profile, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No profile at {}, using defaults", path.display());
            return Ok(Self::new());
        }

        let data = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&data)?;
        config.apply_env();
        tracing::info!("Loaded profile from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Saved profile to {}", path.display());
        Ok(())
    }
}

/// `<config_dir>/lexicard/config.json`
pub fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// `<data_dir>/lexicard`, home of the history, cache and log files.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}
