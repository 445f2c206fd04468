use std::path::PathBuf;
use std::time::Duration;

use lexicard_anki::AnkiConnectClient;
use lexicard_config::Config;
use lexicard_core::SearchOrchestrator;
use lexicard_io::{AudioPlayer, History, HistoryError, SystemClipboard};

const HISTORY_FILE: &str = "history";
const CACHE_FILE: &str = "cache.json";

/// Everything the request handlers reach besides the screens.
pub struct AppState {
    pub config: Config,
    pub profile_path: Option<PathBuf>,
    pub orchestrator: SearchOrchestrator,
    pub anki: AnkiConnectClient,
    pub history: Option<History>,
    pub audio: AudioPlayer,
    pub clipboard: SystemClipboard,
    pub cache_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: Config, profile_path: Option<PathBuf>) -> Self {
        let orchestrator = lexicard_dictionary::default_orchestrator(
            &config.dictionary.primary,
            &config.dictionary.secondary,
            Duration::from_secs(config.dictionary.timeout_seconds),
        );
        let data_dir = lexicard_config::data_dir();

        let history = data_dir
            .as_ref()
            .map(|dir| dir.join(HISTORY_FILE))
            .and_then(|path| {
                History::load(path)
                    .map_err(|e| tracing::warn!("History unavailable: {e}"))
                    .ok()
            });

        Self {
            anki: AnkiConnectClient::new(&config.anki),
            config,
            profile_path,
            orchestrator,
            history,
            audio: AudioPlayer::new(),
            clipboard: SystemClipboard::new(),
            cache_path: data_dir.map(|dir| dir.join(CACHE_FILE)),
        }
    }

    /// Load the cache file when enabled.
    pub async fn load_cache(&self) {
        let (true, Some(path)) = (self.config.cachefile, self.cache_path.as_ref()) else {
            return;
        };
        match self.orchestrator.cache().load(path).await {
            Ok(n) => tracing::info!("Loaded {n} cached dictionaries"),
            Err(e) => tracing::warn!("Cache not loaded: {e}"),
        }
    }

    /// Write the cache file when enabled.
    pub async fn save_cache(&self) {
        let (true, Some(path)) = (self.config.cachefile, self.cache_path.as_ref()) else {
            return;
        };
        if let Err(e) = self.orchestrator.cache().save(path).await {
            tracing::error!("Cache not saved: {e}");
        }
    }

    /// Persist the profile, if there is somewhere to put it.
    pub fn save_profile(&self) -> Result<(), lexicard_config::ConfigError> {
        match &self.profile_path {
            Some(path) => self.config.save(path),
            None => {
                tracing::warn!("No profile path, options are not persisted");
                Ok(())
            }
        }
    }

    /// Push option changes to the parts that copied them at startup.
    pub fn refresh(&mut self) {
        self.orchestrator
            .set_defaults(&self.config.dictionary.primary, &self.config.dictionary.secondary);
        self.anki = AnkiConnectClient::new(&self.config.anki);
    }

    /// Record the accepted search line.
    pub fn remember(&mut self, query: &str) -> Result<(), HistoryError> {
        let persist = self.config.histsave;
        if let Some(history) = self.history.as_mut() {
            history.append(query, persist)?;
        }
        Ok(())
    }

    /// Search-prompt history, most recent first, when shown.
    pub fn history_entries(&self) -> Vec<String> {
        match (&self.history, self.config.histshow) {
            (Some(history), true) => history.recent_first(),
            _ => Vec::new(),
        }
    }
}
