#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is empty")]
    Empty,

    #[error("no clipboard available: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio player found, install mpv or ffplay")]
    NoPlayer,

    #[error("could not start {player}: {source}")]
    Spawn {
        player: &'static str,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
