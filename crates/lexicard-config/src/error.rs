#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value for {option}: {value:?} (expected {expected})")]
    InvalidValue {
        option: String,
        value: String,
        expected: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed profile: {0}")]
    Json(#[from] serde_json::Error),
}
