/// Failure reported by a dictionary lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    #[error("could not find \"{0}\"")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("unknown dictionary: {0}")]
    UnknownDictionary(String),
}

impl DictionaryError {
    pub fn is_connection(&self) -> bool {
        matches!(self, DictionaryError::Connection(_))
    }
}
