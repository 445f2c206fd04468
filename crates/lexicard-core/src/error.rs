use lexicard_types::OpKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("entry index {index} out of bounds (dictionary has {len} entries)")]
    InvalidIndex { index: usize, len: usize },

    #[error("entry {index} is a {kind}, only DEF and SYN can be selected")]
    NotToggleable { index: usize, kind: OpKind },
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache file: {0}")]
    Json(#[from] serde_json::Error),
}
