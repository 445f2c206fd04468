use lexicard_types::{Dictionary, DictionaryError};

/// A dictionary source: one query in, one entry stream out.
#[async_trait::async_trait]
pub trait Lookup: Send + Sync {
    /// Key used in the cache and in `primary`/`secondary` options, e.g. "free".
    fn key(&self) -> &str;

    /// Flags (without the dash) that select this dictionary in a query.
    fn aliases(&self) -> &[&'static str];

    /// Fetch and parse `query`.
    async fn ask(&self, query: &str) -> Result<Dictionary, DictionaryError>;
}
