pub mod cache;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod preprocess;
pub mod query;
pub mod search;
pub mod selector;

pub use cache::DictionaryCache;
pub use error::{CacheError, SelectorError};
pub use lookup::Lookup;
pub use query::Query;
pub use search::{SearchFailure, SearchHit, SearchOrchestrator, SearchOutcome};
pub use selector::{CorollarySet, Selector, ToggleState};
