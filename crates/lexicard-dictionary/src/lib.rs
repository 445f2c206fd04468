pub mod html;
pub mod http;
pub mod loaders;

use std::sync::Arc;
use std::time::Duration;

use lexicard_core::{Lookup, SearchOrchestrator};

pub use loaders::free_dictionary::FreeDictionary;
pub use loaders::wiktionary::Wiktionary;

/// Orchestrator with every built-in dictionary registered.
pub fn default_orchestrator(primary: &str, secondary: &str, timeout: Duration) -> SearchOrchestrator {
    let client = http::client(timeout);
    let lookups: Vec<Arc<dyn Lookup>> = vec![
        Arc::new(FreeDictionary::new(client.clone())),
        Arc::new(Wiktionary::new(client)),
    ];

    lookups
        .into_iter()
        .fold(SearchOrchestrator::new(primary, secondary), |o, lookup| o.register(lookup))
}
