use std::collections::HashMap;
use std::sync::Arc;

use lexicard_types::{Dictionary, DictionaryError};
use tokio::task::JoinSet;

use crate::cache::DictionaryCache;
use crate::filter::filter_by_labels;
use crate::lookup::Lookup;
use crate::query::{Query, parse_queries};

/// A dictionary that answered a sub-query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub dictionary_key: String,
    pub query: Query,
    pub dictionary: Arc<Dictionary>,
}

#[derive(Debug, Clone)]
pub struct SearchFailure {
    pub dictionary_key: String,
    pub phrase: String,
    pub error: DictionaryError,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Hits in sub-query order, then flag order.
    pub hits: Vec<SearchHit>,
    pub failures: Vec<SearchFailure>,
    /// Non-fatal remarks for the status line.
    pub notices: Vec<String>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Parses search strings and runs them against the registered dictionaries.
pub struct SearchOrchestrator {
    lookups: HashMap<String, Arc<dyn Lookup>>,
    aliases: HashMap<String, String>,
    cache: Arc<DictionaryCache>,
    primary: String,
    secondary: String,
}

async fn ask_cached(
    lookup: Arc<dyn Lookup>,
    cache: Arc<DictionaryCache>,
    phrase: String,
) -> Result<Arc<Dictionary>, DictionaryError> {
    let key = lookup.key().to_string();
    if let Some(hit) = cache.get(&key, &phrase).await {
        tracing::debug!("Cache hit: {key} {phrase:?}");
        return Ok(hit);
    }

    tracing::info!("Asking {key} for {phrase:?}");
    let dictionary = Arc::new(lookup.ask(&phrase).await?);
    cache.insert(&key, &phrase, dictionary.clone()).await;
    Ok(dictionary)
}

impl SearchOrchestrator {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            lookups: HashMap::new(),
            aliases: HashMap::new(),
            cache: Arc::new(DictionaryCache::new()),
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn register(mut self, lookup: Arc<dyn Lookup>) -> Self {
        let key = lookup.key().to_string();
        for alias in lookup.aliases() {
            self.aliases.insert(alias.to_string(), key.clone());
        }
        self.lookups.insert(key, lookup);
        self
    }

    pub fn cache(&self) -> &Arc<DictionaryCache> {
        &self.cache
    }

    pub fn set_defaults(&mut self, primary: &str, secondary: &str) {
        self.primary = primary.to_string();
        self.secondary = secondary.to_string();
    }

    pub fn dictionary_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.lookups.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn parse(&self, raw: &str) -> Vec<Query> {
        parse_queries(raw, &self.aliases, &self.primary, &self.secondary)
    }

    fn lookup(&self, key: &str) -> Result<Arc<dyn Lookup>, DictionaryError> {
        self.lookups
            .get(key)
            .cloned()
            .ok_or_else(|| DictionaryError::UnknownDictionary(key.to_string()))
    }

    async fn ask(&self, key: &str, phrase: &str) -> Result<Arc<Dictionary>, DictionaryError> {
        ask_cached(self.lookup(key)?, self.cache.clone(), phrase.to_string()).await
    }

    pub async fn search(&self, raw: &str) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        for query in self.parse(raw) {
            self.run_query(query, &mut outcome).await;
        }
        outcome
    }

    async fn run_query(&self, query: Query, outcome: &mut SearchOutcome) {
        let results: Vec<(String, Result<Arc<Dictionary>, DictionaryError>)> =
            match query.dictionaries.as_slice() {
                [] => {
                    let primary = self.ask(&self.primary, &query.phrase).await;
                    match primary {
                        Ok(dict) => vec![(self.primary.clone(), Ok(dict))],
                        Err(e) => {
                            tracing::warn!(
                                "{} failed for {:?}: {e}, trying {}",
                                self.primary,
                                query.phrase,
                                self.secondary
                            );
                            let secondary = self.ask(&self.secondary, &query.phrase).await;
                            if secondary.is_err() {
                                outcome.failures.push(SearchFailure {
                                    dictionary_key: self.primary.clone(),
                                    phrase: query.phrase.clone(),
                                    error: e,
                                });
                            } else {
                                outcome
                                    .notices
                                    .push(format!("{}: {e}, showing {}", self.primary, self.secondary));
                            }
                            vec![(self.secondary.clone(), secondary)]
                        }
                    }
                }
                [only] => vec![(only.clone(), self.ask(only, &query.phrase).await)],
                many => self.fan_out(many, &query.phrase).await,
            };

        for (key, result) in results {
            match result {
                Ok(dictionary) => {
                    let dictionary = self.apply_filters(&query, dictionary, outcome);
                    outcome.hits.push(SearchHit {
                        dictionary_key: key,
                        query: query.clone(),
                        dictionary,
                    });
                }
                Err(error) => {
                    tracing::warn!("{key} failed for {:?}: {error}", query.phrase);
                    outcome.failures.push(SearchFailure {
                        dictionary_key: key,
                        phrase: query.phrase.clone(),
                        error,
                    });
                }
            }
        }
    }

    /// Ask several dictionaries at once; results come back in `keys` order.
    async fn fan_out(
        &self,
        keys: &[String],
        phrase: &str,
    ) -> Vec<(String, Result<Arc<Dictionary>, DictionaryError>)> {
        let mut bins: Vec<Option<Result<Arc<Dictionary>, DictionaryError>>> =
            (0..keys.len()).map(|_| None).collect();

        let mut tasks = JoinSet::new();
        for (position, key) in keys.iter().enumerate() {
            match self.lookup(key) {
                Ok(lookup) => {
                    let cache = self.cache.clone();
                    let phrase = phrase.to_string();
                    tasks.spawn(async move { (position, ask_cached(lookup, cache, phrase).await) });
                }
                Err(e) => bins[position] = Some(Err(e)),
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, result)) => bins[position] = Some(result),
                Err(e) => tracing::error!("Lookup worker panicked: {e}"),
            }
        }

        keys.iter()
            .cloned()
            .zip(bins)
            .map(|(key, bin)| {
                let result = bin.unwrap_or_else(|| {
                    Err(DictionaryError::Connection("lookup worker aborted".to_string()))
                });
                (key, result)
            })
            .collect()
    }

    fn apply_filters(
        &self,
        query: &Query,
        dictionary: Arc<Dictionary>,
        outcome: &mut SearchOutcome,
    ) -> Arc<Dictionary> {
        if query.flags.is_empty() {
            return dictionary;
        }
        match filter_by_labels(&dictionary, &query.flags) {
            Some(filtered) => Arc::new(filtered),
            None => {
                outcome.notices.push(format!(
                    "{}: no definitions match -{}",
                    query.phrase,
                    query.flags.join(" -")
                ));
                dictionary
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use lexicard_types::{Def, Op};

    use super::*;

    struct Fake {
        key: &'static str,
        aliases: &'static [&'static str],
        fail: bool,
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl Fake {
        fn new(key: &'static str, aliases: &'static [&'static str]) -> Self {
            Self {
                key,
                aliases,
                fail: false,
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Lookup for Fake {
        fn key(&self) -> &str {
            self.key
        }

        fn aliases(&self) -> &[&'static str] {
            self.aliases
        }

        async fn ask(&self, query: &str) -> Result<Dictionary, DictionaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            if self.fail {
                return Err(DictionaryError::Connection("refused".to_string()));
            }
            Ok(Dictionary::from_ops(
                self.key,
                vec![
                    Op::header(self.key),
                    Op::phrase(query, ""),
                    Op::label("noun", ""),
                    Op::Def(Def::new("a thing")),
                    Op::label("verb", ""),
                    Op::Def(Def::new("to do a thing")),
                ],
            ))
        }
    }

    fn orchestrator(primary_fails: bool) -> (SearchOrchestrator, Arc<Fake>, Arc<Fake>) {
        let mut free = Fake::new("free", &["f", "free"]);
        free.fail = primary_fails;
        // Slow primary so fan-out results arrive out of order.
        free.delay_ms = 30;
        let free = Arc::new(free);
        let wikt = Arc::new(Fake::new("wikt", &["w", "wikt"]));
        let orchestrator = SearchOrchestrator::new("free", "wikt")
            .register(free.clone())
            .register(wikt.clone());
        (orchestrator, free, wikt)
    }

    #[tokio::test]
    async fn no_flags_uses_primary() {
        let (o, free, wikt) = orchestrator(false);
        let outcome = o.search("mint").await;
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].dictionary_key, "free");
        assert_eq!(free.calls.load(Ordering::SeqCst), 1);
        assert_eq!(wikt.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_back_to_secondary() {
        let (o, _, _) = orchestrator(true);
        let outcome = o.search("mint").await;
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].dictionary_key, "wikt");
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.notices.len(), 1);
    }

    #[tokio::test]
    async fn fan_out_keeps_flag_order() {
        let (o, _, _) = orchestrator(false);
        let outcome = o.search("mint -f -w").await;
        let keys: Vec<_> = outcome.hits.iter().map(|h| h.dictionary_key.as_str()).collect();
        assert_eq!(keys, vec!["free", "wikt"]);

        let outcome = o.search("mint -w -f").await;
        let keys: Vec<_> = outcome.hits.iter().map(|h| h.dictionary_key.as_str()).collect();
        assert_eq!(keys, vec!["wikt", "free"]);
    }

    #[tokio::test]
    async fn successes_are_cached_failures_are_not() {
        let (o, free, _) = orchestrator(true);
        o.search("mint -f").await;
        o.search("mint -f").await;
        assert_eq!(free.calls.load(Ordering::SeqCst), 2);

        let (o, free, _) = orchestrator(false);
        o.search("mint -f").await;
        o.search("mint -f, mint -f").await;
        assert_eq!(free.calls.load(Ordering::SeqCst), 1);
        assert_eq!(o.cache().len().await, 1);
    }

    #[tokio::test]
    async fn failures_are_reported_in_place() {
        let (o, _, _) = orchestrator(true);
        let outcome = o.search("mint -c").await;
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].dictionary_key, "free");
        assert!(outcome.failures[0].error.is_connection());
    }

    #[tokio::test]
    async fn free_flags_filter_definitions() {
        let (o, _, _) = orchestrator(false);
        let outcome = o.search("mint -v").await;
        assert_eq!(outcome.hits[0].dictionary.count_defs(), 1);

        let outcome = o.search("mint -adj").await;
        assert_eq!(outcome.hits[0].dictionary.count_defs(), 2);
        assert_eq!(outcome.notices.len(), 1);
    }
}
