use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lexicard_types::{Dictionary, Op};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::CacheError;

type Key = (String, String);

/// Process-level memo of successful lookups keyed by `(dictionary, query)`.
#[derive(Default)]
pub struct DictionaryCache {
    entries: RwLock<HashMap<Key, Arc<Dictionary>>>,
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    dictionary: String,
    query: String,
    name: String,
    #[serde(default)]
    url: Option<String>,
    entries: Vec<Op>,
}

impl DictionaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, dictionary: &str, query: &str) -> Option<Arc<Dictionary>> {
        let entries = self.entries.read().await;
        entries
            .get(&(dictionary.to_string(), query.to_string()))
            .cloned()
    }

    /// Insert unless another worker got there first; parsing is
    /// deterministic so either copy is as good.
    pub async fn insert(&self, dictionary: &str, query: &str, value: Arc<Dictionary>) {
        let mut entries = self.entries.write().await;
        entries
            .entry((dictionary.to_string(), query.to_string()))
            .or_insert(value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn save(&self, path: &Path) -> Result<(), CacheError> {
        let records: Vec<CacheRecord> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .map(|((dictionary, query), dict)| CacheRecord {
                    dictionary: dictionary.clone(),
                    query: query.clone(),
                    name: dict.name.clone(),
                    url: dict.url.clone(),
                    entries: dict.ops().to_vec(),
                })
                .collect()
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_string(&records)?).await?;
        tracing::info!("Saved {} cached lookups to {}", records.len(), path.display());
        Ok(())
    }

    /// Merge records from `path` into the cache. A missing file is not an error.
    pub async fn load(&self, path: &Path) -> Result<usize, CacheError> {
        let data = match fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<CacheRecord> = serde_json::from_str(&data)?;
        let count = records.len();

        let mut entries = self.entries.write().await;
        for record in records {
            let mut dict = Dictionary::from_ops(record.name, record.entries);
            dict.url = record.url;
            entries.insert((record.dictionary, record.query), Arc::new(dict));
        }
        tracing::info!("Loaded {count} cached lookups from {}", path.display());
        Ok(count)
    }
}
