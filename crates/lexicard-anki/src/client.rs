use std::path::{Path, PathBuf};
use std::time::Duration;

use lexicard_config::anki::AnkiConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::AnkiError;

/// A note ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub deck: String,
    pub model: String,
    pub fields: Map<String, Value>,
    pub tags: Vec<String>,
}

/// Card-export port.
#[async_trait::async_trait]
pub trait AnkiPort: Send + Sync {
    async fn add_note(&self, note: &NewNote) -> Result<u64, AnkiError>;

    async fn model_names(&self) -> Result<Vec<String>, AnkiError>;

    async fn model_field_names(&self, model: &str) -> Result<Vec<String>, AnkiError>;

    async fn deck_names(&self) -> Result<Vec<String>, AnkiError>;

    /// Open Anki's card browser on `query`.
    async fn browse(&self, query: &str) -> Result<(), AnkiError>;

    /// Make the audio at `url` available in the collection's media folder
    /// and return its file name there.
    async fn store_audio(&self, url: &str, filename: &str) -> Result<String, AnkiError>;
}

#[derive(Clone)]
pub struct AnkiConnectClient {
    base_url: String,
    client: reqwest::Client,
    allow_duplicates: bool,
    duplicate_scope: &'static str,
    mediadir: Option<PathBuf>,
}

impl AnkiConnectClient {
    pub fn new(config: &AnkiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to a default HTTP client: {e}");
                reqwest::Client::new()
            });

        Self {
            base_url: config.url.clone(),
            client,
            allow_duplicates: config.duplicates,
            duplicate_scope: config.dupescope.as_str(),
            mediadir: config.mediadir.as_ref().map(PathBuf::from),
        }
    }

    /// Check if AnkiConnect is available
    pub async fn version(&self) -> Result<u32, AnkiError> {
        self.invoke("version", json!({})).await
    }

    /// Invoke an AnkiConnect API action
    async fn invoke<T>(&self, action: &str, params: Value) -> Result<T, AnkiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = AnkiRequest {
            action,
            version: 6,
            params,
        };
        tracing::debug!("AnkiConnect {action}");

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        response.json::<AnkiResponse<T>>().await?.into_result()
    }

    async fn download(&self, url: &str, dir: &Path, filename: &str) -> Result<(), AnkiError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnkiError::Api(format!("cannot download {url}: {e}")))?
            .bytes()
            .await
            .map_err(|e| AnkiError::Api(format!("cannot download {url}: {e}")))?;
        tokio::fs::write(dir.join(filename), &bytes).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AnkiPort for AnkiConnectClient {
    async fn add_note(&self, note: &NewNote) -> Result<u64, AnkiError> {
        let params = json!({
            "note": {
                "deckName": note.deck,
                "modelName": note.model,
                "fields": note.fields,
                "tags": note.tags,
                "options": {
                    "allowDuplicate": self.allow_duplicates,
                    "duplicateScope": self.duplicate_scope,
                }
            }
        });

        self.invoke("addNote", params)
            .await
            .map_err(|e| match e {
                AnkiError::Api(message) => AnkiError::from_api(&message, &note.deck, &note.model),
                other => other,
            })
    }

    async fn model_names(&self) -> Result<Vec<String>, AnkiError> {
        self.invoke("modelNames", json!({})).await
    }

    async fn model_field_names(&self, model: &str) -> Result<Vec<String>, AnkiError> {
        self.invoke("modelFieldNames", json!({ "modelName": model }))
            .await
            .map_err(|e| match e {
                AnkiError::Api(message) => AnkiError::from_api(&message, "", model),
                other => other,
            })
    }

    async fn deck_names(&self) -> Result<Vec<String>, AnkiError> {
        self.invoke("deckNames", json!({})).await
    }

    async fn browse(&self, query: &str) -> Result<(), AnkiError> {
        let _: Vec<u64> = self.invoke("guiBrowse", json!({ "query": query })).await?;
        Ok(())
    }

    async fn store_audio(&self, url: &str, filename: &str) -> Result<String, AnkiError> {
        if let Some(dir) = &self.mediadir {
            self.download(url, dir, filename).await?;
            return Ok(filename.to_string());
        }
        self.invoke("storeMediaFile", json!({ "filename": filename, "url": url }))
            .await
    }
}

#[derive(Serialize)]
struct AnkiRequest<'a> {
    action: &'a str,
    version: u32,
    params: Value,
}

#[derive(Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self) -> Result<T, AnkiError> {
        if let Some(error) = self.error {
            return Err(AnkiError::Api(error));
        }

        self.result
            .ok_or_else(|| AnkiError::Api("AnkiConnect returned null result".to_string()))
    }
}
