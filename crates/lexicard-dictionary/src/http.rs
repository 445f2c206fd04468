use std::time::Duration;

use lexicard_types::DictionaryError;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("lexicard/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for every dictionary.
pub fn client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to a default HTTP client: {e}");
            Client::new()
        })
}

/// `base` with `segment` appended as one percent-encoded path segment.
pub fn url_with_segment(base: &str, segment: &str) -> Result<Url, DictionaryError> {
    let mut url = Url::parse(base).map_err(|e| DictionaryError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| DictionaryError::Parse(format!("{base} cannot take a path")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

fn map_transport(e: reqwest::Error) -> DictionaryError {
    if e.is_timeout() {
        DictionaryError::Connection("request timed out".to_string())
    } else if e.is_connect() {
        DictionaryError::Connection("could not connect".to_string())
    } else if e.is_decode() {
        DictionaryError::Parse(e.to_string())
    } else {
        DictionaryError::Connection(e.to_string())
    }
}

/// GET `url` and decode the body as JSON. 404 means the query has no entry.
pub async fn get_json<T>(client: &Client, url: Url, query: &str) -> Result<T, DictionaryError>
where
    T: DeserializeOwned,
{
    tracing::debug!("GET {url}");
    let response = client.get(url).send().await.map_err(map_transport)?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(DictionaryError::NotFound(query.to_string()));
    }
    if !status.is_success() {
        return Err(DictionaryError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    response.json::<T>().await.map_err(map_transport)
}
