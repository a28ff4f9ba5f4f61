//! Supabase (PostgREST) song store.
//!
//! Talks to `{url}/rest/v1/{table}` with the project API key. Selects map to
//! GET with PostgREST query parameters, inserts to POST, updates to PATCH
//! filtered by `id`. Writes ask for `Prefer: return=representation` so the
//! stored rows come back in the response.
//!
//! Requests are sent once; failures surface as [`StoreError`] without retry.

use crate::config::StoreConfig;
use crate::provider::{SongStore, StoreError};
use crate::query::SongQuery;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use songrank_core::song::{FieldUpdate, NewSong, Song};
use std::time::Duration;
use uuid::Uuid;

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Song store backed by a hosted Supabase table.
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
}

impl SupabaseStore {
    /// Build a store from validated settings.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        config
            .validate()
            .map_err(|e| StoreError::Other(e.to_string()))?;

        let invalid_key = |_| StoreError::Other("store key is not a valid header value".into());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.key)).map_err(invalid_key)?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("songrank/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.table_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a request and decode the row array it returns.
    fn send(&self, request: RequestBuilder, action: &str) -> Result<Vec<Song>, StoreError> {
        let resp = request.send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                StoreError::NetworkUnreachable(e.to_string())
            } else {
                StoreError::Other(format!("{action} request failed: {e}"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let message = error_message(status, &body);
            tracing::warn!(action, status = status.as_u16(), %message, "store request rejected");

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StoreError::AuthenticationRequired(message)
                }
                _ => StoreError::Http {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let rows: Vec<Song> = resp.json().map_err(|e| {
            StoreError::ResponseFormatChanged(format!("failed to decode {action} response: {e}"))
        })?;
        tracing::debug!(action, rows = rows.len(), "store request complete");
        Ok(rows)
    }
}

impl SongStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    fn fetch(&self, query: &SongQuery) -> Result<Vec<Song>, StoreError> {
        let params = query.to_params();
        tracing::debug!(endpoint = %self.endpoint, ?params, "select songs");
        self.send(self.client.get(&self.endpoint).query(&params), "select")
    }

    fn insert(&self, song: &NewSong) -> Result<Vec<Song>, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, title = %song.title, "insert song");
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(song);
        self.send(request, "insert")
    }

    fn update(&self, id: Uuid, update: &FieldUpdate) -> Result<Vec<Song>, StoreError> {
        tracing::debug!(endpoint = %self.endpoint, %id, field = %update.field(), "update song");
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&update.to_patch());
        self.send(request, "update")
    }
}

/// Human-readable message for a failed response: the PostgREST `message`
/// when the body carries one, else the raw body, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<PostgrestError>(body) {
        let mut message = err.message;
        if let Some(details) = err.details.filter(|d| !d.is_empty()) {
            message = format!("{message}: {details}");
        }
        if let Some(code) = err.code {
            message = format!("{message} ({code})");
        }
        return message;
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
