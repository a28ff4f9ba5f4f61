//! Song store trait and structured error types.
//!
//! The SongStore trait abstracts over where the `songs` table lives (the
//! hosted Supabase table, or an in-process table) so operations and HTTP
//! handlers can take the store as an explicit dependency and tests can swap
//! in the memory store.

use crate::query::SongQuery;
use songrank_core::song::{FieldError, FieldUpdate, NewSong, Song};
use thiserror::Error;
use uuid::Uuid;

/// Structured error types for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("song not found: {id}")]
    NotFound { id: Uuid },

    #[error("invalid field: {0}")]
    Field(#[from] FieldError),

    #[error("store error: {0}")]
    Other(String),
}

/// Access to the `songs` table.
///
/// Implementations are blocking; async callers move calls onto a blocking
/// thread.
pub trait SongStore: Send + Sync {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// Run a select query and return the matching rows.
    fn fetch(&self, query: &SongQuery) -> Result<Vec<Song>, StoreError>;

    /// Insert a row and return it as stored.
    fn insert(&self, song: &NewSong) -> Result<Vec<Song>, StoreError>;

    /// Change one column of the row with the given id and return the
    /// updated rows (empty when nothing matched).
    fn update(&self, id: Uuid, update: &FieldUpdate) -> Result<Vec<Song>, StoreError>;
}
