//! Song queries used by the HTTP layer.
//!
//! Each operation takes the store explicitly, builds one [`SongQuery`], and
//! returns the rows as the store produced them.

use crate::provider::{SongStore, StoreError};
use crate::query::SongQuery;
use songrank_core::song::{FieldList, FieldUpdate, NewSong, ScoreField, Song, SongField};
use uuid::Uuid;

/// Minimum score used when the caller does not give one.
pub const DEFAULT_MIN_SCORE: f64 = 90.0;

/// Songs whose `score_field` is at least `min_score`, ordered by
/// `order_field` descending.
pub fn ranking_by(
    store: &dyn SongStore,
    score_field: ScoreField,
    order_field: SongField,
    select: FieldList,
    min_score: f64,
) -> Result<Vec<Song>, StoreError> {
    let query = SongQuery::new()
        .select(select)
        .order_desc(order_field)
        .gte(score_field, min_score);
    run(store, &query, "ranking_by")
}

/// Songs whose `field` equals `value`, best average first.
pub fn songs_with_value(
    store: &dyn SongStore,
    field: ScoreField,
    value: f64,
    response_fields: FieldList,
) -> Result<Vec<Song>, StoreError> {
    let query = SongQuery::new()
        .select(response_fields)
        .order_desc(SongField::AverageScore)
        .order_desc(field.field())
        .eq(field.field(), value);
    run(store, &query, "songs_with_value")
}

/// Songs whose `field` is at least `min_score`, highest first.
pub fn songs_at_least(
    store: &dyn SongStore,
    field: ScoreField,
    response_fields: FieldList,
    min_score: f64,
) -> Result<Vec<Song>, StoreError> {
    let query = SongQuery::new()
        .select(response_fields)
        .order_desc(field.field())
        .gte(field, min_score);
    run(store, &query, "songs_at_least")
}

/// Songs whose `field` is strictly below `max_score`, highest first.
pub fn songs_below(
    store: &dyn SongStore,
    field: ScoreField,
    max_score: f64,
    response_fields: FieldList,
) -> Result<Vec<Song>, StoreError> {
    let query = SongQuery::new()
        .select(response_fields)
        .order_desc(field.field())
        .lt(field, max_score);
    run(store, &query, "songs_below")
}

/// Songs where every one of `empty_fields` is null, ordered by
/// `order_field` descending.
pub fn songs_with_empty_fields(
    store: &dyn SongStore,
    empty_fields: &FieldList,
    order_field: SongField,
    response_fields: FieldList,
) -> Result<Vec<Song>, StoreError> {
    let query = empty_fields
        .iter()
        .fold(SongQuery::new().select(response_fields), |query, field| {
            query.is_null(field)
        })
        .order_desc(order_field);
    run(store, &query, "songs_with_empty_fields")
}

pub fn insert_song(store: &dyn SongStore, song: &NewSong) -> Result<Vec<Song>, StoreError> {
    let rows = store.insert(song)?;
    tracing::info!(store = store.name(), title = %song.title, "inserted song");
    Ok(rows)
}

/// Change one column of a song. Fails with [`StoreError::NotFound`] when no
/// row has the id.
pub fn update_song_field(
    store: &dyn SongStore,
    id: Uuid,
    update: &FieldUpdate,
) -> Result<Vec<Song>, StoreError> {
    let rows = store.update(id, update)?;
    if rows.is_empty() {
        return Err(StoreError::NotFound { id });
    }
    tracing::info!(store = store.name(), %id, field = %update.field(), "updated song");
    Ok(rows)
}

fn run(store: &dyn SongStore, query: &SongQuery, operation: &str) -> Result<Vec<Song>, StoreError> {
    let rows = store.fetch(query)?;
    tracing::info!(store = store.name(), operation, rows = rows.len(), "songs fetched");
    Ok(rows)
}
