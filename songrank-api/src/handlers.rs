//! Request handlers.
//!
//! Comma-separated column lists and column names are parsed into typed
//! fields before the store is touched. Extractor rejections are taken as
//! `Result`s so they render through [`ApiError`] like every other failure.
//! Store calls block, so they run on tokio's blocking pool.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use songrank_core::song::{FieldList, FieldUpdate, NewSong, ScoreField, Song, SongField};
use songrank_store::songs::{self, DEFAULT_MIN_SCORE};
use songrank_store::{SongStore, StoreError};
use std::sync::Arc;
use uuid::Uuid;

pub const API_VERSION: &str = "0.1";

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    pub order_field: String,
    pub select_fields: String,
    pub min_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreIsParams {
    pub response_fields: String,
    pub selected_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ScoreAboveParams {
    pub response_fields: String,
    pub min_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreBelowParams {
    pub response_fields: String,
    pub max_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ZeroScoresParams {
    pub empty_fields: String,
    pub order_field: String,
    pub response_fields: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub field: String,
    pub value: Value,
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "version": API_VERSION }))
}

/// `GET /songs/ranking-by/:score_field`
pub async fn ranking_by(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<RankingParams>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Path(score_field) = path?;
    let Query(params) = query?;
    let score_field: ScoreField = score_field.parse()?;
    let order_field: SongField = params.order_field.parse()?;
    let select: FieldList = params.select_fields.parse()?;
    let min_score = params.min_score.unwrap_or(DEFAULT_MIN_SCORE);

    let rows = run_blocking(&state, "get_songs", move |store| {
        songs::ranking_by(store, score_field, order_field, select, min_score)
    })
    .await?;
    Ok(Json(rows))
}

/// `GET /songs/score-is/:selected_field`
pub async fn score_is(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ScoreIsParams>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Path(selected_field) = path?;
    let Query(params) = query?;
    let field: ScoreField = selected_field.parse()?;
    let response_fields: FieldList = params.response_fields.parse()?;
    let value = params.selected_score;

    let rows = run_blocking(&state, "get_songs_with_score", move |store| {
        songs::songs_with_value(store, field, value, response_fields)
    })
    .await?;
    tracing::info!(count = rows.len(), %field, score = value, "songs with score");
    Ok(Json(rows))
}

/// `GET /songs/score-above/:selected_field`
pub async fn score_above(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ScoreAboveParams>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Path(selected_field) = path?;
    let Query(params) = query?;
    let field: ScoreField = selected_field.parse()?;
    let response_fields: FieldList = params.response_fields.parse()?;
    let min_score = params.min_score.unwrap_or(DEFAULT_MIN_SCORE);

    let rows = run_blocking(&state, "get_songs_min", move |store| {
        songs::songs_at_least(store, field, response_fields, min_score)
    })
    .await?;
    tracing::info!(count = rows.len(), %field, min_score, "songs at or above score");
    Ok(Json(rows))
}

/// `GET /songs/score-below/:selected_field`
pub async fn score_below(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ScoreBelowParams>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Path(selected_field) = path?;
    let Query(params) = query?;
    let field: ScoreField = selected_field.parse()?;
    let response_fields: FieldList = params.response_fields.parse()?;
    let max_score = params.max_score;

    let rows = run_blocking(&state, "get_songs_below", move |store| {
        songs::songs_below(store, field, max_score, response_fields)
    })
    .await?;
    Ok(Json(rows))
}

/// `GET /songs/zero-scores/`
pub async fn zero_scores(
    State(state): State<AppState>,
    query: Result<Query<ZeroScoresParams>, QueryRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Query(params) = query?;
    let empty_fields: FieldList = params.empty_fields.parse()?;
    let order_field: SongField = params.order_field.parse()?;
    let response_fields = FieldList::parse_or_response(params.response_fields.as_deref())?;

    let rows = run_blocking(&state, "fetching songs with zero scores", move |store| {
        songs::songs_with_empty_fields(store, &empty_fields, order_field, response_fields)
    })
    .await?;
    Ok(Json(rows))
}

/// `POST /songs`
pub async fn create_song(
    State(state): State<AppState>,
    body: Result<Json<NewSong>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Song>>), ApiError> {
    let Json(new_song) = body?;
    let rows = run_blocking(&state, "create_song", move |store| {
        songs::insert_song(store, &new_song)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

/// `PATCH /songs/:id`
pub async fn update_song(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let Path(id) = path?;
    let Json(request) = body?;
    let field: SongField = request.field.parse()?;
    let update = FieldUpdate::new(field, request.value)?;

    let rows = run_blocking(&state, "update_song", move |store| {
        songs::update_song_field(store, id, &update)
    })
    .await?;
    Ok(Json(rows))
}

/// Run a store operation on the blocking pool, tagging failures with the
/// operation name.
async fn run_blocking<F>(
    state: &AppState,
    operation: &'static str,
    f: F,
) -> Result<Vec<Song>, ApiError>
where
    F: FnOnce(&dyn SongStore) -> Result<Vec<Song>, StoreError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| ApiError::Internal {
            operation,
            message: e.to_string(),
        })?
        .map_err(|source| ApiError::Store { operation, source })
}
