//! Route table.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, patch, post};
use axum::Router;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/songs", post(handlers::create_song))
        .route("/songs/:id", patch(handlers::update_song))
        .route("/songs/ranking-by/:score_field", get(handlers::ranking_by))
        .route("/songs/score-is/:selected_field", get(handlers::score_is))
        .route("/songs/score-above/:selected_field", get(handlers::score_above))
        .route("/songs/score-below/:selected_field", get(handlers::score_below))
        .route("/songs/zero-scores", get(handlers::zero_scores))
        .route("/songs/zero-scores/", get(handlers::zero_scores))
        .with_state(state)
}
