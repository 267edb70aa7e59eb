use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    athletes::{get_athletes, put_athlete},
    health,
    pieces::{get_pieces, post_piece},
    rankings::{get_rankings, recalculate},
    schedule::post_schedule,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/teams/:team_id/athletes",
            get(get_athletes).put(put_athlete),
        )
        .route("/api/teams/:team_id/pieces", get(get_pieces).post(post_piece))
        .route("/api/teams/:team_id/rankings", get(get_rankings))
        .route(
            "/api/teams/:team_id/rankings/recalculate",
            post(recalculate),
        )
        .route("/api/schedule", post(post_schedule))
        .with_state(state)
}
