use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::models::{AppError, AthleteInput};
use crate::domain::{Athlete, TeamId};

pub async fn put_athlete(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
    Json(input): Json<AthleteInput>,
) -> Result<Json<Athlete>, AppError> {
    let athlete = Athlete {
        id: input.id,
        name: input.name,
        side: input.side,
    };
    let stored = state.records.upsert_athlete(team_id, &athlete)?;
    Ok(Json(stored))
}

pub async fn get_athletes(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<Athlete>>, AppError> {
    Ok(Json(state.records.list_athletes(team_id)?))
}
