use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::models::AppError;
use crate::domain::{RankingSnapshot, TeamId};

pub async fn get_rankings(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<RankingSnapshot>, AppError> {
    match state.rankings.fetch_rankings(team_id).await? {
        Some(snapshot) => Ok(Json(snapshot.as_ref().clone())),
        None => Err(AppError::NotFound(format!(
            "Team {} has not been ranked yet",
            team_id
        ))),
    }
}

pub async fn recalculate(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<RankingSnapshot>, AppError> {
    let snapshot = state.rankings.recalculate_rankings(team_id).await?;
    Ok(Json(snapshot.as_ref().clone()))
}
