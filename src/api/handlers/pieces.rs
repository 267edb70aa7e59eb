use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::models::AppError;
use crate::domain::{PieceResult, SeatRacePiece, TeamId};

pub async fn post_piece(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
    Json(piece): Json<SeatRacePiece>,
) -> Result<(StatusCode, Json<PieceResult>), AppError> {
    let result = state.records.record_piece_result(team_id, &piece)?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn get_pieces(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Vec<PieceResult>>, AppError> {
    Ok(Json(state.records.get_race_history(team_id)?))
}
