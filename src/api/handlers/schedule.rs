use axum::{extract::State, response::Json};
use std::sync::Arc;

use super::AppState;
use crate::api::models::AppError;
use crate::schedule::{generate_schedule, Schedule, ScheduleRequest};

pub async fn post_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = generate_schedule(&request, &state.config.schedule)?;
    Ok(Json(schedule))
}
