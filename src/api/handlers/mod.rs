use axum::response::Json;

use crate::api::models::HealthResponse;
use crate::config::AppConfig;
use crate::services::RankingService;
use crate::store::RaceRecordStore;

pub mod athletes;
pub mod pieces;
pub mod rankings;
pub mod schedule;

/// Shared by every handler behind an `Arc`
pub struct AppState {
    pub records: RaceRecordStore,
    pub rankings: RankingService,
    pub config: AppConfig,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
