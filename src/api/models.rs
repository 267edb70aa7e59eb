use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::domain::Side;
use crate::errors::SeatRaceError;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
}

/// Body of an athlete upsert
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteInput {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_side")]
    pub side: Side,
}

fn default_side() -> Side {
    Side::Both
}

/// Errors returned by the HTTP handlers
#[derive(Debug)]
pub enum AppError {
    Domain(SeatRaceError),
    NotFound(String),
}

impl From<SeatRaceError> for AppError {
    fn from(err: SeatRaceError) -> Self {
        AppError::Domain(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Domain(SeatRaceError::Storage(err))
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(SeatRaceError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Domain(SeatRaceError::InsufficientRoster { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Domain(SeatRaceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message) = match &self {
            AppError::Domain(SeatRaceError::Validation(msg)) => ("validation_error", msg.clone()),
            AppError::Domain(err @ SeatRaceError::InsufficientRoster { .. }) => {
                ("insufficient_roster", err.to_string())
            }
            AppError::Domain(SeatRaceError::Storage(err)) => {
                error!("Request failed: {:#}", err);
                ("internal_error", "Internal storage error".to_string())
            }
            AppError::NotFound(msg) => ("not_found", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
