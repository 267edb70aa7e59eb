use anyhow::Context as _;
use thiserror::Error;

use crate::domain::TeamId;

/// Failures surfaced to callers of the store, scheduler and ranking service
#[derive(Debug, Error)]
pub enum SeatRaceError {
    /// Malformed piece, multi-swap piece or invalid request data
    #[error("Validation error: {0}")]
    Validation(String),
    /// Too few athletes for the requested boat configuration
    #[error(
        "Insufficient roster: {athletes} athletes cannot crew {boats} boats of {seats} seats"
    )]
    InsufficientRoster {
        athletes: usize,
        boats: usize,
        seats: usize,
    },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type SeatRaceResult<T> = Result<T, SeatRaceError>;

pub fn validation(message: impl Into<String>) -> SeatRaceError {
    SeatRaceError::Validation(message.into())
}

/// Add context to storage errors
pub fn storage_context(operation: &str, team_id: TeamId) -> String {
    format!("Failed to {} for team {}", operation, team_id)
}

/// Wrap result with storage context
pub fn with_storage_context<T, E>(
    result: Result<T, E>,
    operation: &str,
    team_id: TeamId,
) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(storage_context(operation, team_id))
}
