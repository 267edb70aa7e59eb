use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::TransactionBehavior;

use crate::config::StorageSettings;
use crate::database::{self, athletes, pieces, DbPool};
use crate::domain::{
    detect_swap, validate_piece, Athlete, BoatEntry, PieceId, PieceKind, PieceResult,
    SeatRacePiece, TeamId,
};
use crate::errors::{validation, with_storage_context, SeatRaceResult};

/// Append-only log of seat-race pieces, keyed by team
#[derive(Clone)]
pub struct RaceRecordStore {
    pool: DbPool,
    default_distance_meters: f64,
}

impl RaceRecordStore {
    pub fn new(pool: DbPool, settings: &StorageSettings) -> Self {
        Self {
            pool,
            default_distance_meters: settings.default_distance_meters,
        }
    }

    /// Validates and appends a piece.
    ///
    /// The first piece of a session is stored as a baseline; every later one
    /// must differ from its predecessor by exactly one swap. Rejected pieces
    /// leave the history untouched.
    pub fn record_piece_result(
        &self,
        team_id: TeamId,
        piece: &SeatRacePiece,
    ) -> SeatRaceResult<PieceResult> {
        if let Err(e) = validate_piece(piece) {
            warn!("Rejected piece for team {}: {}", team_id, e);
            return Err(e);
        }

        let mut conn = database::get_connection(&self.pool)?;
        let tx = with_storage_context(
            conn.transaction_with_behavior(TransactionBehavior::Immediate),
            "open piece transaction",
            team_id,
        )?;

        let previous = pieces::find_last_in_session(&tx, team_id, piece.session_id)?;
        let kind = match previous {
            None => PieceKind::Baseline,
            Some(prev) => match classify_against(&prev, piece) {
                Ok(kind) => kind,
                Err(e) => {
                    warn!(
                        "Rejected piece for team {} session {}: {}",
                        team_id, piece.session_id, e
                    );
                    return Err(e);
                }
            },
        };

        let boats = normalize_boats(&piece.boats);
        let (winning_boat_id, margin_seconds) = decide_outcome(&boats);

        let mut result = PieceResult {
            id: 0,
            team_id,
            session_id: piece.session_id,
            boats,
            timestamp: piece.timestamp,
            distance_meters: piece.distance_meters.unwrap_or(self.default_distance_meters),
            kind,
            winning_boat_id,
            margin_seconds,
        };

        result.id = pieces::insert_piece(&tx, &result)?;
        with_storage_context(tx.commit(), "commit piece", team_id)?;

        info!(
            "Recorded piece {} for team {} session {} ({} won by {:.2}s)",
            result.id, team_id, result.session_id, result.winning_boat_id, result.margin_seconds
        );
        Ok(result)
    }

    /// Every stored piece of the team in chronological order
    pub fn get_race_history(&self, team_id: TeamId) -> Result<Vec<PieceResult>> {
        let conn = database::get_connection(&self.pool)?;
        pieces::list_by_team(&conn, team_id)
            .with_context(|| format!("Failed to load race history for team {}", team_id))
    }

    pub fn history_version(&self, team_id: TeamId) -> Result<PieceId> {
        let conn = database::get_connection(&self.pool)?;
        pieces::history_version(&conn, team_id)
    }

    pub fn upsert_athlete(&self, team_id: TeamId, athlete: &Athlete) -> SeatRaceResult<Athlete> {
        if athlete.name.trim().is_empty() {
            return Err(validation("Athlete name must not be empty"));
        }

        let conn = database::get_connection(&self.pool)?;
        Ok(athletes::upsert_athlete(&conn, team_id, athlete)?)
    }

    pub fn list_athletes(&self, team_id: TeamId) -> Result<Vec<Athlete>> {
        let conn = database::get_connection(&self.pool)?;
        athletes::list_by_team(&conn, team_id)
    }
}

fn classify_against(previous: &PieceResult, piece: &SeatRacePiece) -> SeatRaceResult<PieceKind> {
    if piece.timestamp < previous.timestamp {
        return Err(validation(format!(
            "Piece timestamp {} precedes the previous piece of the session ({})",
            piece.timestamp, previous.timestamp
        )));
    }

    let swap = detect_swap(&previous.boats, &piece.boats)?;
    Ok(PieceKind::Swap { swap })
}

fn normalize_boats(boats: &[BoatEntry]) -> Vec<BoatEntry> {
    boats
        .iter()
        .map(|boat| {
            let mut boat = boat.clone();
            boat.seats.sort_by_key(|s| s.seat_number);
            boat
        })
        .collect()
}

/// Winner is the fastest boat (first submitted on ties); margin is its gap to the next boat
fn decide_outcome(boats: &[BoatEntry]) -> (String, f64) {
    let mut times: Vec<(usize, f64)> = boats
        .iter()
        .enumerate()
        .map(|(idx, b)| (idx, b.elapsed_seconds))
        .collect();
    times.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let winner = &boats[times[0].0];
    let margin = times.get(1).map(|t| t.1 - times[0].1).unwrap_or(0.0);
    (winner.boat_id.clone(), margin)
}
