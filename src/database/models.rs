use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::domain::{
    BoatEntry, ConfidenceTier, PieceKind, PieceResult, RankedAthlete, SwapKind, SwapPair, Trend,
};

#[derive(Debug, Clone)]
pub struct PieceRow {
    pub id: i64,
    pub team_id: i64,
    pub session_id: i64,
    pub recorded_at: DateTime<Utc>,
    pub distance_meters: f64,
    pub kind: String,
    pub swap_kind: Option<String>,
    pub swap_boat_id: Option<String>,
    pub swap_outgoing: Option<i64>,
    pub swap_incoming: Option<i64>,
    pub swap_other_boat_id: Option<String>,
    pub winning_boat_id: String,
    pub margin_seconds: f64,
}

impl PieceRow {
    pub fn into_result(self, boats: Vec<BoatEntry>) -> Result<PieceResult> {
        let kind = self.piece_kind()?;

        Ok(PieceResult {
            id: self.id,
            team_id: self.team_id,
            session_id: self.session_id,
            boats,
            timestamp: self.recorded_at,
            distance_meters: self.distance_meters,
            kind,
            winning_boat_id: self.winning_boat_id,
            margin_seconds: self.margin_seconds,
        })
    }

    fn piece_kind(&self) -> Result<PieceKind> {
        match self.kind.as_str() {
            "baseline" => Ok(PieceKind::Baseline),
            "swap" => Ok(PieceKind::Swap {
                swap: self.swap_pair()?,
            }),
            other => Err(anyhow!("Unknown kind '{}' on piece {}", other, self.id)),
        }
    }

    fn swap_pair(&self) -> Result<SwapPair> {
        let kind = match self.swap_kind.as_deref() {
            Some("boat_swap") => SwapKind::BoatSwap,
            Some("substitution") => SwapKind::Substitution,
            other => return Err(anyhow!("Unknown swap kind {:?} on piece {}", other, self.id)),
        };

        match (&self.swap_boat_id, self.swap_outgoing, self.swap_incoming) {
            (Some(boat_id), Some(outgoing), Some(incoming)) => Ok(SwapPair {
                kind,
                boat_id: boat_id.clone(),
                outgoing,
                incoming,
                other_boat_id: self.swap_other_boat_id.clone(),
            }),
            _ => Err(anyhow!("Incomplete swap columns on piece {}", self.id)),
        }
    }
}

pub fn swap_kind_str(kind: SwapKind) -> &'static str {
    match kind {
        SwapKind::BoatSwap => "boat_swap",
        SwapKind::Substitution => "substitution",
    }
}

#[derive(Debug, Clone)]
pub struct BoatRow {
    pub piece_id: i64,
    pub boat_id: String,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct SeatRow {
    pub piece_id: i64,
    pub boat_id: String,
    pub seat_number: u32,
    pub athlete_id: i64,
    pub side: String,
}

#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub id: i64,
    pub team_id: i64,
    pub generated_at: DateTime<Utc>,
    pub history_version: i64,
    pub converged: bool,
    pub iterations: i64,
}

#[derive(Debug, Clone)]
pub struct SnapshotEntryRow {
    pub athlete_id: i64,
    pub name: String,
    pub rating: f64,
    pub confidence: f64,
    pub confidence_tier: String,
    pub races_completed: u32,
    pub comparisons: u32,
    pub rank: u32,
    pub trend: String,
}

impl SnapshotEntryRow {
    pub fn into_ranked(self) -> Result<RankedAthlete> {
        let confidence_tier = ConfidenceTier::parse(&self.confidence_tier)
            .ok_or_else(|| anyhow!("Unknown confidence tier '{}'", self.confidence_tier))?;
        let trend =
            Trend::parse(&self.trend).ok_or_else(|| anyhow!("Unknown trend '{}'", self.trend))?;

        Ok(RankedAthlete {
            athlete_id: self.athlete_id,
            name: self.name,
            rating: self.rating,
            confidence: self.confidence,
            confidence_tier,
            races_completed: self.races_completed,
            comparisons: self.comparisons,
            rank: self.rank,
            trend,
        })
    }
}
