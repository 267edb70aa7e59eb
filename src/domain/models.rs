use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TeamId = i64;
pub type AthleteId = i64;
pub type SessionId = i64;
pub type PieceId = i64;

/// Rowing side an athlete prefers (or the seat is rigged for)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Port,
    Starboard,
    Both,
    Coxswain,
}

impl Side {
    pub fn as_str(&self) -> &str {
        match self {
            Side::Port => "port",
            Side::Starboard => "starboard",
            Side::Both => "both",
            Side::Coxswain => "coxswain",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "port" => Some(Side::Port),
            "starboard" => Some(Side::Starboard),
            "both" => Some(Side::Both),
            "coxswain" => Some(Side::Coxswain),
            _ => None,
        }
    }
}

/// Athlete registered on a team roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: AthleteId,
    pub name: String,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub seat_number: u32,
    pub athlete_id: AthleteId,
    pub side: Side,
}

/// One boat of a piece: its crew and the time it rowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatEntry {
    pub boat_id: String,
    pub seats: Vec<SeatAssignment>,
    pub elapsed_seconds: f64,
}

impl BoatEntry {
    pub fn contains(&self, athlete_id: AthleteId) -> bool {
        self.seats.iter().any(|s| s.athlete_id == athlete_id)
    }
}

/// Piece submission from the training subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRacePiece {
    pub session_id: SessionId,
    pub boats: Vec<BoatEntry>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapKind {
    /// Two athletes exchanged boats
    BoatSwap,
    /// A boated athlete was replaced by one who sat out the previous piece
    Substitution,
}

/// The single lineup change separating a piece from its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPair {
    pub kind: SwapKind,
    /// Boat that `outgoing` left and `incoming` joined
    pub boat_id: String,
    pub outgoing: AthleteId,
    pub incoming: AthleteId,
    /// Boat `outgoing` moved into; `None` for substitutions
    pub other_boat_id: Option<String>,
}

impl SwapPair {
    pub fn involves(&self, athlete_id: AthleteId) -> bool {
        self.outgoing == athlete_id || self.incoming == athlete_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PieceKind {
    Baseline,
    Swap { swap: SwapPair },
}

/// A stored, finalized piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceResult {
    pub id: PieceId,
    pub team_id: TeamId,
    pub session_id: SessionId,
    pub boats: Vec<BoatEntry>,
    pub timestamp: DateTime<Utc>,
    pub distance_meters: f64,
    pub kind: PieceKind,
    pub winning_boat_id: String,
    /// Gap between the winner and the runner-up
    pub margin_seconds: f64,
}

impl PieceResult {
    pub fn swap(&self) -> Option<&SwapPair> {
        match &self.kind {
            PieceKind::Baseline => None,
            PieceKind::Swap { swap } => Some(swap),
        }
    }

    pub fn boat(&self, boat_id: &str) -> Option<&BoatEntry> {
        self.boats.iter().find(|b| b.boat_id == boat_id)
    }

    pub fn athlete_ids(&self) -> impl Iterator<Item = AthleteId> + '_ {
        self.boats
            .iter()
            .flat_map(|b| b.seats.iter().map(|s| s.athlete_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceTier::High
        } else if score >= 0.5 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(ConfidenceTier::Low),
            "medium" => Some(ConfidenceTier::Medium),
            "high" => Some(ConfidenceTier::High),
            _ => None,
        }
    }
}

/// Rank movement relative to the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
    New,
}

impl Trend {
    pub fn between(previous_rank: Option<u32>, rank: u32) -> Self {
        match previous_rank {
            None => Trend::New,
            Some(prev) if rank < prev => Trend::Up,
            Some(prev) if rank > prev => Trend::Down,
            Some(_) => Trend::Same,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Same => "same",
            Trend::New => "new",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Trend::Up),
            "down" => Some(Trend::Down),
            "same" => Some(Trend::Same),
            "new" => Some(Trend::New),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAthlete {
    pub athlete_id: AthleteId,
    pub name: String,
    pub rating: f64,
    pub confidence: f64,
    pub confidence_tier: ConfidenceTier,
    pub races_completed: u32,
    pub comparisons: u32,
    pub rank: u32,
    pub trend: Trend,
}

/// Immutable, versioned ranking of a team produced by one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSnapshot {
    pub snapshot_id: i64,
    pub team_id: TeamId,
    pub generated_at: DateTime<Utc>,
    /// Newest piece id included in the computation
    pub history_version: PieceId,
    pub converged: bool,
    pub iterations: usize,
    pub athletes: Vec<RankedAthlete>,
}

impl RankingSnapshot {
    pub fn athlete(&self, athlete_id: AthleteId) -> Option<&RankedAthlete> {
        self.athletes.iter().find(|a| a.athlete_id == athlete_id)
    }
}
