use serde::{Deserialize, Serialize};

use crate::domain::AthleteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatConfig {
    pub boats: usize,
    pub seats_per_boat: usize,
}

impl BoatConfig {
    pub fn boated_seats(&self) -> usize {
        self.boats * self.seats_per_boat
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub athlete_ids: Vec<AthleteId>,
    pub boat_config: BoatConfig,
    pub piece_count: usize,
    /// Swap pairs cycled in order when the roster is too small for a Latin walk
    #[serde(default)]
    pub manual_rotation: Vec<(AthleteId, AthleteId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatLineup {
    pub label: String,
    /// Athletes from seat 1 upwards
    pub seats: Vec<AthleteId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSpec {
    pub index: usize,
    pub boats: Vec<BoatLineup>,
    /// Athletes sitting this piece out
    pub bye: Vec<AthleteId>,
    /// The two athletes that changed places since the previous piece; none for the baseline
    pub swap_pair: Option<(AthleteId, AthleteId)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Coverage {
    /// Every athlete is linked to every other through swap comparisons
    Connected,
    /// Too few pieces to link the whole roster
    Partial,
    /// Coach-specified rotation; no coverage guarantee
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub pieces: Vec<PieceSpec>,
    pub coverage: Coverage,
}

impl Schedule {
    /// Swap pairs in piece order
    pub fn swap_pairs(&self) -> Vec<(AthleteId, AthleteId)> {
        self.pieces.iter().filter_map(|p| p.swap_pair).collect()
    }
}
