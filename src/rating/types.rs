use chrono::{DateTime, Utc};

use crate::domain::{AthleteId, PieceId, RankedAthlete};

pub type RatingValue = f64;

/// Pairwise comparison isolated by one swap between consecutive pieces
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupEdge {
    pub piece_id: PieceId,
    pub timestamp: DateTime<Utc>,
    pub incoming: AthleteId,
    pub outgoing: AthleteId,
    /// Seconds per 500 m by which `incoming` is faster than `outgoing`
    pub margin: f64,
}

impl MatchupEdge {
    pub fn faster(&self) -> AthleteId {
        if self.margin >= 0.0 {
            self.incoming
        } else {
            self.outgoing
        }
    }

    pub fn slower(&self) -> AthleteId {
        if self.margin >= 0.0 {
            self.outgoing
        } else {
            self.incoming
        }
    }

    /// Athlete ids ordered low to high
    pub fn pair(&self) -> (AthleteId, AthleteId) {
        if self.incoming < self.outgoing {
            (self.incoming, self.outgoing)
        } else {
            (self.outgoing, self.incoming)
        }
    }

    /// Margin seen from the lower athlete id of the pair
    pub fn oriented_margin(&self) -> f64 {
        if self.incoming < self.outgoing {
            self.margin
        } else {
            -self.margin
        }
    }
}

/// Weighted win of one athlete over another, as fed to the fit
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub winner_id: AthleteId,
    pub loser_id: AthleteId,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Log-strengths indexed like the athlete list passed to the fit
    pub log_strengths: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Result of one engine run over a team's full history
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub athletes: Vec<RankedAthlete>,
    pub history_version: PieceId,
    pub edge_count: usize,
    pub iterations: usize,
    pub converged: bool,
}

impl Evaluation {
    pub fn rating_of(&self, athlete_id: AthleteId) -> Option<RatingValue> {
        self.athletes
            .iter()
            .find(|a| a.athlete_id == athlete_id)
            .map(|a| a.rating)
    }
}
