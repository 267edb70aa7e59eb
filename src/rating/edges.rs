use std::collections::BTreeMap;

use super::types::MatchupEdge;
use crate::domain::{detect_swap, PieceResult, SessionId, SwapKind, SwapPair};

const SPLIT_METERS: f64 = 500.0;

/// Derives one edge per consecutive piece pair of a session that differ by a single swap.
///
/// Edges come back sorted by piece timestamp, piece id, then athlete pair.
pub fn derive_edges(history: &[PieceResult]) -> Vec<MatchupEdge> {
    let mut edges: Vec<MatchupEdge> = group_by_session(history)
        .values()
        .flat_map(|pieces| pieces.windows(2).filter_map(|w| edge_between(w[0], w[1])))
        .collect();

    edges.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.piece_id.cmp(&b.piece_id))
            .then(a.pair().cmp(&b.pair()))
    });
    edges
}

fn group_by_session(history: &[PieceResult]) -> BTreeMap<SessionId, Vec<&PieceResult>> {
    let mut sessions: BTreeMap<SessionId, Vec<&PieceResult>> = BTreeMap::new();
    for piece in history {
        sessions.entry(piece.session_id).or_default().push(piece);
    }
    for pieces in sessions.values_mut() {
        pieces.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
    }
    sessions
}

fn edge_between(previous: &PieceResult, current: &PieceResult) -> Option<MatchupEdge> {
    let swap = detect_swap(&previous.boats, &current.boats).ok()?;
    let swing = lead_of(current, &swap)? - lead_of(previous, &swap)?;

    // A boat swap moves both athletes, so the swing counts their difference twice
    let difference = match swap.kind {
        SwapKind::BoatSwap => swing / 2.0,
        SwapKind::Substitution => swing,
    };
    let distance = (previous.distance_meters + current.distance_meters) / 2.0;

    Some(MatchupEdge {
        piece_id: current.id,
        timestamp: current.timestamp,
        incoming: swap.incoming,
        outgoing: swap.outgoing,
        margin: difference * SPLIT_METERS / distance,
    })
}

/// Seconds by which the swap boat beat its reference in `piece`.
///
/// The reference is the counterpart boat of a boat swap, or the mean of all
/// other boats for a substitution.
fn lead_of(piece: &PieceResult, swap: &SwapPair) -> Option<f64> {
    let boat = piece.boat(&swap.boat_id)?;

    let reference = match &swap.other_boat_id {
        Some(other) => piece.boat(other)?.elapsed_seconds,
        None => {
            let others: Vec<f64> = piece
                .boats
                .iter()
                .filter(|b| b.boat_id != swap.boat_id)
                .map(|b| b.elapsed_seconds)
                .collect();
            if others.is_empty() {
                return None;
            }
            others.iter().sum::<f64>() / others.len() as f64
        }
    };

    Some(reference - boat.elapsed_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoatEntry, PieceKind, SeatAssignment, Side};
    use chrono::{Duration, TimeZone, Utc};

    fn boat(id: &str, athletes: &[i64], elapsed: f64) -> BoatEntry {
        BoatEntry {
            boat_id: id.to_string(),
            seats: athletes
                .iter()
                .enumerate()
                .map(|(i, &athlete_id)| SeatAssignment {
                    seat_number: i as u32 + 1,
                    athlete_id,
                    side: Side::Both,
                })
                .collect(),
            elapsed_seconds: elapsed,
        }
    }

    fn piece(id: i64, session_id: i64, minute: i64, boats: Vec<BoatEntry>) -> PieceResult {
        PieceResult {
            id,
            team_id: 1,
            session_id,
            boats,
            timestamp: Utc.with_ymd_and_hms(2026, 5, 1, 7, 0, 0).unwrap() + Duration::minutes(minute),
            distance_meters: 1000.0,
            kind: PieceKind::Baseline,
            winning_boat_id: String::new(),
            margin_seconds: 0.0,
        }
    }

    #[test]
    fn test_boat_swap_margin_is_half_the_swing_per_500() {
        let history = vec![
            piece(1, 1, 0, vec![boat("1", &[10, 30], 102.0), boat("2", &[20, 40], 100.0)]),
            piece(2, 1, 10, vec![boat("1", &[10, 40], 100.0), boat("2", &[20, 30], 101.0)]),
        ];

        let edges = derive_edges(&history);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].incoming, 40);
        assert_eq!(edges[0].outgoing, 30);
        // lead went from -2.0 to +1.0: swing 3.0, 1.5 s per athlete over 1000 m
        assert!((edges[0].margin - 0.75).abs() < 1e-12);
        assert_eq!(edges[0].faster(), 40);
    }

    #[test]
    fn test_substitution_margin_uses_full_swing() {
        let history = vec![
            piece(1, 1, 0, vec![boat("1", &[10, 30], 100.0), boat("2", &[20, 40], 100.0)]),
            piece(2, 1, 10, vec![boat("1", &[10, 50], 101.0), boat("2", &[20, 40], 100.0)]),
        ];

        let edges = derive_edges(&history);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].incoming, 50);
        assert!((edges[0].margin + 0.5).abs() < 1e-12);
        assert_eq!(edges[0].faster(), 30);
    }

    #[test]
    fn test_edges_stay_within_sessions() {
        let history = vec![
            piece(1, 1, 0, vec![boat("1", &[10, 30], 100.0), boat("2", &[20, 40], 100.0)]),
            piece(2, 2, 5, vec![boat("1", &[10, 40], 100.0), boat("2", &[20, 30], 100.0)]),
        ];
        assert!(derive_edges(&history).is_empty());
    }

    #[test]
    fn test_multi_change_pairs_are_skipped() {
        let history = vec![
            piece(1, 1, 0, vec![boat("1", &[10, 30], 100.0), boat("2", &[20, 40], 100.0)]),
            piece(2, 1, 5, vec![boat("1", &[20, 40], 100.0), boat("2", &[10, 30], 100.0)]),
        ];
        assert!(derive_edges(&history).is_empty());
    }

    #[test]
    fn test_edges_sorted_by_time_across_sessions() {
        let history = vec![
            piece(1, 2, 0, vec![boat("1", &[1, 2], 100.0), boat("2", &[3, 4], 100.0)]),
            piece(2, 1, 1, vec![boat("1", &[5, 6], 100.0), boat("2", &[7, 8], 100.0)]),
            piece(3, 1, 2, vec![boat("1", &[5, 8], 99.0), boat("2", &[7, 6], 100.0)]),
            piece(4, 2, 3, vec![boat("1", &[1, 4], 99.0), boat("2", &[3, 2], 100.0)]),
        ];

        let edges = derive_edges(&history);
        let pieces: Vec<i64> = edges.iter().map(|e| e.piece_id).collect();
        assert_eq!(pieces, vec![3, 4]);
    }
}
