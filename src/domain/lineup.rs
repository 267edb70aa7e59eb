use std::collections::{BTreeMap, HashSet};

use super::models::{AthleteId, BoatEntry, SeatRacePiece, SwapKind, SwapPair};
use crate::errors::{validation, SeatRaceResult};

type Slot<'a> = (&'a str, u32);

/// Checks the structural invariants of a single piece
pub fn validate_piece(piece: &SeatRacePiece) -> SeatRaceResult<()> {
    if piece.boats.len() < 2 {
        return Err(validation(format!(
            "A seat race needs at least two boats, got {}",
            piece.boats.len()
        )));
    }

    if let Some(distance) = piece.distance_meters {
        if !distance.is_finite() || distance <= 0.0 {
            return Err(validation(format!(
                "Distance must be a positive number of metres, got {}",
                distance
            )));
        }
    }

    let mut boat_ids = HashSet::new();
    let mut athletes = HashSet::new();

    for boat in &piece.boats {
        validate_boat(boat)?;

        if !boat_ids.insert(boat.boat_id.as_str()) {
            return Err(validation(format!("Boat {} appears twice", boat.boat_id)));
        }

        for seat in &boat.seats {
            if !athletes.insert(seat.athlete_id) {
                return Err(validation(format!(
                    "Athlete {} is seated more than once",
                    seat.athlete_id
                )));
            }
        }
    }

    Ok(())
}

fn validate_boat(boat: &BoatEntry) -> SeatRaceResult<()> {
    if boat.boat_id.trim().is_empty() {
        return Err(validation("Boat id must not be empty"));
    }

    if boat.seats.is_empty() {
        return Err(validation(format!("Boat {} has no seats", boat.boat_id)));
    }

    if !boat.elapsed_seconds.is_finite() || boat.elapsed_seconds <= 0.0 {
        return Err(validation(format!(
            "Boat {} has invalid elapsed time {}",
            boat.boat_id, boat.elapsed_seconds
        )));
    }

    let mut seat_numbers = HashSet::new();
    for seat in &boat.seats {
        if seat.seat_number == 0 || !seat_numbers.insert(seat.seat_number) {
            return Err(validation(format!(
                "Boat {} has invalid or duplicate seat number {}",
                boat.boat_id, seat.seat_number
            )));
        }
    }

    Ok(())
}

/// Finds the single swap separating `current` from `previous`.
///
/// Both lineups must use the same boats and seats. Exactly one of two
/// changes is accepted: two athletes in different boats trading places, or
/// one boated athlete replaced by an athlete who sat out `previous`.
pub fn detect_swap(previous: &[BoatEntry], current: &[BoatEntry]) -> SeatRaceResult<SwapPair> {
    let before = slot_map(previous);
    let after = slot_map(current);

    if !same_layout(&before, &after) {
        return Err(validation(
            "Boat and seat layout must match the previous piece of the session",
        ));
    }

    let changed: Vec<(Slot, AthleteId, AthleteId)> = before
        .iter()
        .filter_map(|(slot, &was)| {
            let now = after[slot];
            (was != now).then_some((*slot, was, now))
        })
        .collect();

    match changed.as_slice() {
        [] => Err(validation(
            "Lineup is identical to the previous piece; exactly one swap is required",
        )),
        [(slot, outgoing, incoming)] => Ok(SwapPair {
            kind: SwapKind::Substitution,
            boat_id: slot.0.to_string(),
            outgoing: *outgoing,
            incoming: *incoming,
            other_boat_id: None,
        }),
        [(first, a, b), (second, c, d)] if a == d && b == c => {
            if first.0 == second.0 {
                return Err(validation(format!(
                    "Athletes {} and {} changed seats inside boat {}; only swaps between boats isolate a comparison",
                    a, b, first.0
                )));
            }
            Ok(SwapPair {
                kind: SwapKind::BoatSwap,
                boat_id: first.0.to_string(),
                outgoing: *a,
                incoming: *b,
                other_boat_id: Some(second.0.to_string()),
            })
        }
        _ => Err(validation(format!(
            "{} seats changed since the previous piece; exactly one swap is allowed",
            changed.len()
        ))),
    }
}

fn slot_map(boats: &[BoatEntry]) -> BTreeMap<Slot<'_>, AthleteId> {
    boats
        .iter()
        .flat_map(|boat| {
            boat.seats
                .iter()
                .map(move |seat| ((boat.boat_id.as_str(), seat.seat_number), seat.athlete_id))
        })
        .collect()
}

fn same_layout(a: &BTreeMap<Slot, AthleteId>, b: &BTreeMap<Slot, AthleteId>) -> bool {
    a.len() == b.len() && a.keys().zip(b.keys()).all(|(x, y)| x == y)
}
