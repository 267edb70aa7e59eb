use std::cmp::Ordering;

use crate::domain::RankedAthlete;

/// Sorts athletes into their final order and numbers them from 1.
///
/// Raced athletes come first by rating, then races completed, then id.
/// Athletes without a race follow, alphabetically by name then id.
pub fn assign_ranks(mut athletes: Vec<RankedAthlete>) -> Vec<RankedAthlete> {
    athletes.sort_by(compare_standing);

    for (idx, athlete) in athletes.iter_mut().enumerate() {
        athlete.rank = idx as u32 + 1;
    }

    athletes
}

fn compare_standing(a: &RankedAthlete, b: &RankedAthlete) -> Ordering {
    match (a.races_completed == 0, b.races_completed == 0) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => a.name.cmp(&b.name).then(a.athlete_id.cmp(&b.athlete_id)),
        (false, false) => b
            .rating
            .total_cmp(&a.rating)
            .then(b.races_completed.cmp(&a.races_completed))
            .then(a.athlete_id.cmp(&b.athlete_id)),
    }
}
