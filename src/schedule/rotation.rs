use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use log::{debug, info};

use super::latin_square::LatinSquare;
use super::types::{BoatConfig, BoatLineup, Coverage, PieceSpec, Schedule, ScheduleRequest};
use crate::config::ScheduleSettings;
use crate::domain::AthleteId;
use crate::errors::{validation, SeatRaceError, SeatRaceResult};

/// Builds a swap rotation for a roster and boat configuration.
///
/// Lineup slots fill boat 1 seats 1..m, then boat 2, and so on; slots past the
/// last boat are byes. Consecutive pieces differ by one athlete pair changing
/// places across boats or between a boat and the bye bench. Rosters below
/// `min_latin_order` follow the manual rotation instead of a Latin walk.
pub fn generate_schedule(
    request: &ScheduleRequest,
    settings: &ScheduleSettings,
) -> SeatRaceResult<Schedule> {
    validate_request(request, settings)?;

    let schedule = if request.athlete_ids.len() < settings.min_latin_order {
        debug!(
            "Roster of {} is below Latin order {}, using manual rotation",
            request.athlete_ids.len(),
            settings.min_latin_order
        );
        manual_rotation(request)?
    } else {
        if !request.manual_rotation.is_empty() {
            debug!("Ignoring manual rotation for a roster large enough for a Latin walk");
        }
        latin_walk(request)
    };

    info!(
        "Scheduled {} pieces for {} athletes in {} boats of {} ({:?})",
        schedule.pieces.len(),
        request.athlete_ids.len(),
        request.boat_config.boats,
        request.boat_config.seats_per_boat,
        schedule.coverage
    );
    Ok(schedule)
}

fn validate_request(request: &ScheduleRequest, settings: &ScheduleSettings) -> SeatRaceResult<()> {
    let config = request.boat_config;
    if config.boats < 2 {
        return Err(validation(format!(
            "A seat race needs at least two boats, got {}",
            config.boats
        )));
    }
    if config.seats_per_boat == 0 {
        return Err(validation("Boats need at least one seat"));
    }
    if request.piece_count == 0 {
        return Err(validation("Piece count must be at least 1"));
    }
    if request.piece_count > settings.max_pieces {
        return Err(validation(format!(
            "Piece count {} exceeds the limit of {}",
            request.piece_count, settings.max_pieces
        )));
    }

    let mut seen = HashSet::new();
    for &athlete_id in &request.athlete_ids {
        if !seen.insert(athlete_id) {
            return Err(validation(format!("Athlete {} is listed twice", athlete_id)));
        }
    }

    let athletes = request.athlete_ids.len();
    if athletes < 2 * config.seats_per_boat || config.boated_seats() > athletes {
        return Err(SeatRaceError::InsufficientRoster {
            athletes,
            boats: config.boats,
            seats: config.seats_per_boat,
        });
    }

    Ok(())
}

/// Walks the rows of a cyclic Latin square one swap at a time.
///
/// Each step scores every cross-group swap: joining two comparison components
/// first, then moving athletes toward the current target row, then pairs met
/// least often, then lowest slots. Joining comes first so N-1 swaps connect
/// the whole roster.
fn latin_walk(request: &ScheduleRequest) -> Schedule {
    let roster = &request.athlete_ids;
    let n_athletes = roster.len();
    let square = LatinSquare::cyclic(n_athletes);

    let mut lineup = Lineup::new(request.boat_config, roster, square.row(0));
    let mut components = DisjointSet::new(n_athletes);
    let mut met: HashMap<(usize, usize), u32> = HashMap::new();
    let mut target_row = 1 % n_athletes;
    let mut pieces = vec![lineup.to_piece(0, None)];

    for index in 1..request.piece_count {
        target_row = next_unmatched_row(&lineup, &square, target_row);
        let target_groups = lineup.target_groups(&square.row(target_row));

        let Some((i, j)) = best_swap(&lineup, &target_groups, &components, &met) else {
            break;
        };

        let (a, b) = (lineup.slots[i], lineup.slots[j]);
        lineup.swap(i, j);
        components.union(a, b);
        *met.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        pieces.push(lineup.to_piece(index, Some((roster[a], roster[b]))));
    }

    let coverage = if components.count() == 1 {
        Coverage::Connected
    } else {
        Coverage::Partial
    };

    Schedule { pieces, coverage }
}

fn next_unmatched_row(lineup: &Lineup, square: &LatinSquare, mut row: usize) -> usize {
    for _ in 0..square.order() {
        if !lineup.matches(&square.row(row)) {
            return row;
        }
        row = (row + 1) % square.order();
    }
    row
}

fn best_swap(
    lineup: &Lineup,
    target_groups: &[usize],
    components: &DisjointSet,
    met: &HashMap<(usize, usize), u32>,
) -> Option<(usize, usize)> {
    let n_slots = lineup.slots.len();

    (0..n_slots)
        .flat_map(|i| (i + 1..n_slots).map(move |j| (i, j)))
        .filter(|&(i, j)| lineup.group(i) != lineup.group(j))
        .max_by_key(|&(i, j)| {
            let (a, b) = (lineup.slots[i], lineup.slots[j]);
            let joins = components.find(a) != components.find(b);
            let progress = lineup.progress(a, i, j, target_groups)
                + lineup.progress(b, j, i, target_groups);
            let times_met = met.get(&(a.min(b), a.max(b))).copied().unwrap_or(0);
            (joins, progress, Reverse(times_met), Reverse(i), Reverse(j))
        })
}

/// Cycles the coach's swap pairs, or swaps seat 1 of the first two boats
fn manual_rotation(request: &ScheduleRequest) -> SeatRaceResult<Schedule> {
    let roster = &request.athlete_ids;
    let seats = request.boat_config.seats_per_boat;

    let mut lineup = Lineup::new(request.boat_config, roster, (0..roster.len()).collect());
    let mut pieces = vec![lineup.to_piece(0, None)];

    for index in 1..request.piece_count {
        let (i, j) = if request.manual_rotation.is_empty() {
            (0, seats)
        } else {
            let (a, b) = request.manual_rotation[(index - 1) % request.manual_rotation.len()];
            let (Some(i), Some(j)) = (lineup.slot_of(a), lineup.slot_of(b)) else {
                return Err(validation(format!(
                    "Manual swap {}-{} names an athlete outside the roster",
                    a, b
                )));
            };
            if lineup.group(i) == lineup.group(j) {
                return Err(validation(format!(
                    "Manual swap {}-{} at piece {} does not move either athlete to another boat",
                    a, b, index
                )));
            }
            (i, j)
        };

        let pair = (roster[lineup.slots[i]], roster[lineup.slots[j]]);
        lineup.swap(i, j);
        pieces.push(lineup.to_piece(index, Some(pair)));
    }

    Ok(Schedule {
        pieces,
        coverage: Coverage::Manual,
    })
}

/// Athlete indices by lineup slot
struct Lineup<'a> {
    config: BoatConfig,
    roster: &'a [AthleteId],
    slots: Vec<usize>,
}

impl<'a> Lineup<'a> {
    fn new(config: BoatConfig, roster: &'a [AthleteId], slots: Vec<usize>) -> Self {
        Self {
            config,
            roster,
            slots,
        }
    }

    /// Boat index of a slot; the bye bench counts as one extra group
    fn group(&self, slot: usize) -> usize {
        if slot < self.config.boated_seats() {
            slot / self.config.seats_per_boat
        } else {
            self.config.boats
        }
    }

    /// Group each athlete would sit in under the given Latin row
    fn target_groups(&self, row: &[usize]) -> Vec<usize> {
        let mut groups = vec![0; row.len()];
        for (slot, &athlete) in row.iter().enumerate() {
            groups[athlete] = self.group(slot);
        }
        groups
    }

    /// Seat order inside a boat carries no comparison, so rows match by group
    fn matches(&self, row: &[usize]) -> bool {
        let groups = self.target_groups(row);
        self.slots
            .iter()
            .enumerate()
            .all(|(slot, &athlete)| groups[athlete] == self.group(slot))
    }

    /// +1 when moving `athlete` from slot `from` to `to` reaches its target group, -1 when it leaves it
    fn progress(&self, athlete: usize, from: usize, to: usize, target_groups: &[usize]) -> i32 {
        let target = target_groups[athlete];
        i32::from(self.group(to) == target) - i32::from(self.group(from) == target)
    }

    fn slot_of(&self, athlete_id: AthleteId) -> Option<usize> {
        self.slots
            .iter()
            .position(|&athlete| self.roster[athlete] == athlete_id)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.slots.swap(i, j);
    }

    fn to_piece(&self, index: usize, swap_pair: Option<(AthleteId, AthleteId)>) -> PieceSpec {
        let seats = self.config.seats_per_boat;
        let ids = |range: &[usize]| range.iter().map(|&a| self.roster[a]).collect::<Vec<_>>();

        let boats = (0..self.config.boats)
            .map(|b| BoatLineup {
                label: format!("Boat {}", b + 1),
                seats: ids(&self.slots[b * seats..(b + 1) * seats]),
            })
            .collect();

        PieceSpec {
            index,
            boats,
            bye: ids(&self.slots[self.config.boated_seats()..]),
            swap_pair,
        }
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    count: usize,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            count: size,
        }
    }

    fn find(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
            self.count -= 1;
        }
    }

    fn count(&self) -> usize {
        self.count
    }
}
