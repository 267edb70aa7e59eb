mod common;

use common::{boat, piece, temp_config};
use seat_race_ranking::domain::{Athlete, RankingSnapshot, Side};
use seat_race_ranking::services::server::build_state;

const A: i64 = 1;
const B: i64 = 2;
const C: i64 = 3;
const D: i64 = 4;

fn rating(snapshot: &RankingSnapshot, id: i64) -> f64 {
    snapshot.athlete(id).unwrap().rating
}

/// Records two pieces where C and D trade boats, then ranks the team twice
async fn rank_swap(piece_one: (f64, f64), piece_two: (f64, f64)) -> (RankingSnapshot, RankingSnapshot) {
    let (config, _dir) = temp_config();
    let state = build_state(config).unwrap();

    for (id, name) in [(A, "A"), (B, "B"), (C, "C"), (D, "D")] {
        let athlete = Athlete {
            id,
            name: name.to_string(),
            side: Side::Both,
        };
        state.records.upsert_athlete(1, &athlete).unwrap();
    }

    let first = piece(1, 0, vec![boat("1", &[A, C], piece_one.0), boat("2", &[B, D], piece_one.1)]);
    let second = piece(1, 12, vec![boat("1", &[A, D], piece_two.0), boat("2", &[B, C], piece_two.1)]);
    state.records.record_piece_result(1, &first).unwrap();
    state.records.record_piece_result(1, &second).unwrap();

    let one = state.rankings.recalculate_rankings(1).await.unwrap();
    let two = state.rankings.recalculate_rankings(1).await.unwrap();
    (one.as_ref().clone(), two.as_ref().clone())
}

fn assert_bit_identical(one: &RankingSnapshot, two: &RankingSnapshot) {
    assert_eq!(one.athletes.len(), two.athletes.len());
    for (a, b) in one.athletes.iter().zip(&two.athletes) {
        assert_eq!(a.athlete_id, b.athlete_id);
        assert_eq!(a.rating.to_bits(), b.rating.to_bits());
        assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
        assert_eq!(a.confidence_tier, b.confidence_tier);
        assert_eq!(a.rank, b.rank);
    }
}

#[tokio::test]
async fn test_swapping_in_d_gains_three_seconds() {
    // D's crew loses by 2.0 s, then wins by 1.0 s after D replaces C
    let (one, two) = rank_swap((102.0, 100.0), (100.0, 101.0)).await;

    assert!(rating(&one, D) > rating(&one, C));
    assert!((rating(&one, A) - rating(&one, B)).abs() < 1e-9);
    assert_eq!(rating(&one, A), 1000.0);
    assert_bit_identical(&one, &two);
}

#[tokio::test]
async fn test_crew_winning_both_pieces_favours_its_swapped_athlete() {
    // boat 1 wins by 2.0 s with C, boat 2 wins by 1.0 s once C joins it
    let (one, two) = rank_swap((100.0, 102.0), (101.0, 100.0)).await;

    assert!(rating(&one, C) > rating(&one, D));
    assert!((rating(&one, A) - rating(&one, B)).abs() < 1e-9);
    assert_bit_identical(&one, &two);
}

#[tokio::test]
async fn test_win_years_later_in_new_session_keeps_winner_rating() {
    const Z: i64 = 5;
    const TWO_YEARS: i64 = 2 * 365 * 24 * 60;

    let (config, _dir) = temp_config();
    let state = build_state(config).unwrap();

    // A beats B in every boat swap of the first session
    for i in 0..10 {
        let boats = if i % 2 == 0 {
            vec![boat("1", &[A, C], 100.0), boat("2", &[B, D], 102.0)]
        } else {
            vec![boat("1", &[B, C], 102.0), boat("2", &[A, D], 100.0)]
        };
        state.records.record_piece_result(1, &piece(1, i * 12, boats)).unwrap();
    }
    let baseline = piece(2, TWO_YEARS, vec![boat("1", &[A, 6], 100.0), boat("2", &[Z, 7], 102.0)]);
    state.records.record_piece_result(1, &baseline).unwrap();
    let before = state.rankings.recalculate_rankings(1).await.unwrap();

    let swap = piece(2, TWO_YEARS + 12, vec![boat("1", &[Z, 6], 102.0), boat("2", &[A, 7], 100.0)]);
    state.records.record_piece_result(1, &swap).unwrap();
    let after = state.rankings.recalculate_rankings(1).await.unwrap();

    assert!(rating(&before, A) > 1000.0);
    assert!(rating(&after, A) >= rating(&before, A));
    assert!(rating(&after, Z) < rating(&before, Z));
}
