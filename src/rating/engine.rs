use std::collections::{BTreeMap, HashMap};

use log::info;

use super::bradley_terry::fit_strengths;
use super::confidence::{confidence_score, gather_inputs};
use super::edges::derive_edges;
use super::ranking::assign_ranks;
use super::types::{Comparison, Evaluation, MatchupEdge};
use super::weighting::edge_weights;
use crate::config::RatingSettings;
use crate::domain::{Athlete, AthleteId, ConfidenceTier, PieceResult, RankedAthlete, Trend};

/// Rates and ranks every athlete of a roster from the team's full race history.
///
/// Pure and deterministic: the same roster and history always produce the
/// same evaluation, bit for bit. Athletes that only appear in the history are
/// included under a generated name. Trends are left as `New`; comparing with
/// an earlier snapshot is the caller's business.
pub fn calculate_ratings(
    roster: &[Athlete],
    history: &[PieceResult],
    settings: &RatingSettings,
) -> Evaluation {
    let names = collect_names(roster, history);
    let athlete_ids: Vec<AthleteId> = names.keys().copied().collect();
    let races = count_races(history);

    let edges = derive_edges(history);
    let comparisons = build_comparisons(&edges, settings);
    info!(
        "Rating {} athletes from {} pieces ({} matchup edges)",
        athlete_ids.len(),
        history.len(),
        edges.len()
    );

    let fit = fit_strengths(&athlete_ids, &comparisons, settings);
    let inputs = gather_inputs(&athlete_ids, &edges);
    let points_per_unit = settings.points_per_doubling / std::f64::consts::LN_2;

    let athletes = athlete_ids
        .iter()
        .zip(&fit.log_strengths)
        .map(|(&athlete_id, &log_strength)| {
            let races_completed = races.get(&athlete_id).copied().unwrap_or(0);
            let (rating, confidence) = if races_completed == 0 {
                (settings.initial_rating, 0.0)
            } else {
                (
                    settings.initial_rating + log_strength * points_per_unit,
                    confidence_score(&inputs[&athlete_id], settings),
                )
            };

            RankedAthlete {
                athlete_id,
                name: names[&athlete_id].clone(),
                rating,
                confidence,
                confidence_tier: ConfidenceTier::from_score(confidence),
                races_completed,
                comparisons: inputs[&athlete_id].comparisons,
                rank: 0,
                trend: Trend::New,
            }
        })
        .collect();

    Evaluation {
        athletes: assign_ranks(athletes),
        history_version: history.iter().map(|p| p.id).max().unwrap_or(0),
        edge_count: edges.len(),
        iterations: fit.iterations,
        converged: fit.converged,
    }
}

fn collect_names(roster: &[Athlete], history: &[PieceResult]) -> BTreeMap<AthleteId, String> {
    let mut names: BTreeMap<AthleteId, String> = roster
        .iter()
        .map(|a| (a.id, a.name.clone()))
        .collect();

    for athlete_id in history.iter().flat_map(|p| p.athlete_ids()) {
        names
            .entry(athlete_id)
            .or_insert_with(|| format!("Athlete {}", athlete_id));
    }

    names
}

fn count_races(history: &[PieceResult]) -> HashMap<AthleteId, u32> {
    let mut counts = HashMap::new();
    for athlete_id in history.iter().flat_map(|p| p.athlete_ids()) {
        *counts.entry(athlete_id).or_insert(0) += 1;
    }
    counts
}

/// Turns each edge into a win for the faster athlete, weighted by age and margin.
///
/// Outcomes stay binary, so with decay off an extra win can never lower the
/// winner's fit. The margin only sets how much evidence the win carries; dead heats carry none.
fn build_comparisons(edges: &[MatchupEdge], settings: &RatingSettings) -> Vec<Comparison> {
    let weights = edge_weights(edges, settings.half_life_days);

    edges
        .iter()
        .zip(weights)
        .map(|(edge, age_weight)| Comparison {
            winner_id: edge.faster(),
            loser_id: edge.slower(),
            weight: age_weight * margin_evidence(edge.margin.abs(), settings.margin_scale),
        })
        .filter(|c| c.weight > 0.0)
        .collect()
}

fn margin_evidence(margin: f64, margin_scale: f64) -> f64 {
    if margin_scale <= 0.0 {
        return if margin > 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - (-margin / margin_scale).exp()
}
