use std::collections::{BTreeMap, HashMap};

use super::graph::ComparisonGraph;
use super::types::MatchupEdge;
use crate::config::RatingSettings;
use crate::domain::AthleteId;

/// Evidence behind one athlete's rating
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceInputs {
    pub comparisons: u32,
    /// Comparisons separating the athlete from the most-connected athlete
    pub hub_distance: Option<usize>,
    /// Mean variance of repeated comparisons against the same partner
    pub repeat_variance: Option<f64>,
}

pub fn gather_inputs(
    athlete_ids: &[AthleteId],
    edges: &[MatchupEdge],
) -> HashMap<AthleteId, ConfidenceInputs> {
    let graph = ComparisonGraph::from_pairs(edges.iter().map(|e| e.pair()));
    let distances = graph
        .hub()
        .map(|hub| graph.distances_from(hub))
        .unwrap_or_default();
    let variances = repeat_variances(edges);

    athlete_ids
        .iter()
        .map(|&id| {
            let inputs = ConfidenceInputs {
                comparisons: graph.comparisons(id),
                hub_distance: distances.get(&id).copied(),
                repeat_variance: variances.get(&id).copied(),
            };
            (id, inputs)
        })
        .collect()
}

/// Per athlete, the mean variance over partners met at least twice
fn repeat_variances(edges: &[MatchupEdge]) -> HashMap<AthleteId, f64> {
    let mut samples: BTreeMap<(AthleteId, AthleteId), Vec<f64>> = BTreeMap::new();
    for edge in edges {
        samples.entry(edge.pair()).or_default().push(edge.oriented_margin());
    }

    let mut per_athlete: BTreeMap<AthleteId, Vec<f64>> = BTreeMap::new();
    for ((a, b), margins) in &samples {
        if margins.len() < 2 {
            continue;
        }
        let variance = population_variance(margins);
        per_athlete.entry(*a).or_default().push(variance);
        per_athlete.entry(*b).or_default().push(variance);
    }

    per_athlete
        .into_iter()
        .map(|(id, variances)| (id, variances.iter().sum::<f64>() / variances.len() as f64))
        .collect()
}

fn population_variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn comparison_factor(comparisons: u32, settings: &RatingSettings) -> f64 {
    if settings.comparison_scale <= 0.0 {
        return if comparisons > 0 { 1.0 } else { 0.0 };
    }
    1.0 - (-(comparisons as f64) / settings.comparison_scale).exp()
}

pub fn connectivity_factor(hub_distance: Option<usize>) -> f64 {
    hub_distance.map_or(0.0, |d| 1.0 / (1.0 + d as f64))
}

pub fn consistency_factor(repeat_variance: Option<f64>, settings: &RatingSettings) -> f64 {
    match repeat_variance {
        Some(variance) if settings.variance_scale > 0.0 => {
            1.0 / (1.0 + variance / settings.variance_scale)
        }
        _ => 1.0,
    }
}

/// Composite confidence in [0, 1]; zero without comparisons
pub fn confidence_score(inputs: &ConfidenceInputs, settings: &RatingSettings) -> f64 {
    let evidence = comparison_factor(inputs.comparisons, settings);
    let structure = settings.connectivity_weight * connectivity_factor(inputs.hub_distance)
        + settings.consistency_weight() * consistency_factor(inputs.repeat_variance, settings);

    (evidence * structure).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn edge(piece_id: i64, incoming: AthleteId, outgoing: AthleteId, margin: f64) -> MatchupEdge {
        MatchupEdge {
            piece_id,
            timestamp: Utc::now(),
            incoming,
            outgoing,
            margin,
        }
    }

    #[test]
    fn test_no_comparisons_means_zero_confidence() {
        let settings = RatingSettings::default();
        let inputs = ConfidenceInputs {
            comparisons: 0,
            hub_distance: None,
            repeat_variance: None,
        };
        assert_eq!(confidence_score(&inputs, &settings), 0.0);
    }

    #[test]
    fn test_confidence_non_decreasing_in_comparisons() {
        let settings = RatingSettings::default();
        let mut previous = 0.0;
        for comparisons in 0..40 {
            let inputs = ConfidenceInputs {
                comparisons,
                hub_distance: Some(1),
                repeat_variance: Some(0.3),
            };
            let score = confidence_score(&inputs, &settings);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_closer_to_hub_is_more_confident() {
        let settings = RatingSettings::default();
        let near = ConfidenceInputs {
            comparisons: 5,
            hub_distance: Some(0),
            repeat_variance: None,
        };
        let far = ConfidenceInputs {
            hub_distance: Some(3),
            ..near.clone()
        };
        assert!(confidence_score(&near, &settings) > confidence_score(&far, &settings));
    }

    #[test]
    fn test_inconsistent_repeats_lower_confidence() {
        let settings = RatingSettings::default();
        let steady = ConfidenceInputs {
            comparisons: 6,
            hub_distance: Some(0),
            repeat_variance: Some(0.0),
        };
        let noisy = ConfidenceInputs {
            repeat_variance: Some(2.0),
            ..steady.clone()
        };
        assert!(confidence_score(&steady, &settings) > confidence_score(&noisy, &settings));
    }

    #[test]
    fn test_gather_inputs_measures_graph_and_repeats() {
        // 1 meets 2 twice with opposite results, 2 meets 3 once
        let edges = vec![edge(1, 1, 2, 0.5), edge(2, 2, 1, 0.5), edge(3, 3, 2, 0.2)];
        let inputs = gather_inputs(&[1, 2, 3, 4], &edges);

        assert_eq!(inputs[&2].comparisons, 3);
        assert_eq!(inputs[&2].hub_distance, Some(0));
        assert_eq!(inputs[&3].hub_distance, Some(1));
        assert_eq!(inputs[&4].hub_distance, None);
        // oriented margins for (1, 2) are +0.5 and -0.5
        assert!((inputs[&1].repeat_variance.unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(inputs[&3].repeat_variance, None);
    }
}
