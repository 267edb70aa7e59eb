use std::collections::HashMap;

use log::{debug, info};
use ndarray::{Array1, Array2};

use super::convergence::{has_converged, should_continue};
use super::types::{Comparison, FitOutcome};
use crate::config::RatingSettings;
use crate::domain::AthleteId;

/// Fits Bradley-Terry log-strengths with the MM (Minorization-Maximization) algorithm.
///
/// `athlete_ids` fixes the index order of the result. Every athlete also plays
/// `virtual_games_weight` drawn games against an average reference, which keeps
/// unconnected athletes at log-strength 0 and the fit finite for unbeaten ones.
/// Passes are Jacobi-style and sum in index order, so identical input gives
/// bit-identical output.
pub fn fit_strengths(
    athlete_ids: &[AthleteId],
    comparisons: &[Comparison],
    settings: &RatingSettings,
) -> FitOutcome {
    let n_athletes = athlete_ids.len();
    let athlete_to_idx: HashMap<AthleteId, usize> = athlete_ids
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();

    let (comparison_matrix, wins) = build_comparison_data(comparisons, &athlete_to_idx, n_athletes);
    let neighbours = collect_neighbours(&comparison_matrix);

    let outcome = mm_algorithm(&comparison_matrix, &neighbours, &wins, settings);
    info!(
        "Bradley-Terry fit over {} athletes and {} comparisons: {} iterations, converged = {}",
        n_athletes,
        comparisons.len(),
        outcome.iterations,
        outcome.converged
    );
    outcome
}

fn build_comparison_data(
    comparisons: &[Comparison],
    athlete_to_idx: &HashMap<AthleteId, usize>,
    n_athletes: usize,
) -> (Array2<f64>, Array1<f64>) {
    let mut comparison_matrix = Array2::<f64>::zeros((n_athletes, n_athletes));
    let mut wins = Array1::<f64>::zeros(n_athletes);

    for comparison in comparisons {
        let (Some(&i), Some(&j)) = (
            athlete_to_idx.get(&comparison.winner_id),
            athlete_to_idx.get(&comparison.loser_id),
        ) else {
            continue;
        };
        if i == j || comparison.weight <= 0.0 {
            continue;
        }

        comparison_matrix[[i, j]] += comparison.weight;
        comparison_matrix[[j, i]] += comparison.weight;
        wins[i] += comparison.weight;
    }

    (comparison_matrix, wins)
}

fn collect_neighbours(comparison_matrix: &Array2<f64>) -> Vec<Vec<usize>> {
    comparison_matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(_, &weight)| weight > 0.0)
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

fn mm_algorithm(
    comparison_matrix: &Array2<f64>,
    neighbours: &[Vec<usize>],
    wins: &Array1<f64>,
    settings: &RatingSettings,
) -> FitOutcome {
    let n_athletes = wins.len();
    let points_per_unit = settings.points_per_doubling / std::f64::consts::LN_2;
    let virtual_weight = settings.virtual_games_weight.max(0.0);

    // ratings = 1.0 for everyone
    let mut log_gamma = Array1::<f64>::zeros(n_athletes);
    let mut iteration = 0;
    let mut converged = false;

    while should_continue(iteration, settings.max_iterations) {
        let gamma = log_gamma.mapv(f64::exp);
        let mut new_log_gamma = Array1::<f64>::zeros(n_athletes);

        for i in 0..n_athletes {
            let mut denominator = 0.0;
            for &j in &neighbours[i] {
                denominator += comparison_matrix[[i, j]] / (gamma[i] + gamma[j]);
            }

            denominator += virtual_weight / (gamma[i] + 1.0);
            let adjusted_wins = wins[i] + (0.5 * virtual_weight);

            new_log_gamma[i] = if denominator > 0.0 && adjusted_wins > 0.0 {
                (adjusted_wins / denominator).ln()
            } else {
                log_gamma[i]
            };
        }

        iteration += 1;
        let settled = has_converged(
            &log_gamma,
            &new_log_gamma,
            points_per_unit,
            settings.convergence_tolerance,
        );
        log_gamma = new_log_gamma;

        if settled {
            converged = true;
            debug!("MM algorithm converged in {} iterations", iteration);
            break;
        }
    }

    FitOutcome {
        log_strengths: log_gamma.to_vec(),
        iterations: iteration,
        converged,
    }
}
