use chrono::{DateTime, Utc};

use super::types::MatchupEdge;

pub fn calculate_weight(
    edge_date: DateTime<Utc>,
    reference_date: DateTime<Utc>,
    half_life_days: f64,
) -> f64 {
    let age_days = calculate_age_days(edge_date, reference_date);
    apply_exponential_decay(age_days, half_life_days)
}

fn calculate_age_days(edge_date: DateTime<Utc>, reference_date: DateTime<Utc>) -> i64 {
    let duration = reference_date.signed_duration_since(edge_date);
    duration.num_days().max(0)
}

fn apply_exponential_decay(age_days: i64, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 1.0;
    }
    // formula: weight = exp(-λ × days_ago)
    // where λ = ln(2) / half_life_days
    let lambda = std::f64::consts::LN_2 / half_life_days;
    let decay_factor = -lambda * (age_days as f64);
    decay_factor.exp()
}

/// Decay weights measured from the newest edge, so results never depend on the wall clock
pub fn edge_weights(edges: &[MatchupEdge], half_life_days: f64) -> Vec<f64> {
    let Some(reference) = edges.iter().map(|e| e.timestamp).max() else {
        return Vec::new();
    };

    edges
        .iter()
        .map(|e| calculate_weight(e.timestamp, reference, half_life_days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_weight_halves_after_half_life() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let weight = calculate_weight(now - Duration::days(365), now, 365.0);
        assert!((weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_future_edges_are_not_boosted() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(calculate_weight(now + Duration::days(3), now, 365.0), 1.0);
    }

    #[test]
    fn test_non_positive_half_life_disables_decay() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(calculate_weight(now - Duration::days(900), now, 0.0), 1.0);
    }
}
