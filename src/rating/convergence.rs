use ndarray::Array1;

/// Largest absolute move of any log-strength between two passes
pub fn max_change(old: &Array1<f64>, new: &Array1<f64>) -> f64 {
    (new - old)
        .mapv(|x| x.abs())
        .fold(0.0_f64, |a, &b| a.max(b))
}

/// Compares the largest move, expressed in rating points, against the tolerance
pub fn has_converged(
    old: &Array1<f64>,
    new: &Array1<f64>,
    points_per_unit: f64,
    tolerance: f64,
) -> bool {
    max_change(old, new) * points_per_unit < tolerance
}

pub fn should_continue(iteration: usize, max_iterations: usize) -> bool {
    iteration < max_iterations
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_max_change_is_absolute() {
        let old = array![0.0, 1.0, -1.0];
        let new = array![0.1, 0.7, -1.0];
        assert!((max_change(&old, &new) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_scaled_to_rating_points() {
        let old = array![0.0];
        let new = array![0.001];
        assert!(has_converged(&old, &new, 1.0, 0.01));
        assert!(!has_converged(&old, &new, 144.0, 0.01));
    }

    #[test]
    fn test_should_continue_stops_at_cap() {
        assert!(should_continue(99, 100));
        assert!(!should_continue(100, 100));
    }
}
