//! Common numeric utilities used across the crate.

// =============================================================================
// Probability helpers
// =============================================================================

/// Probabilities are clipped to `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`
/// before taking logs or forming gradients.
pub const PROBABILITY_EPSILON: f64 = 1e-6;

/// Sigmoid function: 1 / (1 + exp(-x))
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Clip a probability away from 0 and 1.
#[inline]
pub fn clip_probability(p: f64) -> f64 {
    p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON)
}

/// Binary cross-entropy of a clipped probability against a 0/1 label.
#[inline]
pub fn log_loss(p: f64, label: f64) -> f64 {
    let p = clip_probability(p);
    -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
}

// =============================================================================
// Comparisons and norms
// =============================================================================

/// `|a - b| < epsilon`.
#[inline]
pub fn almost_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Euclidean norm of a dense slice.
///
/// Scales by the largest magnitude first so huge or tiny entries neither
/// overflow nor underflow.
pub fn dense_norm2(values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = values.iter().map(|v| (v / scale).powi(2)).sum();
    scale * sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn clipping() {
        assert_eq!(clip_probability(0.0), PROBABILITY_EPSILON);
        assert_eq!(clip_probability(1.0), 1.0 - PROBABILITY_EPSILON);
        assert_eq!(clip_probability(0.3), 0.3);
        assert!(log_loss(0.0, 1.0).is_finite());
        assert!((log_loss(0.5, 1.0) - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn norms() {
        assert_eq!(dense_norm2(&[]), 0.0);
        assert_eq!(dense_norm2(&[0.0, 0.0]), 0.0);
        assert!((dense_norm2(&[3.0, -4.0]) - 5.0).abs() < 1e-12);
        assert!((dense_norm2(&[3e200, 4e200]) - 5e200).abs() < 1e188);
    }

    #[test]
    fn almost_equal_is_strict() {
        assert!(almost_equal(1.0, 1.0 + 1e-14, 1e-13));
        assert!(!almost_equal(1.0, 1.1, 1e-13));
    }
}
