//! Evaluation metrics for model quality.
//!
//! Metrics are separate from losses: a model is trained on the logistic
//! loss but evaluated with ranking or thresholded metrics.

use crate::utils::log_loss;

/// A metric for evaluating model quality.
///
/// - `compute`: Called with scores and 0/1 labels, returns a scalar
/// - Higher is better for some metrics (accuracy, AUC), lower for others
///   (logloss); use `higher_is_better()` to determine the direction
pub trait Metric {
    /// Compute the metric value.
    ///
    /// `scores` and `labels` must have equal length.
    fn compute(&self, scores: &[f64], labels: &[f64]) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

// =============================================================================
// LogLoss (Binary Cross-Entropy)
// =============================================================================

/// Binary cross-entropy: -mean(y*log(p) + (1-y)*log(1-p))
///
/// Lower is better. Expects probabilities; they are clipped to
/// `[1e-6, 1 - 1e-6]` before taking logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl Metric for LogLoss {
    fn compute(&self, scores: &[f64], labels: &[f64]) -> f64 {
        debug_assert_eq!(scores.len(), labels.len());

        if scores.is_empty() {
            return 0.0;
        }

        let total: f64 = scores
            .iter()
            .zip(labels.iter())
            .map(|(&p, &y)| log_loss(p, y))
            .sum();
        total / scores.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

// =============================================================================
// Accuracy
// =============================================================================

/// Fraction of instances whose thresholded score matches the label.
///
/// Higher is better. A score `>= threshold` predicts class 1.
#[derive(Debug, Clone, Copy)]
pub struct Accuracy {
    pub threshold: f64,
}

impl Default for Accuracy {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Accuracy {
    /// Create accuracy metric with custom threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Metric for Accuracy {
    fn compute(&self, scores: &[f64], labels: &[f64]) -> f64 {
        debug_assert_eq!(scores.len(), labels.len());

        if scores.is_empty() {
            return 0.0;
        }

        let correct = scores
            .iter()
            .zip(labels.iter())
            .filter(|&(&p, &y)| {
                let predicted = if p >= self.threshold { 1.0 } else { 0.0 };
                predicted == y
            })
            .count();
        correct as f64 / scores.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}

// =============================================================================
// AUC (Area Under ROC Curve)
// =============================================================================

/// Area under the ROC curve, via the Mann-Whitney rank sum.
///
/// Scores are ranked in ascending order; exactly tied scores share their
/// average rank. Labels `> 0.5` count as positive.
///
/// Returns 0.5 when there are no positives or no negatives.
///
/// ```
/// use sparse_lr::training::{Auc, Metric};
///
/// assert_eq!(Auc.compute(&[0.1, 0.4, 0.35, 0.8], &[0.0, 0.0, 1.0, 1.0]), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Auc;

impl Metric for Auc {
    fn compute(&self, scores: &[f64], labels: &[f64]) -> f64 {
        debug_assert_eq!(scores.len(), labels.len());
        let n = scores.len();

        let n_pos = labels.iter().filter(|&&l| l > 0.5).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return 0.5;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

        let mut rank_sum_pos = 0.0f64;
        let mut i = 0;
        while i < n {
            let mut j = i + 1;
            while j < n && scores[order[j]] == scores[order[i]] {
                j += 1;
            }

            // 1-based ranks i+1..=j share their mean.
            let avg_rank = (i + 1 + j) as f64 / 2.0;
            let tied_pos = order[i..j].iter().filter(|&&idx| labels[idx] > 0.5).count();
            rank_sum_pos += avg_rank * tied_pos as f64;

            i = j;
        }

        let n_pos_f = n_pos as f64;
        let n_neg_f = n_neg as f64;
        (rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg_f)
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "auc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn logloss_values() {
        assert_eq!(LogLoss.compute(&[], &[]), 0.0);
        let ll = LogLoss.compute(&[0.5, 0.5], &[1.0, 0.0]);
        assert_abs_diff_eq!(ll, std::f64::consts::LN_2, epsilon = 1e-12);

        // Clipping keeps confident mistakes finite.
        let ll = LogLoss.compute(&[0.0], &[1.0]);
        assert_abs_diff_eq!(ll, -(1e-6f64).ln(), epsilon = 1e-9);
    }

    #[test]
    fn accuracy_values() {
        let labels = [1.0, 0.0, 1.0, 0.0];
        assert_eq!(Accuracy::default().compute(&[0.9, 0.1, 0.6, 0.4], &labels), 1.0);
        assert_eq!(Accuracy::default().compute(&[0.9, 0.9, 0.4, 0.4], &labels), 0.5);
        assert_eq!(Accuracy::default().compute(&[0.5], &[1.0]), 1.0);
        assert_eq!(
            Accuracy::with_threshold(0.95).compute(&[0.9, 0.1, 0.6, 0.4], &labels),
            0.5
        );
    }

    #[test]
    fn auc_perfect_is_exact() {
        let scores = [0.1, 0.2, 0.3, 0.7, 0.8, 0.9];
        let labels = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        assert_eq!(Auc.compute(&scores, &labels), 1.0);
    }

    #[test]
    fn auc_worst() {
        let scores = [0.9, 0.8, 0.1];
        let labels = [0.0, 0.0, 1.0];
        assert_eq!(Auc.compute(&scores, &labels), 0.0);
    }

    #[test]
    fn auc_ties_share_rank() {
        // All scores tied: every positive/negative pair counts half.
        assert_eq!(Auc.compute(&[0.3; 4], &[1.0, 0.0, 1.0, 0.0]), 0.5);

        // One positive tied with one of two negatives.
        assert_eq!(Auc.compute(&[0.1, 0.5, 0.5], &[0.0, 0.0, 1.0]), 0.75);
    }

    #[test]
    fn auc_degenerate_labels() {
        assert_eq!(Auc.compute(&[0.1, 0.9], &[1.0, 1.0]), 0.5);
        assert_eq!(Auc.compute(&[0.1, 0.9], &[0.0, 0.0]), 0.5);
        assert_eq!(Auc.compute(&[], &[]), 0.5);
    }

    #[test]
    fn directions_and_names() {
        assert!(Auc.higher_is_better());
        assert!(Accuracy::default().higher_is_better());
        assert!(!LogLoss.higher_is_better());
        assert_eq!(Auc.name(), "auc");
        assert_eq!(LogLoss.name(), "logloss");
        assert_eq!(Accuracy::default().name(), "accuracy");
    }
}
