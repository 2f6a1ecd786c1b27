//! Weighted logistic loss over sparse instances.

use crate::data::{ColumnStore, Instance, ZERO_EPSILON};
use crate::training::TrainingError;
use crate::utils::{almost_equal, clip_probability, log_loss, sigmoid};

use super::CoordinateLoss;

/// Labels must be within this distance of 0 or 1.
const LABEL_TOLERANCE: f64 = 1e-13;

/// Weighted binary cross-entropy:
///
/// `Σᵢ -wᵢ·[yᵢ·ln pᵢ + (1-yᵢ)·ln(1-pᵢ)]` with `pᵢ = sigmoid(xᵢ·β)`.
///
/// Per-instance linear scores `xᵢ·β` are cached and patched on every
/// coefficient update, so a gradient along `d` only touches the instances
/// with a non-zero in column `d`.
///
/// Instances with weight at or below `1e-13` are excluded from training:
/// they appear in no column and contribute nothing to cost or gradient.
///
/// # Intercept
///
/// With `has_intercept`, the loss is defined over `dimension + 1`
/// coefficients and the last one multiplies an implicit constant feature 1.
#[derive(Debug, Clone)]
pub struct LogisticLoss {
    columns: ColumnStore,
    labels: Box<[f64]>,
    /// Instance weights, with excluded instances zeroed.
    weights: Box<[f64]>,
    /// Cached linear predictor per instance.
    scores: Box<[f64]>,
    num_included: usize,
}

impl LogisticLoss {
    /// Build the loss over `instances` with `dimension` features.
    ///
    /// Labels within `1e-13` of 0 or 1 are snapped to exactly 0 or 1.
    ///
    /// # Errors
    ///
    /// - [`TrainingError::EmptyTrainingSet`] if `instances` is empty
    /// - [`TrainingError::InvalidWeight`] for a negative or non-finite weight
    /// - [`TrainingError::InvalidLabel`] for a label that is not 0 or 1
    /// - [`TrainingError::FeatureOutOfRange`] for a feature index `>= dimension`
    pub fn new(
        dimension: usize,
        instances: &[Instance],
        has_intercept: bool,
    ) -> Result<Self, TrainingError> {
        if instances.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }

        let mut labels = Vec::with_capacity(instances.len());
        let mut weights = Vec::with_capacity(instances.len());
        let mut num_included = 0;

        for (index, x) in instances.iter().enumerate() {
            let weight = x.weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(TrainingError::InvalidWeight { index, weight });
            }

            let label = x.label();
            let label = if almost_equal(label, 0.0, LABEL_TOLERANCE) {
                0.0
            } else if almost_equal(label, 1.0, LABEL_TOLERANCE) {
                1.0
            } else {
                return Err(TrainingError::InvalidLabel { index, label });
            };

            if let Some(feature) = x.features().max_index() {
                if feature as usize >= dimension {
                    return Err(TrainingError::FeatureOutOfRange {
                        index,
                        feature,
                        dimension,
                    });
                }
            }

            labels.push(label);
            if weight > ZERO_EPSILON {
                weights.push(weight);
                num_included += 1;
            } else {
                weights.push(0.0);
            }
        }

        let columns = ColumnStore::from_instances(instances, dimension, has_intercept);
        log::debug!(
            "logistic loss: {} of {} instances included, {} columns, {} non-zeros",
            num_included,
            instances.len(),
            columns.num_cols(),
            columns.nnz()
        );

        Ok(Self {
            columns,
            labels: labels.into_boxed_slice(),
            weights: weights.into_boxed_slice(),
            scores: vec![0.0; instances.len()].into_boxed_slice(),
            num_included,
        })
    }

    /// Cached linear predictor per instance, in input order.
    ///
    /// Excluded instances stay at 0.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// The column index the loss walks.
    pub fn column_store(&self) -> &ColumnStore {
        &self.columns
    }

    /// Number of instances with weight above `1e-13`.
    pub fn num_included(&self) -> usize {
        self.num_included
    }

    pub fn has_intercept(&self) -> bool {
        self.columns.has_intercept()
    }

    /// Linear predictor per instance computed from scratch at `beta`.
    pub fn recompute_scores(&self, beta: &[f64]) -> Vec<f64> {
        debug_assert_eq!(beta.len(), self.dimension());
        let mut scores = vec![0.0; self.scores.len()];
        for (d, &b) in beta.iter().enumerate() {
            if b == 0.0 {
                continue;
            }
            for (i, x) in self.columns.column(d) {
                scores[i] += x * b;
            }
        }
        scores
    }
}

impl CoordinateLoss for LogisticLoss {
    fn dimension(&self) -> usize {
        self.columns.num_cols()
    }

    /// Full pass over the data; the score cache is not consulted.
    fn cost(&self, beta: &[f64]) -> f64 {
        self.recompute_scores(beta)
            .iter()
            .zip(self.labels.iter().zip(self.weights.iter()))
            .filter(|(_, (_, w))| **w > 0.0)
            .map(|(&z, (&y, &w))| w * log_loss(sigmoid(z), y))
            .sum()
    }

    fn gradient(&self, d: usize, _beta: &[f64]) -> f64 {
        let mut grad = 0.0;
        for (i, x) in self.columns.column(d) {
            let p = clip_probability(sigmoid(self.scores[i]));
            grad -= (self.labels[i] - p) * x * self.weights[i];
        }
        grad
    }

    fn max_second_derivative(&self, d: usize) -> f64 {
        self.columns
            .column(d)
            .map(|(i, x)| 0.25 * x * x * self.weights[i])
            .sum()
    }

    fn coefficient_update(&mut self, d: usize, delta: f64, _beta: &[f64]) {
        if delta.abs() < ZERO_EPSILON {
            return;
        }
        for (i, x) in self.columns.column(d) {
            self.scores[i] += delta * x;
        }
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}
