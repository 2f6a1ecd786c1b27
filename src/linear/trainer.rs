//! L2-regularized logistic regression trainer.
//!
//! The objective is
//!
//! ```text
//! logistic(β) + λ · 0.5·Σⱼ (βⱼ - priorⱼ)²
//! ```
//!
//! minimized by [`CoordinateLipschitzGradientOptimizer`]. The intercept,
//! when fitted, is not penalized.
//!
//! # Example
//!
//! ```
//! use sparse_lr::{Instance, LogisticRegressionTrainer, SparseVector};
//!
//! let instances = vec![
//!     Instance::new(SparseVector::from_dense(&[1.0]), 1.0),
//!     Instance::new(SparseVector::from_dense(&[-1.0]), 0.0),
//! ];
//!
//! let trainer = LogisticRegressionTrainer::builder()
//!     .lambda(0.1)
//!     .build()
//!     .unwrap();
//! let model = trainer.train(1, &instances).unwrap();
//! assert!(model.weight(0) > 0.0);
//! ```

use derive_builder::Builder;
use ndarray::{ArrayView1, ArrayView2};

use crate::data::{Instance, SparseVector};
use crate::training::{
    CoordinateLipschitzGradientOptimizer, CoordinateLoss, L2RegularizerLoss, LinearCombineLoss,
    LogisticLoss, OptimizerConfig, OptimizerState, TrainingError, Verbosity,
};

use super::LinearModel;

// ============================================================================
// LogisticRegressionTrainer
// ============================================================================

/// Logistic regression trainer with all parameters inlined.
///
/// Use [`LogisticRegressionTrainer::builder()`] for a fluent configuration
/// API, or [`LogisticRegressionTrainer::default()`] for `λ = 1` with an
/// intercept.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), default)]
pub struct LogisticRegressionTrainer {
    /// L2 regularization weight (lambda).
    #[builder(default = "1.0")]
    pub lambda: f64,

    /// Fit an unpenalized intercept.
    #[builder(default = "true")]
    pub fit_intercept: bool,

    /// Center of the ridge penalty. Length must be the coefficient count,
    /// i.e. `dimension + fit_intercept`. `None` shrinks toward zero.
    #[builder(default)]
    pub prior: Option<Vec<f64>>,

    /// Stopping rules for coordinate descent.
    #[builder(default)]
    pub optimizer: OptimizerConfig,

    /// Verbosity level for training output. When set, overrides
    /// `optimizer.verbosity`.
    #[builder(default)]
    pub verbosity: Option<Verbosity>,
}

impl Default for LogisticRegressionTrainer {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            fit_intercept: true,
            prior: None,
            optimizer: OptimizerConfig::default(),
            verbosity: None,
        }
    }
}

/// How a training run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingOutcome {
    pub state: OptimizerState,
    pub sweeps: usize,
}

impl TrainingOutcome {
    #[inline]
    pub fn converged(&self) -> bool {
        self.state == OptimizerState::Converged
    }
}

impl LogisticRegressionTrainer {
    /// Create a builder for configuring the trainer.
    pub fn builder() -> LogisticRegressionTrainerBuilder {
        LogisticRegressionTrainerBuilder::default()
    }

    /// Optimizer configuration with the trainer-level verbosity applied.
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            verbosity: self.verbosity.unwrap_or(self.optimizer.verbosity),
            ..self.optimizer.clone()
        }
    }

    /// Train on sparse instances with `dimension` features.
    ///
    /// # Errors
    ///
    /// Everything [`LogisticLoss::new`] rejects, plus
    /// [`TrainingError::InvalidRegularization`] for a negative or non-finite
    /// `lambda` and [`TrainingError::PriorLengthMismatch`] for a prior of the
    /// wrong length.
    pub fn train(&self, dimension: usize, instances: &[Instance]) -> Result<LinearModel, TrainingError> {
        self.train_with_outcome(dimension, instances)
            .map(|(model, _)| model)
    }

    /// Like [`train`](Self::train), also reporting how the optimizer stopped.
    pub fn train_with_outcome(
        &self,
        dimension: usize,
        instances: &[Instance],
    ) -> Result<(LinearModel, TrainingOutcome), TrainingError> {
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(TrainingError::InvalidRegularization(self.lambda));
        }

        let logistic = LogisticLoss::new(dimension, instances, self.fit_intercept)?;
        let num_coefficients = logistic.dimension();
        let regularizer = match &self.prior {
            Some(prior) => {
                L2RegularizerLoss::checked_prior(num_coefficients, prior, self.fit_intercept)?
            }
            None => L2RegularizerLoss::new(num_coefficients, self.fit_intercept),
        };

        let mut loss = LinearCombineLoss::new();
        loss.add(logistic)?.add_weighted(regularizer, self.lambda)?;

        let optimum =
            CoordinateLipschitzGradientOptimizer::new(&mut loss, self.optimizer_config()).run();

        let outcome = TrainingOutcome {
            state: optimum.state,
            sweeps: optimum.sweeps,
        };
        let model = LinearModel::new(optimum.coefficients, dimension, self.fit_intercept);
        Ok((model, outcome))
    }

    /// Train on a dense `(rows, features)` matrix with one 0/1 label per row.
    ///
    /// Near-zero entries are dropped when rows are converted to sparse form.
    ///
    /// # Errors
    ///
    /// [`TrainingError::LabelCountMismatch`] if `labels` and `features`
    /// disagree on the row count, plus everything [`train`](Self::train)
    /// rejects.
    pub fn train_dense(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<LinearModel, TrainingError> {
        if labels.len() != features.nrows() {
            return Err(TrainingError::LabelCountMismatch {
                labels: labels.len(),
                rows: features.nrows(),
            });
        }

        let instances: Vec<Instance> = features
            .rows()
            .into_iter()
            .zip(labels.iter())
            .map(|(row, &label)| {
                let dense: Vec<f64> = row.iter().copied().collect();
                Instance::new(SparseVector::from_dense(&dense), label)
            })
            .collect();

        self.train(features.ncols(), &instances)
    }
}

/// Train with `lambda` and return the raw coefficient vector.
///
/// The result has `dimension` weights followed by the intercept when
/// `has_intercept` is set.
pub fn train(
    dimension: usize,
    instances: &[Instance],
    lambda: f64,
    has_intercept: bool,
) -> Result<Box<[f64]>, TrainingError> {
    let trainer = LogisticRegressionTrainer {
        lambda,
        fit_intercept: has_intercept,
        ..Default::default()
    };
    let model = trainer.train(dimension, instances)?;
    Ok(model.coefficients().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> Vec<Instance> {
        vec![
            Instance::new(SparseVector::from_dense(&[2.0, 0.0]), 1.0),
            Instance::new(SparseVector::from_dense(&[1.0, 0.5]), 1.0),
            Instance::new(SparseVector::from_dense(&[-1.0, 0.5]), 0.0),
            Instance::new(SparseVector::from_dense(&[-2.0, 0.0]), 0.0),
        ]
    }

    #[test]
    fn builder_defaults_match_default() {
        let built = LogisticRegressionTrainer::builder().build().unwrap();
        let default = LogisticRegressionTrainer::default();
        assert_eq!(built.lambda, default.lambda);
        assert_eq!(built.fit_intercept, default.fit_intercept);
        assert_eq!(built.prior, default.prior);
        assert_eq!(built.optimizer, default.optimizer);
    }

    #[test]
    fn nested_verbosity_survives_without_override() {
        let trainer = LogisticRegressionTrainer::builder()
            .optimizer(
                OptimizerConfig::builder()
                    .verbosity(Verbosity::Debug)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(trainer.verbosity, None);
        assert_eq!(trainer.optimizer_config().verbosity, Verbosity::Debug);

        let overridden = LogisticRegressionTrainer {
            verbosity: Some(Verbosity::Silent),
            ..trainer
        };
        let config = overridden.optimizer_config();
        assert_eq!(config.verbosity, Verbosity::Silent);
        assert_eq!(config.max_sweeps, overridden.optimizer.max_sweeps);
    }

    #[test]
    fn learns_separating_direction() {
        let (model, outcome) = LogisticRegressionTrainer::default()
            .train_with_outcome(2, &separable())
            .unwrap();
        assert!(outcome.converged());
        assert!(outcome.sweeps > 0);
        assert!(model.weight(0) > 0.0);
        assert!(model.predict_dense(&[2.0, 0.0]) > 0.5);
        assert!(model.predict_dense(&[-2.0, 0.0]) < 0.5);
    }

    #[test]
    fn free_function_matches_trainer() {
        let coefficients = train(2, &separable(), 1.0, true).unwrap();
        let model = LogisticRegressionTrainer::default()
            .train(2, &separable())
            .unwrap();
        assert_eq!(&*coefficients, model.coefficients());
        assert_eq!(coefficients.len(), 3);

        let no_intercept = train(2, &separable(), 1.0, false).unwrap();
        assert_eq!(no_intercept.len(), 2);
    }

    #[test]
    fn rejects_bad_lambda() {
        for lambda in [-1.0, f64::NAN, f64::INFINITY] {
            let trainer = LogisticRegressionTrainer {
                lambda,
                ..Default::default()
            };
            assert!(matches!(
                trainer.train(2, &separable()),
                Err(TrainingError::InvalidRegularization(_))
            ));
        }
    }

    #[test]
    fn rejects_prior_of_wrong_length() {
        let trainer = LogisticRegressionTrainer::builder()
            .prior(vec![0.0, 0.0])
            .build()
            .unwrap();
        assert_eq!(
            trainer.train(2, &separable()).unwrap_err(),
            TrainingError::PriorLengthMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn dense_input_matches_sparse() {
        let features = array![[2.0, 0.0], [1.0, 0.5], [-1.0, 0.5], [-2.0, 0.0]];
        let labels = array![1.0, 1.0, 0.0, 0.0];
        let trainer = LogisticRegressionTrainer::default();

        let dense = trainer.train_dense(features.view(), labels.view()).unwrap();
        let sparse = trainer.train(2, &separable()).unwrap();
        assert_eq!(dense, sparse);
    }

    #[test]
    fn dense_label_count_mismatch() {
        let features = array![[1.0], [2.0]];
        let labels = array![1.0];
        assert_eq!(
            LogisticRegressionTrainer::default()
                .train_dense(features.view(), labels.view())
                .unwrap_err(),
            TrainingError::LabelCountMismatch { labels: 1, rows: 2 }
        );
    }
}
