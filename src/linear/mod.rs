//! L2-regularized logistic regression.
//!
//! Prediction is a sparse dot product followed by a sigmoid:
//!
//! ```text
//! p(y = 1 | x) = sigmoid(Σ x[i] × weight[i] + intercept)
//! ```
//!
//! - [`LogisticRegressionTrainer`]: Configuration and training entry point
//! - [`LinearModel`]: Trained coefficients and prediction
//! - [`LogisticRegression`]: Stateful fit/predict wrapper

mod classifier;
mod model;
mod trainer;

pub use classifier::LogisticRegression;
pub use model::LinearModel;
pub use trainer::{
    LogisticRegressionTrainer, LogisticRegressionTrainerBuilder, TrainingOutcome, train,
};

/// Errors from using a model in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("model has not been trained")]
    NotTrained,
}
