//! sparse-lr: L2-regularized logistic regression for sparse data.
//!
//! Models are trained with coordinate descent driven by per-coordinate
//! Lipschitz bounds on the second derivative. Each coordinate step is the
//! closed-form minimizer of a quadratic upper bound, and per-instance linear
//! scores are maintained incrementally through a column store so a full sweep
//! costs time linear in the number of non-zeros.
//!
//! # Key Types
//!
//! - [`SparseVector`] / [`Instance`] - Training data
//! - [`CoordinateLoss`] - Loss contract driven by the optimizer
//! - [`CoordinateLipschitzGradientOptimizer`] - The coordinate descent driver
//! - [`LogisticRegressionTrainer`] / [`LinearModel`] - High-level train/predict
//!
//! # Training
//!
//! ```
//! use sparse_lr::{Instance, LogisticRegressionTrainer, SparseVector};
//!
//! let instances = vec![
//!     Instance::new(SparseVector::from_dense(&[0.0, -1.0]), 1.0),
//!     Instance::new(SparseVector::from_dense(&[1.0, -1.0]), 0.0),
//!     Instance::new(SparseVector::from_dense(&[1.0, 1.0]), 0.0),
//!     Instance::new(SparseVector::from_dense(&[0.0, 1.0]), 1.0),
//! ];
//!
//! let model = LogisticRegressionTrainer::default().train(2, &instances).unwrap();
//! assert!(model.predict_dense(&[0.0, 100.0]) > 0.5);
//! ```

// Re-export approx traits for users who want to compare vectors
pub use approx;

pub mod data;
pub mod linear;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{Instance, SparseVector, SparseVectorError};
pub use linear::{
    LinearModel, LogisticRegression, LogisticRegressionTrainer, LogisticRegressionTrainerBuilder,
    ModelError, train,
};
pub use training::{
    CoordinateLipschitzGradientOptimizer, CoordinateLoss, L2RegularizerLoss, LinearCombineLoss,
    LogisticLoss, OptimizerConfig, OptimizerState, TrainingError, Verbosity,
};
