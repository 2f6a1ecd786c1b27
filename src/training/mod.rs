//! Training infrastructure for coordinate descent.
//!
//! This module provides the core types needed for training:
//!
//! - [`CoordinateLoss`]: Trait the optimizer drives, one coordinate at a time
//! - [`CoordinateLipschitzGradientOptimizer`]: Coordinate descent with
//!   per-coordinate Lipschitz step sizes
//! - [`OptimizerConfig`]: Stopping rules and numeric guards
//! - [`Metric`]: Trait for evaluating model quality
//! - [`TrainingLogger`]: Structured logging with verbosity levels
//!
//! ## Losses
//!
//! - [`LogisticLoss`]: Weighted binary cross-entropy over sparse instances
//! - [`L2RegularizerLoss`]: Ridge penalty, optionally centered on a prior
//! - [`LinearCombineLoss`]: Weighted sum of losses
//!
//! ## Metrics
//!
//! - [`Auc`]: Area under ROC curve
//! - [`LogLoss`]: Binary cross-entropy
//! - [`Accuracy`]: Thresholded classification accuracy

mod error;
mod logger;
mod loss;
mod metric;
mod optimizer;

pub use error::TrainingError;
pub use logger::{TrainingLogger, Verbosity};
pub use loss::{CoordinateLoss, L2RegularizerLoss, LinearCombineLoss, LogisticLoss};
pub use metric::{Accuracy, Auc, LogLoss, Metric};
pub use optimizer::{
    CoordinateLipschitzGradientOptimizer, OptimizerConfig, OptimizerConfigBuilder,
    OptimizerState, Optimum, SweepStats,
};
