//! Training errors.

/// Errors raised while building losses or training a model.
///
/// Every variant aborts the call that produced it; no partial model is
/// returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("instance {index}: label {label} is not 0 or 1")]
    InvalidLabel { index: usize, label: f64 },

    #[error("instance {index}: weight {weight} must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("instance {index}: feature index {feature} out of range for dimension {dimension}")]
    FeatureOutOfRange {
        index: usize,
        feature: u32,
        dimension: usize,
    },

    #[error("loss dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("prior has {got} coefficients, expected {expected}")]
    PriorLengthMismatch { expected: usize, got: usize },

    #[error("got {labels} labels for {rows} rows")]
    LabelCountMismatch { labels: usize, rows: usize },

    #[error("regularization weight must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),
}
