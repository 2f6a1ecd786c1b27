//! Losses driven one coordinate at a time.
//!
//! # CoordinateLoss Trait
//!
//! The optimizer never sees the data directly. It asks a [`CoordinateLoss`]
//! for:
//! - `gradient(d, beta)`: partial derivative along coordinate `d`
//! - `max_second_derivative(d)`: an upper bound on the curvature along `d`,
//!   used as the Lipschitz constant of the partial gradient
//! - `cost(beta)`: the objective value, for diagnostics only
//!
//! and notifies it through `coefficient_update(d, delta, beta)` after every
//! committed change, so losses that cache per-instance state can patch it
//! instead of recomputing.
//!
//! # Available Losses
//!
//! - [`LogisticLoss`]: Weighted binary cross-entropy over sparse instances
//! - [`L2RegularizerLoss`]: Ridge penalty, optionally centered on a prior
//! - [`LinearCombineLoss`]: Weighted sum of other losses

mod combine;
mod logistic;
mod regularizer;

pub use combine::LinearCombineLoss;
pub use logistic::LogisticLoss;
pub use regularizer::L2RegularizerLoss;

/// A differentiable objective exposing per-coordinate information.
///
/// Coefficients are indexed `0..dimension()`. When a loss models an
/// intercept, it occupies the last index.
///
/// # Contract
///
/// - `gradient` and `max_second_derivative` are only called with
///   `d < dimension()`.
/// - `beta` always has length `dimension()`.
/// - After `coefficient_update(d, delta, beta)`, `beta[d]` already holds the
///   new value and the previous value was `beta[d] - delta`.
pub trait CoordinateLoss {
    /// Number of coefficients this loss is defined over.
    fn dimension(&self) -> usize;

    /// Objective value at `beta`.
    fn cost(&self, beta: &[f64]) -> f64;

    /// Partial derivative of the objective along coordinate `d`.
    fn gradient(&self, d: usize, beta: &[f64]) -> f64;

    /// Upper bound on the second derivative along coordinate `d`.
    ///
    /// May be 0 when the objective is flat along `d`; the optimizer floors it.
    fn max_second_derivative(&self, d: usize) -> f64;

    /// Coordinate `d` moved by `delta`.
    fn coefficient_update(&mut self, d: usize, delta: f64, beta: &[f64]);

    /// Loss name (for logging).
    fn name(&self) -> &'static str;
}

impl<L: CoordinateLoss + ?Sized> CoordinateLoss for Box<L> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn cost(&self, beta: &[f64]) -> f64 {
        (**self).cost(beta)
    }

    fn gradient(&self, d: usize, beta: &[f64]) -> f64 {
        (**self).gradient(d, beta)
    }

    fn max_second_derivative(&self, d: usize) -> f64 {
        (**self).max_second_derivative(d)
    }

    fn coefficient_update(&mut self, d: usize, delta: f64, beta: &[f64]) {
        (**self).coefficient_update(d, delta, beta)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
