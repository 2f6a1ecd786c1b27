//! Coordinate descent with per-coordinate Lipschitz step sizes.
//!
//! Each step minimizes a quadratic upper bound of the objective along one
//! coordinate:
//!
//! ```text
//! delta[d] = -gradient(d) / L[d]
//! ```
//!
//! where `L[d]` is the loss's bound on the second derivative along `d`,
//! computed once before the first sweep. A sweep visits every coordinate in
//! increasing order and each step sees the updates made earlier in the same
//! sweep (Gauss-Seidel).
//!
//! # Example
//!
//! ```
//! use sparse_lr::{
//!     CoordinateLipschitzGradientOptimizer, L2RegularizerLoss, OptimizerConfig, OptimizerState,
//! };
//!
//! // Ridge toward a prior is minimized by the prior itself.
//! let mut loss = L2RegularizerLoss::with_prior(vec![1.0, -2.0], false);
//! let optimum = CoordinateLipschitzGradientOptimizer::new(&mut loss, OptimizerConfig::default()).run();
//!
//! assert_eq!(optimum.state, OptimizerState::Converged);
//! assert_eq!(&*optimum.coefficients, &[1.0, -2.0]);
//! ```

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::{CoordinateLoss, TrainingLogger, Verbosity};

// ============================================================================
// OptimizerConfig
// ============================================================================

/// Stopping rules and numeric guards for the optimizer.
///
/// Use [`OptimizerConfig::builder()`] for a fluent configuration API.
///
/// ```
/// use sparse_lr::OptimizerConfig;
///
/// let config = OptimizerConfig::builder()
///     .max_sweeps(50usize)
///     .relative_tolerance(None)
///     .build()
///     .unwrap();
/// assert!(config.strict_convergence);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Upper bound on the number of sweeps. 0 runs initialization only.
    #[builder(default = "500")]
    pub max_sweeps: usize,

    /// Stop once a sweep changes no coordinate.
    #[builder(default = "true")]
    pub strict_convergence: bool,

    /// Stop once the sweep's summed squared gradient drops to this fraction
    /// of the initial one.
    #[builder(default = "Some(1e-4)")]
    pub relative_tolerance: Option<f64>,

    /// Lower clamp on each coordinate's Lipschitz bound.
    #[builder(default = "1e-6")]
    pub lipschitz_floor: f64,

    /// A coordinate counts as changed when it moves by more than this.
    #[builder(default = "1e-7")]
    pub change_epsilon: f64,

    /// Verbosity level for training output.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 500,
            strict_convergence: true,
            relative_tolerance: Some(1e-4),
            lipschitz_floor: 1e-6,
            change_epsilon: 1e-7,
            verbosity: Verbosity::default(),
        }
    }
}

impl OptimizerConfig {
    /// Create a builder for configuring the optimizer.
    pub fn builder() -> OptimizerConfigBuilder {
        OptimizerConfigBuilder::default()
    }
}

// ============================================================================
// State and results
// ============================================================================

/// Lifecycle of an optimizer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimizerState {
    /// Bounds and initial gradient not yet computed.
    Initializing,
    /// Ready for another sweep.
    Sweeping,
    /// A convergence rule fired.
    Converged,
    /// `max_sweeps` sweeps ran without convergence.
    IterationLimitReached,
}

impl OptimizerState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::IterationLimitReached)
    }
}

/// Statistics for one completed sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStats {
    /// 1-based sweep number.
    pub sweep: usize,
    /// Coordinates that moved by more than `change_epsilon`.
    pub changed: usize,
    /// Sum of squared gradients, each taken just before its coordinate's step.
    pub gradient_norm_sq: f64,
    /// State after the sweep.
    pub state: OptimizerState,
}

/// Final coefficients of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    pub coefficients: Box<[f64]>,
    pub state: OptimizerState,
    pub sweeps: usize,
}

impl Optimum {
    #[inline]
    pub fn converged(&self) -> bool {
        self.state == OptimizerState::Converged
    }
}

// ============================================================================
// CoordinateLipschitzGradientOptimizer
// ============================================================================

/// Coordinate descent driver over a [`CoordinateLoss`].
///
/// The optimizer owns the coefficient vector and borrows the loss mutably
/// for its whole life, so the loss's cached state can only change through
/// the optimizer's update notifications.
///
/// Drive it with [`run`](Self::run), or call [`sweep`](Self::sweep)
/// repeatedly to inspect progress between sweeps.
pub struct CoordinateLipschitzGradientOptimizer<'a, L: CoordinateLoss + ?Sized> {
    loss: &'a mut L,
    config: OptimizerConfig,
    beta: Box<[f64]>,
    bounds: Box<[f64]>,
    initial_gradient_norm_sq: f64,
    sweeps: usize,
    state: OptimizerState,
    logger: TrainingLogger,
}

impl<'a, L: CoordinateLoss + ?Sized> CoordinateLipschitzGradientOptimizer<'a, L> {
    /// Create an optimizer starting from all-zero coefficients.
    ///
    /// No loss method is called until the first sweep.
    pub fn new(loss: &'a mut L, config: OptimizerConfig) -> Self {
        let dimension = loss.dimension();
        let logger = TrainingLogger::new(config.verbosity);
        Self {
            loss,
            config,
            beta: vec![0.0; dimension].into_boxed_slice(),
            bounds: Box::default(),
            initial_gradient_norm_sq: 0.0,
            sweeps: 0,
            state: OptimizerState::Initializing,
            logger,
        }
    }

    /// Current coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.beta
    }

    #[inline]
    pub fn state(&self) -> OptimizerState {
        self.state
    }

    /// Completed sweeps.
    #[inline]
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Objective value at the current coefficients. A full pass for
    /// data-backed losses.
    pub fn cost(&self) -> f64 {
        self.loss.cost(&self.beta)
    }

    /// Per-coordinate step denominators. Empty before initialization.
    pub fn lipschitz_bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Summed squared gradient at the starting point.
    pub fn initial_gradient_norm_sq(&self) -> f64 {
        self.initial_gradient_norm_sq
    }

    fn initialize(&mut self) {
        let dimension = self.beta.len();
        self.logger.start_training(self.config.max_sweeps, dimension);

        // Anchor cached loss state to the all-zero starting point.
        if dimension > 0 {
            self.loss.coefficient_update(0, 0.0, &self.beta);
        }

        let floor = self.config.lipschitz_floor;
        self.bounds = (0..dimension)
            .map(|d| self.loss.max_second_derivative(d).max(floor))
            .collect();

        self.initial_gradient_norm_sq = (0..dimension)
            .map(|d| self.loss.gradient(d, &self.beta).powi(2))
            .sum();

        if self.logger.enabled(Verbosity::Info) {
            self.logger.log_initial(self.cost(), self.initial_gradient_norm_sq);
        }

        self.state = OptimizerState::Sweeping;
        if self.config.max_sweeps == 0 {
            self.finish(OptimizerState::IterationLimitReached);
        }
    }

    /// Run one sweep over all coordinates.
    ///
    /// Initializes first if needed. Returns `None` once a terminal state has
    /// been reached, without touching the loss.
    pub fn sweep(&mut self) -> Option<SweepStats> {
        if self.state == OptimizerState::Initializing {
            self.initialize();
        }
        if self.state.is_terminal() {
            return None;
        }

        let mut changed = 0;
        let mut gradient_norm_sq = 0.0;
        for d in 0..self.beta.len() {
            let grad = self.loss.gradient(d, &self.beta);
            gradient_norm_sq += grad * grad;

            let delta = -grad / self.bounds[d];
            if delta.abs() > self.config.change_epsilon {
                self.beta[d] += delta;
                self.loss.coefficient_update(d, delta, &self.beta);
                changed += 1;
            }
        }
        self.sweeps += 1;

        if self.logger.enabled(Verbosity::Debug) {
            self.logger.log_round(
                self.sweeps,
                &[
                    ("cost", self.cost()),
                    ("grad_norm_sq", gradient_norm_sq),
                    ("changed", changed as f64),
                ],
            );
        }

        let relative_converged = match self.config.relative_tolerance {
            Some(tol) => gradient_norm_sq <= tol * self.initial_gradient_norm_sq,
            None => false,
        };
        if (self.config.strict_convergence && changed == 0) || relative_converged {
            self.finish(OptimizerState::Converged);
        } else if self.sweeps >= self.config.max_sweeps {
            self.finish(OptimizerState::IterationLimitReached);
        }

        Some(SweepStats {
            sweep: self.sweeps,
            changed,
            gradient_norm_sq,
            state: self.state,
        })
    }

    /// Sweep until a stopping rule fires.
    pub fn run(mut self) -> Optimum {
        while self.sweep().is_some() {}
        Optimum {
            coefficients: self.beta,
            state: self.state,
            sweeps: self.sweeps,
        }
    }

    fn finish(&mut self, state: OptimizerState) {
        self.state = state;
        if state == OptimizerState::IterationLimitReached && self.config.max_sweeps > 0 {
            self.logger.warn(&format!(
                "coordinate descent stopped after {} sweeps without converging",
                self.sweeps
            ));
        }
        let final_cost = self
            .logger
            .enabled(Verbosity::Info)
            .then(|| self.loss.cost(&self.beta));
        self.logger.finish_training(self.sweeps, state, final_cost);
    }
}
