//! Ridge (L2) penalty.

use crate::training::TrainingError;

use super::CoordinateLoss;

/// Ridge penalty `0.5·Σⱼ (βⱼ - priorⱼ)²`.
///
/// With `exempt_last`, the final coefficient (the intercept) is left out of
/// the sum, its gradient is 0 and so is its curvature.
///
/// The penalty reads `beta` directly and keeps no cached state.
#[derive(Debug, Clone)]
pub struct L2RegularizerLoss {
    num_coefficients: usize,
    prior: Option<Box<[f64]>>,
    exempt_last: bool,
}

impl L2RegularizerLoss {
    /// Ridge toward zero.
    pub fn new(num_coefficients: usize, exempt_last: bool) -> Self {
        Self {
            num_coefficients,
            prior: None,
            exempt_last,
        }
    }

    /// Ridge toward `prior`. The prior value of an exempt coefficient is
    /// ignored.
    pub fn with_prior(prior: impl Into<Box<[f64]>>, exempt_last: bool) -> Self {
        let prior = prior.into();
        Self {
            num_coefficients: prior.len(),
            prior: Some(prior),
            exempt_last,
        }
    }

    /// Ridge toward `prior` for a loss over `num_coefficients`.
    ///
    /// # Errors
    ///
    /// [`TrainingError::PriorLengthMismatch`] if the lengths differ.
    pub fn checked_prior(
        num_coefficients: usize,
        prior: &[f64],
        exempt_last: bool,
    ) -> Result<Self, TrainingError> {
        if prior.len() != num_coefficients {
            return Err(TrainingError::PriorLengthMismatch {
                expected: num_coefficients,
                got: prior.len(),
            });
        }
        Ok(Self::with_prior(prior, exempt_last))
    }

    pub fn prior(&self) -> Option<&[f64]> {
        self.prior.as_deref()
    }

    #[inline]
    fn is_exempt(&self, d: usize) -> bool {
        self.exempt_last && d + 1 == self.num_coefficients
    }

    #[inline]
    fn center(&self, d: usize) -> f64 {
        self.prior.as_ref().map_or(0.0, |p| p[d])
    }
}

impl CoordinateLoss for L2RegularizerLoss {
    fn dimension(&self) -> usize {
        self.num_coefficients
    }

    fn cost(&self, beta: &[f64]) -> f64 {
        let sum: f64 = beta
            .iter()
            .enumerate()
            .filter(|&(d, _)| !self.is_exempt(d))
            .map(|(d, &b)| {
                let diff = b - self.center(d);
                diff * diff
            })
            .sum();
        0.5 * sum
    }

    fn gradient(&self, d: usize, beta: &[f64]) -> f64 {
        if self.is_exempt(d) {
            0.0
        } else {
            beta[d] - self.center(d)
        }
    }

    fn max_second_derivative(&self, d: usize) -> f64 {
        if self.is_exempt(d) { 0.0 } else { 1.0 }
    }

    fn coefficient_update(&mut self, _d: usize, _delta: f64, _beta: &[f64]) {}

    fn name(&self) -> &'static str {
        "l2"
    }
}
