//! Weighted sum of coordinate losses.

use std::fmt;

use crate::training::TrainingError;

use super::CoordinateLoss;

/// `Σᵢ wᵢ·lossᵢ`, evaluated term by term.
///
/// Every sub-loss must report the same dimension; the first one added fixes
/// it. Coefficient updates fan out to all sub-losses in insertion order.
///
/// # Example
///
/// ```
/// use sparse_lr::{CoordinateLoss, L2RegularizerLoss, LinearCombineLoss};
///
/// let mut loss = LinearCombineLoss::new();
/// loss.add(L2RegularizerLoss::new(2, false)).unwrap();
/// loss.add_weighted(L2RegularizerLoss::new(2, false), 3.0).unwrap();
///
/// assert_eq!(loss.dimension(), 2);
/// assert_eq!(loss.gradient(0, &[1.0, 0.0]), 4.0);
/// assert!(loss.add(L2RegularizerLoss::new(3, false)).is_err());
/// ```
#[derive(Default)]
pub struct LinearCombineLoss {
    terms: Vec<(Box<dyn CoordinateLoss>, f64)>,
}

impl LinearCombineLoss {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term with weight 1.
    pub fn add<L: CoordinateLoss + 'static>(&mut self, loss: L) -> Result<&mut Self, TrainingError> {
        self.add_weighted(loss, 1.0)
    }

    /// Add a term with an explicit weight.
    ///
    /// # Errors
    ///
    /// [`TrainingError::DimensionMismatch`] if `loss` disagrees with the
    /// dimension of the terms already present.
    pub fn add_weighted<L: CoordinateLoss + 'static>(
        &mut self,
        loss: L,
        weight: f64,
    ) -> Result<&mut Self, TrainingError> {
        self.add_boxed(Box::new(loss), weight)
    }

    /// Add an already boxed term.
    pub fn add_boxed(
        &mut self,
        loss: Box<dyn CoordinateLoss>,
        weight: f64,
    ) -> Result<&mut Self, TrainingError> {
        if let Some((first, _)) = self.terms.first() {
            if first.dimension() != loss.dimension() {
                return Err(TrainingError::DimensionMismatch {
                    expected: first.dimension(),
                    got: loss.dimension(),
                });
            }
        }
        self.terms.push((loss, weight));
        Ok(self)
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Term weights in insertion order.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.terms.iter().map(|(_, w)| *w)
    }
}

impl fmt::Debug for LinearCombineLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.terms.iter().map(|(loss, w)| (loss.name(), *w)))
            .finish()
    }
}

impl CoordinateLoss for LinearCombineLoss {
    /// Dimension shared by all terms, or 0 when empty.
    fn dimension(&self) -> usize {
        self.terms.first().map_or(0, |(loss, _)| loss.dimension())
    }

    fn cost(&self, beta: &[f64]) -> f64 {
        self.terms.iter().map(|(loss, w)| w * loss.cost(beta)).sum()
    }

    fn gradient(&self, d: usize, beta: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(loss, w)| w * loss.gradient(d, beta))
            .sum()
    }

    fn max_second_derivative(&self, d: usize) -> f64 {
        self.terms
            .iter()
            .map(|(loss, w)| w * loss.max_second_derivative(d))
            .sum()
    }

    fn coefficient_update(&mut self, d: usize, delta: f64, beta: &[f64]) {
        for (loss, _) in self.terms.iter_mut() {
            loss.coefficient_update(d, delta, beta);
        }
    }

    fn name(&self) -> &'static str {
        "linear_combine"
    }
}
