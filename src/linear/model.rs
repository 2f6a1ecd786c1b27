//! Trained logistic-regression model and prediction.

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::data::SparseVector;
use crate::utils::{dense_norm2, sigmoid};

/// Logistic-regression model (weights + optional intercept).
///
/// Coefficients are laid out as feature weights followed by the intercept:
///
/// ```text
/// coefficients[feature]      → weight, for feature in 0..num_features
/// coefficients[num_features] → intercept (only when has_intercept)
/// ```
///
/// # Example
///
/// ```
/// use sparse_lr::{LinearModel, SparseVector};
///
/// let model = LinearModel::new(vec![2.0, -1.0, 0.5].into_boxed_slice(), 2, true);
///
/// assert_eq!(model.weight(1), -1.0);
/// assert_eq!(model.intercept(), 0.5);
///
/// let x = SparseVector::from_dense(&[1.0, 0.0]);
/// assert_eq!(model.raw_score(&x), 2.5);
/// assert!(model.predict_proba(&x) > 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// `num_features` weights, then the intercept if present.
    coefficients: Box<[f64]>,

    /// Number of input features.
    num_features: usize,

    has_intercept: bool,
}

impl LinearModel {
    /// Create a model from trained coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients.len() != num_features + has_intercept`.
    pub fn new(coefficients: Box<[f64]>, num_features: usize, has_intercept: bool) -> Self {
        let expected_len = num_features + usize::from(has_intercept);
        assert_eq!(
            coefficients.len(),
            expected_len,
            "coefficients length {} doesn't match num_features + intercept = {}",
            coefficients.len(),
            expected_len
        );

        Self {
            coefficients,
            num_features,
            has_intercept,
        }
    }

    /// Create a zero-initialized model.
    pub fn zeros(num_features: usize, has_intercept: bool) -> Self {
        let len = num_features + usize::from(has_intercept);
        Self::new(vec![0.0; len].into_boxed_slice(), num_features, has_intercept)
    }

    /// Number of input features.
    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    #[inline]
    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// All coefficients, intercept last.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Feature weights, without the intercept.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.coefficients[..self.num_features]
    }

    #[inline]
    pub fn weight(&self, feature: usize) -> f64 {
        debug_assert!(feature < self.num_features, "feature index out of bounds");
        self.coefficients[feature]
    }

    /// Intercept, or 0 for a model without one.
    #[inline]
    pub fn intercept(&self) -> f64 {
        if self.has_intercept {
            self.coefficients[self.num_features]
        } else {
            0.0
        }
    }

    /// Euclidean norm of the feature weights, excluding the intercept.
    pub fn weight_norm(&self) -> f64 {
        dense_norm2(self.weights())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Linear predictor `x·w + b`.
    ///
    /// # Panics
    ///
    /// Panics if `x` has a feature index `>= num_features`.
    #[inline]
    pub fn raw_score(&self, x: &SparseVector) -> f64 {
        x.dot_dense(self.weights()) + self.intercept()
    }

    /// Probability of class 1.
    #[inline]
    pub fn predict_proba(&self, x: &SparseVector) -> f64 {
        sigmoid(self.raw_score(x))
    }

    /// Probability of class 1 for a dense feature row.
    pub fn predict_dense(&self, features: &[f64]) -> f64 {
        self.predict_proba(&SparseVector::from_dense(features))
    }

    /// Probability of class 1 for each row of a dense `(rows, num_features)`
    /// matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has more than `num_features` columns.
    pub fn predict_batch(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        assert!(
            features.ncols() <= self.num_features,
            "matrix has {} columns but the model has {} features",
            features.ncols(),
            self.num_features
        );
        let weights = self.weights();
        let intercept = self.intercept();
        features
            .rows()
            .into_iter()
            .map(|row| {
                let z: f64 = row.iter().zip(weights).map(|(x, w)| x * w).sum();
                sigmoid(z + intercept)
            })
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string.
    ///
    /// The coefficient count is checked against the declared shape.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        let expected = model.num_features + usize::from(model.has_intercept);
        if model.coefficients.len() != expected {
            return Err(serde::de::Error::invalid_length(
                model.coefficients.len(),
                &"num_features coefficients plus the intercept",
            ));
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn accessors() {
        let model = LinearModel::new(vec![0.5, -0.25, 1.0].into_boxed_slice(), 2, true);
        assert_eq!(model.num_features(), 2);
        assert_eq!(model.weights(), &[0.5, -0.25]);
        assert_eq!(model.intercept(), 1.0);

        let no_bias = LinearModel::new(vec![0.5, -0.25].into_boxed_slice(), 2, false);
        assert_eq!(no_bias.intercept(), 0.0);
        assert_eq!(no_bias.weights(), no_bias.coefficients());
    }

    #[test]
    #[should_panic(expected = "doesn't match")]
    fn wrong_length_panics() {
        LinearModel::new(vec![0.0; 2].into_boxed_slice(), 2, true);
    }

    #[test]
    fn zeros_predict_half() {
        let model = LinearModel::zeros(3, true);
        assert_eq!(model.predict_dense(&[1.0, 2.0, 3.0]), 0.5);
        assert_eq!(model.weight_norm(), 0.0);
    }

    #[test]
    fn sparse_and_dense_agree() {
        let model = LinearModel::new(vec![0.3, -0.7, 0.0, 0.2].into_boxed_slice(), 3, true);
        let dense = [1.5, 0.0, -2.0];
        let sparse = SparseVector::from_dense(&dense);

        let expected = sigmoid(0.3 * 1.5 + 0.2);
        assert_abs_diff_eq!(model.predict_proba(&sparse), expected, epsilon = 1e-15);
        assert_abs_diff_eq!(model.predict_dense(&dense), expected, epsilon = 1e-15);

        let batch = model.predict_batch(array![[1.5, 0.0, -2.0], [0.0, 0.0, 0.0]].view());
        assert_eq!(batch.len(), 2);
        assert_abs_diff_eq!(batch[0], expected, epsilon = 1e-15);
        assert_abs_diff_eq!(batch[1], sigmoid(0.2), epsilon = 1e-15);
    }

    #[test]
    fn json_round_trip() {
        let model = LinearModel::new(vec![0.125, -3.5, 0.75].into_boxed_slice(), 2, true);
        let json = model.to_json().unwrap();
        assert_eq!(LinearModel::from_json(&json).unwrap(), model);
    }

    #[test]
    fn json_rejects_bad_shape() {
        let json = r#"{"coefficients":[1.0],"num_features":2,"has_intercept":true}"#;
        assert!(LinearModel::from_json(json).is_err());
    }
}
