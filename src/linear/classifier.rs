//! Stateful fit/predict wrapper.

use ndarray::{ArrayView1, ArrayView2};

use crate::data::{Instance, SparseVector};
use crate::training::TrainingError;

use super::{LinearModel, LogisticRegressionTrainer, ModelError};

/// Logistic-regression classifier holding its trained model.
///
/// Prediction before a successful [`fit`](Self::fit) fails with
/// [`ModelError::NotTrained`]. A failed fit leaves any previous model in
/// place.
///
/// # Example
///
/// ```
/// use sparse_lr::{Instance, LogisticRegression, ModelError, SparseVector};
///
/// let mut clf = LogisticRegression::new(1.0);
/// let x = SparseVector::from_dense(&[1.0]);
/// assert_eq!(clf.predict(&x), Err(ModelError::NotTrained));
///
/// clf.fit(1, &[
///     Instance::new(SparseVector::from_dense(&[1.0]), 1.0),
///     Instance::new(SparseVector::from_dense(&[-1.0]), 0.0),
/// ]).unwrap();
/// assert!(clf.predict(&x).unwrap() > 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    trainer: LogisticRegressionTrainer,
    model: Option<LinearModel>,
}

impl LogisticRegression {
    /// Classifier with regularization weight `lambda` and an intercept.
    pub fn new(lambda: f64) -> Self {
        Self::with_trainer(LogisticRegressionTrainer {
            lambda,
            ..Default::default()
        })
    }

    pub fn with_trainer(trainer: LogisticRegressionTrainer) -> Self {
        Self {
            trainer,
            model: None,
        }
    }

    pub fn trainer(&self) -> &LogisticRegressionTrainer {
        &self.trainer
    }

    /// Center the ridge penalty on `prior` for subsequent fits.
    pub fn set_prior(&mut self, prior: Vec<f64>) {
        self.trainer.prior = Some(prior);
    }

    /// Train on sparse instances, replacing any previous model.
    pub fn fit(&mut self, dimension: usize, instances: &[Instance]) -> Result<&LinearModel, TrainingError> {
        let model = self.trainer.train(dimension, instances)?;
        Ok(&*self.model.insert(model))
    }

    /// Train on a dense matrix, replacing any previous model.
    pub fn fit_dense(
        &mut self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, f64>,
    ) -> Result<&LinearModel, TrainingError> {
        let model = self.trainer.train_dense(features, labels)?;
        Ok(&*self.model.insert(model))
    }

    #[inline]
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model.
    pub fn model(&self) -> Result<&LinearModel, ModelError> {
        self.model.as_ref().ok_or(ModelError::NotTrained)
    }

    /// Trained coefficients, intercept last.
    pub fn coefficients(&self) -> Result<&[f64], ModelError> {
        self.model().map(LinearModel::coefficients)
    }

    /// Probability of class 1.
    pub fn predict(&self, x: &SparseVector) -> Result<f64, ModelError> {
        self.model().map(|m| m.predict_proba(x))
    }

    /// Probability of class 1 for a dense feature row.
    pub fn predict_dense(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.model().map(|m| m.predict_dense(features))
    }
}
