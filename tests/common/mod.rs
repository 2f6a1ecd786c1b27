//! Shared data builders for integration tests.
//!
//! For assertion helpers, use `sparse_lr::testing`.

#![allow(dead_code)]

use rand::prelude::*;

use sparse_lr::utils::sigmoid;
use sparse_lr::{Instance, SparseVector};

#[allow(unused_imports)]
pub use sparse_lr::assert_approx_eq;
#[allow(unused_imports)]
pub use sparse_lr::testing::{DEFAULT_TOLERANCE, assert_coefficients_eq, assert_slice_approx_eq};

// =============================================================================
// Fixed datasets
// =============================================================================

/// Four points separable by the sign of the first coordinate.
///
/// `x0 = 0` is class 1 and `x0 = 1` is class 0; `x1` carries no signal.
pub fn toy_instances() -> Vec<Instance> {
    vec![
        Instance::new(SparseVector::from_dense(&[0.0, -1.0]), 1.0),
        Instance::new(SparseVector::from_dense(&[1.0, -1.0]), 0.0),
        Instance::new(SparseVector::from_dense(&[1.0, 1.0]), 0.0),
        Instance::new(SparseVector::from_dense(&[0.0, 1.0]), 1.0),
    ]
}

/// The toy dataset in LIBSVM text form.
pub const TOY_LIBSVM: &str = "\
# x0 separates the classes
1 2:-1
0 1:1 2:-1
0 1:1 2:1
1 2:1
";

// =============================================================================
// Synthetic data
// =============================================================================

/// Randomly generated sparse classification problem.
pub struct Synthetic {
    pub instances: Vec<Instance>,
    /// Weights the labels were sampled from.
    pub true_weights: Vec<f64>,
    pub true_intercept: f64,
}

/// Sample `num_rows` sparse rows over `num_features` features.
///
/// Each feature is present with probability `density` and uniform in
/// `[-1, 1]`. Labels are Bernoulli draws from the logistic model defined by
/// uniformly sampled weights in `[-3, 3]`.
pub fn synthetic(num_rows: usize, num_features: usize, density: f64, seed: u64) -> Synthetic {
    let mut rng = StdRng::seed_from_u64(seed);

    let true_weights: Vec<f64> = (0..num_features)
        .map(|_| rng.r#gen::<f64>() * 6.0 - 3.0)
        .collect();
    let true_intercept = rng.r#gen::<f64>() - 0.5;

    let instances = (0..num_rows)
        .map(|_| {
            let dense: Vec<f64> = (0..num_features)
                .map(|_| {
                    if rng.r#gen::<f64>() < density {
                        rng.r#gen::<f64>() * 2.0 - 1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            let features = SparseVector::from_dense(&dense);
            let p = sigmoid(features.dot_dense(&true_weights) + true_intercept);
            let label = if rng.r#gen::<f64>() < p { 1.0 } else { 0.0 };
            Instance::new(features, label)
        })
        .collect();

    Synthetic {
        instances,
        true_weights,
        true_intercept,
    }
}

/// Balanced random labels.
pub fn random_labels(n: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..n)
        .map(|_| if rng.r#gen::<bool>() { 1.0 } else { 0.0 })
        .collect()
}
