//! Testing utilities for sparse-lr.
//!
//! Assertion helpers shared by unit tests and integration tests.
//!
//! ```ignore
//! use sparse_lr::assert_approx_eq;
//! use sparse_lr::testing::{assert_coefficients_eq, DEFAULT_TOLERANCE};
//! ```

use approx::AbsDiffEq;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons of O(1) quantities.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f64 values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
///
/// # Examples
///
/// ```
/// # use sparse_lr::assert_approx_eq;
/// assert_approx_eq!(1.0, 1.0001, 0.001);
/// assert_approx_eq!(0.25, 0.25, 1e-12, "quarter");
/// ```
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two slices are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slice_approx_eq(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{context}[{i}]: {a} ≠ {e} (diff={diff}, tolerance={tolerance})"
        );
    }
}

// =============================================================================
// Coefficient Assertions
// =============================================================================

/// Render the coefficients that differ as `-expected` / `+actual` pairs.
fn diff_coefficients(actual: &[f64], expected: &[f64], epsilon: f64) -> String {
    let mut result = format!("Length: {}\nEpsilon: {epsilon:.0e}\n\n", actual.len());
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if !a.abs_diff_eq(e, epsilon) {
            result.push_str(&format!("[{i:3}] - {e:>12.6}  (expected)\n"));
            result.push_str(&format!("      + {a:>12.6}  (actual, Δ={:+.2e})\n", a - e));
        }
    }
    result
}

/// Assert that two coefficient vectors match within `epsilon`.
///
/// On failure, shows a diff of the differing coefficients.
pub fn assert_coefficients_eq(actual: &[f64], expected: &[f64], epsilon: f64, context: &str) {
    if actual.len() != expected.len() {
        panic!(
            "\n{context}: length mismatch\n- {}  (expected)\n+ {}  (actual)\n",
            expected.len(),
            actual.len()
        );
    }
    if !actual.abs_diff_eq(expected, epsilon) {
        let diff_count = actual
            .iter()
            .zip(expected.iter())
            .filter(|(a, e)| !a.abs_diff_eq(e, epsilon))
            .count();
        let diff_output = diff_coefficients(actual, expected, epsilon);
        panic!(
            "\n{context}: {diff_count}/{} coefficients differ\n\n{diff_output}",
            actual.len()
        );
    }
}
