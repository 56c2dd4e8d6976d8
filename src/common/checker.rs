//! This file defines some functions that checks some pre-conditions
//! E.g., the smoothing parameter, the weight distribution.

use super::constants::SIMPLEX_TOLERANCE;


/// Check the smoothing parameter.
#[inline(always)]
pub(crate) fn smoothing(eps: f64) {
    assert!(
        eps.is_finite() && eps >= 0.0,
        "smoothing must be a finite non-negative value. got {eps}."
    );
}


/// Check that `weights` is a probability distribution:
/// every entry finite and non-negative, summing to `1`.
#[inline(always)]
pub(crate) fn distribution(weights: &[f64]) {
    assert!(
        weights.iter().all(|w| w.is_finite() && *w >= 0.0),
        "every weight must be finite and non-negative. weights = {weights:?}"
    );

    let sum = weights.iter().sum::<f64>();
    assert!(
        (sum - 1f64).abs() < SIMPLEX_TOLERANCE,
        "sum(weights[..]) = {sum}"
    );
}
