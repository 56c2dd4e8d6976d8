//! This file provides some numeric helpers
//! used by the weight update.


/// Normalizes `weights` to sum to `1`,
/// dividing each entry by `max_weight · Σ(w / max_weight)`.
/// Rescaling by the maximum first keeps the summation in range
/// even when the raw weights are close to overflowing.
#[inline(always)]
pub(crate) fn normalize_by_max(weights: &mut [f64], max_weight: f64) {
    assert!(max_weight > 0.0 && max_weight.is_finite());

    let sum = weights.iter()
        .map(|w| w / max_weight)
        .sum::<f64>();

    weights.iter_mut()
        .for_each(|w| {
            *w /= max_weight;
            *w /= sum;
        });
}


/// Returns the weighted exponential loss of a two-sided layer
/// from the four weighted sums.
///
/// A side whose coefficient is not finite contributes nothing.
/// If neither side contributes, the loss is `+∞`.
#[inline(always)]
pub(crate) fn split_loss(
    pos_correct: f64,
    pos_incorrect: f64,
    neg_correct: f64,
    neg_incorrect: f64,
    coef_pos: f64,
    coef_neg: f64,
) -> f64
{
    let mut loss = None;

    if coef_pos.is_finite() {
        let term = pos_correct * (-coef_pos).exp()
            + neg_incorrect * coef_pos.exp();
        loss = Some(term);
    }

    if coef_neg.is_finite() {
        let term = neg_correct * coef_neg.exp()
            + pos_incorrect * (-coef_neg).exp();
        loss = Some(loss.unwrap_or(0.0) + term);
    }

    loss.unwrap_or(f64::INFINITY)
}
