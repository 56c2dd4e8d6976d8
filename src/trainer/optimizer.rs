//! The threshold sweep that fits one configuration's layer.
//!
//! For a threshold `t`, a positive sample is classified correctly
//! iff its output is `> t`, a negative one iff its output is `<= t`.
//! With the four weighted sums
//! `W+c`, `W+i` (positives correct / incorrect) and
//! `W-c`, `W-i` (negatives correct / incorrect),
//! the exponential loss is minimized by
//!
//! ```text
//! coef_pos =  ln(W+c / W-i) / 2
//! coef_neg = -ln(W-c / W+i) / 2
//! ```
use crate::common::utils;
use super::ThresholdSweep;

use std::iter;


/// The best threshold and coefficients found for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Split {
    pub(crate) loss: f64,
    pub(crate) threshold: f64,
    pub(crate) coef_pos: f64,
    pub(crate) coef_neg: f64,
}


impl Split {
    /// The split returned when no threshold has a finite loss.
    /// It never beats another candidate.
    pub(crate) fn degenerate() -> Self {
        Self {
            loss: f64::INFINITY,
            threshold: f64::INFINITY,
            coef_pos: f64::INFINITY,
            coef_neg: f64::NEG_INFINITY,
        }
    }
}


/// The outputs of one class, sorted ascending with their weights,
/// and the prefix/suffix sums of those weights.
/// NaN outputs are never on either side of a threshold;
/// their weight is kept apart.
struct SortedSide {
    outputs: Vec<f64>,
    // prefix[k] = Σ_{j < k} w_j
    prefix: Vec<f64>,
    // suffix[k] = Σ_{j >= k} w_j
    suffix: Vec<f64>,
    nan_weight: f64,
    nan_count: usize,
}


/// The weight and the number of samples of one class
/// on either side of a threshold.
/// NaN outputs are excluded.
struct Cut {
    below: f64,
    above: f64,
    n_below: usize,
    n_above: usize,
}


impl SortedSide {
    fn new(outputs: &[f64], weights: &[f64]) -> Self {
        let mut pairs = outputs.iter()
            .copied()
            .zip(weights.iter().copied())
            .collect::<Vec<_>>();

        let nan_weight = pairs.iter()
            .filter(|(o, _)| o.is_nan())
            .map(|(_, w)| w)
            .sum::<f64>();
        let nan_count = pairs.iter()
            .filter(|(o, _)| o.is_nan())
            .count();
        pairs.retain(|(o, _)| !o.is_nan());
        pairs.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let n = pairs.len();
        let mut prefix = vec![0.0; n + 1];
        let mut suffix = vec![0.0; n + 1];
        for (k, (_, w)) in pairs.iter().enumerate() {
            prefix[k + 1] = prefix[k] + w;
        }
        for (k, (_, w)) in pairs.iter().enumerate().rev() {
            suffix[k] = suffix[k + 1] + w;
        }

        let outputs = pairs.into_iter()
            .map(|(o, _)| o)
            .collect();

        Self { outputs, prefix, suffix, nan_weight, nan_count }
    }


    #[inline(always)]
    fn cut(&self, threshold: f64) -> Cut {
        let k = self.outputs.partition_point(|&o| o <= threshold);
        Cut {
            below: self.prefix[k],
            above: self.suffix[k],
            n_below: k,
            n_above: self.outputs.len() - k,
        }
    }
}


/// Fits the threshold and coefficients of a configuration
/// against one round's weight distribution.
pub(crate) struct Optimizer<'a> {
    weights: &'a [f64],
    n_positives: usize,
    sweep: ThresholdSweep,
    smoothing: f64,
}


impl<'a> Optimizer<'a> {
    /// `weights` are indexed like the prediction vectors:
    /// positives in `0..n_positives`, negatives after.
    pub(crate) fn new(
        weights: &'a [f64],
        n_positives: usize,
        sweep: ThresholdSweep,
        smoothing: f64,
    ) -> Self
    {
        assert!(n_positives <= weights.len());
        Self { weights, n_positives, sweep, smoothing }
    }


    /// Candidate thresholds: `-∞` and then the distinct finite-or-`-∞`
    /// outputs of the sweep, ascending.
    /// A `+∞` threshold would select nothing, so the sweep stops before it.
    fn thresholds(&self, outputs: &[f64]) -> impl Iterator<Item = f64> {
        let source = match self.sweep {
            ThresholdSweep::PositiveOutputs => &outputs[..self.n_positives],
            ThresholdSweep::AllOutputs => outputs,
        };

        let mut values = source.iter()
            .copied()
            .filter(|&v| v > f64::NEG_INFINITY && v < f64::INFINITY)
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        values.dedup();

        iter::once(f64::NEG_INFINITY).chain(values)
    }


    /// Sweeps the thresholds of one configuration
    /// and returns the split of lowest loss.
    /// Ties go to the lower threshold.
    pub(crate) fn optimize(&self, outputs: &[f64]) -> Split {
        assert_eq!(outputs.len(), self.weights.len());

        let (pos_outputs, neg_outputs) = outputs.split_at(self.n_positives);
        let (pos_weights, neg_weights) = self.weights.split_at(self.n_positives);

        let pos = SortedSide::new(pos_outputs, pos_weights);
        let neg = SortedSide::new(neg_outputs, neg_weights);

        let eps = self.smoothing;
        let mut best = Split::degenerate();

        for threshold in self.thresholds(outputs) {
            let pos_cut = pos.cut(threshold);
            let neg_cut = neg.cut(threshold);

            let pos_correct = pos_cut.above;
            let pos_incorrect = pos_cut.below + pos.nan_weight;
            let neg_correct = neg_cut.below;
            let neg_incorrect = neg_cut.above + neg.nan_weight;

            let coef_pos = ((pos_correct + eps) / (neg_incorrect + eps)).ln()
                / 2.0;
            let coef_neg = -((neg_correct + eps) / (pos_incorrect + eps)).ln()
                / 2.0;

            // The update gives NaN outputs `coef_neg`.
            let admissible = reaches_no_opponent(
                coef_pos, pos_cut.n_above, neg_cut.n_above,
            ) && reaches_no_opponent(
                coef_neg,
                pos_cut.n_below + pos.nan_count,
                neg_cut.n_below + neg.nan_count,
            );
            if !admissible { continue; }

            let loss = utils::split_loss(
                pos_correct,
                pos_incorrect,
                neg_correct,
                neg_incorrect,
                coef_pos,
                coef_neg,
            );

            // NaN and `+∞` never compare lower.
            if loss < best.loss {
                best = Split {
                    loss,
                    threshold,
                    coef_pos: weightless_as_zero(coef_pos),
                    coef_neg: weightless_as_zero(coef_neg),
                };
            }
        }

        best
    }
}


/// An infinite coefficient drives every sample on its side
/// to an infinite confidence.
/// It is only allowed if no sample of the class it misclassifies
/// is on that side, whatever that sample's weight.
/// Otherwise the sample's weight overflows,
/// or its confidence becomes `∞ - ∞`.
#[inline(always)]
fn reaches_no_opponent(coef: f64, n_positives: usize, n_negatives: usize)
    -> bool
{
    if coef == f64::INFINITY {
        n_negatives == 0
    } else if coef == f64::NEG_INFINITY {
        n_positives == 0
    } else {
        true
    }
}


/// A NaN coefficient comes from `0 / 0`:
/// the side carries no weight of either class.
/// Such a side keeps the confidences of its samples.
#[inline(always)]
fn weightless_as_zero(coef: f64) -> f64 {
    if coef.is_nan() { 0.0 } else { coef }
}
