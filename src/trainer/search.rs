//! The parallel reduction over the configurations of one learner.
use rayon::prelude::*;

use super::Predictions;
use super::optimizer::{Optimizer, Split};

use std::hash::Hash;


/// The best split found so far, tagged with its configuration slot.
/// Starts at `+∞` loss and is only replaced by a strictly lower loss.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalBest {
    pub(crate) loss: f64,
    pub(crate) found: Option<(usize, Split)>,
}


impl LocalBest {
    pub(crate) fn empty() -> Self {
        Self { loss: f64::INFINITY, found: None }
    }


    #[inline(always)]
    fn offer(self, k: usize, split: Split) -> Self {
        if split.loss < self.loss {
            Self { loss: split.loss, found: Some((k, split)) }
        } else {
            self
        }
    }


    /// Keeps `self` unless `other` is strictly better.
    /// Combined in iteration order, this keeps the first of equal losses.
    #[inline(always)]
    fn merge(self, other: Self) -> Self {
        if other.loss < self.loss { other } else { self }
    }
}


/// Fits every configuration of `table`
/// and returns the one of lowest loss.
///
/// Each rayon worker folds a contiguous run of configurations
/// into its own [`LocalBest`];
/// the partial results are then reduced in iteration order.
/// The result does not depend on how the work was split.
pub(crate) fn best_configuration<C>(
    table: &Predictions<C>,
    optimizer: &Optimizer<'_>,
) -> LocalBest
    where C: Clone + Eq + Hash + Send + Sync,
{
    table.par_outputs()
        .fold(LocalBest::empty, |best, (k, outputs)| {
            best.offer(k, optimizer.optimize(outputs))
        })
        .reduce(LocalBest::empty, LocalBest::merge)
}
