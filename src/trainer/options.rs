use serde::{Serialize, Deserialize};

use crate::common::constants::DEFAULT_SMOOTHING;


/// Which outputs become candidate thresholds
/// in the threshold sweep of a configuration.
/// The sweep always starts from `-∞`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdSweep {
    /// The distinct outputs of the positive samples.
    PositiveOutputs,
    /// The distinct outputs of every sample.
    AllOutputs,
}


impl Default for ThresholdSweep {
    fn default() -> Self {
        ThresholdSweep::PositiveOutputs
    }
}


/// Parameters of a [`Trainer`](crate::Trainer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainerOptions {
    /// Added to each of the four weighted sums
    /// inside the closed-form coefficients.
    /// `0.0` keeps the exact minimizer,
    /// which yields infinite coefficients on perfectly separated sides.
    pub smoothing: f64,

    /// Candidate thresholds of the sweep.
    pub threshold_sweep: ThresholdSweep,

    /// Search the learners of the pool in parallel.
    /// The selected layer does not depend on this flag.
    pub parallel_learners: bool,
}


impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            threshold_sweep: ThresholdSweep::default(),
            parallel_learners: false,
        }
    }
}
