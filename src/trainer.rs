//! Provides the boosting [`Trainer`] and its parts:
//! the prediction cache, the threshold/coefficient optimizer,
//! and the parallel search over configurations.

mod options;
mod prediction_cache;
mod optimizer;
mod search;
mod trainer_algorithm;


pub use options::{TrainerOptions, ThresholdSweep};
pub use prediction_cache::{PredictionCache, Predictions, CacheKey};
pub use trainer_algorithm::{Trainer, TrainerId, RoundReport};
