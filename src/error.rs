//! Errors reported by the trainer.
use thiserror::Error;


/// A specialized `Result` for training.
pub type Result<T> = std::result::Result<T, TrainError>;


/// Errors that can occur while constructing a [`Trainer`](crate::Trainer)
/// or running a boosting round.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainError {
    /// Neither positive nor negative samples were given.
    #[error("The training sample is empty")]
    EmptySampleSet,

    /// The learner pool is empty.
    #[error("The learner pool is empty")]
    EmptyLearnerPool,

    /// Two learners in the pool share the same name.
    /// Names key the prediction cache, so they must be unique.
    #[error("Learner `{name}` appears more than once in the pool")]
    DuplicateLearner {
        /// The shared name.
        name: String,
    },

    /// A learner yielded no configuration for any training sample.
    #[error("Learner `{learner}` has no configuration for the training sample")]
    EmptyConfigurationSpace {
        /// Name of the learner.
        learner: String,
    },

    /// A sample weight overflowed after the confidence update.
    /// Boosting has diverged; the round is not retried.
    #[error("Sample weight overflowed at round {round}")]
    WeightOverflow {
        /// The round that failed.
        round: usize,
    },

    /// Every sample weight underflowed to zero, or a weight became NaN,
    /// so the distribution cannot be normalized.
    #[error("Sample weights degenerated at round {round}")]
    DegenerateWeights {
        /// The round that failed.
        round: usize,
    },

    /// No candidate layer had a finite loss.
    /// Only reported by [`Trainer::run`](crate::Trainer::run).
    #[error("No layer with a finite loss exists at round {round}")]
    NoImprovingLayer {
        /// The round that found nothing.
        round: usize,
    },
}
