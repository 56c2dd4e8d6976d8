//! Exports the trainer, the weak learners, and the traits.
//! 
pub use crate::trainer::{
    Trainer,
    TrainerOptions,
    ThresholdSweep,
    RoundReport,

    PredictionCache,
    Predictions,
};


pub use crate::weak_learner::{
    // Weak learner trait
    WeakLearner,


    // Learners
    FeatureStump,
    FnLearner,
};


pub use crate::hypothesis::{
    Layer,
    Classifier,
};


pub use crate::sample::Label;


pub use crate::error::{TrainError, Result};


pub use crate::research::{
    Logger,
    exponential_loss,
    training_error,
};
