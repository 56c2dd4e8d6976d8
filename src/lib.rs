#![warn(missing_docs)]

//!
//! A crate that trains layered boosting classifiers.
//!
//! The trainer in this crate builds an additive ensemble,
//! one **layer** per boosting round.
//! Each round searches a pool of weak learners,
//! every configuration each learner offers,
//! and every threshold on the configuration's outputs,
//! for the combination that minimizes the weighted exponential loss
//! over a fixed set of positive and negative samples.
//!
//! A layer contributes `coef_pos` to a sample's confidence
//! if the learner's raw output exceeds the layer's threshold,
//! and `coef_neg` otherwise.
//! The resulting [`Classifier`] sums these contributions.
//!
//! # Example
//! ```no_run
//! use layerboost::prelude::*;
//!
//! let positives = vec![vec![1.0, 0.3], vec![2.0, 0.1]];
//! let negatives = vec![vec![-1.0, 0.2], vec![-2.0, 0.4]];
//!
//! let mut trainer = Trainer::init([FeatureStump::new()], positives, negatives)
//!     .unwrap()
//!     .smoothing(1e-6);
//!
//! for _ in 0..10 {
//!     let loss = trainer.add_layer().unwrap();
//!     println!("loss: {loss}");
//! }
//!
//! let f = trainer.classifier();
//! let score = f.classify(&vec![1.5, 0.2]);
//! assert!(score > 0.0);
//! ```

pub mod common;
pub mod error;
pub mod sample;
pub mod weak_learner;
pub mod hypothesis;
pub mod trainer;
pub mod research;
pub mod prelude;


pub use error::{TrainError, Result};

pub use sample::{
    Label,
    TrainingSample,
};

pub use weak_learner::{
    WeakLearner,
    FeatureStump,
    FnLearner,
};

pub use hypothesis::{
    Layer,
    Classifier,
};

pub use trainer::{
    Trainer,
    TrainerId,
    TrainerOptions,
    ThresholdSweep,
    RoundReport,
    PredictionCache,
    Predictions,
};
