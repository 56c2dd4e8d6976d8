//! This directory provides some features for research.
//! Measure the followings of the trainer per round
//! - Running time
//! - Round loss
//! - Exponential loss
//! - Training / test error

/// Defines a logger that runs a trainer with logging.
pub mod logger;

/// Defines loss functions of a trained classifier.
pub mod loss_functions;

pub use logger::{Logger, LoggerError};

pub use loss_functions::{
    exponential_loss,
    training_error,
};
