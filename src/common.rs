//! Defines some common functions used in this library.

/// Defines numeric helpers such as weight normalization.
pub(crate) mod utils;

/// Defines some checker functions.
pub(crate) mod checker;

/// Defines the constants shared by the trainer.
pub mod constants;

/// Serializes `f64` fields that may be infinite.
pub(crate) mod serde_float;
