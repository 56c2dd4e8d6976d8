//! The trained hypotheses: a single [`Layer`]
//! and the additive [`Classifier`] built from layers.

pub(crate) mod layer;
pub(crate) mod classifier;


pub use layer::Layer;
pub use classifier::Classifier;
