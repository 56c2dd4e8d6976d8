//! Labeled training samples and the weighted sample set
//! the trainer boosts over.

// Provides the binary label.
pub(crate) mod label;
// Provides the per-sample bookkeeping struct.
pub(crate) mod training_sample;
// Provides the combined positive/negative sample set.
pub(crate) mod sample_set;


pub use label::Label;
pub use training_sample::TrainingSample;
pub(crate) use sample_set::SampleSet;
