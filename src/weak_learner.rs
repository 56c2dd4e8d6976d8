//! The files in `weak_learner/` directory defines
//! `WeakLearner` trait and weak learners.

/// Provides WeakLearner trait.
pub mod core;

/// Defines a feature-selection learner.
pub mod feature_stump;

/// Defines a learner built from closures.
pub mod fn_learner;


pub use self::core::WeakLearner;
pub use self::feature_stump::FeatureStump;
pub use self::fn_learner::FnLearner;
