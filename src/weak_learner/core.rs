use std::fmt;
use std::hash::Hash;


/// The trait [`WeakLearner`] defines the contract a weak learner
/// must satisfy to take part in training.
///
/// A weak learner is a family of simple classifiers.
/// Each member of the family is picked by a [`WeakLearner::Config`],
/// and scores a sample with a raw `f64` output.
/// The trainer turns a configuration into a layer by choosing
/// a threshold on that output and one coefficient per side.
///
/// # Required Methods
/// - [`WeakLearner::name`]
/// - [`WeakLearner::configurations`]
/// - [`WeakLearner::classify`]
/// - [`WeakLearner::info`] ... optional.
///
/// A heterogeneous pool can be built from
/// `Box<dyn WeakLearner<Sample = S, Config = C>>`,
/// or from an `enum` that implements this trait.
pub trait WeakLearner: Send + Sync {
    /// The sample type this learner scores.
    type Sample: Send + Sync;

    /// A parameter setting of this learner.
    /// Configurations key the prediction cache,
    /// so two equal configurations must score every sample identically.
    type Config: Clone + Eq + Hash + fmt::Debug + Send + Sync;


    /// Returns a name that identifies this learner within a pool.
    fn name(&self) -> &str;


    /// Returns the information of this learner as `(key, value)` pairs.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Enumerates the configurations available for `sample`.
    /// The space may depend on the sample,
    /// e.g., the number of features it carries.
    fn configurations(&self, sample: &Self::Sample) -> Vec<Self::Config>;


    /// Scores `sample` under `config`.
    fn classify(&self, config: &Self::Config, sample: &Self::Sample) -> f64;
}


impl<L> WeakLearner for Box<L>
    where L: WeakLearner + ?Sized,
{
    type Sample = L::Sample;
    type Config = L::Config;


    fn name(&self) -> &str {
        (**self).name()
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        (**self).info()
    }


    fn configurations(&self, sample: &Self::Sample) -> Vec<Self::Config> {
        (**self).configurations(sample)
    }


    fn classify(&self, config: &Self::Config, sample: &Self::Sample) -> f64 {
        (**self).classify(config, sample)
    }
}
