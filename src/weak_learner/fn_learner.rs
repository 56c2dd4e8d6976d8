use crate::WeakLearner;

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;


/// A weak learner assembled from two closures:
/// one that enumerates the configurations for a sample,
/// and one that scores a sample under a configuration.
///
/// # Example
/// ```no_run
/// use layerboost::prelude::*;
///
/// // Thresholds on the sample itself, one configuration per scale.
/// let scaled = FnLearner::new(
///     "scaled",
///     |_: &f64| vec![1_i32, 2, 3],
///     |k: &i32, x: &f64| *k as f64 * x,
/// );
/// assert_eq!(scaled.classify(&2, &0.5), 1.0);
/// ```
pub struct FnLearner<S, C, E, F> {
    name: String,
    enumerate: E,
    score: F,
    _marker: PhantomData<fn(&S) -> C>,
}


impl<S, C, E, F> FnLearner<S, C, E, F>
    where E: Fn(&S) -> Vec<C>,
          F: Fn(&C, &S) -> f64,
{
    /// Construct a new learner named `name`.
    pub fn new(name: impl Into<String>, enumerate: E, score: F) -> Self {
        Self {
            name: name.into(),
            enumerate,
            score,
            _marker: PhantomData,
        }
    }
}


impl<S, C, E, F> fmt::Debug for FnLearner<S, C, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLearner")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}


impl<S, C, E, F> WeakLearner for FnLearner<S, C, E, F>
    where S: Send + Sync,
          C: Clone + Eq + Hash + fmt::Debug + Send + Sync,
          E: Fn(&S) -> Vec<C> + Send + Sync,
          F: Fn(&C, &S) -> f64 + Send + Sync,
{
    type Sample = S;
    type Config = C;


    fn name(&self) -> &str {
        &self.name
    }


    fn configurations(&self, sample: &S) -> Vec<C> {
        (self.enumerate)(sample)
    }


    fn classify(&self, config: &C, sample: &S) -> f64 {
        (self.score)(config, sample)
    }
}
