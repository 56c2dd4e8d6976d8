use serde::{Serialize, Deserialize};

use crate::WeakLearner;

use std::marker::PhantomData;


/// A feature-selection weak learner over `f64` feature vectors.
///
/// Each configuration is a feature index,
/// and the raw output of a sample is the value of that feature.
/// Combined with the trainer's threshold search,
/// every layer built from this learner is a decision stump.
///
/// Samples may have different lengths;
/// a feature is offered for every sample that carries it.
///
/// # Example
/// ```no_run
/// use layerboost::prelude::*;
///
/// let stump = FeatureStump::<Vec<f64>>::new()
///     .features(vec![0, 2]);
/// assert_eq!(stump.configurations(&vec![0.1, 0.2, 0.3]), vec![0, 2]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct FeatureStump<S> {
    name: String,
    features: Option<Vec<usize>>,
    #[serde(skip)]
    _sample: PhantomData<fn(&S)>,
}


impl<S> FeatureStump<S> {
    /// Construct a learner that offers every feature.
    pub fn new() -> Self {
        Self {
            name: "FeatureStump".to_string(),
            features: None,
            _sample: PhantomData,
        }
    }


    /// Set the name of this learner.
    /// Names must be unique within a learner pool.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }


    /// Restrict the configurations to the given feature indices.
    pub fn features(mut self, features: Vec<usize>) -> Self {
        self.features = Some(features);
        self
    }
}


impl<S> Default for FeatureStump<S> {
    fn default() -> Self {
        Self::new()
    }
}


impl<S> WeakLearner for FeatureStump<S>
    where S: AsRef<[f64]> + Send + Sync,
{
    type Sample = S;
    type Config = usize;


    fn name(&self) -> &str {
        &self.name
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let features = match &self.features {
            Some(features) => format!("{}", features.len()),
            None => "all".to_string(),
        };
        Some(vec![("# of features", features)])
    }


    fn configurations(&self, sample: &S) -> Vec<usize> {
        let n_feature = sample.as_ref().len();
        match &self.features {
            Some(features) => features.iter()
                .copied()
                .filter(|&j| j < n_feature)
                .collect(),
            None => (0..n_feature).collect(),
        }
    }


    fn classify(&self, config: &usize, sample: &S) -> f64 {
        sample.as_ref()
            .get(*config)
            .copied()
            .unwrap_or(0.0)
    }
}
