use serde::{Serialize, Deserialize};

use crate::WeakLearner;

use std::fmt;
use std::sync::Arc;


/// One trained weak classifier.
///
/// For a sample whose raw output under
/// `(learner, config)` is `o`,
/// the layer contributes `coef_pos` if `o > threshold`,
/// and `coef_neg` otherwise.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize, L::Config: Serialize",
    deserialize = "L: Deserialize<'de>, L::Config: Deserialize<'de>",
))]
pub struct Layer<L: WeakLearner> {
    learner: Arc<L>,
    config: L::Config,
    #[serde(with = "crate::common::serde_float")]
    threshold: f64,
    #[serde(with = "crate::common::serde_float")]
    coef_pos: f64,
    #[serde(with = "crate::common::serde_float")]
    coef_neg: f64,
}


impl<L: WeakLearner> Layer<L> {
    /// Construct a new layer.
    pub fn new(
        learner: Arc<L>,
        config: L::Config,
        threshold: f64,
        coef_pos: f64,
        coef_neg: f64,
    ) -> Self
    {
        Self { learner, config, threshold, coef_pos, coef_neg, }
    }


    /// The weak learner this layer was built from.
    #[inline(always)]
    pub fn learner(&self) -> &Arc<L> {
        &self.learner
    }


    /// The learner's configuration.
    #[inline(always)]
    pub fn config(&self) -> &L::Config {
        &self.config
    }


    /// Outputs strictly above the threshold get `coef_pos`.
    #[inline(always)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }


    /// Contribution for outputs above the threshold.
    #[inline(always)]
    pub fn coef_pos(&self) -> f64 {
        self.coef_pos
    }


    /// Contribution for outputs at or below the threshold.
    #[inline(always)]
    pub fn coef_neg(&self) -> f64 {
        self.coef_neg
    }


    /// The learner's raw output on `sample`.
    #[inline(always)]
    pub fn output(&self, sample: &L::Sample) -> f64 {
        self.learner.classify(&self.config, sample)
    }


    /// Maps a raw output to this layer's contribution.
    #[inline(always)]
    pub fn contribution_of(&self, output: f64) -> f64 {
        if output > self.threshold { self.coef_pos } else { self.coef_neg }
    }


    /// This layer's contribution to the confidence of `sample`.
    #[inline(always)]
    pub fn contribution(&self, sample: &L::Sample) -> f64 {
        self.contribution_of(self.output(sample))
    }
}


impl<L: WeakLearner> Clone for Layer<L> {
    fn clone(&self) -> Self {
        Self {
            learner: Arc::clone(&self.learner),
            config: self.config.clone(),
            threshold: self.threshold,
            coef_pos: self.coef_pos,
            coef_neg: self.coef_neg,
        }
    }
}


impl<L: WeakLearner> fmt::Debug for Layer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("learner", &self.learner.name())
            .field("config", &self.config)
            .field("threshold", &self.threshold)
            .field("coef_pos", &self.coef_pos)
            .field("coef_neg", &self.coef_neg)
            .finish()
    }
}
