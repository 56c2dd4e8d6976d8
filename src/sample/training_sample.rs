use super::Label;


/// A raw sample wrapped with the trainer's bookkeeping.
///
/// `index` is a dense slot over both classes:
/// positives occupy `0..n_positives`,
/// negatives follow at `n_positives..`.
/// The slot addresses the sample's entry in every prediction vector.
#[derive(Debug, Clone)]
pub struct TrainingSample<S> {
    pub(crate) sample: S,
    pub(crate) index: usize,
    pub(crate) label: Label,
    pub(crate) weight: f64,
    pub(crate) confidence: f64,
}


impl<S> TrainingSample<S> {
    pub(crate) fn new(sample: S, index: usize, label: Label, weight: f64)
        -> Self
    {
        Self { sample, index, label, weight, confidence: 0.0, }
    }


    /// The raw sample.
    #[inline(always)]
    pub fn sample(&self) -> &S {
        &self.sample
    }


    /// The sample's slot in prediction vectors.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }


    /// The fixed label.
    #[inline(always)]
    pub fn label(&self) -> Label {
        self.label
    }


    /// Current importance weight.
    #[inline(always)]
    pub fn weight(&self) -> f64 {
        self.weight
    }


    /// Sum of the contributions of every layer trained so far.
    #[inline(always)]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }


    /// `label * confidence`. Positive iff the current ensemble
    /// classifies the sample correctly.
    #[inline(always)]
    pub fn margin(&self) -> f64 {
        self.label.value() * self.confidence
    }
}
