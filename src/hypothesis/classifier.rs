use serde::{Serialize, Deserialize};
use rayon::prelude::*;

use crate::{Label, WeakLearner};
use super::Layer;

use std::fmt;


/// A struct that the trainer in this library returns.
/// The confidence of a sample is the sum of the contributions
/// of every layer, in training order.
/// You can read/write this struct by `serde` trait.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize, L::Config: Serialize",
    deserialize = "L: Deserialize<'de>, L::Config: Deserialize<'de>",
))]
pub struct Classifier<L: WeakLearner> {
    layers: Vec<Layer<L>>,
}


impl<L: WeakLearner> Classifier<L> {
    /// Construct an empty classifier.
    /// An empty classifier scores every sample `0.0`.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }


    /// Construct a classifier from layers.
    pub fn from_layers(layers: Vec<Layer<L>>) -> Self {
        Self { layers }
    }


    /// Append a layer.
    #[inline]
    pub(crate) fn push(&mut self, layer: Layer<L>) {
        self.layers.push(layer);
    }


    /// The layers in training order.
    #[inline]
    pub fn layers(&self) -> &[Layer<L>] {
        &self.layers
    }


    /// The number of layers.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }


    /// Whether no layer has been trained yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }


    /// Returns a copy made of the first `n_layers` layers.
    pub fn truncated(&self, n_layers: usize) -> Self {
        let n_layers = n_layers.min(self.layers.len());
        Self::from_layers(self.layers[..n_layers].to_vec())
    }


    /// Decompose the classifier into its layers.
    #[inline]
    pub fn into_layers(self) -> Vec<Layer<L>> {
        self.layers
    }


    /// Computes the confidence of `sample`.
    pub fn classify(&self, sample: &L::Sample) -> f64 {
        self.layers.iter()
            .map(|layer| layer.contribution(sample))
            .sum::<f64>()
    }


    /// Predicts the label of `sample`.
    /// A confidence of `0.0` is predicted as positive.
    pub fn predict(&self, sample: &L::Sample) -> Label {
        Label::from_confidence(self.classify(sample))
    }


    /// Computes the confidence of every sample in `samples`.
    pub fn classify_all(&self, samples: &[L::Sample]) -> Vec<f64> {
        samples.par_iter()
            .map(|sample| self.classify(sample))
            .collect()
    }


    /// Predicts the labels of `samples`.
    pub fn predict_all(&self, samples: &[L::Sample]) -> Vec<Label> {
        samples.par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }
}


impl<L: WeakLearner> Default for Classifier<L> {
    fn default() -> Self {
        Self::new()
    }
}


impl<L: WeakLearner> Clone for Classifier<L> {
    fn clone(&self) -> Self {
        Self { layers: self.layers.clone() }
    }
}


impl<L: WeakLearner> fmt::Debug for Classifier<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("layers", &self.layers)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureStump;
    use std::sync::Arc;

    fn two_layers() -> Classifier<FeatureStump<Vec<f64>>> {
        let stump = Arc::new(FeatureStump::new());
        Classifier::from_layers(vec![
            Layer::new(Arc::clone(&stump), 0, 0.0, 1.0, -1.0),
            Layer::new(stump, 1, 5.0, 0.5, -0.25),
        ])
    }

    #[test]
    fn empty_classifier_scores_zero() {
        let f = Classifier::<FeatureStump<Vec<f64>>>::new();
        assert!(f.is_empty());
        assert_eq!(f.classify(&vec![1.0, 2.0]), 0.0);
        assert_eq!(f.predict(&vec![1.0, 2.0]), Label::Positive);
    }

    #[test]
    fn classify_sums_layer_contributions() {
        let f = two_layers();
        assert_eq!(f.classify(&vec![1.0, 6.0]), 1.5);
        assert_eq!(f.classify(&vec![-1.0, 0.0]), -1.25);
        assert_eq!(f.predict(&vec![-1.0, 0.0]), Label::Negative);
    }

    #[test]
    fn classify_all_keeps_order() {
        let f = two_layers();
        let samples = vec![vec![1.0, 6.0], vec![-1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(f.classify_all(&samples), vec![1.5, -1.25, 0.75]);
    }

    #[test]
    fn truncated_is_a_prefix() {
        let f = two_layers();
        let g = f.truncated(1);
        assert_eq!(g.len(), 1);
        assert_eq!(g.classify(&vec![1.0, 6.0]), 1.0);
        assert_eq!(f.truncated(10).len(), 2);
    }

    #[test]
    fn serializes_to_json() {
        let f = two_layers();
        let json = serde_json::to_string(&f).unwrap();
        let g: Classifier<FeatureStump<Vec<f64>>> = serde_json::from_str(&json)
            .unwrap();
        assert_eq!(g.classify(&vec![1.0, 6.0]), f.classify(&vec![1.0, 6.0]));
    }
}
