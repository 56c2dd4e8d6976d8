use crate::common::utils;
use super::{Label, TrainingSample};


/// The positive and negative training samples, stored in index order.
#[derive(Debug, Clone)]
pub(crate) struct SampleSet<S> {
    samples: Vec<TrainingSample<S>>,
    n_positives: usize,
}


/// Confidences and weights after adding one layer,
/// computed but not yet written back to the sample set.
#[derive(Debug, Clone)]
pub(crate) struct Reweighted {
    confidences: Vec<f64>,
    weights: Vec<f64>,
    max_weight: f64,
    has_nan: bool,
}


impl Reweighted {
    /// The largest weight, ignoring NaN.
    #[inline(always)]
    pub(crate) fn max_weight(&self) -> f64 {
        self.max_weight
    }


    /// Whether any weight is NaN.
    #[inline(always)]
    pub(crate) fn has_nan(&self) -> bool {
        self.has_nan
    }
}


impl<S> SampleSet<S> {
    /// Wraps the samples with uniform weights `1 / N`.
    pub(crate) fn new(positives: Vec<S>, negatives: Vec<S>) -> Self {
        let n_positives = positives.len();
        let n_sample = n_positives + negatives.len();
        let uni = 1.0 / n_sample as f64;

        let positives = positives.into_iter()
            .enumerate()
            .map(|(i, s)| TrainingSample::new(s, i, Label::Positive, uni));
        let negatives = negatives.into_iter()
            .enumerate()
            .map(|(i, s)| {
                TrainingSample::new(s, n_positives + i, Label::Negative, uni)
            });

        let samples = positives.chain(negatives).collect::<Vec<_>>();

        Self { samples, n_positives }
    }


    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }


    #[inline(always)]
    pub(crate) fn n_positives(&self) -> usize {
        self.n_positives
    }


    #[inline(always)]
    pub(crate) fn n_negatives(&self) -> usize {
        self.samples.len() - self.n_positives
    }


    #[inline(always)]
    pub(crate) fn samples(&self) -> &[TrainingSample<S>] {
        &self.samples
    }


    #[cfg(test)]
    pub(crate) fn samples_mut(&mut self) -> &mut [TrainingSample<S>] {
        &mut self.samples
    }


    /// A copy of the current weights in index order.
    pub(crate) fn weights(&self) -> Vec<f64> {
        self.samples.iter()
            .map(|s| s.weight)
            .collect()
    }


    /// Adds a layer's contribution to every confidence and
    /// recomputes `weight = exp(-confidence * label)`.
    ///
    /// `outputs[i]` is the layer's raw output on the sample at index `i`.
    pub(crate) fn reweight(
        &self,
        outputs: &[f64],
        threshold: f64,
        coef_pos: f64,
        coef_neg: f64,
    ) -> Reweighted
    {
        assert_eq!(outputs.len(), self.samples.len());

        let n_sample = self.samples.len();
        let mut confidences = Vec::with_capacity(n_sample);
        let mut weights = Vec::with_capacity(n_sample);
        let mut max_weight = 0.0_f64;
        let mut has_nan = false;

        for (s, &o) in self.samples.iter().zip(outputs) {
            let coef = if o > threshold { coef_pos } else { coef_neg };
            let confidence = s.confidence + coef;
            let weight = (-confidence * s.label.value()).exp();

            has_nan |= weight.is_nan();
            max_weight = max_weight.max(weight);

            confidences.push(confidence);
            weights.push(weight);
        }

        Reweighted { confidences, weights, max_weight, has_nan, }
    }


    /// Writes the update back, normalizing the weights to sum to `1`.
    /// The caller guarantees `0 < max_weight < ∞` and no NaN weight.
    pub(crate) fn commit(&mut self, update: Reweighted) {
        let Reweighted { confidences, mut weights, max_weight, .. } = update;

        utils::normalize_by_max(&mut weights, max_weight);

        self.samples.iter_mut()
            .zip(confidences.into_iter().zip(weights))
            .for_each(|(s, (c, w))| {
                s.confidence = c;
                s.weight = w;
            });
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        let set = SampleSet::new(vec!['a', 'b'], vec!['c', 'd', 'e']);

        assert_eq!(set.len(), 5);
        assert_eq!(set.n_positives(), 2);
        assert_eq!(set.n_negatives(), 3);

        let indices = set.samples()
            .iter()
            .map(|s| s.index())
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);

        assert_eq!(set.samples()[1].label(), Label::Positive);
        assert_eq!(set.samples()[2].label(), Label::Negative);
        assert_eq!(*set.samples()[2].sample(), 'c');
    }

    #[test]
    fn initial_weights_are_uniform() {
        let set = SampleSet::new(vec![(); 3], vec![(); 1]);
        assert!(set.weights().iter().all(|&w| w == 0.25));
        assert!(set.samples().iter().all(|s| s.confidence() == 0.0));
    }

    #[test]
    fn reweight_then_commit() {
        let mut set = SampleSet::new(vec![(); 2], vec![(); 2]);
        let outputs = [1.0, -1.0, -1.0, 1.0];

        let update = set.reweight(&outputs, 0.0, 0.5, -0.5);
        assert!((update.max_weight() - 0.5_f64.exp()).abs() < 1e-12);
        assert!(!update.has_nan());

        // Nothing changes until the update is committed.
        assert!(set.samples().iter().all(|s| s.confidence() == 0.0));

        set.commit(update);

        let conf = set.samples()
            .iter()
            .map(|s| s.confidence())
            .collect::<Vec<_>>();
        assert_eq!(conf, vec![0.5, -0.5, -0.5, 0.5]);

        let sum = set.weights().iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12);

        // Correctly classified samples lose weight.
        let w = set.weights();
        assert!(w[0] < w[1]);
        assert!(w[2] < w[3]);
        assert!((w[0] - w[2]).abs() < 1e-15);
    }
}
