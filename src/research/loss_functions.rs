use rayon::prelude::*;

use crate::{Classifier, Label, WeakLearner};


/// The empirical exponential loss of `f`,
/// `Σ exp(-label · f(x)) / N` over both classes.
/// Returns `0.0` if there is no sample.
pub fn exponential_loss<L>(
    f: &Classifier<L>,
    positives: &[L::Sample],
    negatives: &[L::Sample],
) -> f64
    where L: WeakLearner,
{
    let n_sample = positives.len() + negatives.len();
    if n_sample == 0 { return 0.0; }

    let pos = positives.par_iter()
        .map(|x| (-f.classify(x)).exp())
        .sum::<f64>();
    let neg = negatives.par_iter()
        .map(|x| f.classify(x).exp())
        .sum::<f64>();

    (pos + neg) / n_sample as f64
}


/// The fraction of samples `f` misclassifies.
/// A confidence of `0.0` counts as positive.
/// Returns `0.0` if there is no sample.
pub fn training_error<L>(
    f: &Classifier<L>,
    positives: &[L::Sample],
    negatives: &[L::Sample],
) -> f64
    where L: WeakLearner,
{
    let n_sample = positives.len() + negatives.len();
    if n_sample == 0 { return 0.0; }

    let pos = positives.par_iter()
        .filter(|x| f.predict(x) != Label::Positive)
        .count();
    let neg = negatives.par_iter()
        .filter(|x| f.predict(x) != Label::Negative)
        .count();

    (pos + neg) as f64 / n_sample as f64
}
