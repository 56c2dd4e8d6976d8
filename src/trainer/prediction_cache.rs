//! The memoized outputs of every learner on the training samples,
//! shared between trainers and keyed by trainer and learner.
use rayon::prelude::*;

use crate::{TrainingSample, WeakLearner};
use super::TrainerId;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};


/// Identifies one memoized prediction table:
/// the trainer that owns the sample set, and the learner's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    trainer: TrainerId,
    learner: String,
}


impl CacheKey {
    /// Construct a new key.
    pub fn new(trainer: TrainerId, learner: impl Into<String>) -> Self {
        Self { trainer, learner: learner.into() }
    }


    /// The trainer part of the key.
    pub fn trainer(&self) -> TrainerId {
        self.trainer
    }


    /// The learner part of the key.
    pub fn learner(&self) -> &str {
        &self.learner
    }
}


/// The raw outputs of one learner on a fixed sample set,
/// one vector per configuration.
///
/// Configurations keep the order in which they were first yielded:
/// samples are visited in index order,
/// and each sample's configurations in the learner's order.
#[derive(Debug, Clone)]
pub struct Predictions<C> {
    configs: Vec<C>,
    outputs: Vec<Vec<f64>>,
    index: HashMap<C, usize>,
}


impl<C> Predictions<C>
    where C: Clone + Eq + Hash + Send + Sync,
{
    /// Scores every sample under every configuration
    /// the learner offers for that sample.
    ///
    /// A configuration only receives outputs from the samples
    /// whose enumeration yielded it. The other entries stay `0.0`.
    pub(crate) fn compute<L>(
        learner: &L,
        samples: &[TrainingSample<L::Sample>],
    ) -> Self
        where L: WeakLearner<Config = C>,
    {
        let n_sample = samples.len();

        let scored = samples.par_iter()
            .map(|s| {
                learner.configurations(&s.sample)
                    .into_iter()
                    .map(|config| {
                        let output = learner.classify(&config, &s.sample);
                        (config, output)
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();


        let mut configs = Vec::new();
        let mut outputs: Vec<Vec<f64>> = Vec::new();
        let mut index = HashMap::new();

        for (s, scores) in samples.iter().zip(scored) {
            for (config, output) in scores {
                let k = match index.get(&config) {
                    Some(&k) => k,
                    None => {
                        let k = configs.len();
                        index.insert(config.clone(), k);
                        configs.push(config);
                        outputs.push(vec![0.0; n_sample]);
                        k
                    },
                };
                outputs[k][s.index] = output;
            }
        }

        Self { configs, outputs, index }
    }


    /// The number of configurations.
    #[inline]
    pub fn len(&self) -> usize {
        self.configs.len()
    }


    /// Whether the learner offered no configuration at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }


    /// The configurations in iteration order.
    #[inline]
    pub fn configs(&self) -> &[C] {
        &self.configs
    }


    /// The output vector of the `k`-th configuration.
    #[inline]
    pub fn outputs(&self, k: usize) -> &[f64] {
        &self.outputs[k]
    }


    /// The output vector of `config`, if the learner offered it.
    pub fn get(&self, config: &C) -> Option<&[f64]> {
        self.index.get(config)
            .map(|&k| &self.outputs[k][..])
    }


    /// Iterates `(configuration, outputs)` pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&C, &[f64])> {
        self.configs.iter()
            .zip(self.outputs.iter().map(|o| &o[..]))
    }


    /// Parallel iterator over `(k, outputs)` pairs.
    pub(crate) fn par_outputs(&self)
        -> impl IndexedParallelIterator<Item = (usize, &Vec<f64>)>
    {
        self.outputs.par_iter().enumerate()
    }
}


type Slot<C> = Arc<OnceLock<Arc<Predictions<C>>>>;


/// Memoizes [`Predictions`] per [`CacheKey`].
///
/// A trainer owns one by default.
/// One cache can also be shared by several trainers;
/// the trainer part of the key keeps their tables apart.
///
/// Each key is populated at most once.
/// Concurrent requests for the same key wait for the first one,
/// while distinct keys populate independently.
pub struct PredictionCache<C> {
    slots: Mutex<HashMap<CacheKey, Slot<C>>>,
}


impl<C> PredictionCache<C> {
    /// Construct an empty cache.
    pub fn new() -> Self {
        Self { slots: Mutex::new(HashMap::new()) }
    }


    /// Returns the table for `key`,
    /// calling `populate` only if no table exists yet.
    pub fn get_or_populate<F>(&self, key: CacheKey, populate: F)
        -> Arc<Predictions<C>>
        where F: FnOnce() -> Predictions<C>,
    {
        let slot = {
            let mut slots = self.slots.lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        // The map lock is released here,
        // so other keys can populate while this one computes.
        let table = slot.get_or_init(|| Arc::new(populate()));
        Arc::clone(table)
    }


    /// Returns the table for `key` if it has been populated.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Predictions<C>>> {
        let slots = self.slots.lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots.get(key)
            .and_then(|slot| slot.get())
            .map(Arc::clone)
    }


    /// The number of populated tables.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots.values()
            .filter(|slot| slot.get().is_some())
            .count()
    }


    /// Whether no table has been populated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Drops every table of `trainer`.
    pub fn evict(&self, trainer: TrainerId) {
        let mut slots = self.slots.lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots.retain(|key, _| key.trainer != trainer);
    }
}


impl<C> Default for PredictionCache<C> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleSet;
    use crate::FnLearner;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn configurations_keep_first_seen_order() {
        let set = SampleSet::new(vec![1_usize, 3], vec![2]);
        // Sample `n` offers configurations `0..n`, in reverse.
        let learner = FnLearner::new(
            "range",
            |n: &usize| (0..*n).rev().collect::<Vec<usize>>(),
            |k: &usize, n: &usize| (*k * 10 + *n) as f64,
        );

        let table = Predictions::compute(&learner, set.samples());

        assert_eq!(table.configs(), &[0, 2, 1]);
        // Configuration `2` is only offered by sample `3` (index 1).
        assert_eq!(table.get(&2).unwrap(), &[0.0, 23.0, 0.0]);
        assert_eq!(table.get(&0).unwrap(), &[1.0, 3.0, 2.0]);
        assert_eq!(table.get(&1).unwrap(), &[0.0, 13.0, 12.0]);
        assert!(table.get(&7).is_none());
    }

    #[test]
    fn populates_each_key_once() {
        let cache = PredictionCache::<usize>::new();
        let calls = AtomicUsize::new(0);
        let set = SampleSet::new(vec![0.5_f64], vec![-0.5]);
        let learner = FnLearner::new(
            "id",
            |_: &f64| vec![0_usize],
            |_: &usize, x: &f64| *x,
        );
        let key = CacheKey::new(TrainerId::next(), "id");

        let populate = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Predictions::compute(&learner, set.samples())
        };

        let first = cache.get_or_populate(key.clone(), populate);
        let second = cache.get_or_populate(key.clone(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Predictions::compute(&learner, set.samples())
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn trainers_do_not_share_tables() {
        let cache = PredictionCache::<usize>::new();
        let a = CacheKey::new(TrainerId::next(), "same-learner");
        let b = CacheKey::new(TrainerId::next(), "same-learner");

        let empty = || Predictions {
            configs: Vec::new(),
            outputs: Vec::new(),
            index: HashMap::new(),
        };
        let ta = cache.get_or_populate(a.clone(), empty);
        let tb = cache.get_or_populate(b.clone(), empty);

        assert!(!Arc::ptr_eq(&ta, &tb));
        assert_eq!(cache.len(), 2);

        cache.evict(a.trainer());
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
    }
}
