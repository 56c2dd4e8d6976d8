//! Provides [`Trainer`], the layered boosting loop.
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    Classifier,
    Layer,
    Label,
    TrainError,
    Result,
    TrainingSample,
    WeakLearner,

    common::checker,
    sample::SampleSet,
};
use super::{
    CacheKey,
    PredictionCache,
    Predictions,
    ThresholdSweep,
    TrainerOptions,
    optimizer::{Optimizer, Split},
    search,
};

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};


static NEXT_TRAINER_ID: AtomicUsize = AtomicUsize::new(0);


/// A process-unique identity of a [`Trainer`].
/// Part of every [`CacheKey`] the trainer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainerId(usize);


impl TrainerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TRAINER_ID.fetch_add(1, Ordering::Relaxed))
    }


    /// The raw identifier.
    pub fn get(self) -> usize {
        self.0
    }
}


/// The outcome of one round, passed to the progress callback of
/// [`Trainer::run_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundReport {
    /// The round number, starting at `1`.
    pub round: usize,
    /// The loss of the layer added in this round.
    pub loss: f64,
    /// The number of layers after this round.
    pub n_layers: usize,
    /// Time spent in this round.
    pub elapsed: Duration,
}


/// The best layer of a round and the outputs it was fitted on.
struct Candidate<L: WeakLearner> {
    loss: f64,
    layer: Layer<L>,
    table: Arc<Predictions<L::Config>>,
    config: usize,
}


/// Defines the layered boosting trainer.
///
/// Each call to [`Trainer::add_layer`] runs one boosting round:
///
/// 1. For every learner in the pool, fetch (or compute once)
///    its outputs on every sample under every configuration.
/// 2. For every configuration, sweep the thresholds and fit
///    the two coefficients that minimize the weighted exponential loss.
/// 3. Keep the layer of strictly lowest loss.
///    Ties go to the first configuration of the first learner
///    in the pool's current order.
/// 4. Add the layer's contribution to every sample's confidence,
///    set `weight = exp(-label · confidence)`,
///    and normalize the weights to sum to `1`.
/// 5. Reverse the pool's order for the next round.
///
/// # Example
/// ```no_run
/// use layerboost::prelude::*;
///
/// let positives = vec![vec![1.0, 0.0], vec![2.0, 1.0]];
/// let negatives = vec![vec![-1.0, 0.5], vec![-2.0, 1.0]];
///
/// let mut trainer = Trainer::init([FeatureStump::new()], positives, negatives)
///     .unwrap()
///     .threshold_sweep(ThresholdSweep::AllOutputs)
///     .smoothing(1e-6);
///
/// let f = trainer.run(20).unwrap();
/// assert_eq!(f.predict(&vec![1.5, 0.3]), Label::Positive);
/// ```
pub struct Trainer<L: WeakLearner> {
    id: TrainerId,

    // The pool, in the order of the next round.
    learners: Vec<Arc<L>>,

    // Positive samples first, then negative ones.
    samples: SampleSet<L::Sample>,

    classifier: Classifier<L>,

    cache: Arc<PredictionCache<L::Config>>,

    options: TrainerOptions,

    // Completed calls of `add_layer`.
    rounds: usize,
}


impl<L: WeakLearner> Trainer<L> {
    /// Initialize the `Trainer`.
    ///
    /// Fails if the pool is empty, if two learners share a name,
    /// or if there is no sample at all.
    pub fn init<I>(
        learners: I,
        positives: Vec<L::Sample>,
        negatives: Vec<L::Sample>,
    ) -> Result<Self>
        where I: IntoIterator<Item = L>,
    {
        let learners = learners.into_iter()
            .map(Arc::new)
            .collect::<Vec<_>>();

        if learners.is_empty() {
            return Err(TrainError::EmptyLearnerPool);
        }

        let mut names = HashSet::new();
        for learner in &learners {
            if !names.insert(learner.name()) {
                let name = learner.name().to_string();
                return Err(TrainError::DuplicateLearner { name });
            }
        }

        if positives.is_empty() && negatives.is_empty() {
            return Err(TrainError::EmptySampleSet);
        }

        let samples = SampleSet::new(positives, negatives);

        Ok(Self {
            id: TrainerId::next(),
            learners,
            samples,
            classifier: Classifier::new(),
            cache: Arc::new(PredictionCache::new()),
            options: TrainerOptions::default(),
            rounds: 0,
        })
    }


    /// Set the smoothing added to the weighted sums
    /// of the coefficient formulas. Default is `0.0`.
    pub fn smoothing(mut self, eps: f64) -> Self {
        checker::smoothing(eps);
        self.options.smoothing = eps;
        self
    }


    /// Set the candidate thresholds of the sweep.
    /// Default is [`ThresholdSweep::PositiveOutputs`].
    pub fn threshold_sweep(mut self, sweep: ThresholdSweep) -> Self {
        self.options.threshold_sweep = sweep;
        self
    }


    /// Search the learners of the pool in parallel.
    /// Default is `false`.
    pub fn parallel_learners(mut self, parallel: bool) -> Self {
        self.options.parallel_learners = parallel;
        self
    }


    /// Replace every option at once.
    pub fn options(mut self, options: TrainerOptions) -> Self {
        checker::smoothing(options.smoothing);
        self.options = options;
        self
    }


    /// Use `cache` to memoize predictions,
    /// e.g., a cache shared with other trainers.
    pub fn with_cache(mut self, cache: Arc<PredictionCache<L::Config>>)
        -> Self
    {
        self.cache.evict(self.id);
        self.cache = cache;
        self
    }


    /// The identity of this trainer.
    #[inline]
    pub fn id(&self) -> TrainerId {
        self.id
    }


    /// The current options.
    #[inline]
    pub fn current_options(&self) -> TrainerOptions {
        self.options
    }


    /// The learner pool in the order the next round will search it.
    #[inline]
    pub fn learners(&self) -> &[Arc<L>] {
        &self.learners
    }


    /// The training samples: positives first, then negatives.
    #[inline]
    pub fn samples(&self) -> &[TrainingSample<L::Sample>] {
        self.samples.samples()
    }


    /// A copy of the current weight distribution in index order.
    #[inline]
    pub fn weights(&self) -> Vec<f64> {
        self.samples.weights()
    }


    /// The number of positive samples.
    #[inline]
    pub fn n_positives(&self) -> usize {
        self.samples.n_positives()
    }


    /// The number of negative samples.
    #[inline]
    pub fn n_negatives(&self) -> usize {
        self.samples.n_negatives()
    }


    /// The number of completed rounds.
    /// A round that found no layer still counts.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }


    /// The prediction cache this trainer uses.
    #[inline]
    pub fn cache(&self) -> &Arc<PredictionCache<L::Config>> {
        &self.cache
    }


    /// A snapshot of the classifier trained so far.
    pub fn classifier(&self) -> Classifier<L> {
        self.classifier.clone()
    }


    /// The fraction of training samples
    /// the current classifier misclassifies.
    pub fn training_error(&self) -> f64 {
        let samples = self.samples.samples();
        let n_errors = samples.iter()
            .filter(|s| Label::from_confidence(s.confidence()) != s.label())
            .count();

        n_errors as f64 / self.samples.len() as f64
    }


    /// The empirical exponential loss of the current classifier,
    /// `Σ exp(-label · confidence) / N`.
    pub fn exponential_loss(&self) -> f64 {
        let samples = self.samples.samples();
        let total = samples.iter()
            .map(|s| (-s.margin()).exp())
            .sum::<f64>();

        total / self.samples.len() as f64
    }


    /// Returns the outputs of the pool learner named `name`
    /// on every sample, computing them on first use.
    pub fn predictions(&self, name: &str)
        -> Option<Arc<Predictions<L::Config>>>
    {
        self.learners.iter()
            .find(|learner| learner.name() == name)
            .map(|learner| self.table(learner))
    }


    /// The memoized prediction table of `learner`.
    fn table(&self, learner: &L) -> Arc<Predictions<L::Config>> {
        let key = CacheKey::new(self.id, learner.name());
        self.cache.get_or_populate(key, || {
            debug!(
                trainer = self.id.get(),
                learner = learner.name(),
                "computing predictions",
            );
            Predictions::compute(learner, self.samples.samples())
        })
    }


    /// Finds the best layer `learner` can contribute this round.
    fn search_learner(&self, learner: &Arc<L>, optimizer: &Optimizer<'_>)
        -> Result<Option<Candidate<L>>>
    {
        let table = self.table(learner);

        if table.is_empty() {
            let learner = learner.name().to_string();
            return Err(TrainError::EmptyConfigurationSpace { learner });
        }

        let best = search::best_configuration(&table, optimizer);

        debug!(
            learner = learner.name(),
            configurations = table.len(),
            loss = best.loss,
            "searched learner",
        );

        let candidate = best.found
            .map(|(k, split)| {
                let Split { loss, threshold, coef_pos, coef_neg } = split;
                let layer = Layer::new(
                    Arc::clone(learner),
                    table.configs()[k].clone(),
                    threshold,
                    coef_pos,
                    coef_neg,
                );
                Candidate { loss, layer, table: Arc::clone(&table), config: k }
            });

        Ok(candidate)
    }


    /// Runs one boosting round and returns the loss of the added layer.
    ///
    /// Returns `+∞` without adding a layer
    /// if no candidate has a finite loss.
    ///
    /// # Errors
    /// - [`TrainError::EmptyConfigurationSpace`]
    ///   if a learner offers no configuration.
    /// - [`TrainError::WeightOverflow`]
    ///   if a sample weight overflows after the update.
    /// - [`TrainError::DegenerateWeights`]
    ///   if the weights can no longer be normalized.
    ///
    /// On error the samples, the classifier, the round count,
    /// and the pool order are left unchanged.
    pub fn add_layer(&mut self) -> Result<f64> {
        let round = self.rounds + 1;

        // The search phase only reads the weights.
        let weights = self.samples.weights();
        let optimizer = Optimizer::new(
            &weights,
            self.samples.n_positives(),
            self.options.threshold_sweep,
            self.options.smoothing,
        );

        let candidates = if self.options.parallel_learners {
            self.learners.par_iter()
                .map(|learner| self.search_learner(learner, &optimizer))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.learners.iter()
                .map(|learner| self.search_learner(learner, &optimizer))
                .collect::<Result<Vec<_>>>()?
        };

        // Merge in pool order; only a strictly lower loss replaces the best.
        let mut best_loss = f64::INFINITY;
        let mut best = None;
        for candidate in candidates.into_iter().flatten() {
            if candidate.loss < best_loss {
                best_loss = candidate.loss;
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => self.append(candidate, round)?,
            None => {
                warn!(
                    trainer = self.id.get(),
                    round,
                    "no layer with a finite loss",
                );
            },
        }

        self.learners.reverse();
        self.rounds = round;
        Ok(best_loss)
    }


    /// Updates the samples with the chosen layer and appends it.
    fn append(&mut self, candidate: Candidate<L>, round: usize) -> Result<()> {
        let Candidate { loss, layer, table, config } = candidate;

        let update = self.samples.reweight(
            table.outputs(config),
            layer.threshold(),
            layer.coef_pos(),
            layer.coef_neg(),
        );

        let max_weight = update.max_weight();
        if max_weight.is_infinite() {
            return Err(TrainError::WeightOverflow { round });
        }
        if !(max_weight > 0.0) || update.has_nan() {
            return Err(TrainError::DegenerateWeights { round });
        }

        self.samples.commit(update);

        #[cfg(debug_assertions)]
        checker::distribution(&self.samples.weights());

        info!(
            trainer = self.id.get(),
            round,
            loss,
            learner = layer.learner().name(),
            config = ?layer.config(),
            threshold = layer.threshold(),
            coef_pos = layer.coef_pos(),
            coef_neg = layer.coef_neg(),
            "added layer",
        );

        self.classifier.push(layer);
        Ok(())
    }


    /// Runs up to `max_rounds` rounds and returns the classifier.
    ///
    /// Stops early once a round reaches zero loss.
    ///
    /// # Errors
    /// Any error of [`Trainer::add_layer`], and
    /// [`TrainError::NoImprovingLayer`] if a round finds no layer.
    pub fn run(&mut self, max_rounds: usize) -> Result<Classifier<L>> {
        let cancel = AtomicBool::new(false);
        self.run_with(max_rounds, &cancel, |_| {})
    }


    /// Same as [`Trainer::run`], with a cancellation flag
    /// checked before every round and a callback invoked after every round.
    ///
    /// Setting `cancel` stops training after the round in progress;
    /// the classifier trained so far is returned.
    pub fn run_with<P>(
        &mut self,
        max_rounds: usize,
        cancel: &AtomicBool,
        mut progress: P,
    ) -> Result<Classifier<L>>
        where P: FnMut(&RoundReport),
    {
        let flow = (0..max_rounds).try_for_each(|_| {
            if cancel.load(Ordering::Relaxed) {
                info!(trainer = self.id.get(), round = self.rounds, "cancelled");
                return ControlFlow::Break(Ok(()));
            }

            let now = Instant::now();
            let loss = match self.add_layer() {
                Ok(loss) => loss,
                Err(e) => return ControlFlow::Break(Err(e)),
            };

            let report = RoundReport {
                round: self.rounds,
                loss,
                n_layers: self.classifier.len(),
                elapsed: now.elapsed(),
            };
            progress(&report);

            if !loss.is_finite() {
                let round = self.rounds;
                return ControlFlow::Break(Err(
                    TrainError::NoImprovingLayer { round }
                ));
            }

            if loss == 0.0 {
                return ControlFlow::Break(Ok(()));
            }

            ControlFlow::Continue(())
        });

        if let ControlFlow::Break(Err(e)) = flow {
            return Err(e);
        }

        Ok(self.classifier())
    }
}


impl<L: WeakLearner> Drop for Trainer<L> {
    fn drop(&mut self) {
        self.cache.evict(self.id);
    }
}
