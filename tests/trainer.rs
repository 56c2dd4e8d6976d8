use layerboost::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};


fn one_config(_: &f64) -> Vec<usize> {
    vec![0]
}


fn identity(_: &usize, x: &f64) -> f64 {
    *x
}


fn gaussian_samples(seed: u64, n: usize, n_features: usize)
    -> (Vec<Vec<f64>>, Vec<Vec<f64>>)
{
    let mut rng = StdRng::seed_from_u64(seed);
    let pos = Normal::new(0.5, 1.0).unwrap();
    let neg = Normal::new(-0.5, 1.0).unwrap();

    let positives = (0..n)
        .map(|_| (0..n_features).map(|_| pos.sample(&mut rng)).collect())
        .collect();
    let negatives = (0..n)
        .map(|_| (0..n_features).map(|_| neg.sample(&mut rng)).collect())
        .collect();

    (positives, negatives)
}


/// Tests for `Trainer`.
#[cfg(test)]
pub mod trainer_tests {
    use super::*;

    #[test]
    fn separable_exact() {
        let learner = FnLearner::new("identity", one_config, identity);
        let mut trainer = Trainer::init(
            [learner], vec![1.0, 2.0], vec![-1.0, -2.0]
        ).unwrap();

        assert_eq!(trainer.exponential_loss(), 1.0);
        let loss = trainer.add_layer().unwrap();
        assert!(loss < 1.0);

        let f = trainer.classifier();
        assert_eq!(f.len(), 1);
        let layer = &f.layers()[0];
        assert_eq!(layer.threshold(), 1.0);
        assert!(layer.coef_neg().is_finite());

        // Every negative ends up below zero.
        assert!(f.classify(&-1.0) < 0.0);
        assert!(f.classify(&-2.0) < 0.0);
        assert!(f.classify(&2.0) > 0.0);

        let total = trainer.weights().iter().sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn separable_smoothed() {
        let learner = FnLearner::new("identity", one_config, identity);
        let mut trainer = Trainer::init(
            [learner], vec![1.0, 2.0], vec![-1.0, -2.0]
        ).unwrap()
            .threshold_sweep(ThresholdSweep::AllOutputs)
            .smoothing(1e-6);

        let loss = trainer.add_layer().unwrap();
        assert!(loss < 1.0);

        let f = trainer.classifier();
        let layer = &f.layers()[0];
        assert!(layer.coef_pos().is_finite());
        assert!(layer.coef_neg().is_finite());
        assert_eq!(trainer.training_error(), 0.0);

        for x in [1.0, 2.0] {
            assert_eq!(f.predict(&x), Label::Positive);
        }
        for x in [-1.0, -2.0] {
            assert_eq!(f.predict(&x), Label::Negative);
        }
    }

    #[test]
    fn constant_outputs() {
        let learner = FnLearner::new(
            "constant",
            |_: &f64| vec![0_usize, 1, 2],
            |_: &usize, _: &f64| 0.0,
        );
        let mut trainer = Trainer::init(
            [learner], vec![1.0, 2.0], vec![-1.0, -2.0]
        ).unwrap();

        let loss = trainer.add_layer().unwrap();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);

        let weights = trainer.weights();
        assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_stay_a_distribution() {
        let (positives, negatives) = gaussian_samples(1234, 40, 4);
        let mut trainer = Trainer::init(
            [FeatureStump::new()], positives, negatives
        ).unwrap()
            .threshold_sweep(ThresholdSweep::AllOutputs)
            .smoothing(1e-3);

        for _ in 0..25 {
            let loss = trainer.add_layer().unwrap();
            assert!(loss <= 1.0 + 1e-9, "round loss {loss} exceeds 1");

            let weights = trainer.weights();
            assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
            let total = weights.iter().sum::<f64>();
            assert!((total - 1.0).abs() < 1e-9);
        }

        assert_eq!(trainer.rounds(), 25);
        assert_eq!(trainer.classifier().len(), 25);
        assert!(trainer.exponential_loss() < 1.0);
    }

    #[test]
    fn default_options_keep_weights_a_distribution() {
        for seed in 0..5 {
            let (positives, negatives) = gaussian_samples(seed, 40, 4);
            let mut trainer = Trainer::init(
                [FeatureStump::new()], positives, negatives
            ).unwrap();

            for round in 1..=30 {
                let loss = trainer.add_layer().unwrap_or_else(|e| {
                    panic!("seed {seed}, round {round}: {e}")
                });
                assert!(!loss.is_nan(), "seed {seed}, round {round}");

                let weights = trainer.weights();
                assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
                let total = weights.iter().sum::<f64>();
                assert!((total - 1.0).abs() < 1e-9);

                assert!(trainer.samples().iter().all(|s| !s.confidence().is_nan()));
            }

            let f = trainer.classifier();
            for layer in f.layers() {
                assert!(!layer.coef_pos().is_nan());
                assert!(!layer.coef_neg().is_nan());
            }
            assert!(trainer.exponential_loss() < 1.0);
        }
    }

    #[test]
    fn exact_classifier_survives_json() {
        let mut trainer = Trainer::init(
            [FeatureStump::new()],
            vec![vec![1.0], vec![2.0]],
            vec![vec![-1.0], vec![-2.0]],
        ).unwrap();
        trainer.add_layer().unwrap();

        let f = trainer.classifier();
        assert_eq!(f.layers()[0].coef_pos(), f64::INFINITY);

        let json = serde_json::to_string(&f).unwrap();
        let restored: Classifier<FeatureStump<Vec<f64>>> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        let (a, b) = (&f.layers()[0], &restored.layers()[0]);
        assert_eq!(a.threshold(), b.threshold());
        assert_eq!(a.coef_pos(), b.coef_pos());
        assert_eq!(a.coef_neg(), b.coef_neg());

        for x in [vec![2.0], vec![1.0], vec![-1.5]] {
            assert_eq!(restored.classify(&x), f.classify(&x));
        }
        assert_eq!(restored.classify(&vec![2.0]), f64::INFINITY);
    }

    #[test]
    fn predictions_are_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let learner = FnLearner::new(
            "counting",
            |_: &f64| vec![0_usize, 1],
            move |k: &usize, x: &f64| {
                counter.fetch_add(1, Ordering::SeqCst);
                if *k == 0 { *x } else { -*x }
            },
        );
        let mut trainer = Trainer::init(
            [learner], vec![1.0, 2.0, -0.5], vec![-1.0, 0.5]
        ).unwrap()
            .smoothing(1e-6);

        trainer.add_layer().unwrap();
        // 5 samples, 2 configurations each.
        assert_eq!(calls.load(Ordering::SeqCst), 10);

        for _ in 0..4 {
            trainer.add_layer().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 10);

        let table = trainer.predictions("counting").unwrap();
        assert_eq!(table.configs(), &[0, 1]);
        assert_eq!(table.get(&1).unwrap(), &[-1.0, -2.0, 0.5, 1.0, -0.5]);
        assert!(trainer.predictions("missing").is_none());
    }

    #[test]
    fn ties_go_to_the_first_learner_and_the_pool_reverses() {
        let a = FnLearner::new("a", one_config, identity);
        let b = FnLearner::new("b", one_config, identity);
        let mut trainer = Trainer::init(
            [a, b], vec![1.0, 2.0], vec![-1.0, -2.0]
        ).unwrap();

        trainer.add_layer().unwrap();
        let names = trainer.learners()
            .iter()
            .map(|l| l.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["b", "a"]);

        trainer.add_layer().unwrap();
        let f = trainer.classifier();
        assert_eq!(f.layers()[0].learner().name(), "a");
        assert_eq!(f.layers()[1].learner().name(), "b");
    }

    #[test]
    fn parallel_learners_match_sequential() {
        let (positives, negatives) = gaussian_samples(99, 30, 6);
        let pool = || {
            vec![
                FeatureStump::new().with_name("left").features(vec![0, 1, 2]),
                FeatureStump::new().with_name("right").features(vec![3, 4, 5]),
            ]
        };

        let mut sequential = Trainer::init(
            pool(), positives.clone(), negatives.clone()
        ).unwrap()
            .smoothing(1e-4);
        let mut parallel = Trainer::init(pool(), positives, negatives)
            .unwrap()
            .smoothing(1e-4)
            .parallel_learners(true);

        for _ in 0..8 {
            let a = sequential.add_layer().unwrap();
            let b = parallel.add_layer().unwrap();
            assert_eq!(a, b);
        }

        let f = sequential.classifier();
        let g = parallel.classifier();
        for (x, y) in f.layers().iter().zip(g.layers()) {
            assert_eq!(x.learner().name(), y.learner().name());
            assert_eq!(x.config(), y.config());
            assert_eq!(x.threshold(), y.threshold());
        }
    }

    #[test]
    fn run_stops_when_cancelled() {
        let (positives, negatives) = gaussian_samples(7, 20, 3);
        let mut trainer = Trainer::init(
            [FeatureStump::new()], positives, negatives
        ).unwrap()
            .smoothing(1e-3);

        let cancel = AtomicBool::new(false);
        let mut reports = Vec::new();
        let f = trainer.run_with(50, &cancel, |report| {
            reports.push(*report);
            if report.round == 2 {
                cancel.store(true, Ordering::Relaxed);
            }
        }).unwrap();

        assert_eq!(f.len(), 2);
        assert_eq!(trainer.rounds(), 2);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].n_layers, 2);
    }

    #[test]
    fn run_reports_single_class() {
        let learner = FnLearner::new("identity", one_config, identity);
        let mut trainer = Trainer::init([learner], vec![1.0, 2.0], vec![])
            .unwrap();

        let err = trainer.run(10).unwrap_err();
        assert_eq!(err, TrainError::NoImprovingLayer { round: 1 });
    }

    #[test]
    fn empty_configuration_space() {
        let learner = FnLearner::new(
            "silent",
            |_: &f64| Vec::<usize>::new(),
            identity,
        );
        let mut trainer = Trainer::init([learner], vec![1.0], vec![-1.0])
            .unwrap();

        let err = trainer.add_layer().unwrap_err();
        let learner = "silent".to_string();
        assert_eq!(err, TrainError::EmptyConfigurationSpace { learner });
        assert!(trainer.classifier().is_empty());
    }

    #[test]
    fn snapshots_are_copies() {
        let (positives, negatives) = gaussian_samples(3, 15, 2);
        let mut trainer = Trainer::init(
            [FeatureStump::new()], positives, negatives
        ).unwrap()
            .smoothing(1e-3);

        trainer.add_layer().unwrap();
        let snapshot = trainer.classifier();
        trainer.add_layer().unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(trainer.classifier().len(), 2);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Classifier<FeatureStump<Vec<f64>>> =
            serde_json::from_str(&json).unwrap();
        let x = vec![0.3, -0.2];
        assert_eq!(restored.classify(&x), snapshot.classify(&x));
    }

    #[test]
    fn heterogeneous_pool() {
        type Boxed = Box<dyn WeakLearner<Sample = Vec<f64>, Config = usize>>;

        let norm = FnLearner::new(
            "norm",
            |_: &Vec<f64>| vec![1_usize, 2],
            |p: &usize, x: &Vec<f64>| {
                x.iter().map(|v| v.abs().powi(*p as i32)).sum::<f64>()
            },
        );
        let pool: Vec<Boxed> = vec![Box::new(FeatureStump::new()), Box::new(norm)];

        let (positives, negatives) = gaussian_samples(11, 20, 2);
        let mut trainer = Trainer::init(pool, positives, negatives)
            .unwrap()
            .smoothing(1e-3);

        let f = trainer.run(10).unwrap();
        assert_eq!(f.len(), 10);
        assert!(trainer.predictions("FeatureStump").is_some());
        assert!(trainer.predictions("norm").is_some());
    }

    #[test]
    fn shared_cache_keeps_trainers_apart() {
        let cache = Arc::new(PredictionCache::new());
        let (positives, negatives) = gaussian_samples(5, 10, 2);

        let mut first = Trainer::init(
            [FeatureStump::new()], positives.clone(), negatives.clone()
        ).unwrap()
            .with_cache(Arc::clone(&cache));
        let mut second = Trainer::init(
            [FeatureStump::new()], negatives, positives
        ).unwrap()
            .with_cache(Arc::clone(&cache));

        first.add_layer().unwrap();
        second.add_layer().unwrap();
        assert_eq!(cache.len(), 2);

        let a = first.predictions("FeatureStump").unwrap();
        let b = second.predictions("FeatureStump").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        drop(first);
        assert_eq!(cache.len(), 1);
    }
}
