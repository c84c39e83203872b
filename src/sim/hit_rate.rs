//! Hit-rate estimate: many volleys, one number

use rand::Rng;

use super::params::ToxicRainParams;
use super::trial::{TrialEngine, trial_rng};
use crate::batch::{BatchRunner, ResultCollection, mean};
use crate::error::SimResult;
use crate::report::BatchSummary;
use crate::settings::SimulationSettings;

/// A trial engine paired with the runner and seed that drive it
#[derive(Debug, Clone)]
pub struct HitRateSimulation {
    engine: TrialEngine,
    runner: BatchRunner,
    collection: ResultCollection,
    seed: u64,
}

impl HitRateSimulation {
    /// Validate `params` and set up the engine and runner described by
    /// `settings`. Without a configured seed one is drawn and logged so the
    /// run can be replayed.
    pub fn new(params: &ToxicRainParams, settings: &SimulationSettings) -> SimResult<Self> {
        let engine = TrialEngine::new(params, settings.containment)?
            .with_max_attempts(settings.max_attempts);
        let runner = BatchRunner::new(settings.workers);
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!(
            "Simulation initialized with seed: {} ({} workers, {} results)",
            seed,
            runner.workers(),
            settings.collection.as_str()
        );

        Ok(Self::from_parts(engine, runner, settings.collection, seed))
    }

    pub fn from_parts(
        engine: TrialEngine,
        runner: BatchRunner,
        collection: ResultCollection,
        seed: u64,
    ) -> Self {
        Self {
            engine,
            runner,
            collection,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Trial `index` of any batch run by this simulation
    pub fn trial(&self, index: usize) -> SimResult<f64> {
        self.engine.run_trial(&mut trial_rng(self.seed, index))
    }

    /// Mean number of pods hitting the target over `trials` volleys
    pub fn estimate(&self, trials: usize) -> SimResult<f64> {
        self.runner.try_run_batch(
            trials,
            |i| self.trial(i),
            |results| mean(self.collection.collect(results)),
        )
    }

    /// Like [`HitRateSimulation::estimate`], with spread and range
    pub fn summarize(&self, trials: usize) -> SimResult<BatchSummary> {
        self.runner.try_run_batch(
            trials,
            |i| self.trial(i),
            |results| {
                let results = self.collection.collect(results);
                BatchSummary::from_results(trials, &results, self.seed, self.collection)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::ContainmentRule;

    #[test]
    fn test_estimate_matches_summary_mean() {
        let settings = SimulationSettings {
            seed: Some(21),
            workers: 4,
            ..SimulationSettings::default()
        };
        let sim = HitRateSimulation::new(&ToxicRainParams::default(), &settings).unwrap();

        let mean = sim.estimate(3_000).unwrap();
        let summary = sim.summarize(3_000).unwrap();
        assert_eq!(mean.to_bits(), summary.mean.to_bits());
        assert_eq!(summary.trials, 3_000);
        assert_eq!(summary.seed, 21);
    }

    #[test]
    fn test_trial_is_reproducible() {
        let settings = SimulationSettings {
            seed: Some(8),
            ..SimulationSettings::default()
        };
        let sim = HitRateSimulation::new(&ToxicRainParams::default(), &settings).unwrap();
        for i in 0..20 {
            assert_eq!(sim.trial(i).unwrap(), sim.trial(i).unwrap());
        }
    }

    #[test]
    fn test_unseeded_simulation_draws_seed() {
        let sim =
            HitRateSimulation::new(&ToxicRainParams::default(), &SimulationSettings::default())
                .unwrap();
        let replay = HitRateSimulation::new(
            &ToxicRainParams::default(),
            &SimulationSettings {
                seed: Some(sim.seed()),
                ..SimulationSettings::default()
            },
        )
        .unwrap();
        assert_eq!(sim.estimate(500).unwrap(), replay.estimate(500).unwrap());
    }

    #[test]
    fn test_invalid_params_fail_before_running() {
        let params = ToxicRainParams {
            projectile_count: 3,
            ..ToxicRainParams::default()
        };
        let err = HitRateSimulation::new(&params, &SimulationSettings::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_exhausted_attempts_fail_batch() {
        let params = ToxicRainParams {
            arrow_exclusion_radius: 1000.0,
            ..ToxicRainParams::default()
        };
        let settings = SimulationSettings {
            seed: Some(1),
            containment: ContainmentRule::Euclidean,
            max_attempts: Some(1_000),
            ..SimulationSettings::default()
        };
        let sim = HitRateSimulation::new(&params, &settings).unwrap();

        let err = sim.estimate(50).unwrap_err();
        match err {
            SimError::TrialFailed { source, .. } => {
                let cause = source.downcast_ref::<SimError>().expect("SimError cause");
                assert!(matches!(cause, SimError::AttemptsExhausted { placed: 1, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_distinct_summary_counts_outcomes() {
        let settings = SimulationSettings {
            seed: Some(4),
            collection: ResultCollection::Distinct,
            ..SimulationSettings::default()
        };
        let sim = HitRateSimulation::new(&ToxicRainParams::default(), &settings).unwrap();
        let summary = sim.summarize(2_000).unwrap();
        assert_eq!(summary.collection, ResultCollection::Distinct);
        assert_eq!(summary.aggregated, summary.distinct_outcomes);
        assert!(summary.aggregated <= 6);
    }
}
