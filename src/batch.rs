//! Parallel repeated-trial runner
//!
//! Runs a trial closure `n` times on a fixed-size worker pool, waits for every
//! trial to finish, then hands the collected results to an aggregation
//! closure. The runner knows nothing about the trials it runs.

use std::collections::HashSet;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_WORKERS;
use crate::error::{SimError, SimResult, TrialCause};

/// How trial results are gathered before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCollection {
    /// Every trial result is aggregated
    #[default]
    Multiset,
    /// Bit-identical results collapse to a single entry (set semantics).
    /// Kept for comparison with older published numbers; it skews the mean
    /// toward rare outcomes.
    Distinct,
}

impl ResultCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCollection::Multiset => "multiset",
            ResultCollection::Distinct => "distinct",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "multiset" | "all" => Some(ResultCollection::Multiset),
            "distinct" | "set" => Some(ResultCollection::Distinct),
            _ => None,
        }
    }

    /// Apply this collection mode to trial results, in trial order
    pub fn collect(&self, results: Vec<f64>) -> Vec<f64> {
        self.collect_by(results, |r| float_key(*r))
    }

    /// Apply this collection mode to results of any type. Under `Distinct`
    /// two results are the same when `key` maps them to equal values; the
    /// first occurrence is kept.
    pub fn collect_by<T, K, F>(&self, mut results: Vec<T>, key: F) -> Vec<T>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        if *self == ResultCollection::Distinct {
            let mut seen = HashSet::with_capacity(results.len());
            results.retain(|r| seen.insert(key(r)));
        }
        results
    }
}

/// Bit pattern of `value`, with every NaN mapped to one key
fn float_key(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Shared flag that stops trials which have not started yet
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to a single scheduled trial
enum Outcome<T> {
    Ran(T),
    Skipped,
    Failed(SimError),
}

/// Runs batches of independent trials on a bounded rayon pool
#[derive(Debug, Clone)]
pub struct BatchRunner {
    workers: usize,
    cancel: Option<CancelToken>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl BatchRunner {
    /// Create a runner with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `n` trials that cannot fail and aggregate their results.
    ///
    /// Still returns a `Result`: a panicking trial, a cancellation or a pool
    /// that cannot be built all fail the batch.
    pub fn run_batch<T, R, F, A>(&self, n: usize, trial: F, aggregate: A) -> SimResult<R>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
        A: FnOnce(Vec<T>) -> R,
    {
        self.try_run_batch(
            n,
            |i| Ok::<T, std::convert::Infallible>(trial(i)),
            aggregate,
        )
    }

    /// Run `n` trials and aggregate their results.
    ///
    /// `trial` receives the trial index (0-based). All trials finish before
    /// `aggregate` is called with every result in trial-index order. If any
    /// trial fails, the first recorded failure in trial order is returned and
    /// no aggregate is produced. Trials that have not started when a failure
    /// or cancellation is observed are skipped.
    ///
    /// Results are never filtered here; apply a [`ResultCollection`] inside
    /// `aggregate` when set semantics are wanted.
    pub fn try_run_batch<T, E, R, F, A>(&self, n: usize, trial: F, aggregate: A) -> SimResult<R>
    where
        T: Send,
        E: Into<TrialCause>,
        F: Fn(usize) -> Result<T, E> + Sync,
        A: FnOnce(Vec<T>) -> R,
    {
        if n == 0 {
            return Err(SimError::EmptyBatch);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("trial-worker-{i}"))
            .build()?;

        log::info!("Running {} trials on {} workers", n, self.workers);

        let abort = AtomicBool::new(false);
        let outcomes: Vec<Outcome<T>> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| self.run_one(i, &trial, &abort))
                .collect()
        });

        let mut results = Vec::with_capacity(n);
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                Outcome::Ran(value) => results.push(value),
                Outcome::Skipped => skipped += 1,
                Outcome::Failed(err) => {
                    log::error!("Batch aborted: {err}");
                    return Err(err);
                }
            }
        }

        if skipped > 0 {
            log::warn!("Batch cancelled, {skipped} of {n} trials skipped");
            return Err(SimError::Cancelled {
                completed: n - skipped,
                requested: n,
            });
        }

        log::debug!("Aggregating {} trial results", results.len());
        Ok(aggregate(results))
    }

    fn run_one<T, E, F>(&self, index: usize, trial: &F, abort: &AtomicBool) -> Outcome<T>
    where
        E: Into<TrialCause>,
        F: Fn(usize) -> Result<T, E> + Sync,
    {
        let cancelled = self.cancel.as_ref().is_some_and(CancelToken::is_cancelled);
        if cancelled || abort.load(Ordering::Relaxed) {
            return Outcome::Skipped;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| trial(index))) {
            Ok(Ok(value)) => Outcome::Ran(value),
            Ok(Err(err)) => {
                abort.store(true, Ordering::Relaxed);
                Outcome::Failed(SimError::TrialFailed {
                    trial: index,
                    source: err.into(),
                })
            }
            Err(payload) => {
                abort.store(true, Ordering::Relaxed);
                Outcome::Failed(SimError::TrialPanicked {
                    trial: index,
                    message: panic_message(payload.as_ref()),
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Arithmetic mean, usable directly as an aggregation closure
pub fn mean(results: Vec<f64>) -> f64 {
    results.iter().sum::<f64>() / results.len() as f64
}
