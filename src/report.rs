//! Batch statistics
//!
//! The binary prints the bare mean by default; the summary adds spread and
//! range for anyone comparing setups, and serializes to JSON.

use serde::{Deserialize, Serialize};

use crate::batch::ResultCollection;
use crate::error::SimResult;

/// Statistics over the trial results of one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Trials requested and run
    pub trials: usize,
    /// Results that took part in the mean (fewer than `trials` when distinct)
    pub aggregated: usize,
    /// Distinct values among the aggregated results
    pub distinct_outcomes: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Standard error of the mean
    pub std_error: f64,
    pub min: f64,
    pub max: f64,
    /// Base seed; trial `i` used `seed + i`
    pub seed: u64,
    pub collection: ResultCollection,
}

impl BatchSummary {
    /// Summarize aggregated results. `results` must not be empty.
    pub fn from_results(
        trials: usize,
        results: &[f64],
        seed: u64,
        collection: ResultCollection,
    ) -> Self {
        let n = results.len() as f64;
        let mean = results.iter().sum::<f64>() / n;
        let variance = if results.len() > 1 {
            results.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        let min = results.iter().copied().fold(f64::INFINITY, f64::min);
        let max = results.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let distinct_outcomes = ResultCollection::Distinct.collect(results.to_vec()).len();

        Self {
            trials,
            aggregated: results.len(),
            distinct_outcomes,
            mean,
            std_dev,
            std_error: std_dev / n.sqrt(),
            min,
            max,
            seed,
            collection,
        }
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
