//! Run settings
//!
//! Defaults reproduce the reference run. Overrides come from `TOXIC_RAIN_*`
//! environment variables; there is no settings file.

use serde::{Deserialize, Serialize};

use crate::batch::ResultCollection;
use crate::consts::{DEFAULT_TRIALS, DEFAULT_WORKERS};
use crate::error::{SimError, SimResult};
use crate::sim::ContainmentRule;

/// What the binary prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The mean alone
    #[default]
    Plain,
    /// Full batch summary as JSON
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Some(OutputFormat::Plain),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of volleys to simulate
    pub trials: usize,
    /// Worker threads, independent of `trials`
    pub workers: usize,
    /// Base seed; drawn at random when unset
    pub seed: Option<u64>,
    pub collection: ResultCollection,
    pub containment: ContainmentRule,
    /// Rejected candidates allowed per projectile; unset means no limit
    pub max_attempts: Option<u64>,
    pub format: OutputFormat,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            workers: DEFAULT_WORKERS,
            seed: None,
            collection: ResultCollection::default(),
            containment: ContainmentRule::default(),
            max_attempts: None,
            format: OutputFormat::default(),
        }
    }
}

impl SimulationSettings {
    pub const TRIALS_VAR: &'static str = "TOXIC_RAIN_TRIALS";
    pub const WORKERS_VAR: &'static str = "TOXIC_RAIN_WORKERS";
    pub const SEED_VAR: &'static str = "TOXIC_RAIN_SEED";
    pub const COLLECTION_VAR: &'static str = "TOXIC_RAIN_COLLECTION";
    pub const CONTAINMENT_VAR: &'static str = "TOXIC_RAIN_CONTAINMENT";
    pub const MAX_ATTEMPTS_VAR: &'static str = "TOXIC_RAIN_MAX_ATTEMPTS";
    pub const FORMAT_VAR: &'static str = "TOXIC_RAIN_FORMAT";

    /// Defaults overridden by the process environment
    pub fn from_env() -> SimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(v) = get(Self::TRIALS_VAR) {
            settings.trials = parse_number(Self::TRIALS_VAR, &v)?;
        }
        if let Some(v) = get(Self::WORKERS_VAR) {
            settings.workers = parse_number(Self::WORKERS_VAR, &v)?;
        }
        if let Some(v) = get(Self::SEED_VAR) {
            settings.seed = Some(parse_number(Self::SEED_VAR, &v)?);
        }
        if let Some(v) = get(Self::COLLECTION_VAR) {
            settings.collection = ResultCollection::from_str(v.trim())
                .ok_or_else(|| unknown_value(Self::COLLECTION_VAR, &v))?;
        }
        if let Some(v) = get(Self::CONTAINMENT_VAR) {
            settings.containment = ContainmentRule::from_str(v.trim())
                .ok_or_else(|| unknown_value(Self::CONTAINMENT_VAR, &v))?;
        }
        if let Some(v) = get(Self::MAX_ATTEMPTS_VAR) {
            settings.max_attempts = Some(parse_number(Self::MAX_ATTEMPTS_VAR, &v)?);
        }
        if let Some(v) = get(Self::FORMAT_VAR) {
            settings.format = OutputFormat::from_str(v.trim())
                .ok_or_else(|| unknown_value(Self::FORMAT_VAR, &v))?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings no batch can run with
    pub fn validate(&self) -> SimResult<()> {
        if self.trials == 0 {
            return Err(SimError::invalid("trial count must be at least 1"));
        }
        if self.workers == 0 {
            return Err(SimError::invalid("worker count must be at least 1"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> SimResult<T> {
    // allow 100_000 style separators
    let cleaned: String = value.trim().chars().filter(|c| *c != '_').collect();
    cleaned
        .parse()
        .map_err(|_| SimError::invalid(format!("{key}: expected a non-negative integer, got {value:?}")))
}

fn unknown_value(key: &str, value: &str) -> SimError {
    SimError::invalid(format!("{key}: unknown value {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_reference_run() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.trials, 100_000);
        assert_eq!(settings.workers, 10);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.collection, ResultCollection::Multiset);
        assert_eq!(settings.containment, ContainmentRule::SquaredDistance);
        assert_eq!(settings.max_attempts, None);
        assert_eq!(settings.format, OutputFormat::Plain);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let settings = SimulationSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, SimulationSettings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = SimulationSettings::from_lookup(lookup(&[
            ("TOXIC_RAIN_TRIALS", "2_000"),
            ("TOXIC_RAIN_WORKERS", "4"),
            ("TOXIC_RAIN_SEED", "12345"),
            ("TOXIC_RAIN_COLLECTION", "distinct"),
            ("TOXIC_RAIN_CONTAINMENT", "Euclidean"),
            ("TOXIC_RAIN_MAX_ATTEMPTS", "1000000"),
            ("TOXIC_RAIN_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(settings.trials, 2_000);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.seed, Some(12345));
        assert_eq!(settings.collection, ResultCollection::Distinct);
        assert_eq!(settings.containment, ContainmentRule::Euclidean);
        assert_eq!(settings.max_attempts, Some(1_000_000));
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_blank_values_ignored() {
        let settings =
            SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_SEED", "  ")])).unwrap();
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_TRIALS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("TOXIC_RAIN_TRIALS"));

        let err = SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_WORKERS", "-2")]))
            .unwrap_err();
        assert!(err.to_string().contains("TOXIC_RAIN_WORKERS"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_FORMAT", "xml")]))
            .unwrap_err();
        assert!(err.to_string().contains("TOXIC_RAIN_FORMAT"));
    }

    #[test]
    fn test_zero_trials_or_workers_rejected() {
        assert!(SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_TRIALS", "0")])).is_err());
        assert!(SimulationSettings::from_lookup(lookup(&[("TOXIC_RAIN_WORKERS", "0")])).is_err());
    }

    #[test]
    fn test_settings_serialize() {
        let json = serde_json::to_string(&SimulationSettings::default()).unwrap();
        assert!(json.contains("\"containment\":\"squared_distance\""));
        assert!(json.contains("\"collection\":\"multiset\""));
    }
}
