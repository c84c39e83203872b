//! Toxic Rain volley simulation
//!
//! Trial logic is pure and deterministic for a given RNG:
//! - Immutable geometry shared across trials
//! - One seeded RNG per trial
//! - No shared mutable state

pub mod disk;
pub mod hit_rate;
pub mod params;
pub mod trial;

pub use disk::{ContainmentRule, Disk, any_contains};
pub use hit_rate::HitRateSimulation;
pub use params::{ToxicRainParams, TrialConfiguration};
pub use trial::{TrialEngine, trial_rng};
