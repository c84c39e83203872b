//! Toxic Rain - Monte Carlo hit-rate estimator for arrow pods
//!
//! Core modules:
//! - `sim`: Single-trial geometry (disks, rejection sampling, hit counting)
//! - `batch`: Parallel repeated-trial runner with pluggable aggregation
//! - `report`: Batch statistics and JSON output
//! - `settings`: Run settings and environment overrides

pub mod batch;
pub mod error;
pub mod report;
pub mod settings;
pub mod sim;

pub use batch::{BatchRunner, CancelToken, ResultCollection, mean};
pub use error::{SimError, SimResult};
pub use report::BatchSummary;
pub use settings::{OutputFormat, SimulationSettings};
pub use sim::{ContainmentRule, HitRateSimulation, ToxicRainParams, TrialEngine};

/// Reference run constants
pub mod consts {
    /// Radius of the target's own hitbox
    pub const TARGET_HITBOX_RADIUS: f64 = 1.0;
    /// Radius of the area arrows can land in, before extra projectiles
    pub const TOXIC_RAIN_BASE_RADIUS: f64 = 8.0;
    /// No other arrow lands within this radius of an impact
    pub const TOXIC_RAIN_ARROW_EXCLUSION_RADIUS: f64 = 4.0;
    /// Radius of the damaging pod spawned at each impact
    pub const TOXIC_RAIN_POD_BASE_RADIUS: f64 = 4.0;
    /// Area of effect multiplier applied to the pod radius
    pub const INCREASED_AREA_OF_EFFECT: f64 = 1.0;
    /// Arrows fired per use
    pub const PROJECTILE_COUNT: u32 = 5;
    /// Hitable radius growth per projectile above the base count
    pub const TOXIC_RAIN_BASE_RADIUS_INC_PER_PROJECTILE: f64 = 1.0;

    /// Projectiles from the bow plus the gem's own arrows; the hitable
    /// radius only grows past this count
    pub const TOXIC_RAIN_GEM_BASE_PROJECTILES: u32 = 5;

    /// Trials in the reference batch
    pub const DEFAULT_TRIALS: usize = 100_000;
    /// Worker threads in the reference batch
    pub const DEFAULT_WORKERS: usize = 10;
}
