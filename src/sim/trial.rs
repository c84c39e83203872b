//! Single Toxic Rain volley
//!
//! Arrows land one after another at uniformly random spots of the hitable
//! area. No arrow may land inside the exclusion radius of an earlier one, so
//! candidates are redrawn until a free spot turns up. The volley's score is
//! the number of pods close enough to the target to hit it.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::disk::{ContainmentRule, Disk, any_contains};
use super::params::{ToxicRainParams, TrialConfiguration};
use crate::error::{SimError, SimResult};

/// Per-trial RNG: trial `index` of a batch seeded with `base_seed`
pub fn trial_rng(base_seed: u64, index: usize) -> Pcg32 {
    Pcg32::seed_from_u64(base_seed.wrapping_add(index as u64))
}

/// Runs volleys against a fixed configuration.
///
/// The engine is immutable once built and can be shared across threads; each
/// trial brings its own RNG and keeps its impacts to itself.
///
/// # Liveness
///
/// When the exclusion radius is large compared to the hitable area, a volley
/// can reach a state where no free spot is left. Without `max_attempts` the
/// rejection loop then never returns.
#[derive(Debug, Clone)]
pub struct TrialEngine {
    config: TrialConfiguration,
    max_attempts: Option<u64>,
}

impl TrialEngine {
    /// Build an engine, validating `params` up front
    pub fn new(params: &ToxicRainParams, rule: ContainmentRule) -> SimResult<Self> {
        let config = TrialConfiguration::derive(params, rule)?;
        log::debug!(
            "Trial geometry: hitable radius {}, hit radius {}, exclusion radius {}, {} projectiles ({})",
            config.target_area.radius,
            config.hit_area.radius,
            config.exclusion_radius,
            config.projectile_count,
            rule.as_str()
        );
        Ok(Self {
            config,
            max_attempts: None,
        })
    }

    /// Give up on a projectile after `max_attempts` rejected candidates
    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn config(&self) -> &TrialConfiguration {
        &self.config
    }

    /// Fire one volley and count the pods that hit the target
    pub fn run_trial<R: Rng>(&self, rng: &mut R) -> SimResult<f64> {
        let impacts = self.place_impacts(rng)?;
        let hits = impacts
            .iter()
            .filter(|pod| self.config.hit_area.contains_point(pod.center))
            .count();
        Ok(hits as f64)
    }

    /// Place every projectile of a volley, returning its exclusion disks
    pub fn place_impacts<R: Rng>(&self, rng: &mut R) -> SimResult<Vec<Disk>> {
        let wanted = self.config.projectile_count;
        let mut impacts: Vec<Disk> = Vec::with_capacity(wanted as usize);

        for placed in 0..wanted {
            let impact = self.next_free_spot(rng, &impacts).ok_or_else(|| {
                let attempts = self.max_attempts.unwrap_or_default();
                log::warn!("Gave up placing projectile {placed} after {attempts} attempts");
                SimError::AttemptsExhausted {
                    attempts,
                    placed,
                    wanted,
                }
            })?;
            impacts.push(self.config.exclusion_disk(impact));
        }

        Ok(impacts)
    }

    /// Rejection-sample a spot inside the hitable area and outside every
    /// earlier exclusion disk. `None` only when the attempt cap is hit.
    fn next_free_spot<R: Rng>(&self, rng: &mut R, impacts: &[Disk]) -> Option<DVec2> {
        let mut attempts: u64 = 0;
        loop {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return None;
            }
            attempts += 1;

            let candidate = self.random_candidate(rng);
            if !any_contains(impacts, candidate) && self.config.target_area.contains_point(candidate)
            {
                return Some(candidate);
            }
        }
    }

    /// Uniform point in the bounding square [0, 2R)²
    #[inline]
    fn random_candidate<R: Rng>(&self, rng: &mut R) -> DVec2 {
        let side = self.config.hitable_area_radius() * 2.0;
        DVec2::new(rng.random::<f64>() * side, rng.random::<f64>() * side)
    }
}
