//! Skill parameters and the trial geometry derived from them

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::disk::{ContainmentRule, Disk};
use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Inputs describing one Toxic Rain setup against one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicRainParams {
    pub target_hitbox_radius: f64,
    pub base_radius: f64,
    pub arrow_exclusion_radius: f64,
    pub pod_base_radius: f64,
    /// Multiplier applied to the pod radius (1.0 = no increase)
    pub increased_area_of_effect: f64,
    pub projectile_count: u32,
    pub base_radius_inc_per_projectile: f64,
}

impl Default for ToxicRainParams {
    fn default() -> Self {
        Self {
            target_hitbox_radius: TARGET_HITBOX_RADIUS,
            base_radius: TOXIC_RAIN_BASE_RADIUS,
            arrow_exclusion_radius: TOXIC_RAIN_ARROW_EXCLUSION_RADIUS,
            pod_base_radius: TOXIC_RAIN_POD_BASE_RADIUS,
            increased_area_of_effect: INCREASED_AREA_OF_EFFECT,
            projectile_count: PROJECTILE_COUNT,
            base_radius_inc_per_projectile: TOXIC_RAIN_BASE_RADIUS_INC_PER_PROJECTILE,
        }
    }
}

impl ToxicRainParams {
    /// Projectiles beyond the gem's base count
    pub fn additional_projectiles(&self) -> SimResult<u32> {
        self.projectile_count
            .checked_sub(TOXIC_RAIN_GEM_BASE_PROJECTILES)
            .ok_or_else(|| {
                SimError::invalid(format!(
                    "projectile count {} must be at least {}",
                    self.projectile_count, TOXIC_RAIN_GEM_BASE_PROJECTILES
                ))
            })
    }

    /// Radius of the area arrows can land in
    pub fn hitable_area_radius(&self) -> SimResult<f64> {
        let additional = self.additional_projectiles()?;
        Ok(self.base_radius + f64::from(additional) * self.base_radius_inc_per_projectile)
    }

    /// Radius around the target within which a pod hits it
    pub fn hit_radius(&self) -> f64 {
        self.target_hitbox_radius + self.pod_base_radius * self.increased_area_of_effect
    }

    fn validate(&self) -> SimResult<()> {
        let fields = [
            ("target_hitbox_radius", self.target_hitbox_radius),
            ("base_radius", self.base_radius),
            ("arrow_exclusion_radius", self.arrow_exclusion_radius),
            ("pod_base_radius", self.pod_base_radius),
            ("increased_area_of_effect", self.increased_area_of_effect),
            (
                "base_radius_inc_per_projectile",
                self.base_radius_inc_per_projectile,
            ),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Geometry shared read-only by every trial of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfiguration {
    /// Area arrows land in, centered at (R, R)
    pub target_area: Disk,
    /// Pods landing inside this disk hit the target
    pub hit_area: Disk,
    pub exclusion_radius: f64,
    pub projectile_count: u32,
    pub rule: ContainmentRule,
}

impl TrialConfiguration {
    pub fn derive(params: &ToxicRainParams, rule: ContainmentRule) -> SimResult<Self> {
        params.validate()?;
        let radius = params.hitable_area_radius()?;
        let center = DVec2::splat(radius);

        Ok(Self {
            target_area: Disk::new(center, radius, rule),
            hit_area: Disk::new(center, params.hit_radius(), rule),
            exclusion_radius: params.arrow_exclusion_radius,
            projectile_count: params.projectile_count,
            rule,
        })
    }

    /// Radius R of the hitable area; candidates are drawn from [0, 2R)²
    #[inline]
    pub fn hitable_area_radius(&self) -> f64 {
        self.target_area.radius
    }

    /// Exclusion disk around an accepted impact
    #[inline]
    pub fn exclusion_disk(&self, impact: DVec2) -> Disk {
        Disk::new(impact, self.exclusion_radius, self.rule)
    }
}
