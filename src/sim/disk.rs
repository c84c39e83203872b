//! Disk geometry for impact placement
//!
//! Everything lives in the first quadrant: the hitable area is centered at
//! (R, R) so candidates can be drawn from the square [0, 2R)².

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How a disk decides whether it contains a point.
///
/// `SquaredDistance` compares the squared distance against the plain radius,
/// which behaves like a disk of radius `sqrt(radius)`. It is the default so
/// existing hit-rate numbers reproduce; `Euclidean` is the geometric disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentRule {
    /// `distance² < radius`
    #[default]
    SquaredDistance,
    /// `distance² < radius²`
    Euclidean,
}

impl ContainmentRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainmentRule::SquaredDistance => "squared_distance",
            ContainmentRule::Euclidean => "euclidean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "squared_distance" | "squared" | "legacy" => Some(ContainmentRule::SquaredDistance),
            "euclidean" | "corrected" => Some(ContainmentRule::Euclidean),
            _ => None,
        }
    }

    /// Value the squared distance is compared against
    #[inline]
    fn threshold(&self, radius: f64) -> f64 {
        match self {
            ContainmentRule::SquaredDistance => radius,
            ContainmentRule::Euclidean => radius * radius,
        }
    }
}

/// A disk: center plus radius, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub center: DVec2,
    pub radius: f64,
    pub rule: ContainmentRule,
}

impl Disk {
    pub fn new(center: DVec2, radius: f64, rule: ContainmentRule) -> Self {
        Self {
            center,
            radius,
            rule,
        }
    }

    /// Strict containment; points on the boundary are outside
    #[inline]
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) < self.rule.threshold(self.radius)
    }
}

/// True if any disk in `disks` contains `point`
#[inline]
pub fn any_contains(disks: &[Disk], point: DVec2) -> bool {
    disks.iter().any(|d| d.contains_point(point))
}
