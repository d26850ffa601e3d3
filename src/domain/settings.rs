#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::domain::dome::validate_radius;
use crate::sphere_vertex_count;
use crate::{DomeError, DomeResult};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Random bumps pushed up from the dome floor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct FloorPunches {
    #[default(5)]
    pub count: usize,

    #[default(10.0)]
    pub height: f64,

    #[default(10.0)]
    pub radius: f64,

    pub seed: u64,
}

/// Rectangular patch of the floor raised or lowered by a fixed amount.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct FloorBasin {
    /// `[min_x, min_y, max_x, max_y]`, exclusive bounds.
    #[default([-1.0, -1.0, 1.0, 1.0])]
    pub region: [f64; 4],

    pub height: f64,
}

impl FloorBasin {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let [min_x, min_y, max_x, max_y] = self.region;

        min_x < x && x < max_x && min_y < y && y < max_y
    }
}

/// Everything needed to build a dome rig.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct DomeSettings {
    #[default(100.0)]
    pub radius: f64,

    #[default(128)]
    pub segments: u32,

    #[default(64)]
    pub rings: u32,

    #[default(50.0)]
    pub emission_strength: f64,

    pub floor_punches: Option<FloorPunches>,

    pub floor_basin: Option<FloorBasin>,
}

impl DomeSettings {
    /// Parses settings from JSON, filling in defaults for missing keys.
    pub fn from_json(json: &str) -> DomeResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> DomeResult<()> {
        validate_radius(self.radius)?;

        if self.segments < 3 {
            return Err(DomeError::settings(format!(
                "dome needs at least 3 segments, got {}",
                self.segments
            )));
        }

        if self.rings < 3 {
            return Err(DomeError::settings(format!(
                "dome needs at least 3 rings, got {}",
                self.rings
            )));
        }

        if sphere_vertex_count(self.segments, self.rings).is_none() {
            return Err(DomeError::settings(format!(
                "{} segments and {} rings give more vertices than a mesh can index",
                self.segments, self.rings
            )));
        }

        if !(self.emission_strength >= 0.0) {
            return Err(DomeError::settings(format!(
                "emission strength must be non-negative, got {}",
                self.emission_strength
            )));
        }

        if let Some(punches) = &self.floor_punches {
            if !(punches.radius >= 0.0) || !punches.height.is_finite() {
                return Err(DomeError::settings(format!(
                    "invalid floor punches {:?}",
                    punches
                )));
            }
        }

        if let Some(basin) = &self.floor_basin {
            let [min_x, min_y, max_x, max_y] = basin.region;

            if min_x > max_x || min_y > max_y || !basin.height.is_finite() {
                return Err(DomeError::settings(format!(
                    "invalid floor basin {:?}",
                    basin
                )));
            }
        }

        Ok(())
    }
}
