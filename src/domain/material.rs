use crate::DomeGeometry;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Shading parameters of the dome surface.
///
/// The environment image is fed into both an emission and a diffuse term,
/// mixed by `mix_factor`. Without an image the surface falls back to a flat
/// color.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct DomeMaterial {
    #[default(50.0)]
    pub emission_strength: f64,

    #[default(0.5)]
    pub mix_factor: f64,

    #[default([0.0; 3])]
    pub mapping_offset: [f64; 3],

    #[default([0.2, 0.2, 0.8, 1.0])]
    pub fallback_color: [f32; 4],

    pub has_environment: bool,
}

impl DomeMaterial {
    pub fn for_dome(dome: &DomeGeometry, emission_strength: f64, has_environment: bool) -> Self {
        Self {
            emission_strength,
            mapping_offset: dome.mapping_offset(),
            has_environment,
            ..Self::default()
        }
    }

    pub fn with_emission_strength(mut self, emission_strength: f64) -> Self {
        self.emission_strength = emission_strength.max(0.0);
        self
    }
}
