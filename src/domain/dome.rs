use crate::{DomeError, DomeResult};
use cgmath::Point3;
use serde::Serialize;

/// Sphere of known radius whose lower part is flattened into a floor.
///
/// Every point below `-radius / 10` is pushed up onto the floor plane, which
/// leaves a hemisphere-plus-base solid. The radius is the only free parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DomeGeometry {
    radius: f64,
}

impl DomeGeometry {
    pub fn new(radius: f64) -> DomeResult<Self> {
        validate_radius(radius)?;

        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Height of the flat base, `-radius / 10`.
    pub fn floor_height(&self) -> f64 {
        -self.base_offset()
    }

    /// Vertical offset between the pure sphere and the visual dome surface.
    pub fn base_offset(&self) -> f64 {
        self.radius / 10.0
    }

    /// Translation applied to texture coordinates so the projected image
    /// lines up with the raised dome.
    pub fn mapping_offset(&self) -> [f64; 3] {
        [0.0, 0.0, -self.radius / 5.0]
    }

    pub fn is_below_floor(&self, point: Point3<f64>) -> bool {
        point.z < self.floor_height()
    }

    /// Whether a point belongs to the floor once the dome is flattened.
    pub fn is_on_or_below_floor(&self, point: Point3<f64>) -> bool {
        point.z <= self.floor_height()
    }

    /// Moves a point that lies below the floor onto it, keeping x and y.
    pub fn flatten(&self, point: Point3<f64>) -> Point3<f64> {
        if self.is_below_floor(point) {
            Point3::new(point.x, point.y, self.floor_height())
        } else {
            point
        }
    }
}

pub(crate) fn validate_radius(radius: f64) -> DomeResult<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(DomeError::InvalidRadius(radius))
    }
}
