#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{DomeGeometry, DomeResult, UvCoordinate};
use cgmath::prelude::*;
use cgmath::{Point3, Rad, Vector3};
use serde::Serialize;
use std::f64::consts::PI;

/// Fraction of the radius the sun is lifted above the projected point.
pub const SUN_HEIGHT_FACTOR: f64 = 0.1;

/// Sun energy per meter of dome radius.
pub const SUN_ENERGY_PER_METER: f64 = 100.0;

/// A UV coordinate mapped onto the dome surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Projection {
    /// `(0.5 - u) * 2pi`.
    pub longitude: Rad<f64>,
    /// Polar angle from the top pole, `v * pi`; not a signed latitude.
    pub latitude: Rad<f64>,
    /// Point on the visual dome surface.
    pub point: Point3<f64>,
}

/// Directional light placed over the brightest spot of the dome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SunLight {
    pub position: Point3<f64>,
    /// Unit vector from the light towards the dome origin.
    pub direction: Option<Vector3<f64>>,
    pub energy: f64,
}

/// Maps a UV coordinate of the environment image onto the dome.
///
/// These conventions match how the environment texture is wrapped around the
/// dome, so they are kept as is:
///
/// * `u` runs from `+pi` at the left edge to `-pi` at the right edge;
/// * `v` is a polar angle, `0` at the top pole and `pi` at the bottom one;
/// * `z` is raised by `radius / 10` so the point lands on the visual dome
///   rather than on the sphere centered at the origin.
///
/// Poles are not special-cased: both give `x = y = 0`.
pub fn project(uv: UvCoordinate, dome: &DomeGeometry) -> Projection {
    let radius = dome.radius();

    let longitude = (0.5 - uv.u()) * 2.0 * PI;
    let latitude = uv.v() * PI;

    let x = radius * latitude.sin() * longitude.cos();
    let y = radius * latitude.sin() * longitude.sin();
    let z = radius * latitude.cos() + dome.base_offset();

    Projection {
        longitude: Rad(longitude),
        latitude: Rad(latitude),
        point: Point3::new(x, y, z),
    }
}

/// Validates raw inputs before projecting them.
pub fn project_uv(u: f64, v: f64, radius: f64) -> DomeResult<Projection> {
    let dome = DomeGeometry::new(radius)?;
    let uv = UvCoordinate::new(u, v)?;

    Ok(project(uv, &dome))
}

/// Places the sun straight above the projected point.
///
/// The offset is vertical, `radius / 10` along `+z`, not radial. The light
/// aims at the dome origin and its energy grows linearly with the radius.
pub fn place_sun(projection: &Projection, dome: &DomeGeometry) -> SunLight {
    let sun_height = dome.radius() * SUN_HEIGHT_FACTOR;
    let position = projection.point + Vector3::unit_z() * sun_height;

    let to_origin = Point3::origin() - position;

    let direction = if to_origin.magnitude2() > 0.0 {
        Some(to_origin.normalize())
    } else {
        None
    };

    let sun = SunLight {
        position,
        direction,
        energy: SUN_ENERGY_PER_METER * dome.radius(),
    };

    debug!(
        "sun at ({:.2}, {:.2}, {:.2}) with energy {}",
        position.x, position.y, position.z, sun.energy
    );

    sun
}
