#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{place_sun, project, scan, DomeGeometry, EnvironmentImage, SunLight, UvCoordinate};
use cgmath::Point3;
use serde::Serialize;

/// The brightest region of an environment image, located on the dome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BrightSpot {
    pub uv: UvCoordinate,
    pub brightness: f64,
    pub point: Point3<f64>,
    pub light: SunLight,
}

impl BrightSpot {
    pub fn locate(image: &EnvironmentImage, dome: &DomeGeometry) -> Self {
        let found = scan(image);
        let projection = project(found.uv, dome);
        let light = place_sun(&projection, dome);

        info!(
            "brightest spot at uv ({:.4}, {:.4}) -> ({:.2}, {:.2}, {:.2})",
            found.uv.u(),
            found.uv.v(),
            projection.point.x,
            projection.point.y,
            projection.point.z
        );

        Self {
            uv: found.uv,
            brightness: found.brightness,
            point: projection.point,
            light,
        }
    }
}
