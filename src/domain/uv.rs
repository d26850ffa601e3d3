use crate::{DomeError, DomeResult};
use serde::Serialize;

/// Normalized image-space position, `u` horizontal and `v` vertical.
///
/// Both components lie in `[0, 1]`; `v = 0` is the top row of the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UvCoordinate {
    u: f64,
    v: f64,
}

impl UvCoordinate {
    pub fn new(u: f64, v: f64) -> DomeResult<Self> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);

        if !in_range(u) || !in_range(v) {
            return Err(DomeError::OutOfRangeCoordinate { u, v });
        }

        Ok(Self { u, v })
    }

    /// UV of a pixel in an image of the given size.
    ///
    /// Pixel `(0, 0)` maps to `(0, 0)` and the bottom-right pixel to `(1, 1)`.
    pub fn from_pixel(x: u32, y: u32, width: u32, height: u32) -> Self {
        let normalize = |p: u32, n: u32| {
            if n > 1 {
                f64::from(p) / f64::from(n - 1)
            } else {
                0.0
            }
        };

        Self {
            u: normalize(x, width),
            v: normalize(y, height),
        }
    }

    pub fn u(&self) -> f64 {
        self.u
    }

    pub fn v(&self) -> f64 {
        self.v
    }
}
