#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{EnvironmentImage, UvCoordinate, SCAN_BLOCK_SIZE};
use itertools::iproduct;
use serde::Serialize;

/// Brightest block found in an environment image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScanResult {
    /// UV of the block's top-left pixel.
    pub uv: UvCoordinate,
    /// Top-left pixel of the block.
    pub pixel: (u32, u32),
    /// Summed red, green and blue intensity over the whole block.
    pub brightness: f64,
}

/// Finds the 4x4 pixel block with the greatest summed RGB intensity.
///
/// Blocks overlap: every top-left pixel `(px, py)` with a full block below
/// and to the right of it is considered. The scan walks rows top to bottom
/// and each row left to right, and only a strictly brighter block replaces
/// the current best, so ties resolve to the first block in that order.
///
/// The block is represented by its top-left pixel, giving
/// `u = px / (width - 1)` and `v = py / (height - 1)`.
pub fn scan(image: &EnvironmentImage) -> ScanResult {
    let width = image.width();
    let height = image.height();

    let brightness = pixel_brightness(image);

    let mut best_pixel = (0, 0);
    let mut best_brightness = block_brightness(&brightness, width as usize, 0, 0);

    let last_x = width - SCAN_BLOCK_SIZE;
    let last_y = height - SCAN_BLOCK_SIZE;

    for (py, px) in iproduct!(0..=last_y, 0..=last_x) {
        let value = block_brightness(&brightness, width as usize, px as usize, py as usize);

        if value > best_brightness {
            best_brightness = value;
            best_pixel = (px, py);
        }
    }

    if best_brightness <= 0.0 {
        warn!("environment image is entirely black, using the top-left block");
    }

    let uv = UvCoordinate::from_pixel(best_pixel.0, best_pixel.1, width, height);

    debug!(
        "brightest block at pixel {:?} (uv {:.4}, {:.4}), brightness {}",
        best_pixel,
        uv.u(),
        uv.v(),
        best_brightness
    );

    ScanResult {
        uv,
        pixel: best_pixel,
        brightness: best_brightness,
    }
}

fn pixel_brightness(image: &EnvironmentImage) -> Vec<f64> {
    iproduct!(0..image.height(), 0..image.width())
        .map(|(y, x)| image.brightness(x, y))
        .collect()
}

// Always summed in the same order so equal blocks give bit-identical totals.
fn block_brightness(brightness: &[f64], cols: usize, px: usize, py: usize) -> f64 {
    let size = SCAN_BLOCK_SIZE as usize;
    let mut total = 0.0;

    for y in py..py + size {
        for &value in &brightness[y * cols + px..y * cols + px + size] {
            total += value;
        }
    }

    total
}
