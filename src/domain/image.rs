#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{DomeError, DomeResult};
use half::f16;
use image::DynamicImage;
use img2raw::{ColorSpace, DataFormat, Header};
use std::path::Path;
use zerocopy::LayoutVerified;

/// Side length of the square pixel block the brightness scan works with.
pub const SCAN_BLOCK_SIZE: u32 = 4;

/// Where the first row of an interleaved pixel buffer sits in the picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelOrigin {
    /// First row is the top of the picture (most image files).
    TopLeft,
    /// First row is the bottom of the picture (3D tool pixel buffers).
    BottomLeft,
}

/// Panoramic environment image as a grid of linear RGB triples.
///
/// Row zero is the top of the picture. Construction validates dimensions and
/// channel values so the rest of the pipeline never sees a malformed image.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl EnvironmentImage {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> DomeResult<Self> {
        validate_dimensions(width, height)?;

        let expected = pixel_count(width, height, 1)?;

        if pixels.len() != expected {
            return Err(DomeError::image(format!(
                "expected {} pixels for a {}x{} image, found {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        for (index, pixel) in pixels.iter().enumerate() {
            if pixel.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(DomeError::image(format!(
                    "pixel ({}, {}) has a non-numeric or negative channel: {:?}",
                    index % width as usize,
                    index / width as usize,
                    pixel
                )));
            }
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image from an interleaved RGB or RGBA buffer.
    ///
    /// Alpha is discarded. Bottom-left buffers are flipped so that the
    /// resulting image always starts with its top row.
    pub fn from_interleaved(
        width: u32,
        height: u32,
        channels: usize,
        data: &[f32],
        origin: PixelOrigin,
    ) -> DomeResult<Self> {
        if channels < 3 {
            return Err(DomeError::image(format!(
                "expected at least 3 channels per pixel, found {}",
                channels
            )));
        }

        validate_dimensions(width, height)?;

        let cols = width as usize;
        let rows = height as usize;

        let expected = pixel_count(width, height, channels)?;

        if data.len() != expected {
            return Err(DomeError::image(format!(
                "expected {} values for a {}x{}x{} buffer, found {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }

        let mut pixels = Vec::with_capacity(cols * rows);

        for y in 0..rows {
            let row = match origin {
                PixelOrigin::TopLeft => y,
                PixelOrigin::BottomLeft => rows - 1 - y,
            };

            for texel in data[row * cols * channels..(row + 1) * cols * channels].chunks(channels) {
                pixels.push([texel[0], texel[1], texel[2]]);
            }
        }

        Self::new(width, height, pixels)
    }

    /// Converts a decoded image into linear floating-point RGB.
    ///
    /// Integer formats end up in the `0.0..=1.0` range.
    pub fn from_dynamic_image(image: &DynamicImage) -> DomeResult<Self> {
        let rgb = image.to_rgb32f();
        let (width, height) = rgb.dimensions();

        let pixels = rgb.pixels().map(|pixel| pixel.0).collect();

        Self::new(width, height, pixels)
    }

    pub fn load_from_memory(bytes: &[u8]) -> DomeResult<Self> {
        Self::from_dynamic_image(&image::load_from_memory(bytes)?)
    }

    pub fn open(path: impl AsRef<Path>) -> DomeResult<Self> {
        let path = path.as_ref();

        info!("loading environment image {}", path.display());

        Self::from_dynamic_image(&image::open(path)?)
    }

    /// Decodes an img2raw asset holding RGBA16F linear sRGB pixels.
    pub fn from_raw_asset(bytes: &[u8]) -> DomeResult<Self> {
        let (header, data) = LayoutVerified::<_, Header>::new_from_prefix(bytes)
            .ok_or_else(|| DomeError::image("raw asset is too short for its header"))?;

        if header.data_format.try_parse() != Some(DataFormat::RGBA16F) {
            return Err(DomeError::image("expected RGBA16F environment map"));
        }

        if header.color_space.try_parse() != Some(ColorSpace::LinearSRGB) {
            return Err(DomeError::image("expected linear sRGB environment map"));
        }

        let [cols, rows] = header.dimensions;

        let texels: Vec<f32> = data
            .chunks_exact(2)
            .map(|bytes| f16::from_bits(u16::from_le_bytes([bytes[0], bytes[1]])).to_f32())
            .collect();

        Self::from_interleaved(cols, rows, 4, &texels, PixelOrigin::TopLeft)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Summed red, green and blue intensity of a pixel.
    pub fn brightness(&self, x: u32, y: u32) -> f64 {
        let [r, g, b] = self.pixel(x, y);

        f64::from(r) + f64::from(g) + f64::from(b)
    }
}

/// Number of values in a `width x height x channels` buffer, if addressable.
fn pixel_count(width: u32, height: u32, channels: usize) -> DomeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(channels))
        .ok_or_else(|| {
            DomeError::image(format!(
                "a {}x{}x{} buffer does not fit in memory",
                width, height, channels
            ))
        })
}

/// Rejects images that cannot hold a single full scan block.
pub fn validate_dimensions(width: u32, height: u32) -> DomeResult<()> {
    if width == 0 || height == 0 {
        return Err(DomeError::image(format!(
            "image is empty ({}x{})",
            width, height
        )));
    }

    if width < SCAN_BLOCK_SIZE || height < SCAN_BLOCK_SIZE {
        return Err(DomeError::image(format!(
            "image is {}x{}, smaller than one {}x{} block",
            width, height, SCAN_BLOCK_SIZE, SCAN_BLOCK_SIZE
        )));
    }

    Ok(())
}
