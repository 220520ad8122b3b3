//! # Image Preprocessing Module
//!
//! This module prepares uploaded raster images for the binarized OCR pass.
//! The preprocessing is a single fixed-threshold binarization: every pixel is
//! forced to pure black or pure white based on the mean of its color
//! channels. There is no histogram analysis and no per-region adaptation;
//! the original image is always fed to the other OCR pass untouched, so the
//! binarizer must never mutate its input.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Luminance threshold above which a pixel becomes white
const BINARIZE_THRESHOLD: u32 = 128;

/// Decode raw upload bytes into a raster image.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("could not decode image data")
}

/// Convert an image to a high-contrast black/white variant.
///
/// For every pixel the luminance is the unweighted mean of the red, green
/// and blue channels; all three channels become 255 when the mean strictly
/// exceeds 128, otherwise 0. The alpha channel is carried over unchanged.
/// The output is a new buffer with the same dimensions as the input.
pub fn binarize(image: &RgbaImage) -> RgbaImage {
    let start_time = std::time::Instant::now();

    let mut binary = RgbaImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let channel_sum = u32::from(r) + u32::from(g) + u32::from(b);
        // mean > 128, compared without the division
        let value = if channel_sum > 3 * BINARIZE_THRESHOLD {
            255
        } else {
            0
        };
        binary.put_pixel(x, y, Rgba([value, value, value, a]));
    }

    debug!(
        target: "ocr_preprocessing",
        "binarization completed in {:.2}ms: dimensions={}x{}",
        start_time.elapsed().as_secs_f64() * 1000.0,
        image.width(),
        image.height()
    );

    binary
}

/// Encode a raster as PNG bytes for handing to the OCR engine.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("could not encode binarized image as PNG")?;
    Ok(buffer.into_inner())
}
