// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, flatten to RGB, bounded downscale, and JPEG
// encoding. Operates on in-memory images using the `image` crate.

use image::imageops::FilterType;
use image::{DynamicImage, ImageResult, RgbImage};
use tracing::{debug, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// let page = ImageProcessor::from_bytes(&data)?
///     .to_rgb()
///     .fit_within(2000)
///     .into_rgb8();
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.). The format
    /// is sniffed from the content, not the file name.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> ImageResult<Self> {
        let img = image::load_from_memory(data)?;
        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the pixels as 8-bit RGB.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }

    // -- Transformations ------------------------------------------------------

    /// Flatten to 8-bit RGB. Alpha is dropped, palettes and grayscale are
    /// expanded.
    pub fn to_rgb(self) -> Self {
        if matches!(self.image, DynamicImage::ImageRgb8(_)) {
            return self;
        }
        Self {
            image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
        }
    }

    /// Shrink the image so its longer side is at most `max_dimension`,
    /// preserving aspect ratio. Images already within bounds are returned
    /// unchanged; this never upscales.
    #[instrument(skip(self), fields(max_dimension))]
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        let Some((new_w, new_h)) = fitted_dimensions(width, height, max_dimension) else {
            return self;
        };
        debug!(from_w = width, from_h = height, new_w, new_h, "Downscaling image");
        Self {
            image: self.image.resize_exact(new_w, new_h, FilterType::Lanczos3),
        }
    }
}

/// Target size for an image whose longer side exceeds `max_dimension`, or
/// `None` when no scaling is needed.
///
/// Both sides are scaled by `max_dimension / max(width, height)` and rounded to
/// the nearest integer, never below 1.
pub fn fitted_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let longest = width.max(height);
    if max_dimension == 0 || longest <= max_dimension {
        return None;
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
    Some((scaled(width), scaled(height)))
}

/// Encode an RGB buffer as baseline JPEG.
pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)?;
    Ok(buffer)
}
