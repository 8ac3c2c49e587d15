// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-item normalization: read, decode, flatten, bound.

use image::RgbImage;
use pagebinder_core::config::ConversionOptions;
use pagebinder_core::types::SkipReason;
use tracing::{debug, instrument, warn};

use super::processor::ImageProcessor;
use crate::source::ImageSource;

/// A decoded page image ready for assembly.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub identifier: String,
    pub pixels: RgbImage,
    /// Bytes read from the source.
    pub source_bytes: u64,
}

impl ProcessedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Turn one source into an RGB page image no larger than the configured
/// ceiling.
///
/// Failures never escape as job errors. A source that cannot be opened or read
/// becomes an I/O skip; bytes that do not decode become a decode skip.
#[instrument(skip_all, fields(identifier = source.identifier()))]
pub fn normalize(
    source: &ImageSource,
    options: &ConversionOptions,
) -> Result<ProcessedImage, SkipReason> {
    let identifier = source.identifier();

    let data = source.read_all().map_err(|err| {
        warn!(error = %err, "Could not read image source");
        SkipReason::io(identifier, err.to_string())
    })?;

    let processor = ImageProcessor::from_bytes(&data).map_err(|err| {
        warn!(error = %err, "Could not decode image");
        SkipReason::decode(identifier, err.to_string())
    })?;

    let pixels = processor
        .to_rgb()
        .fit_within(options.effective_max_dimension())
        .into_rgb8();

    debug!(width = pixels.width(), height = pixels.height(), "Image normalized");
    Ok(ProcessedImage {
        identifier: identifier.to_string(),
        pixels,
        source_bytes: data.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use pagebinder_core::types::SkipKind;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([40, 80, 120, 128]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buffer), format)
            .unwrap();
        buffer
    }

    #[test]
    fn upload_is_decoded_and_bounded() {
        let source = ImageSource::upload("wide.png", encoded(300, 100, ImageFormat::Png));
        let options = ConversionOptions {
            max_dimension: 150,
            ..Default::default()
        };
        let page = normalize(&source, &options).unwrap();
        assert_eq!(page.identifier, "wide.png");
        assert_eq!((page.width(), page.height()), (150, 50));
    }

    #[test]
    fn small_image_keeps_its_size() {
        let source = ImageSource::upload("small.bmp", encoded(30, 40, ImageFormat::Bmp));
        let page = normalize(&source, &ConversionOptions::default()).unwrap();
        assert_eq!((page.width(), page.height()), (30, 40));
    }

    #[test]
    fn zero_max_dimension_leaves_size_alone() {
        let source = ImageSource::upload("a.png", encoded(64, 32, ImageFormat::Png));
        let options = ConversionOptions {
            max_dimension: 0,
            ..Default::default()
        };
        let page = normalize(&source, &options).unwrap();
        assert_eq!((page.width(), page.height()), (64, 32));
    }

    #[test]
    fn zero_byte_file_is_a_decode_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();

        let reason = normalize(&ImageSource::file(&path), &ConversionOptions::default())
            .unwrap_err();
        assert_eq!(reason.identifier, "empty.jpg");
        assert_eq!(reason.kind, SkipKind::Decode);
    }

    #[test]
    fn missing_file_is_an_io_skip() {
        let dir = tempfile::tempdir().unwrap();
        let source = ImageSource::file(dir.path().join("gone.png"));
        let reason = normalize(&source, &ConversionOptions::default()).unwrap_err();
        assert_eq!(reason.kind, SkipKind::Io);
        assert!(reason.to_string().starts_with("gone.png: IOError"));
    }

    #[test]
    fn content_wins_over_extension() {
        // PNG bytes behind a .jpg name still decode.
        let source = ImageSource::upload("mislabelled.jpg", encoded(8, 8, ImageFormat::Png));
        assert!(normalize(&source, &ConversionOptions::default()).is_ok());
    }
}
