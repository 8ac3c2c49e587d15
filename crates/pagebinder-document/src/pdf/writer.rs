// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble normalized page images into one multi-page PDF using
// `lopdf`.
//
// Every page is sized to its image (one pixel per point) and carries a single
// DCT-encoded image XObject painted over the full MediaBox.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, info, instrument};

use crate::image::ProcessedImage;
use crate::image::processor::encode_jpeg;

/// Producer string written to the /Info dictionary.
const PRODUCER: &str = "Pagebinder";

/// Builds a PDF with one page per image, in the order given.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    /// JPEG quality for embedded page images (1-100).
    quality: u8,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Serialize `images` into a PDF, one page each, in sequence order.
    ///
    /// Each image buffer is encoded and released as soon as its page is
    /// written. An empty sequence is rejected with `EmptyInput`.
    #[instrument(skip_all, fields(pages = images.len(), quality = self.quality))]
    pub fn assemble(&self, images: Vec<ProcessedImage>) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(PagebinderError::EmptyInput);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(images.len());

        for (index, image) in images.into_iter().enumerate() {
            let page_id = self.add_page(&mut doc, pages_id, index, image)?;
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(page_count as i64),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal(PRODUCER));
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(|err| {
            PagebinderError::Assembly(format!("failed to serialise PDF: {}", err))
        })?;

        info!(page_count, output_bytes = output.len(), "PDF assembled");
        Ok(output)
    }

    /// Append one image page under `pages_id`. Consumes the pixel buffer.
    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        index: usize,
        image: ProcessedImage,
    ) -> Result<ObjectId> {
        let (width, height) = image.pixels.dimensions();
        let jpeg = encode_jpeg(&image.pixels, self.quality).map_err(|err| {
            PagebinderError::Assembly(format!(
                "failed to encode {} as JPEG: {}",
                image.identifier, err
            ))
        })?;
        drop(image);

        let image_id = doc.add_object(image_stream(jpeg, width, height));
        let name = format!("Im{}", index + 1);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(i64::from(width)),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(i64::from(height)),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|err| {
            PagebinderError::Assembly(format!("failed to encode page content: {}", err))
        })?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let mut xobjects = Dictionary::new();
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(width)),
                Object::Integer(i64::from(height)),
            ],
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
            "Contents" => content_id,
        });

        debug!(page = index + 1, width, height, "Page added");
        Ok(page_id)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(95)
    }
}

/// Wrap JPEG bytes in an image XObject stream.
fn image_stream(jpeg: Vec<u8>, width: u32, height: u32) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    dict.set("Length", Object::Integer(jpeg.len() as i64));
    Stream::new(dict, jpeg).with_compression(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{Rgb, RgbImage};

    fn page(identifier: &str, width: u32, height: u32) -> ProcessedImage {
        ProcessedImage {
            identifier: identifier.into(),
            pixels: RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x % 256) as u8, (y % 256) as u8, 90])
            }),
            source_bytes: 0,
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = PdfWriter::default().assemble(Vec::new());
        assert!(matches!(result, Err(PagebinderError::EmptyInput)));
    }

    #[test]
    fn pages_follow_input_order_and_size() {
        let images = vec![page("a", 40, 30), page("b", 10, 80), page("c", 25, 25)];
        let bytes = PdfWriter::new(90).assemble(images).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
        assert_eq!(
            reader.page_sizes().unwrap(),
            vec![(40.0, 30.0), (10.0, 80.0), (25.0, 25.0)]
        );
    }

    #[test]
    fn quality_changes_size_but_not_pages() {
        let make = || vec![page("a", 120, 90), page("b", 90, 120)];
        let high = PdfWriter::new(95).assemble(make()).unwrap();
        let low = PdfWriter::new(5).assemble(make()).unwrap();
        assert!(low.len() < high.len());

        let high_reader = PdfReader::from_bytes(&high).unwrap();
        let low_reader = PdfReader::from_bytes(&low).unwrap();
        assert_eq!(high_reader.page_count(), low_reader.page_count());
        assert_eq!(
            high_reader.page_sizes().unwrap(),
            low_reader.page_sizes().unwrap()
        );
    }

    #[test]
    fn title_is_embedded() {
        let mut writer = PdfWriter::new(80);
        writer.set_title("Holiday scans");
        let bytes = writer.assemble(vec![page("a", 4, 4)]).unwrap();
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.title().as_deref(), Some("Holiday scans"));
    }

    #[test]
    fn out_of_range_quality_is_clamped() {
        assert_eq!(PdfWriter::new(0).quality(), 1);
        assert_eq!(PdfWriter::new(200).quality(), 100);
    }
}
