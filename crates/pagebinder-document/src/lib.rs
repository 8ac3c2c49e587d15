// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagebinder-document — Image-to-PDF conversion for Pagebinder.
//
// Provides image sources (folder entries and uploads), natural and
// attribute-based ordering, per-image normalization (RGB, bounded Lanczos
// downscale), PDF assembly with lopdf, and the conversion pipeline that ties
// them together with progress callbacks.

pub mod image;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod sort;
pub mod source;

// Re-export the primary items so callers can use `pagebinder_document::Converter` etc.
pub use crate::image::{ImageProcessor, ProcessedImage, normalize};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use pipeline::{CancelToken, ConversionHandle, ConversionOutput, Converter};
pub use progress::{ConversionObserver, NoopObserver, SharedObserver};
pub use sort::{NaturalKey, natural_cmp, sort_sources};
pub use source::{FolderEntry, ImageSource, UploadedImage, scan_folder};
