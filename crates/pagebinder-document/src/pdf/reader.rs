// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect finished PDF documents using the `lopdf`
// crate.

use std::path::Path;

use lopdf::{Document, Object};
use pagebinder_core::error::{PagebinderError, Result};
use tracing::{debug, info, instrument};

/// Read-only view over an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PagebinderError::InvalidDocument(format!(
                "failed to open {}: {}",
                path_ref.display(),
                err
            ))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            PagebinderError::InvalidDocument(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of every page, in page order, taken from
    /// each page's /MediaBox.
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let page = self.document.get_dictionary(page_id).map_err(|err| {
                    PagebinderError::InvalidDocument(format!("page {number}: {err}"))
                })?;
                let media_box = page
                    .get(b"MediaBox")
                    .and_then(Object::as_array)
                    .map_err(|err| {
                        PagebinderError::InvalidDocument(format!("page {number} /MediaBox: {err}"))
                    })?;
                let coords: Vec<f32> = media_box
                    .iter()
                    .map(|value| value.as_float().unwrap_or(0.0))
                    .collect();
                match coords.as_slice() {
                    [x0, y0, x1, y1] => Ok((x1 - x0, y1 - y0)),
                    _ => Err(PagebinderError::InvalidDocument(format!(
                        "page {number} /MediaBox has {} entries",
                        coords.len()
                    ))),
                }
            })
            .collect()
    }

    /// /Title from the document information dictionary, if present.
    pub fn title(&self) -> Option<String> {
        let info_id = self.document.trailer.get(b"Info").ok()?.as_reference().ok()?;
        let info = self.document.get_dictionary(info_id).ok()?;
        let raw = info.get(b"Title").ok()?.as_str().ok()?;
        Some(String::from_utf8_lossy(raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_an_invalid_document() {
        let result = PdfReader::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(PagebinderError::InvalidDocument(_))));
    }

    #[test]
    fn missing_file_is_an_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfReader::open(dir.path().join("nope.pdf"));
        assert!(matches!(result, Err(PagebinderError::InvalidDocument(_))));
    }
}
