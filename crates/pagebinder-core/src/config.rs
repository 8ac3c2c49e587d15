// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PagebinderError, Result};

/// Dimension ceiling used when the caller asks for "no limit".
pub const UNBOUNDED_DIMENSION: u32 = 10_000;

/// Largest side a JPEG page image can carry (the frame header stores a u16).
pub const MAX_ENCODABLE_DIMENSION: u32 = u16::MAX as u32;

/// Per-invocation settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Longest allowed side in pixels. 0 means no limit.
    pub max_dimension: u32,
    /// JPEG quality used for page images (1-100).
    pub pdf_quality: u8,
    /// Normalization workers. 1 processes items in order on the calling thread.
    pub workers: usize,
    /// Title embedded in the PDF /Info dictionary.
    pub title: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_dimension: 2000,
            pdf_quality: 95,
            workers: 1,
            title: None,
        }
    }
}

impl ConversionOptions {
    /// The ceiling actually applied during normalization.
    pub fn effective_max_dimension(&self) -> u32 {
        if self.max_dimension == 0 {
            UNBOUNDED_DIMENSION
        } else {
            self.max_dimension
        }
    }

    /// Check value ranges before a run starts.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.pdf_quality) {
            return Err(PagebinderError::InvalidOptions(format!(
                "PDF quality must be 1-100, got {}",
                self.pdf_quality
            )));
        }
        if self.workers == 0 {
            return Err(PagebinderError::InvalidOptions(
                "worker count must be at least 1".into(),
            ));
        }
        if self.max_dimension > MAX_ENCODABLE_DIMENSION {
            return Err(PagebinderError::InvalidOptions(format!(
                "max dimension must be at most {MAX_ENCODABLE_DIMENSION} px, got {}",
                self.max_dimension
            )));
        }
        Ok(())
    }

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let options: Self = serde_json::from_str(&raw)?;
        Ok(options)
    }
}
