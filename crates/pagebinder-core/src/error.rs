// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagebinder.
//
// Only job-level failures live here. A single unreadable or undecodable image
// is recorded as a `SkipReason` in the conversion report and never surfaces as
// a `PagebinderError`.

use thiserror::Error;

/// Top-level error type for all Pagebinder operations that abort a job.
#[derive(Debug, Error)]
pub enum PagebinderError {
    // -- Job errors --
    #[error("no images selected")]
    NoInput,

    #[error("all {total} images were skipped: {reasons}")]
    AllItemsSkipped { total: usize, reasons: String },

    #[error("cannot assemble a document with zero pages")]
    EmptyInput,

    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    #[error("a conversion is already running")]
    Busy,

    #[error("conversion cancelled")]
    Cancelled,

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("not a readable PDF: {0}")]
    InvalidDocument(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PagebinderError {
    /// Stable error-kind name reported to failure callbacks.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoInput => "NoInputError",
            Self::AllItemsSkipped { .. } => "AllItemsSkippedError",
            Self::EmptyInput => "EmptyInputError",
            Self::Assembly(_) => "AssemblyError",
            Self::Busy => "BusyError",
            Self::Cancelled => "CancelledError",
            Self::InvalidOptions(_) => "InvalidOptionsError",
            Self::InvalidDocument(_) => "InvalidDocumentError",
            Self::Io(_) => "IOError",
            Self::Serialization(_) => "SerializationError",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagebinderError>;
