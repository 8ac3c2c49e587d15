// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pagebinder.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a candidate image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// A named entry in a filesystem directory.
    Folder,
    /// An in-memory blob handed over by the caller.
    Upload,
}

/// Extensions accepted as image inputs (lowercase, with leading dot).
pub const SUPPORTED_EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".tif", ".tiff", ".bmp", ".webp", ".gif",
];

/// Supported raster input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Jpeg,
    Png,
    Tiff,
    Bmp,
    Webp,
    /// Only the first frame of an animated GIF is used.
    Gif,
}

impl ImageType {
    /// Infer the image type from a file extension, with or without the
    /// leading dot. Matching is case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Infer the image type from the suffix of a file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        file_suffix(name).and_then(Self::from_extension)
    }
}

/// Return the suffix of `name` after its last dot, ignoring a leading dot on
/// hidden files (`.png` has no suffix, `a.PNG` has `PNG`).
pub fn file_suffix(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(&name[dot + 1..])
}

/// Attribute an image collection is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    /// Natural order of the identifier (`img2` before `img10`).
    #[default]
    Name,
    /// Filesystem creation time, oldest first.
    CreationTime,
    /// Size in bytes, smallest first.
    SizeBytes,
    /// Case-folded file suffix.
    ExtensionType,
}

/// A sort field plus a post-hoc reversal flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: SortField,
    pub reversed: bool,
}

impl SortCriterion {
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            reversed: false,
        }
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }
}

/// Lifecycle states of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Whether the state is terminal for the current run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Why a single image was left out of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipKind {
    /// The source was missing or unreadable.
    Io,
    /// The bytes were read but are not a decodable image.
    Decode,
}

impl std::fmt::Display for SkipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io => f.write_str("IOError"),
            Self::Decode => f.write_str("DecodeError"),
        }
    }
}

/// Recorded cause for excluding one item without aborting the job.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{identifier}: {kind}: {message}")]
pub struct SkipReason {
    pub identifier: String,
    pub kind: SkipKind,
    pub message: String,
}

impl SkipReason {
    pub fn io(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind: SkipKind::Io,
            message: message.into(),
        }
    }

    pub fn decode(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind: SkipKind::Decode,
            message: message.into(),
        }
    }
}

/// Per-item outcome of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub succeeded: Vec<String>,
    pub skipped: Vec<SkipReason>,
}

impl ConversionReport {
    /// Total number of items the run looked at.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len()
    }

    /// Skip reasons joined into one line, for failure messages.
    pub fn skip_summary(&self) -> String {
        self.skipped
            .iter()
            .map(|reason| reason.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Details of a completed run, alongside the artifact and report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub job_id: JobId,
    pub page_count: usize,
    pub skipped_count: usize,
    pub pdf_quality: u8,
    /// Effective dimension ceiling in pixels.
    pub max_dimension: u32,
    /// Sum of the source sizes that were read, in bytes.
    pub input_bytes: u64,
    pub artifact_bytes: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Suggested file name for a new document: `<prefix>_YYYYMMDD_HHMM.pdf`.
pub fn default_output_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.pdf", prefix, now.format("%Y%m%d_%H%M"))
}
