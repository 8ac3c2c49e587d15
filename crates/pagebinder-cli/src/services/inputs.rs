// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turn command-line paths into image sources.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagebinder_core::types::ImageType;
use pagebinder_document::{ImageSource, scan_folder};
use tracing::debug;

/// Prefix for generated output names when no single folder names the job.
pub const DEFAULT_OUTPUT_PREFIX: &str = "pagebinder";

/// Sources gathered from the command line.
#[derive(Debug, Default)]
pub struct Collected {
    pub sources: Vec<ImageSource>,
    /// Explicit files left out because their extension is not supported.
    pub ignored: Vec<PathBuf>,
}

/// Expand every input: directories are listed (non-recursive), files with a
/// supported extension are taken as they are.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Collected> {
    let mut collected = Collected::default();

    for input in inputs {
        if input.is_dir() {
            let found = scan_folder(input)
                .with_context(|| format!("Failed to list {}", input.display()))?;
            debug!(dir = %input.display(), found = found.len(), "Folder expanded");
            collected.sources.extend(found);
        } else if is_supported(input) {
            collected.sources.push(ImageSource::file(input));
        } else {
            collected.ignored.push(input.clone());
        }
    }

    Ok(collected)
}

/// Output-name prefix: the folder's name when the job is a single folder.
pub fn output_prefix(inputs: &[PathBuf]) -> String {
    match inputs {
        [only] if only.is_dir() => only
            .canonicalize()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.to_string()),
        _ => DEFAULT_OUTPUT_PREFIX.to_string(),
    }
}

fn is_supported(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(ImageType::from_file_name)
        .is_some()
}
