// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layered conversion options: defaults, then an options file, then flags.

use std::path::Path;

use anyhow::{Context, Result};
use pagebinder_core::ConversionOptions;
use tracing::debug;

use super::config_dir::default_options_file;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub max_dimension: Option<u32>,
    pub pdf_quality: Option<u8>,
    pub workers: Option<usize>,
    pub title: Option<String>,
}

impl OptionOverrides {
    fn apply(self, options: &mut ConversionOptions) {
        if let Some(max_dimension) = self.max_dimension {
            options.max_dimension = max_dimension;
        }
        if let Some(quality) = self.pdf_quality {
            options.pdf_quality = quality;
        }
        if let Some(workers) = self.workers {
            options.workers = workers;
        }
        if self.title.is_some() {
            options.title = self.title;
        }
    }
}

/// Build the options for one run.
///
/// An explicit `config` file must load. Without one, the per-user options file
/// is used when it exists. Flags override either.
pub fn resolve(config: Option<&Path>, overrides: OptionOverrides) -> Result<ConversionOptions> {
    let mut options = match config {
        Some(path) => load(path)?,
        None => match default_options_file() {
            Some(path) if path.is_file() => load(&path)?,
            _ => ConversionOptions::default(),
        },
    };
    overrides.apply(&mut options);
    debug!(?options, "Options resolved");
    Ok(options)
}

fn load(path: &Path) -> Result<ConversionOptions> {
    debug!(path = %path.display(), "Loading options file");
    ConversionOptions::from_json_file(path)
        .with_context(|| format!("Failed to load options from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.json");
        std::fs::write(&path, r#"{ "pdf_quality": 70, "max_dimension": 1500 }"#).unwrap();

        let options = resolve(
            Some(path.as_path()),
            OptionOverrides {
                pdf_quality: Some(85),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(options.pdf_quality, 85);
        assert_eq!(options.max_dimension, 1500);
        assert_eq!(options.workers, 1);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let result = resolve(Some(missing.as_path()), OptionOverrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn overrides_apply_to_defaults() {
        let mut options = ConversionOptions::default();
        OptionOverrides {
            max_dimension: Some(0),
            workers: Some(3),
            title: Some("Scans".into()),
            ..Default::default()
        }
        .apply(&mut options);
        assert_eq!(options.max_dimension, 0);
        assert_eq!(options.workers, 3);
        assert_eq!(options.title.as_deref(), Some("Scans"));
        assert_eq!(options.pdf_quality, 95);
    }
}
