// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pagebinder convert` — bind images into one PDF.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use indicatif::HumanBytes;
use pagebinder_core::types::{ConversionReport, ConversionSummary, default_output_name};
use pagebinder_document::{ConversionOutput, Converter};
use serde::Serialize;
use tracing::info;

use super::SortArgs;
use crate::observer::TerminalObserver;
use crate::services::inputs::{collect_sources, output_prefix};
use crate::services::options::{OptionOverrides, resolve};
use crate::style::{bold, dim, green, yellow};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// A folder of images, or one or more image files.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the PDF here instead of `<folder>_YYYYMMDD_HHMM.pdf`.
    #[arg(short, long, env = "PAGEBINDER_OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Longest page side in pixels; larger images are scaled down. 0 disables.
    #[arg(long, env = "PAGEBINDER_MAX_DIMENSION")]
    pub max_dimension: Option<u32>,

    /// JPEG quality for page images (1-100).
    #[arg(long, env = "PAGEBINDER_QUALITY",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Images to normalize in parallel.
    #[arg(short = 'j', long, env = "PAGEBINDER_WORKERS",
          value_parser = clap::value_parser!(u16).range(1..=256))]
    pub workers: Option<u16>,

    /// Title stored in the PDF metadata.
    #[arg(long)]
    pub title: Option<String>,

    /// JSON options file (defaults to ~/.config/pagebinder/options.json if present).
    #[arg(long, env = "PAGEBINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "PAGEBINDER_NO_PROGRESS")]
    pub no_progress: bool,

    /// Print the report and summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    pub fn shows_progress(&self, quiet: bool) -> bool {
        !quiet && !self.no_progress && !self.json
    }

    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            max_dimension: self.max_dimension,
            pdf_quality: self.quality,
            workers: self.workers.map(usize::from),
            title: self.title.clone(),
        }
    }
}

/// JSON document printed with `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    output: &'a Path,
    summary: &'a ConversionSummary,
    report: &'a ConversionReport,
}

pub fn run(args: ConvertArgs, quiet: bool) -> Result<()> {
    let options = resolve(args.config.as_deref(), args.overrides())?;
    let collected = collect_sources(&args.inputs)?;

    if !quiet {
        for path in &collected.ignored {
            eprintln!(
                "{} ignoring {} (not a supported image type)",
                yellow("⚠"),
                path.display()
            );
        }
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(default_output_name(&output_prefix(&args.inputs), Local::now()))
    });

    let observer = TerminalObserver::new(
        collected.sources.len(),
        args.shows_progress(quiet),
        !quiet && !args.json,
    );
    let output = Converter::new()
        .convert(&collected.sources, args.sort.criterion(), &options, &observer)
        .context("Conversion failed")?;

    std::fs::write(&output_path, &output.artifact)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!(path = %output_path.display(), "PDF written");

    if args.json {
        let json = serde_json::to_string_pretty(&JsonOutput {
            output: &output_path,
            summary: &output.summary,
            report: &output.report,
        })
        .context("Failed to serialise report")?;
        println!("{json}");
    } else if !quiet {
        print_summary(&output, &output_path);
    }

    Ok(())
}

fn print_summary(output: &ConversionOutput, path: &Path) {
    let summary = &output.summary;
    let elapsed = summary.finished_at - summary.started_at;

    eprintln!(
        "{} {} pages  →  {}  {}",
        if summary.skipped_count == 0 {
            green("✔")
        } else {
            yellow("⚠")
        },
        bold(&summary.page_count.to_string()),
        bold(&path.display().to_string()),
        dim(&HumanBytes(summary.artifact_bytes).to_string()),
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{} skipped · quality {} · max {} px · {} in · {:.1}s",
            summary.skipped_count,
            summary.pdf_quality,
            summary.max_dimension,
            HumanBytes(summary.input_bytes),
            elapsed.num_milliseconds() as f64 / 1000.0,
        ))
    );
}
