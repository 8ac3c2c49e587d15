// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pagebinder list` — show the images a folder would contribute, in order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::HumanBytes;
use pagebinder_core::types::ImageType;
use pagebinder_document::{ImageSource, scan_folder, sort_sources};
use serde::Serialize;

use super::SortArgs;
use crate::style::{bold, dim, yellow};

/// Entries shown before the listing is cut short.
pub const PREVIEW_LIMIT: usize = 20;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Folder to list.
    pub dir: PathBuf,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Show every entry instead of the first 20.
    #[arg(long)]
    pub all: bool,

    /// Print the listing as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Entry {
    name: String,
    image_type: Option<ImageType>,
    /// `None` when the file's metadata could not be read.
    size_bytes: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Listing {
    count: usize,
    total_bytes: u64,
    entries: Vec<Entry>,
}

fn build_listing(sources: &[&ImageSource]) -> Listing {
    let entries: Vec<Entry> = sources
        .iter()
        .map(|source| Entry {
            name: source.identifier().to_string(),
            image_type: ImageType::from_file_name(source.identifier()),
            size_bytes: source.size_bytes().ok(),
        })
        .collect();
    Listing {
        count: entries.len(),
        total_bytes: entries.iter().filter_map(|e| e.size_bytes).sum(),
        entries,
    }
}

pub fn run(args: ListArgs) -> Result<()> {
    let sources = scan_folder(&args.dir)
        .with_context(|| format!("Failed to list {}", args.dir.display()))?;
    let ordered = sort_sources(&sources, args.sort.criterion());
    let listing = build_listing(&ordered);

    if args.json {
        let json = serde_json::to_string_pretty(&listing).context("Failed to serialise listing")?;
        println!("{json}");
        return Ok(());
    }

    if listing.count == 0 {
        eprintln!("{} no images found in {}", yellow("⚠"), args.dir.display());
        return Ok(());
    }

    println!(
        "{} images in {}  {}",
        bold(&listing.count.to_string()),
        args.dir.display(),
        dim(&format!("({} total)", HumanBytes(listing.total_bytes))),
    );

    let shown = if args.all {
        listing.count
    } else {
        listing.count.min(PREVIEW_LIMIT)
    };
    for (index, entry) in listing.entries.iter().take(shown).enumerate() {
        let size = entry
            .size_bytes
            .map(|b| HumanBytes(b).to_string())
            .unwrap_or_else(|| "?".to_string());
        println!("  {:>4}. {:<48} {:>10}", index + 1, entry.name, size);
    }
    if shown < listing.count {
        println!(
            "  {}",
            dim(&format!(
                "… and {} more (use --all to show everything)",
                listing.count - shown
            ))
        );
    }

    Ok(())
}
