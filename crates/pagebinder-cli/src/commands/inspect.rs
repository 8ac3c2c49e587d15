// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pagebinder inspect` — report page count and page sizes of a finished PDF.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pagebinder_document::PdfReader;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PDF to inspect.
    pub pdf: PathBuf,

    /// Print the result as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let reader = PdfReader::open(&args.pdf).context("Failed to inspect PDF")?;
    let sizes = reader.page_sizes().context("Failed to read page sizes")?;
    let title = reader.title();

    if args.json {
        let pages: Vec<serde_json::Value> = sizes
            .iter()
            .map(|(w, h)| serde_json::json!({ "width": w, "height": h }))
            .collect();
        let meta = serde_json::json!({
            "file": args.pdf,
            "title": title,
            "page_count": reader.page_count(),
            "pages": pages,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
        );
        return Ok(());
    }

    println!("File:         {}", args.pdf.display());
    if let Some(ref t) = title {
        println!("Title:        {}", t);
    }
    println!("Pages:        {}", reader.page_count());
    for (index, (w, h)) in sizes.iter().enumerate() {
        println!("  {:>4}. {} x {} pt", index + 1, w, h);
    }

    Ok(())
}
