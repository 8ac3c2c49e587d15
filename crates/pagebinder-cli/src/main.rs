// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagebinder — bind an ordered collection of images into one PDF.
//
// Entry point. Parses the command line, initialises logging, and dispatches to
// the subcommand handlers.

mod commands;
mod observer;
mod services;
mod style;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pagebinder_core::PagebinderError;
use pagebinder_core::human_errors::{Severity, humanize_error};
use tracing_subscriber::EnvFilter;

use commands::convert::ConvertArgs;
use commands::inspect::InspectArgs;
use commands::list::ListArgs;
use style::{bold, dim, red, yellow};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bind a folder, natural file-name order
  pagebinder convert ~/scans/contract

  # Oldest first, pages no larger than 1500 px, smaller file
  pagebinder convert ~/scans/contract --sort created --max-dimension 1500 --quality 80

  # Explicit files, four workers, named output
  pagebinder convert cover.png p1.jpg p2.jpg -j 4 -o contract.pdf

  # Preview the order a folder would produce
  pagebinder list ~/scans/contract --sort size --reverse

ENVIRONMENT:
  RUST_LOG                 Override log filtering (e.g. pagebinder_document=debug)
  PAGEBINDER_CONFIG        JSON options file (max_dimension, pdf_quality, workers, title)
"#;

#[derive(Parser, Debug)]
#[command(
    name = "pagebinder",
    version,
    about = "Bind a folder of images into a single PDF",
    long_about = "Bind a folder of images (JPEG, PNG, TIFF, BMP, WebP, GIF) into a single PDF, \
one page per image. Images that cannot be read are skipped and reported; the rest are \
flattened to RGB, scaled down to a maximum size, and written in the chosen order.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PAGEBINDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PAGEBINDER_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bind images into one PDF.
    Convert(ConvertArgs),
    /// List the images in a folder in the order they would be bound.
    List(ListArgs),
    /// Show the page count and page sizes of a PDF.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides the feedback that matters while converting,
    // so library INFO logs are suppressed when it is active.
    let show_progress = match &cli.command {
        Command::Convert(args) => args.shows_progress(cli.quiet),
        _ => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let verbose = cli.verbose;
    let result = match cli.command {
        Command::Convert(args) => commands::convert::run(args, cli.quiet),
        Command::List(args) => commands::list::run(args),
        Command::Inspect(args) => commands::inspect::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure in plain language, falling back to the error chain.
fn report_error(err: &anyhow::Error, verbose: bool) {
    match err.downcast_ref::<PagebinderError>() {
        Some(pagebinder_err) => {
            let human = humanize_error(pagebinder_err);
            let marker = match human.severity {
                Severity::ActionRequired => yellow("✘"),
                Severity::Permanent | Severity::Internal => red("✘"),
            };
            eprintln!("{} {}", marker, bold(&human.message));
            eprintln!("  {}", human.suggestion);
            if verbose {
                eprintln!("  {}", dim(&format!("{err:#}")));
            }
        }
        None => eprintln!("{} {err:#}", red("✘")),
    }
}
