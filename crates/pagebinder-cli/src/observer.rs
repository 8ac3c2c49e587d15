// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal observer: live progress bar plus per-image skip warnings.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use pagebinder_core::human_errors::describe_skip;
use pagebinder_core::types::{ConversionReport, SkipReason};
use pagebinder_document::ConversionObserver;

use crate::style::{dim, yellow};

/// Renders conversion events on stderr.
///
/// The bar is optional; skip warnings are printed whenever `warnings` is set,
/// above the bar when there is one.
pub struct TerminalObserver {
    bar: Option<ProgressBar>,
    total: usize,
    warnings: bool,
}

impl TerminalObserver {
    pub fn new(total: usize, show_progress: bool, warnings: bool) -> Self {
        let bar = show_progress.then(|| {
            let bar = ProgressBar::new(total as u64);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} images  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Binding");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Self {
            bar,
            total,
            warnings,
        }
    }

    fn print(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl ConversionObserver for TerminalObserver {
    fn on_progress(&self, fraction: f32, message: &str) {
        if let Some(bar) = &self.bar {
            let position = (f64::from(fraction) * self.total as f64).round() as u64;
            bar.set_position(position);
            bar.set_message(dim(message));
        }
    }

    fn on_item_skipped(&self, identifier: &str, reason: &SkipReason) {
        if self.warnings {
            self.print(format!(
                "  {} {} {}  {}",
                yellow("⚠"),
                identifier,
                describe_skip(reason.kind),
                dim(&reason.message),
            ));
        }
    }

    fn on_completed(&self, _artifact: &[u8], _report: &ConversionReport) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    fn on_failed(&self, _error_kind: &str, _message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }
}
