// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Observer callbacks for a running conversion.

use std::sync::Arc;

use pagebinder_core::types::{ConversionReport, SkipReason};

/// Receives events from a conversion as it runs.
///
/// All methods default to no-ops so callers only override what they need.
/// With more than one worker, `on_item_skipped` can arrive from any pool
/// thread; `on_progress` is serialized and its fraction never decreases.
pub trait ConversionObserver: Send + Sync {
    /// Called after each item has been normalized or skipped.
    ///
    /// `fraction` is `completed / total` in `[0, 1]`.
    fn on_progress(&self, fraction: f32, message: &str) {
        let _ = (fraction, message);
    }

    /// Called once per item that was left out of the document.
    fn on_item_skipped(&self, identifier: &str, reason: &SkipReason) {
        let _ = (identifier, reason);
    }

    /// Called once when the document has been assembled.
    fn on_completed(&self, artifact: &[u8], report: &ConversionReport) {
        let _ = (artifact, report);
    }

    /// Called once when the job ends without a document.
    ///
    /// `error_kind` is the stable name from `PagebinderError::kind`.
    fn on_failed(&self, error_kind: &str, message: &str) {
        let _ = (error_kind, message);
    }
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Shared observer handle, as stored by background jobs.
pub type SharedObserver = Arc<dyn ConversionObserver>;

impl<T: ConversionObserver + ?Sized> ConversionObserver for Arc<T> {
    fn on_progress(&self, fraction: f32, message: &str) {
        (**self).on_progress(fraction, message);
    }

    fn on_item_skipped(&self, identifier: &str, reason: &SkipReason) {
        (**self).on_item_skipped(identifier, reason);
    }

    fn on_completed(&self, artifact: &[u8], report: &ConversionReport) {
        (**self).on_completed(artifact, report);
    }

    fn on_failed(&self, error_kind: &str, message: &str) {
        (**self).on_failed(error_kind, message);
    }
}
