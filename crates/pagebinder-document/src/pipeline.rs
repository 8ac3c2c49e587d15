// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline — sort, normalize each image, assemble the survivors.
//
// A `Converter` runs at most one job at a time. Per-item failures are recorded
// and reported while the job carries on; only an empty selection, a selection
// where nothing survives, cancellation, or an assembly failure end the job
// without a document.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use chrono::Utc;
use pagebinder_core::config::ConversionOptions;
use pagebinder_core::error::{PagebinderError, Result};
use pagebinder_core::types::{
    ConversionReport, ConversionSummary, JobId, JobState, SkipReason, SortCriterion,
};
use rayon::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::image::{ProcessedImage, normalize};
use crate::pdf::PdfWriter;
use crate::progress::{ConversionObserver, SharedObserver};
use crate::sort::sort_sources;
use crate::source::ImageSource;

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The finished PDF.
    pub artifact: Vec<u8>,
    pub report: ConversionReport,
    pub summary: ConversionSummary,
}

/// Cooperative cancellation flag shared between a caller and a running job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the job to stop. Items already being normalized finish; no new
    /// ones are started.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A job running on a background thread, returned by [`Converter::start`].
pub struct ConversionHandle {
    job_id: JobId,
    cancel: CancelToken,
    observer: SharedObserver,
    thread: JoinHandle<Result<ConversionOutput>>,
}

impl ConversionHandle {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn cancel(&self) {
        info!(job_id = %self.job_id, "Cancellation requested");
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the job and return its terminal result.
    ///
    /// A job thread that panicked is reported to the observer as a failure,
    /// since it never reached its own terminal callback.
    pub fn join(self) -> Result<ConversionOutput> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => {
                error!(job_id = %self.job_id, "Conversion thread panicked");
                let err = PagebinderError::Assembly("conversion thread panicked".to_string());
                self.observer.on_failed(err.kind(), &err.to_string());
                Err(err)
            }
        }
    }
}

/// Drives conversion jobs and owns the only mutable per-run state: the job
/// state machine.
///
/// `Idle -> Running -> {Completed, Failed, Cancelled}`. A new job may start
/// from any state except `Running`. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    state: Arc<Mutex<JobState>>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the most recent job.
    pub fn state(&self) -> JobState {
        // Only a panic while the lock is held poisons it; treat that as failed.
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(JobState::Failed)
    }

    /// Run one job to completion on the calling thread.
    pub fn convert(
        &self,
        sources: &[ImageSource],
        criterion: SortCriterion,
        options: &ConversionOptions,
        observer: &dyn ConversionObserver,
    ) -> Result<ConversionOutput> {
        self.convert_with_cancel(sources, criterion, options, observer, &CancelToken::new())
    }

    /// Run one job to completion on the calling thread, stopping early if
    /// `cancel` is triggered.
    pub fn convert_with_cancel(
        &self,
        sources: &[ImageSource],
        criterion: SortCriterion,
        options: &ConversionOptions,
        observer: &dyn ConversionObserver,
        cancel: &CancelToken,
    ) -> Result<ConversionOutput> {
        let guard = self.admit(sources.len(), options, observer)?;
        execute(guard, JobId::new(), sources, criterion, options, observer, cancel)
    }

    /// Start a job on a background thread.
    ///
    /// Admission checks run before this returns: an empty selection, invalid
    /// options, or a job already running are reported here and no thread is
    /// spawned.
    pub fn start(
        &self,
        sources: Vec<ImageSource>,
        criterion: SortCriterion,
        options: ConversionOptions,
        observer: SharedObserver,
    ) -> Result<ConversionHandle> {
        let guard = self.admit(sources.len(), &options, observer.as_ref())?;
        let job_id = JobId::new();
        let cancel = CancelToken::new();
        let thread_cancel = cancel.clone();
        let thread_observer = Arc::clone(&observer);

        let thread = std::thread::Builder::new()
            .name(format!("pagebinder-job-{job_id}"))
            .spawn(move || {
                execute(
                    guard,
                    job_id,
                    &sources,
                    criterion,
                    &options,
                    thread_observer.as_ref(),
                    &thread_cancel,
                )
            })?;

        info!(%job_id, "Conversion started in background");
        Ok(ConversionHandle {
            job_id,
            cancel,
            observer,
            thread,
        })
    }

    /// Reject a job that cannot start, otherwise move to `Running`.
    fn admit(
        &self,
        item_count: usize,
        options: &ConversionOptions,
        observer: &dyn ConversionObserver,
    ) -> Result<RunGuard> {
        let admitted = if item_count == 0 {
            Err(PagebinderError::NoInput)
        } else {
            options.validate().and_then(|()| self.claim())
        };

        if let Err(err) = &admitted {
            warn!(kind = err.kind(), error = %err, "Conversion rejected");
            observer.on_failed(err.kind(), &err.to_string());
        }
        admitted
    }

    fn claim(&self) -> Result<RunGuard> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Job state lock poisoned");
                return Err(PagebinderError::Assembly(
                    "conversion state unavailable".to_string(),
                ));
            }
        };
        if *state == JobState::Running {
            return Err(PagebinderError::Busy);
        }
        *state = JobState::Running;
        Ok(RunGuard {
            state: Arc::clone(&self.state),
            finished: false,
        })
    }
}

/// Holds the `Running` state for one job. Dropping it without `finish`
/// (a panic mid-job) leaves the converter in `Failed`.
struct RunGuard {
    state: Arc<Mutex<JobState>>,
    finished: bool,
}

impl RunGuard {
    fn finish(mut self, terminal: JobState) {
        self.set(terminal);
        self.finished = true;
    }

    fn set(&self, next: JobState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.set(JobState::Failed);
        }
    }
}

/// Run an admitted job, record its terminal state, and notify the observer.
fn execute(
    guard: RunGuard,
    job_id: JobId,
    sources: &[ImageSource],
    criterion: SortCriterion,
    options: &ConversionOptions,
    observer: &dyn ConversionObserver,
    cancel: &CancelToken,
) -> Result<ConversionOutput> {
    match run_job(job_id, sources, criterion, options, observer, cancel) {
        Ok(output) => {
            guard.finish(JobState::Completed);
            info!(
                %job_id,
                pages = output.summary.page_count,
                skipped = output.summary.skipped_count,
                artifact_bytes = output.summary.artifact_bytes,
                "Conversion completed"
            );
            observer.on_completed(&output.artifact, &output.report);
            Ok(output)
        }
        Err(err) => {
            let terminal = if matches!(err, PagebinderError::Cancelled) {
                JobState::Cancelled
            } else {
                JobState::Failed
            };
            guard.finish(terminal);
            warn!(%job_id, kind = err.kind(), error = %err, "Conversion ended without a document");
            observer.on_failed(err.kind(), &err.to_string());
            Err(err)
        }
    }
}

#[instrument(skip_all, fields(job_id = %job_id, items = sources.len(), workers = options.workers))]
fn run_job(
    job_id: JobId,
    sources: &[ImageSource],
    criterion: SortCriterion,
    options: &ConversionOptions,
    observer: &dyn ConversionObserver,
    cancel: &CancelToken,
) -> Result<ConversionOutput> {
    let started_at = Utc::now();
    let ordered = sort_sources(sources, criterion);
    let total = ordered.len();

    let results = if options.workers > 1 {
        normalize_parallel(&ordered, options, observer, cancel)
    } else {
        normalize_sequential(&ordered, options, observer, cancel)
    };

    if cancel.is_cancelled() {
        info!(processed = results.len(), total, "Conversion cancelled");
        return Err(PagebinderError::Cancelled);
    }

    let mut report = ConversionReport::default();
    let mut pages: Vec<ProcessedImage> = Vec::with_capacity(results.len());
    let mut input_bytes = 0u64;
    for result in results {
        match result {
            Ok(page) => {
                report.succeeded.push(page.identifier.clone());
                input_bytes += page.source_bytes;
                pages.push(page);
            }
            Err(reason) => report.skipped.push(reason),
        }
    }

    if pages.is_empty() {
        return Err(PagebinderError::AllItemsSkipped {
            total,
            reasons: report.skip_summary(),
        });
    }

    observer.on_progress(1.0, "Assembling PDF");
    let mut writer = PdfWriter::new(options.pdf_quality);
    if let Some(title) = &options.title {
        writer.set_title(title.as_str());
    }
    let page_count = pages.len();
    let artifact = writer.assemble(pages)?;

    let summary = ConversionSummary {
        job_id,
        page_count,
        skipped_count: report.skipped.len(),
        pdf_quality: writer.quality(),
        max_dimension: options.effective_max_dimension(),
        input_bytes,
        artifact_bytes: artifact.len() as u64,
        started_at,
        finished_at: Utc::now(),
    };

    Ok(ConversionOutput {
        artifact,
        report,
        summary,
    })
}

/// Normalize in sort order on the calling thread.
fn normalize_sequential(
    ordered: &[&ImageSource],
    options: &ConversionOptions,
    observer: &dyn ConversionObserver,
    cancel: &CancelToken,
) -> Vec<std::result::Result<ProcessedImage, SkipReason>> {
    let total = ordered.len();
    let mut results = Vec::with_capacity(total);

    for (index, source) in ordered.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        let result = normalize(source, options);
        if let Err(reason) = &result {
            observer.on_item_skipped(source.identifier(), reason);
        }
        let done = index + 1;
        observer.on_progress(fraction(done, total), &status(source, done, total));
        results.push(result);
    }

    results
}

/// Normalize on a dedicated worker pool. Results come back in sort order no
/// matter which item finishes first.
fn normalize_parallel(
    ordered: &[&ImageSource],
    options: &ConversionOptions,
    observer: &dyn ConversionObserver,
    cancel: &CancelToken,
) -> Vec<std::result::Result<ProcessedImage, SkipReason>> {
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|index| format!("pagebinder-worker-{index}"))
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            warn!(error = %err, "Worker pool unavailable, normalizing sequentially");
            return normalize_sequential(ordered, options, observer, cancel);
        }
    };

    let total = ordered.len();
    let completed = AtomicUsize::new(0);
    // Serializes progress emission so fractions arrive in increasing order.
    let progress_lock = Mutex::new(());

    debug!(workers = options.workers, total, "Normalizing in parallel");
    pool.install(|| {
        ordered
            .par_iter()
            .filter_map(|source| {
                if cancel.is_cancelled() {
                    return None;
                }
                let result = normalize(source, options);
                if let Err(reason) = &result {
                    observer.on_item_skipped(source.identifier(), reason);
                }
                if let Ok(_emit) = progress_lock.lock() {
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    observer.on_progress(fraction(done, total), &status(source, done, total));
                }
                Some(result)
            })
            .collect()
    })
}

fn fraction(done: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    done as f32 / total as f32
}

fn status(source: &ImageSource, done: usize, total: usize) -> String {
    format!("Processing {} ({done}/{total})", source.identifier())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopObserver;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use pagebinder_core::types::SortField;

    #[derive(Default)]
    struct Recorder {
        progress: Mutex<Vec<f32>>,
        failures: Mutex<Vec<String>>,
        completed: Mutex<usize>,
    }

    impl ConversionObserver for Recorder {
        fn on_progress(&self, fraction: f32, _message: &str) {
            self.progress.lock().unwrap().push(fraction);
        }

        fn on_completed(&self, _artifact: &[u8], _report: &ConversionReport) {
            *self.completed.lock().unwrap() += 1;
        }

        fn on_failed(&self, error_kind: &str, _message: &str) {
            self.failures.lock().unwrap().push(error_kind.to_string());
        }
    }

    fn png(name: &str, width: u32, height: u32) -> ImageSource {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        ImageSource::upload(name, bytes)
    }

    #[test]
    fn empty_selection_fails_without_progress_or_state_change() {
        let converter = Converter::new();
        let recorder = Recorder::default();
        let result = converter.convert(
            &[],
            SortCriterion::default(),
            &ConversionOptions::default(),
            &recorder,
        );
        assert!(matches!(result, Err(PagebinderError::NoInput)));
        assert_eq!(converter.state(), JobState::Idle);
        assert!(recorder.progress.lock().unwrap().is_empty());
        assert_eq!(*recorder.failures.lock().unwrap(), vec!["NoInputError"]);
    }

    #[test]
    fn invalid_options_are_rejected_before_running() {
        let converter = Converter::new();
        let options = ConversionOptions {
            pdf_quality: 0,
            ..Default::default()
        };
        let result = converter.convert(
            &[png("a.png", 4, 4)],
            SortCriterion::default(),
            &options,
            &NoopObserver,
        );
        assert!(matches!(result, Err(PagebinderError::InvalidOptions(_))));
        assert_eq!(converter.state(), JobState::Idle);
    }

    #[test]
    fn unencodable_dimension_ceiling_is_rejected_before_running() {
        let converter = Converter::new();
        let recorder = Recorder::default();
        let options = ConversionOptions {
            max_dimension: 100_000,
            ..Default::default()
        };
        let result = converter.convert(
            &[png("ok.png", 10, 10), png("wide.png", 300, 1)],
            SortCriterion::default(),
            &options,
            &recorder,
        );
        assert!(matches!(result, Err(PagebinderError::InvalidOptions(_))));
        assert_eq!(converter.state(), JobState::Idle);
        assert_eq!(*recorder.failures.lock().unwrap(), vec!["InvalidOptionsError"]);
    }

    #[test]
    fn success_reaches_completed_with_monotonic_progress() {
        let converter = Converter::new();
        let recorder = Recorder::default();
        let sources = vec![png("p2.png", 8, 6), png("p10.png", 6, 8), png("p1.png", 5, 5)];
        let output = converter
            .convert(
                &sources,
                SortCriterion::new(SortField::Name),
                &ConversionOptions::default(),
                &recorder,
            )
            .unwrap();

        assert_eq!(converter.state(), JobState::Completed);
        assert!(converter.state().is_terminal());
        assert_eq!(output.report.succeeded, vec!["p1.png", "p2.png", "p10.png"]);
        assert_eq!(output.summary.page_count, 3);
        assert_eq!(output.summary.artifact_bytes, output.artifact.len() as u64);
        assert_eq!(*recorder.completed.lock().unwrap(), 1);

        let progress = recorder.progress.lock().unwrap();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
        assert_eq!(progress.last().copied(), Some(1.0));
    }

    #[test]
    fn all_corrupt_fails_and_lists_reasons() {
        let converter = Converter::new();
        let sources = vec![
            ImageSource::upload("x.png", b"junk".to_vec()),
            ImageSource::upload("y.png", Vec::new()),
        ];
        let err = converter
            .convert(
                &sources,
                SortCriterion::default(),
                &ConversionOptions::default(),
                &NoopObserver,
            )
            .unwrap_err();
        match err {
            PagebinderError::AllItemsSkipped { total, reasons } => {
                assert_eq!(total, 2);
                assert!(reasons.contains("x.png") && reasons.contains("y.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(converter.state(), JobState::Failed);
    }

    #[test]
    fn pre_cancelled_job_ends_cancelled() {
        let converter = Converter::new();
        let recorder = Recorder::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = converter.convert_with_cancel(
            &[png("a.png", 4, 4)],
            SortCriterion::default(),
            &ConversionOptions::default(),
            &recorder,
            &cancel,
        );
        assert!(matches!(result, Err(PagebinderError::Cancelled)));
        assert_eq!(converter.state(), JobState::Cancelled);
        assert_eq!(*recorder.failures.lock().unwrap(), vec!["CancelledError"]);
    }

    #[test]
    fn guard_dropped_mid_job_marks_failed() {
        let converter = Converter::new();
        let guard = converter.claim().unwrap();
        assert_eq!(converter.state(), JobState::Running);
        assert!(!converter.state().is_terminal());
        assert!(matches!(converter.claim(), Err(PagebinderError::Busy)));
        drop(guard);
        assert_eq!(converter.state(), JobState::Failed);
    }

    #[test]
    fn fraction_handles_bounds() {
        assert_eq!(fraction(1, 4), 0.25);
        assert_eq!(fraction(4, 4), 1.0);
        assert_eq!(fraction(0, 0), 1.0);
    }
}
