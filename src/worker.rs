//! Sequential batch-processing worker
//!
//! The worker owns one [`Job`] and runs it to completion on a single
//! background task: per item it loads the image, invokes the
//! background-removal transform, derives the output filename, and writes
//! the result as PNG. Per-item failures are reported and skipped; the run
//! always terminates with exactly one `Finished` event. Cancellation is
//! cooperative and checked once per iteration, so an in-flight item
//! always finishes first.

use crate::{
    cancel::CancelFlag,
    error::{BatchError, Result},
    job::Job,
    progress::{percent, BatchEvent, ChannelReporter, NoOpProgressReporter, ProgressReporter},
    remover::BackgroundRemover,
};
use image::ImageFormat;
use instant::Instant;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::{JoinError, JoinHandle};

/// Mutable run bookkeeping, owned exclusively by the worker during a run
#[derive(Debug)]
struct RunState {
    total: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
    cancelled: bool,
}

impl RunState {
    fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            cancelled: false,
        }
    }

    fn percent(&self) -> u8 {
        percent(self.completed, self.total)
    }
}

/// Final outcome of one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of items in the job
    pub total: usize,
    /// Items that produced an output file
    pub succeeded: usize,
    /// Items that failed at load, transform, or write
    pub failed: usize,
    /// Whether the run ended by cancellation before exhausting the list
    pub cancelled: bool,
    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Items never started because the run was cancelled first
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.total - self.succeeded - self.failed
    }
}

/// Sequential batch processor for background removal
///
/// Consumes a validated [`Job`] and a [`BackgroundRemover`], publishing
/// progress through a [`ProgressReporter`]. Items are processed strictly
/// in input order, one at a time.
pub struct BatchProcessor {
    job: Job,
    remover: Box<dyn BackgroundRemover>,
    reporter: Box<dyn ProgressReporter>,
    cancel: CancelFlag,
}

impl BatchProcessor {
    /// Create a processor that discards progress events
    #[must_use]
    pub fn new(job: Job, remover: Box<dyn BackgroundRemover>) -> Self {
        Self::with_reporter(job, remover, Box::new(NoOpProgressReporter))
    }

    /// Create a processor with an explicit progress reporter
    #[must_use]
    pub fn with_reporter(
        job: Job,
        remover: Box<dyn BackgroundRemover>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            job,
            remover,
            reporter,
            cancel: CancelFlag::new(),
        }
    }

    /// Clone of the cancellation flag for the front-end to keep
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run the batch to termination
    ///
    /// Per-item failures are non-fatal; they are published as status
    /// messages and counted in the summary. The terminal `finished` event
    /// fires exactly once, whether the loop exhausted the list or was
    /// cancelled.
    pub fn run(self) -> RunSummary {
        let start = Instant::now();
        let mut state = RunState::new(self.job.len());

        tracing::info!(total = state.total, "batch run started");

        for input in self.job.inputs() {
            // Cancellation is honored only at iteration boundaries
            if self.cancel.is_requested() {
                state.cancelled = true;
                tracing::info!(
                    completed = state.completed,
                    total = state.total,
                    "batch run cancelled"
                );
                self.reporter.status("Cancelled.");
                break;
            }

            self.reporter
                .status(&format!("Processing: {}", display_name(input)));

            match process_item(self.remover.as_ref(), &self.job, input) {
                Ok(output) => {
                    state.succeeded += 1;
                    tracing::debug!(
                        input = %input.display(),
                        output = %output.display(),
                        "item processed"
                    );
                },
                Err(e) => {
                    state.failed += 1;
                    tracing::warn!(input = %input.display(), error = %e, "item failed");
                    self.reporter.status(&format!("Error: {e}"));
                },
            }

            state.completed += 1;
            self.reporter.progress(state.percent());
        }

        self.reporter.finished();

        let summary = RunSummary {
            total: state.total,
            succeeded: state.succeeded,
            failed: state.failed,
            cancelled: state.cancelled,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            elapsed_ms = summary.elapsed_ms,
            "batch run finished"
        );
        summary
    }
}

/// Load one input, transform it, and write the result
///
/// Writes only into the job's output directory; the input file is never
/// modified and partially written outputs are not cleaned up on failure.
fn process_item(
    remover: &dyn BackgroundRemover,
    job: &Job,
    input: &Path,
) -> Result<PathBuf> {
    let image = image::open(input).map_err(|e| BatchError::load_error(input, &e))?;

    let cutout = remover.remove(&image).map_err(|e| match e {
        BatchError::Transform(reason) => BatchError::transform_error(input, &reason),
        other => other,
    })?;

    let output = job.output_path_for(input);
    cutout
        .save_with_format(&output, ImageFormat::Png)
        .map_err(|e| BatchError::write_error(&output, &e))?;

    Ok(output)
}

/// Filename shown in status lines; full paths stay out of the UI
fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Handle to a batch run executing on a background task
///
/// The front-end holds this as its single "is a run active" state
/// (`Option<RunHandle>`): set on start, cleared once `Finished` has been
/// consumed.
pub struct RunHandle {
    cancel: CancelFlag,
    events: UnboundedReceiver<BatchEvent>,
    join: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Request cooperative cancellation before the next item
    pub fn cancel(&self) {
        self.cancel.request();
    }

    /// Clone of the cancellation flag, for wiring into signal handlers
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Receive the next progress event, or `None` after `Finished` has
    /// been delivered and the worker dropped its sender
    pub async fn recv(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Wait for the run to terminate and return its summary
    ///
    /// # Errors
    ///
    /// Returns a [`JoinError`] only if the worker task panicked or was
    /// aborted.
    pub async fn join(self) -> std::result::Result<RunSummary, JoinError> {
        self.join.await
    }
}

/// Spawn a batch run on a blocking background task
///
/// Image decode, the transform, and the disk write all run off the async
/// surface so a front-end event loop never blocks on per-item work. The
/// returned handle is the only channel back into the run: one cancel flag
/// in, three event kinds out.
#[must_use]
pub fn spawn(job: Job, remover: Box<dyn BackgroundRemover>) -> RunHandle {
    let (tx, rx) = unbounded_channel();
    let processor =
        BatchProcessor::with_reporter(job, remover, Box::new(ChannelReporter::new(tx)));
    let cancel = processor.cancel_flag();
    let join = tokio::task::spawn_blocking(move || processor.run());

    RunHandle {
        cancel,
        events: rx,
        join,
    }
}
