//! Progress reporting for batch runs
//!
//! This module separates progress reporting concerns from the worker loop,
//! allowing different front-ends to implement their own handling. The
//! worker publishes three kinds of events and nothing else: a percentage,
//! a status line, and a single terminal finished signal.

use tokio::sync::mpsc::UnboundedSender;

/// One progress event emitted by the batch worker
///
/// Events carry immutable value snapshots; no shared mutable state crosses
/// the worker boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Overall percentage complete, 0-100, non-decreasing within a run
    Progress(u8),
    /// Human-readable status line (current filename, error text, terminal
    /// cancellation notice)
    Status(String),
    /// The run has terminated; emitted exactly once per run
    Finished,
}

/// Floor percentage of completed items, clamped to 0-100
///
/// `total == 0` never occurs for a validated job but is mapped to 100 so
/// the arithmetic is total.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (completed * 100) / total;
    u8::try_from(pct.min(100)).unwrap_or(100)
}

/// Trait for consuming progress events from a batch run
///
/// Implementations must be cheap and non-blocking; they run inline in the
/// worker loop between items.
pub trait ProgressReporter: Send + Sync {
    /// Report the new overall percentage after an item finished
    fn progress(&self, percent: u8);

    /// Report a status line
    fn status(&self, message: &str);

    /// Report run termination; called exactly once per run
    fn finished(&self);
}

/// No-op reporter that discards all events
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn progress(&self, _percent: u8) {}

    fn status(&self, _message: &str) {}

    fn finished(&self) {}
}

/// Console reporter that logs events through `log`
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    /// Create a new console reporter
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn progress(&self, percent: u8) {
        if self.verbose {
            log::info!("[{percent}%]");
        }
    }

    fn status(&self, message: &str) {
        log::info!("{message}");
    }

    fn finished(&self) {
        log::info!("Run finished");
    }
}

/// Reporter that forwards events over a tokio unbounded channel
///
/// This is the seam between the background task and an event-driven
/// front-end: the worker stays synchronous while the consumer awaits the
/// receiver. Send failures mean the consumer went away; events are then
/// dropped silently because the run still has to terminate.
pub struct ChannelReporter {
    tx: UnboundedSender<BatchEvent>,
}

impl ChannelReporter {
    /// Create a reporter that sends into `tx`
    #[must_use]
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelReporter {
    fn progress(&self, percent: u8) {
        let _ = self.tx.send(BatchEvent::Progress(percent));
    }

    fn status(&self, message: &str) {
        let _ = self.tx.send(BatchEvent::Status(message.to_string()));
    }

    fn finished(&self) {
        let _ = self.tx.send(BatchEvent::Finished);
    }
}
