#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Bulk Background Removal
//!
//! A batch worker for removing image backgrounds: given an ordered list of
//! input images and an output directory, it processes them strictly one at
//! a time on a background task, writing `{stem}_removed.png` results while
//! publishing progress, status, and a single terminal finished event.
//! Cancellation is cooperative, checked once per item.
//!
//! The actual background-removal transform sits behind the
//! [`BackgroundRemover`] trait; the built-in [`BorderKeyRemover`] handles
//! flat backgrounds, and a model-backed implementation can be plugged in
//! through the same trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_bulk::{spawn, BatchEvent, BorderKeyRemover, Job};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let job = Job::new(
//!     vec!["photo.jpg".into(), "cat.png".into()],
//!     "/tmp/out",
//! )?;
//! let mut handle = spawn(job, Box::new(BorderKeyRemover::new()));
//!
//! while let Some(event) = handle.recv().await {
//!     match event {
//!         BatchEvent::Progress(pct) => println!("{pct}%"),
//!         BatchEvent::Status(msg) => println!("{msg}"),
//!         BatchEvent::Finished => break,
//!     }
//! }
//! let summary = handle.join().await?;
//! println!("processed {} of {}", summary.succeeded, summary.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line front-end with progress bar rendering
//! - `webp-support` (default): WebP decoding via the image crate

pub mod cancel;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod job;
pub mod progress;
pub mod remover;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod worker;

// Public API exports
pub use cancel::CancelFlag;
pub use error::{BatchError, Result};
pub use job::{is_supported_image, Job, DROP_EXTENSIONS, SELECT_EXTENSIONS};
pub use progress::{
    percent, BatchEvent, ChannelReporter, ConsoleProgressReporter, NoOpProgressReporter,
    ProgressReporter,
};
pub use remover::{BackgroundRemover, BorderKeyRemover};
pub use worker::{spawn, BatchProcessor, RunHandle, RunSummary};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};
