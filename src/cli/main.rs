//! Bulk background-removal CLI
//!
//! Collects image files from the command line, runs them through the
//! sequential batch worker, and renders progress. Ctrl-C maps to the
//! worker's cooperative cancel flag, so the in-flight image finishes
//! before the run stops.

use crate::{
    job::{is_supported_image, Job, DROP_EXTENSIONS},
    progress::BatchEvent,
    remover::{BackgroundRemover, BorderKeyRemover},
    worker::{spawn, RunHandle, RunSummary},
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Bulk background removal tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-bulk")]
pub struct Cli {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<PathBuf>,

    /// Output directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Filename pattern for directory inputs (e.g. "*.jpg")
    #[arg(long)]
    pub pattern: Option<String>,

    /// Per-channel tolerance for the border-keying remover (0-255)
    #[arg(long, default_value_t = 40)]
    pub tolerance: u8,

    /// Open the output folder in the file manager when the run finishes
    #[arg(long)]
    pub open: bool,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::tracing_config::init_cli_tracing(cli.verbose)
        .context("Failed to initialize tracing")?;

    let files = collect_input_files(&cli)?;
    if files.is_empty() {
        anyhow::bail!("No supported image files found in the provided inputs");
    }
    tracing::info!(count = files.len(), "collected input images");

    if !cli.output.exists() {
        std::fs::create_dir_all(&cli.output).with_context(|| {
            format!("Failed to create output directory: {}", cli.output.display())
        })?;
    }

    let job = Job::new(files, cli.output.clone()).context("Failed to build batch job")?;
    let remover: Box<dyn BackgroundRemover> =
        Box::new(BorderKeyRemover::with_channel_tolerance(cli.tolerance));

    let summary = run_batch(spawn(job, remover)).await?;

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped(),
        cancelled = summary.cancelled,
        elapsed_ms = summary.elapsed_ms,
        "run complete"
    );

    if cli.open && !summary.cancelled {
        if let Err(e) = reveal_folder(&cli.output) {
            tracing::warn!(error = %e, "could not open output folder");
        }
    }

    Ok(())
}

/// Drive one spawned run to completion, rendering events on a progress bar
///
/// The handle is this function's only run state; dropping it after
/// `Finished` is the CLI's version of clearing `Option<RunHandle>`.
async fn run_batch(mut handle: RunHandle) -> Result<RunSummary> {
    let cancel = handle.cancel_flag();
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .context("invalid progress bar template")?
            .progress_chars("#>-"),
    );

    loop {
        tokio::select! {
            event = handle.recv() => match event {
                Some(BatchEvent::Progress(percent)) => pb.set_position(u64::from(percent)),
                Some(BatchEvent::Status(message)) => pb.set_message(message),
                Some(BatchEvent::Finished) | None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                pb.set_message("Cancelling...");
                cancel.request();
            },
        }
    }

    let summary = handle.join().await.context("Batch worker task failed")?;

    if summary.cancelled {
        pb.abandon_with_message(format!(
            "Cancelled. Processed: {}, Failed: {}, Skipped: {}",
            summary.succeeded,
            summary.failed,
            summary.skipped()
        ));
    } else {
        pb.finish_with_message(format!(
            "Completed! Processed: {}, Failed: {}",
            summary.succeeded, summary.failed
        ));
    }

    Ok(summary)
}

/// Expand CLI inputs into an ordered list of image files
///
/// Explicit files keep their command-line order; directory contents are
/// sorted alphanumerically so batch order is reproducible.
fn collect_input_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut all_files = Vec::new();

    for input in &cli.input {
        if input.is_file() {
            if is_supported_image(input, DROP_EXTENSIONS) {
                all_files.push(input.clone());
            } else {
                tracing::warn!(path = %input.display(), "skipping unsupported file");
            }
        } else if input.is_dir() {
            let mut dir_files =
                find_image_files(input, cli.recursive, cli.pattern.as_deref())?;
            dir_files.sort();
            all_files.extend(dir_files);
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                input.display()
            );
        }
    }

    Ok(all_files)
}

/// Find supported image files in a directory
fn find_image_files(dir: &Path, recursive: bool, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.path();
                if is_supported_image(path, DROP_EXTENSIONS) && matches_pattern(path, pattern) {
                    files.push(path.to_path_buf());
                }
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                if is_supported_image(&path, DROP_EXTENSIONS) && matches_pattern(&path, pattern) {
                    files.push(path);
                }
            }
        }
    }

    Ok(files)
}

/// Check if a file matches the given glob pattern
fn matches_pattern(path: &Path, pattern: Option<&str>) -> bool {
    match pattern {
        Some(pat) => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|filename| {
                glob::Pattern::new(pat)
                    .map(|p| p.matches(filename))
                    .unwrap_or(false)
            }),
        None => true,
    }
}

/// Open the output directory in the platform file manager
fn reveal_folder(path: &Path) -> std::io::Result<()> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    std::process::Command::new(program).arg(path).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern(Path::new("/a/photo.jpg"), Some("*.jpg")));
        assert!(!matches_pattern(Path::new("/a/photo.png"), Some("*.jpg")));
        assert!(matches_pattern(Path::new("/a/photo.png"), None));
        assert!(matches_pattern(Path::new("img_01.png"), Some("img_*.png")));
    }

    #[test]
    fn test_find_image_files_flat() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("a.png"), b"x").expect("write");
        fs::write(dir.path().join("b.webp"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("sub").join("c.jpg"), b"x").expect("write");

        let mut found = find_image_files(dir.path(), false, None).expect("scan");
        found.sort();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.webp"]);
    }

    #[test]
    fn test_find_image_files_recursive_with_pattern() {
        let dir = TempDir::new().expect("temp dir");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("keep.jpg"), b"x").expect("write");
        fs::write(dir.path().join("sub").join("also.jpg"), b"x").expect("write");
        fs::write(dir.path().join("sub").join("skip.png"), b"x").expect("write");

        let found = find_image_files(dir.path(), true, Some("*.jpg")).expect("scan");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "jpg"));
    }
}
