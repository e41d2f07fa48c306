//! Error types for batch background removal

use std::path::Path;
use thiserror::Error;

/// Result type alias for batch background removal operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Error types for batch background removal
///
/// The first three variants are per-item failures. They never abort a run:
/// the worker reports them as a status message and moves on to the next
/// item. `InvalidJob` is the only pre-run failure and is raised before any
/// item is touched.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input image is missing, unreadable, or not decodable
    #[error("Load error: {0}")]
    Load(String),

    /// The background-removal transform failed on a decoded image
    #[error("Transform error: {0}")]
    Transform(String),

    /// Writing the result to the output directory failed
    #[error("Write error: {0}")]
    Write(String),

    /// Job construction failed (empty input list, bad output directory)
    #[error("Invalid job: {0}")]
    InvalidJob(String),
}

impl BatchError {
    /// Create a new transform error
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        Self::Transform(msg.into())
    }

    /// Create a new invalid job error
    pub fn invalid_job<S: Into<String>>(msg: S) -> Self {
        Self::InvalidJob(msg.into())
    }

    /// Create a load error with file context
    pub fn load_error<P: AsRef<Path>>(path: P, error: &image::ImageError) -> Self {
        Self::Load(format!(
            "failed to load '{}': {}",
            path.as_ref().display(),
            error
        ))
    }

    /// Create a write error with file context
    pub fn write_error<P: AsRef<Path>>(path: P, error: &image::ImageError) -> Self {
        Self::Write(format!(
            "failed to write '{}': {}",
            path.as_ref().display(),
            error
        ))
    }

    /// Create a transform error with file context
    pub fn transform_error<P: AsRef<Path>>(path: P, reason: &str) -> Self {
        Self::Transform(format!(
            "background removal failed for '{}': {}",
            path.as_ref().display(),
            reason
        ))
    }

    /// Whether this error is fatal to a run rather than to a single item
    #[must_use]
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::InvalidJob(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_display() {
        let err = BatchError::invalid_job("no input images");
        assert_eq!(err.to_string(), "Invalid job: no input images");

        let err = BatchError::transform("model returned empty mask");
        assert_eq!(err.to_string(), "Transform error: model returned empty mask");
    }

    #[test]
    fn test_contextual_constructors() {
        let image_err = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = BatchError::load_error(Path::new("/in/photo.jpg"), &image_err);
        let msg = err.to_string();
        assert!(msg.starts_with("Load error:"));
        assert!(msg.contains("/in/photo.jpg"));
        assert!(msg.contains("no such file"));

        let err = BatchError::transform_error(Path::new("cat.png"), "inference timed out");
        assert!(err.to_string().contains("cat.png"));
        assert!(err.to_string().contains("inference timed out"));
    }

    #[test]
    fn test_only_invalid_job_is_run_fatal() {
        assert!(BatchError::invalid_job("empty").is_run_fatal());
        assert!(!BatchError::Load("x".to_string()).is_run_fatal());
        assert!(!BatchError::transform("x").is_run_fatal());
        assert!(!BatchError::Write("x".to_string()).is_run_fatal());
    }
}
