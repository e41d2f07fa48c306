//! Batch job definition and output-path derivation
//!
//! A [`Job`] is one user-initiated batch: an ordered list of input image
//! paths plus a single output directory. It is validated once at
//! construction and immutable afterwards; the worker consumes it by value.

use crate::error::{BatchError, Result};
use std::path::{Path, PathBuf};

/// Extensions accepted by the file-picker selection path
pub const SELECT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Extensions accepted by the drag-and-drop selection path
pub const DROP_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Check whether a path carries one of the given image extensions
#[must_use]
pub fn is_supported_image(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_lowercase().as_str()))
}

/// One batch of input images plus an output directory
///
/// Input order is preserved exactly; the worker processes items strictly
/// in this order.
#[derive(Debug, Clone)]
pub struct Job {
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl Job {
    /// Create a new job from input paths and an output directory
    ///
    /// An empty input list is refused here rather than producing a
    /// zero-item run; the UI shell keeps its start control disabled for
    /// the same condition.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidJob`] if the input list is empty or
    /// the output directory does not exist or is not a directory.
    pub fn new(inputs: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();

        if inputs.is_empty() {
            return Err(BatchError::invalid_job("job contains no input images"));
        }
        if !output_dir.is_dir() {
            return Err(BatchError::invalid_job(format!(
                "output directory does not exist: {}",
                output_dir.display()
            )));
        }

        Ok(Self { inputs, output_dir })
    }

    /// Input paths in processing order
    #[must_use]
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// The output directory all results are written into
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of items in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// A validated job is never empty, so this always returns false
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Derive the output path for one input: `{stem}_removed.png` in the
    /// output directory
    ///
    /// Two inputs with the same stem map to the same output path; the last
    /// writer wins. This matches the single flat output directory the tool
    /// exposes and is deliberate, not deduplicated.
    #[must_use]
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default();
        self.output_dir
            .join(format!("{}_removed.png", stem.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_input_list_is_refused() {
        let out = TempDir::new().expect("temp dir");
        let err = Job::new(vec![], out.path()).unwrap_err();
        assert!(matches!(err, BatchError::InvalidJob(_)));
        assert!(err.to_string().contains("no input images"));
    }

    #[test]
    fn test_missing_output_dir_is_refused() {
        let err = Job::new(
            vec![PathBuf::from("a.png")],
            PathBuf::from("/definitely/not/here"),
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::InvalidJob(_)));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let out = TempDir::new().expect("temp dir");
        let inputs = vec![
            PathBuf::from("z.png"),
            PathBuf::from("a.jpg"),
            PathBuf::from("m.jpeg"),
        ];
        let job = Job::new(inputs.clone(), out.path()).expect("valid job");
        assert_eq!(job.inputs(), inputs.as_slice());
        assert_eq!(job.len(), 3);
        assert!(!job.is_empty());
    }

    #[test]
    fn test_output_path_derivation() {
        let out = TempDir::new().expect("temp dir");
        let job = Job::new(vec![PathBuf::from("/in/photo.jpg")], out.path()).expect("valid job");

        assert_eq!(
            job.output_path_for(Path::new("/in/photo.jpg")),
            out.path().join("photo_removed.png")
        );
        // Extension is always .png regardless of input format
        assert_eq!(
            job.output_path_for(Path::new("pics/cat.webp")),
            out.path().join("cat_removed.png")
        );
    }

    #[test]
    fn test_output_path_collision_last_write_wins_shape() {
        let out = TempDir::new().expect("temp dir");
        let job = Job::new(vec![PathBuf::from("x.png")], out.path()).expect("valid job");

        // Same stem from different directories collides by design
        assert_eq!(
            job.output_path_for(Path::new("/a/dog.png")),
            job.output_path_for(Path::new("/b/dog.jpg"))
        );
    }

    #[test]
    fn test_supported_image_extensions() {
        assert!(is_supported_image(Path::new("a.PNG"), SELECT_EXTENSIONS));
        assert!(is_supported_image(Path::new("a.jpeg"), SELECT_EXTENSIONS));
        assert!(!is_supported_image(Path::new("a.webp"), SELECT_EXTENSIONS));
        assert!(is_supported_image(Path::new("a.webp"), DROP_EXTENSIONS));
        assert!(is_supported_image(Path::new("a.gif"), DROP_EXTENSIONS));
        assert!(!is_supported_image(Path::new("a.txt"), DROP_EXTENSIONS));
        assert!(!is_supported_image(Path::new("noext"), DROP_EXTENSIONS));
    }
}
