//! Cooperative cancellation flag
//!
//! One shared boolean, written by the front-end and read by the worker at
//! the top of each iteration. Never preemptive: an in-flight item always
//! finishes before the flag is honored, so a cancel request observed one
//! iteration late is acceptable and no locking is needed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between the shell and the worker
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation before the next item starts
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_unset() {
        assert!(!CancelFlag::new().is_requested());
    }

    #[test]
    fn test_request_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let clone = flag.clone();

        clone.request();
        assert!(flag.is_requested());
        assert!(clone.is_requested());

        // Requesting twice is harmless
        flag.request();
        assert!(flag.is_requested());
    }

    #[test]
    fn test_request_from_another_thread() {
        let flag = CancelFlag::new();
        let clone = flag.clone();

        std::thread::spawn(move || clone.request())
            .join()
            .expect("thread join");

        assert!(flag.is_requested());
    }
}
