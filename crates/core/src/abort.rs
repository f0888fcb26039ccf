//! Cancellation token shared between the HTTP layer and the loop.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// An opaque cancellation token.
///
/// Cloned handles observe the same flag. The analysis loop checks the
/// token before processing every stream delta; setting it yields a
/// partial result rather than an error.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Create a new, unset handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
