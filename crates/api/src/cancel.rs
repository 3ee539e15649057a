// Path: crates/api/src/cancel.rs
//! Cooperative cancellation.
//!
//! Engines check the token before every delegate call and before every
//! per-statement signature or verification iteration. Cancellation never
//! leaks buffers: everything in flight is owned and dropped normally.

use attest_types::error::DataIntegrityError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns `Err(Cancelled)` once the token is cancelled.
    pub fn checkpoint(&self) -> Result<(), DataIntegrityError> {
        if self.is_cancelled() {
            Err(DataIntegrityError::Cancelled)
        } else {
            Ok(())
        }
    }
}
