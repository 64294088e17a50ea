// src/analyze/cancel.rs
// =============================================================================
// A shared "stop working" flag.
//
// The orchestrator hands a clone of the same token to every analyzer task,
// and the link checker hands it on to every probe task. Tasks look at it
// before they start a unit of work. Nothing is ever interrupted mid-flight:
// a request that is already on the wire finishes (or times out) normally.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag for every clone of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
