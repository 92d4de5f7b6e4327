//! Cooperative cancellation (spec §5): a cheap flag a host can share across
//! threads and flip to interrupt a span walk between atomic blocks or at a
//! paragraph/sentence split point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ChunkError, Result};

/// A shareable, clonable cancellation flag. Cloning shares the same
/// underlying atomic; every clone observes a `cancel()` from any other.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Err(ChunkError::Cancelled)` if cancellation has fired;
    /// strategies call this at span boundaries.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ChunkError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());
    }

    #[test]
    fn cancel_propagates_to_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(ChunkError::Cancelled)));
    }
}
