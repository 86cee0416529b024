use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives one notification per finished origin search.
///
/// Workers call it concurrently, failed searches included.
pub trait ProgressObserver: Sync {
    fn origin_done(&self);
}

/// Discards progress notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn origin_done(&self) {}
}

impl ProgressObserver for AtomicUsize {
    fn origin_done(&self) {
        self.fetch_add(1, Ordering::Relaxed);
    }
}
