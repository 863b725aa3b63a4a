//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress`] to receive real-time
//! events as workers pick up and finish documents.
//!
//! Callbacks are the least-invasive integration point: callers can forward
//! events to a progress bar, a log sink, or a channel without the library
//! knowing anything about the host application. The trait is `Send + Sync`
//! because events fire concurrently from every worker task.

use crate::stats::DocumentStats;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline coordinator as workers process documents.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `on_document_*` methods may be called concurrently
/// from different worker tasks; implementations must synchronise any shared
/// mutable state themselves.
pub trait BatchProgressCallback: Send + Sync {
    /// Called when a worker takes a document off the queue.
    fn on_document_start(&self, path: &Path) {
        let _ = path;
    }

    /// Called when a document has been fully analysed.
    fn on_document_complete(&self, stats: &DocumentStats) {
        let _ = stats;
    }

    /// Called when a document fails.
    ///
    /// With `skip_failures` set this is the only trace the document leaves;
    /// otherwise the same error also terminates the run.
    fn on_document_error(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called once after every task has finished, on success only.
    fn on_batch_complete(&self, processed: usize, failed: usize) {
        let _ = (processed, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type BatchProgress = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        processed: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_document_start(&self, _path: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _stats: &DocumentStats) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_error(&self, _path: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, processed: usize, _failed: usize) {
            self.processed.store(processed, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_document_start(Path::new("a.pdf"));
        cb.on_document_complete(&DocumentStats::new("a.pdf", 1, 1));
        cb.on_document_error(Path::new("b.pdf"), "some error");
        cb.on_batch_complete(1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            processed: AtomicUsize::new(0),
        };

        tracker.on_document_start(Path::new("a.pdf"));
        tracker.on_document_complete(&DocumentStats::new("a.pdf", 10, 0));
        tracker.on_document_start(Path::new("b.pdf"));
        tracker.on_document_error(Path::new("b.pdf"), "render glitch");
        tracker.on_batch_complete(1, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.processed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: BatchProgress = Arc::new(NoopProgressCallback);
        cb.on_document_start(Path::new("a.pdf"));
        cb.on_batch_complete(0, 0);
    }
}
