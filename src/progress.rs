//! Progress-callback trait for per-page parsing events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the document's pages.
//!
//! Callbacks are the least-invasive integration point: callers can forward
//! events to a terminal progress bar, a GUI status line, or a log sink
//! without the library knowing anything about the host application. The
//! trait is `Send + Sync` so a single callback can serve a multi-file batch
//! run driven from a worker thread.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the PDF is opened, before any page is parsed.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages in the document
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after one page's lines have been extracted and parsed.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `records`     — participant records recovered from this page
    fn on_page_parsed(&self, page_num: usize, total_pages: usize, records: usize) {
        let _ = (page_num, total_pages, records);
    }

    /// Called once after all pages are parsed and the standings are sorted.
    ///
    /// # Arguments
    /// * `total_pages`  — total pages in the document
    /// * `record_count` — records in the final standings
    fn on_conversion_complete(&self, total_pages: usize, record_count: usize) {
        let _ = (total_pages, record_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        pages: AtomicUsize,
        records: AtomicUsize,
        final_count: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_page_parsed(&self, _page_num: usize, _total_pages: usize, records: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
            self.records.fetch_add(records, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_pages: usize, record_count: usize) {
            self.final_count.store(record_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(3);
        cb.on_page_parsed(1, 3, 12);
        cb.on_conversion_complete(3, 35);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            pages: AtomicUsize::new(0),
            records: AtomicUsize::new(0),
            final_count: AtomicUsize::new(0),
        };

        tracker.on_conversion_start(2);
        tracker.on_page_parsed(1, 2, 20);
        tracker.on_page_parsed(2, 2, 15);
        tracker.on_conversion_complete(2, 35);

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.records.load(Ordering::SeqCst), 35);
        assert_eq!(tracker.final_count.load(Ordering::SeqCst), 35);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_parsed(1, 10, 4);
    }
}
