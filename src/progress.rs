//! Progress-callback trait for analysis run events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::analyze::Analyzer::with_progress`] to hear about each stage of the
//! upload → analyze chain as it happens. The CLI uses it to drive a spinner;
//! a web front end could forward the same events to the browser.
//!
//! # Example
//!
//! ```rust
//! use doc_analyzer::AnalysisProgressCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl AnalysisProgressCallback for Counter {
//!     fn on_upload_start(&self, filename: &str, bytes: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Sending {filename} ({bytes} bytes) for analysis...");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by the orchestrator as a run moves through its states.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called just before the document is uploaded.
    fn on_upload_start(&self, filename: &str, bytes: usize) {
        let _ = (filename, bytes);
    }

    /// Called once the backend has stored the document.
    fn on_upload_complete(&self, locator: &str) {
        let _ = locator;
    }

    /// Called just before the analyze request is sent.
    fn on_analysis_start(&self, locator: &str, query_count: usize) {
        let _ = (locator, query_count);
    }

    /// Called when the analysis succeeded and the report is built.
    ///
    /// # Arguments
    /// * `section_count`: number of tables the report will show
    fn on_analysis_complete(&self, section_count: usize) {
        let _ = section_count;
    }

    /// Called once when the run halts on an error.
    fn on_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type held by [`crate::analyze::Analyzer`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
