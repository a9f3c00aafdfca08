//! Error types for the doc-analyzer library.
//!
//! Every failure is fatal for the current run: the upload → analyze chain
//! either completes and produces a report, or halts at the first error. There
//! is no partial-success state and nothing is retried, so a single enum
//! covers all of it.
//!
//! Variants fall into three groups:
//!
//! * **Input**: the document could not be loaded (missing file, wrong type).
//! * **Backend**: one of the two remote calls failed, timed out, or answered
//!   with a body that does not match the gateway contract.
//! * **Local**: invalid configuration or a report that could not be written.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doc-analyzer library.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The run was triggered without a document.
    #[error("No document provided.\nSelect a PDF, DOCX or TXT file to analyze.")]
    NoDocument,

    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one the backend accepts.
    #[error("Unsupported document type '{extension}' for '{path}'\nAccepted types: {accepted}")]
    UnsupportedFileType {
        path: PathBuf,
        extension: String,
        accepted: String,
    },

    /// The file exists but contains no bytes.
    #[error("Document '{path}' is empty")]
    EmptyDocument { path: PathBuf },

    // ── Backend errors ────────────────────────────────────────────────────
    /// The upload endpoint answered with a non-200 status.
    #[error("Failed to upload document: HTTP {status}: {body}")]
    UploadFailed { status: u16, body: String },

    /// The analyze endpoint answered with a non-200 status.
    #[error("Processing error: HTTP {status}: {body}")]
    AnalysisFailed { status: u16, body: String },

    /// A backend call did not complete within the configured timeout.
    #[error("Request to '{endpoint}' timed out after {secs}s\nIncrease --timeout or retry later.")]
    NetworkTimeout { endpoint: String, secs: u64 },

    /// The request never produced an HTTP response (DNS, TLS, refused connection).
    #[error("Could not reach '{endpoint}': {reason}\nCheck your internet connection.")]
    Network { endpoint: String, reason: String },

    /// A response body did not match the expected envelope or payload shape.
    #[error("Malformed response from {context}: {detail}")]
    MalformedResponse { context: String, detail: String },

    // ── Local errors ──────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write the report file.
    #[error("Failed to write report '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// Shorthand for a [`AnalyzerError::MalformedResponse`].
    pub(crate) fn malformed(context: impl Into<String>, detail: impl ToString) -> Self {
        AnalyzerError::MalformedResponse {
            context: context.into(),
            detail: detail.to_string(),
        }
    }
}
