//! # doc-analyzer
//!
//! Send a document to a remote analysis backend and render what comes back
//! (key-value pairs, tables, answers to natural-language queries) as
//! plain-text tables.
//!
//! The heavy lifting (text extraction, layout analysis, table detection,
//! query answering) happens in two serverless endpoints this crate does not
//! own. What lives here is the client side of that contract plus the one
//! piece of real logic it needs: rebuilding table grids from the flat list of
//! positioned cell fragments the backend returns.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Input     read a PDF / DOCX / TXT from disk
//!  ├─ 2. Upload    base64 body → upload endpoint → storage locator
//!  ├─ 3. Analyze   locator + queries → analyze endpoint
//!  ├─ 4. Unwrap    decode the JSON string inside the gateway `body`
//!  ├─ 5. Tables    split fragments at marker cells, pivot each region
//!  └─ 6. Report    key-value pairs, tables, query answers
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc_analyzer::{analyze_file, AnalyzerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyzerConfig::builder()
//!         .upload_endpoint("https://api.example.com/upload")
//!         .analyze_endpoint("https://api.example.com/analyze")
//!         .build()?;
//!     let outcome = analyze_file("invoice.pdf", &config).await?;
//!     print!("{}", outcome.report);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc-analyzer` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze_file, analyze_file_sync, analyze_to_file, AnalysisOutcome, AnalysisState, Analyzer,
};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::AnalyzerError;
pub use model::{
    AnalysisResponse, AnalysisResult, QuerySpec, Record, StorageLocator, TableFragment,
    UploadReceipt, UploadedDocument,
};
pub use pipeline::backend::{DocumentBackend, HttpBackend};
pub use pipeline::tables::{reconstruct_tables, TableGrid};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
pub use report::{LabeledTable, Report, ReportFormat};
