//! Pipeline stages for document analysis.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ backend ──▶ envelope ──▶ tables ──▶ present
//! (path)    (base64)   (2× POST)   (2-step      (pivot     (labeled
//!                                   decode)      grids)     tables)
//! ```
//!
//! 1. [`input`]   : read a local file, check its extension
//! 2. [`encode`]  : wrap the bytes as base64 in the upload JSON body
//! 3. [`backend`] : upload, then analyze; the only stage with network I/O
//! 4. [`envelope`]: unwrap the gateway's JSON-in-a-string `body` field
//! 5. [`tables`]  : split fragments at marker cells and pivot each region
//! 6. [`present`] : turn the result into a [`crate::report::Report`]

pub mod backend;
pub mod encode;
pub mod envelope;
pub mod input;
pub mod present;
pub mod tables;
