//! Data types exchanged with the analysis backend.
//!
//! Field names on the wire follow the gateway contract (`Text`, `RowIndex`,
//! `keyValuePairs`, `s3_uri`, …); the Rust side uses snake_case and maps
//! through `#[serde(rename)]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A document held in memory for the duration of one run.
///
/// Never persisted locally; the backend stores it and hands back a
/// [`StorageLocator`].
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Display name sent to the backend as `filename`.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("name", &self.name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Opaque reference to where the backend persisted an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocator(String);

impl StorageLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A natural-language question the backend answers about the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(rename = "Text")]
    pub text: String,
}

impl QuerySpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Questions asked when the caller does not supply its own.
pub const DEFAULT_QUERIES: [&str; 2] = ["What is the total amount due?", "What is the due date?"];

/// [`DEFAULT_QUERIES`] as owned [`QuerySpec`]s, in display order.
pub fn default_queries() -> Vec<QuerySpec> {
    DEFAULT_QUERIES.iter().copied().map(QuerySpec::new).collect()
}

/// One row of a key-value or query section, rendered column-per-key.
pub type Record = Map<String, Value>;

/// A piece of cell text positioned by the backend's table detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFragment {
    #[serde(rename = "Text", default)]
    pub text: String,
    #[serde(rename = "RowIndex")]
    pub row_index: u32,
    #[serde(rename = "ColumnIndex")]
    pub column_index: u32,
}

impl TableFragment {
    pub fn new(text: impl Into<String>, row_index: u32, column_index: u32) -> Self {
        Self {
            text: text.into(),
            row_index,
            column_index,
        }
    }
}

/// Structured output of the analyze endpoint.
///
/// All three keys must be present; any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "keyValuePairs")]
    pub key_value_pairs: Vec<Record>,
    pub tables: Vec<TableFragment>,
    pub queries: Vec<Record>,
}

/// Successful upload: the locator plus the undecoded response for display.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub locator: StorageLocator,
    pub raw: Value,
}

/// Successful analysis: the decoded result plus the undecoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub result: AnalysisResult,
    pub raw: Value,
}
