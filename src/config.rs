//! Configuration types for a document analysis run.
//!
//! Everything a run needs to know (where the two backend endpoints live, which
//! questions to ask, how to find table boundaries, how long to wait) lives in
//! [`AnalyzerConfig`], built via its [`AnalyzerConfigBuilder`]. The builder
//! clamps numeric knobs and `build()` rejects endpoints that are not absolute
//! HTTP(S) URLs, so an invalid config never reaches the network.

use crate::error::AnalyzerError;
use crate::model::{default_queries, QuerySpec};
use serde::{Deserialize, Serialize};

/// Upload endpoint of the reference deployment.
pub const DEFAULT_UPLOAD_ENDPOINT: &str =
    "https://umpg12ojh0.execute-api.us-east-1.amazonaws.com/default/csci5409_proj_lambda_s3";

/// Analyze endpoint of the reference deployment.
pub const DEFAULT_ANALYZE_ENDPOINT: &str =
    "https://umpg12ojh0.execute-api.us-east-1.amazonaws.com/default/csci5409_proj_lambda";

/// Cell texts that open a new table region.
pub const DEFAULT_TABLE_MARKERS: [&str; 2] = ["Date:", "Item"];

/// Bounds for [`AnalyzerConfig::timeout_secs`].
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// File extensions the backend knows how to analyze.
pub const DEFAULT_ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Configuration for a document analysis run.
///
/// # Example
/// ```rust
/// use doc_analyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .upload_endpoint("https://api.example.com/upload")
///     .analyze_endpoint("https://api.example.com/analyze")
///     .timeout_secs(15)
///     .build()
///     .unwrap();
/// assert_eq!(config.queries.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Endpoint receiving the base64 document. Default: [`DEFAULT_UPLOAD_ENDPOINT`].
    pub upload_endpoint: String,

    /// Endpoint receiving the storage locator and queries. Default: [`DEFAULT_ANALYZE_ENDPOINT`].
    pub analyze_endpoint: String,

    /// Questions sent with every analysis, in display order.
    pub queries: Vec<QuerySpec>,

    /// Exact cell texts that start a new table region. Default: `Date:`, `Item`.
    pub table_markers: Vec<String>,

    /// Lower-case extensions accepted by [`crate::pipeline::input::load_document`].
    pub accepted_extensions: Vec<String>,

    /// Per-request timeout in seconds. Range: 1–600. Default: 30.
    ///
    /// The backend is a cold-starting serverless function; the first call
    /// after idle time routinely takes several seconds.
    pub timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            analyze_endpoint: DEFAULT_ANALYZE_ENDPOINT.to_string(),
            queries: default_queries(),
            table_markers: DEFAULT_TABLE_MARKERS.iter().map(|m| m.to_string()).collect(),
            accepted_extensions: DEFAULT_ACCEPTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            timeout_secs: 30,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn upload_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.upload_endpoint = url.into();
        self
    }

    pub fn analyze_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.analyze_endpoint = url.into();
        self
    }

    /// Replace the query list. An empty iterator keeps the defaults.
    pub fn queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queries: Vec<QuerySpec> = queries.into_iter().map(QuerySpec::new).collect();
        if !queries.is_empty() {
            self.config.queries = queries;
        }
        self
    }

    /// Replace the table markers. An empty iterator keeps the defaults.
    pub fn table_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers.into_iter().map(Into::into).collect();
        if !markers.is_empty() {
            self.config.table_markers = markers;
        }
        self
    }

    pub fn accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.accepted_extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        let c = &self.config;
        validate_endpoint("upload", &c.upload_endpoint)?;
        validate_endpoint("analyze", &c.analyze_endpoint)?;
        if c.queries.iter().any(|q| q.text.trim().is_empty()) {
            return Err(AnalyzerError::InvalidConfig(
                "queries must not be blank".into(),
            ));
        }
        if c.accepted_extensions.is_empty() {
            return Err(AnalyzerError::InvalidConfig(
                "at least one accepted extension is required".into(),
            ));
        }
        Ok(self.config)
    }
}

fn validate_endpoint(name: &str, url: &str) -> Result<(), AnalyzerError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| {
        AnalyzerError::InvalidConfig(format!("{name} endpoint '{url}' is not a valid URL: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AnalyzerError::InvalidConfig(format!(
            "{name} endpoint must use http or https, got '{other}'"
        ))),
    }
}
