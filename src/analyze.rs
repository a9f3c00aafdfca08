//! Orchestration of one analysis run: load → upload → analyze → present.
//!
//! A run moves through [`AnalysisState`]s and halts at the first error; no
//! step is retried and nothing carries over from one run to the next. The
//! [`Analyzer`] only keeps the state of the most recent run so a front end can
//! show where it stopped.
//!
//! Logging goes through `tracing`. A caller that wants one run's logs routed
//! to its own subscriber passes a [`Dispatch`] via [`Analyzer::with_logger`];
//! the whole chain then runs under it without touching the global default.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::model::{AnalysisResult, StorageLocator, UploadedDocument};
use crate::pipeline::backend::{DocumentBackend, HttpBackend};
use crate::pipeline::{input, present};
use crate::progress::ProgressCallback;
use crate::report::{Report, ReportFormat};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, info_span, warn, Dispatch, Instrument};

/// Where a run currently is, or where the last run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnalysisState {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Done,
    Failed,
}

/// Everything produced by a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Display name of the analyzed document.
    pub document: String,
    pub locator: StorageLocator,
    pub result: AnalysisResult,
    /// Analyze response exactly as received, before unwrapping `body`.
    pub raw: Value,
    pub report: Report,
    pub duration_ms: u64,
}

/// Sequences the two backend calls and hands the result to the presenter.
pub struct Analyzer<B = HttpBackend> {
    backend: B,
    config: AnalyzerConfig,
    progress: Option<ProgressCallback>,
    logger: Option<Dispatch>,
    state: AnalysisState,
    failed_stage: Option<AnalysisState>,
}

impl Analyzer<HttpBackend> {
    /// An analyzer talking to the endpoints named in `config`.
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::new(backend, config))
    }
}

impl<B: DocumentBackend> Analyzer<B> {
    pub fn new(backend: B, config: AnalyzerConfig) -> Self {
        Self {
            backend,
            config,
            progress: None,
            logger: None,
            state: AnalysisState::Idle,
            failed_stage: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Route this analyzer's logs to `dispatch` instead of the global subscriber.
    pub fn with_logger(mut self, dispatch: Dispatch) -> Self {
        self.logger = Some(dispatch);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> AnalysisState {
        self.state
    }

    /// The state the last run was in when it failed; `None` unless it failed.
    pub fn failed_stage(&self) -> Option<AnalysisState> {
        self.failed_stage
    }

    /// Run the full chain for `document`.
    ///
    /// `None` fails with [`AnalyzerError::NoDocument`] before any network call.
    pub async fn run(
        &mut self,
        document: Option<&UploadedDocument>,
    ) -> Result<AnalysisOutcome, AnalyzerError> {
        match self.logger.clone() {
            Some(dispatch) => self.run_traced(document).with_subscriber(dispatch).await,
            None => self.run_traced(document).await,
        }
    }

    /// Load `path` and run the chain on it.
    ///
    /// A document that cannot be loaded fails the run in [`AnalysisState::Idle`].
    pub async fn run_file(&mut self, path: impl AsRef<Path>) -> Result<AnalysisOutcome, AnalyzerError> {
        match self.logger.clone() {
            Some(dispatch) => self.run_file_traced(path).with_subscriber(dispatch).await,
            None => self.run_file_traced(path).await,
        }
    }

    async fn run_file_traced(&mut self, path: impl AsRef<Path>) -> Result<AnalysisOutcome, AnalyzerError> {
        let loaded = input::load_document(path, &self.config.accepted_extensions).await;
        match loaded {
            Ok(doc) => self.run_traced(Some(&doc)).await,
            Err(e) => {
                self.state = AnalysisState::Idle;
                self.failed_stage = None;
                self.fail(&e);
                Err(e)
            }
        }
    }

    async fn run_traced(
        &mut self,
        document: Option<&UploadedDocument>,
    ) -> Result<AnalysisOutcome, AnalyzerError> {
        let name = document.map(|d| d.name.clone()).unwrap_or_default();
        let span = info_span!("analysis", document = %name);
        self.state = AnalysisState::Idle;
        self.failed_stage = None;

        let result = self.execute(document).instrument(span.clone()).await;
        if let Err(ref e) = result {
            let _entered = span.enter();
            self.fail(e);
        }
        result
    }

    async fn execute(
        &mut self,
        document: Option<&UploadedDocument>,
    ) -> Result<AnalysisOutcome, AnalyzerError> {
        let start = Instant::now();
        let doc = document.ok_or(AnalyzerError::NoDocument)?;

        // ── Step 1: Upload ───────────────────────────────────────────────────
        self.state = AnalysisState::Uploading;
        info!("Sending document for analysis ({} bytes)", doc.len());
        if let Some(ref cb) = self.progress {
            cb.on_upload_start(&doc.name, doc.len());
        }
        let receipt = self.backend.submit_document(doc).await?;
        debug!("Upload response: {}", receipt.raw);
        if let Some(ref cb) = self.progress {
            cb.on_upload_complete(receipt.locator.as_str());
        }

        // ── Step 2: Analyze ──────────────────────────────────────────────────
        self.state = AnalysisState::Analyzing;
        if let Some(ref cb) = self.progress {
            cb.on_analysis_start(receipt.locator.as_str(), self.config.queries.len());
        }
        let response = self
            .backend
            .analyze_document(&receipt.locator, &self.config.queries)
            .await?;

        // ── Step 3: Present ──────────────────────────────────────────────────
        let report = present::present(&response.result, &self.config.table_markers);
        let sections = report.sections().count();
        self.state = AnalysisState::Done;
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Document processed successfully: {} sections in {}ms",
            sections, duration_ms
        );
        if let Some(ref cb) = self.progress {
            cb.on_analysis_complete(sections);
        }

        Ok(AnalysisOutcome {
            document: doc.name.clone(),
            locator: receipt.locator,
            result: response.result,
            raw: response.raw,
            report,
            duration_ms,
        })
    }

    fn fail(&mut self, error: &AnalyzerError) {
        warn!("Analysis failed while {:?}: {}", self.state, error);
        self.failed_stage = Some(self.state);
        self.state = AnalysisState::Failed;
        if let Some(ref cb) = self.progress {
            cb.on_failed(&error.to_string());
        }
    }
}

/// Analyze a local document with the HTTP backend.
///
/// # Example
/// ```rust,no_run
/// use doc_analyzer::{analyze_file, AnalyzerConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = analyze_file("invoice.pdf", &AnalyzerConfig::default()).await?;
/// println!("{}", outcome.report);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
) -> Result<AnalysisOutcome, AnalyzerError> {
    Analyzer::from_config(config.clone())?.run_file(path).await
}

/// Analyze a document and write its report to `output_path`.
pub async fn analyze_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    format: ReportFormat,
    config: &AnalyzerConfig,
) -> Result<AnalysisOutcome, AnalyzerError> {
    let outcome = analyze_file(path, config).await?;
    crate::report::write_report(&outcome.report, output_path.as_ref(), format)?;
    Ok(outcome)
}

/// Synchronous wrapper around [`analyze_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_file_sync(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
) -> Result<AnalysisOutcome, AnalyzerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_file(path, config))
}
