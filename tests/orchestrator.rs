//! Orchestrator scenarios against a scripted in-memory backend.
//!
//! The backend counts calls per endpoint so the tests can assert that a failed
//! upload never reaches the analyze step.

use doc_analyzer::{
    AnalysisProgressCallback, AnalysisResponse, AnalysisResult, AnalysisState, Analyzer,
    AnalyzerConfig, AnalyzerError, DocumentBackend, ProgressCallback, QuerySpec, StorageLocator,
    TableFragment, UploadReceipt, UploadedDocument,
};
use serde_json::json;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct ScriptedBackend {
    upload_status: u16,
    analyze_status: u16,
    result: AnalysisResult,
    upload_calls: Arc<AtomicUsize>,
    analyze_calls: Arc<AtomicUsize>,
    seen_queries: Arc<Mutex<Vec<QuerySpec>>>,
    seen_locator: Arc<Mutex<Option<StorageLocator>>>,
}

impl ScriptedBackend {
    fn new(upload_status: u16, analyze_status: u16) -> Self {
        Self {
            upload_status,
            analyze_status,
            result: invoice_result(),
            upload_calls: Arc::new(AtomicUsize::new(0)),
            analyze_calls: Arc::new(AtomicUsize::new(0)),
            seen_queries: Arc::new(Mutex::new(Vec::new())),
            seen_locator: Arc::new(Mutex::new(None)),
        }
    }

    fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    fn analyses(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }
}

impl DocumentBackend for ScriptedBackend {
    async fn submit_document(&self, doc: &UploadedDocument) -> Result<UploadReceipt, AnalyzerError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.upload_status != 200 {
            return Err(AnalyzerError::UploadFailed {
                status: self.upload_status,
                body: "Internal Server Error".into(),
            });
        }
        let uri = format!("s3://docs-bucket/{}", doc.name);
        Ok(UploadReceipt {
            locator: StorageLocator::new(uri.clone()),
            raw: json!({ "body": json!({ "s3_uri": uri }).to_string() }),
        })
    }

    async fn analyze_document(
        &self,
        locator: &StorageLocator,
        queries: &[QuerySpec],
    ) -> Result<AnalysisResponse, AnalyzerError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_queries.lock().unwrap() = queries.to_vec();
        *self.seen_locator.lock().unwrap() = Some(locator.clone());
        if self.analyze_status != 200 {
            return Err(AnalyzerError::AnalysisFailed {
                status: self.analyze_status,
                body: "Forbidden".into(),
            });
        }
        let raw = json!({ "body": serde_json::to_string(&self.result).unwrap() });
        Ok(AnalysisResponse {
            result: self.result.clone(),
            raw,
        })
    }
}

fn invoice_result() -> AnalysisResult {
    let record = |v: serde_json::Value| v.as_object().cloned().unwrap();
    AnalysisResult {
        key_value_pairs: vec![record(json!({"Key": "Invoice #", "Value": "INV-0042"}))],
        tables: vec![
            TableFragment::new("Date:", 1, 1),
            TableFragment::new("2024-05-01", 1, 2),
            TableFragment::new("Item", 1, 1),
            TableFragment::new("Amount", 1, 2),
            TableFragment::new("Widget", 2, 1),
            TableFragment::new("$12.00", 2, 2),
        ],
        queries: vec![
            record(json!({"Query": "What is the total amount due?", "Answer": "$12.00"})),
            record(json!({"Query": "What is the due date?", "Answer": "2024-06-01"})),
        ],
    }
}

fn invoice() -> UploadedDocument {
    UploadedDocument::new("invoice.pdf", b"%PDF-1.7 fake".to_vec())
}

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl AnalysisProgressCallback for EventLog {
    fn on_upload_start(&self, filename: &str, _bytes: usize) {
        self.0.lock().unwrap().push(format!("upload:{filename}"));
    }
    fn on_upload_complete(&self, locator: &str) {
        self.0.lock().unwrap().push(format!("stored:{locator}"));
    }
    fn on_analysis_start(&self, _locator: &str, query_count: usize) {
        self.0.lock().unwrap().push(format!("analyze:{query_count}"));
    }
    fn on_analysis_complete(&self, section_count: usize) {
        self.0.lock().unwrap().push(format!("done:{section_count}"));
    }
    fn on_failed(&self, _error: &str) {
        self.0.lock().unwrap().push("failed".into());
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_run_renders_every_section() {
    let backend = ScriptedBackend::new(200, 200);
    let log = Arc::new(EventLog::default());
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default())
        .with_progress(log.clone() as ProgressCallback);

    let outcome = analyzer.run(Some(&invoice())).await.expect("run succeeds");

    assert_eq!(analyzer.state(), AnalysisState::Done);
    assert_eq!(analyzer.failed_stage(), None);
    assert_eq!(outcome.document, "invoice.pdf");
    assert_eq!(outcome.locator.as_str(), "s3://docs-bucket/invoice.pdf");

    let report = &outcome.report;
    assert!(report.key_value_pairs.is_some());
    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.tables[1].cell(1, 0), Some("Widget"));
    assert_eq!(report.queries.as_ref().unwrap().cell(1, 1), Some("2024-06-01"));

    assert_eq!(
        log.events(),
        vec![
            "upload:invoice.pdf",
            "stored:s3://docs-bucket/invoice.pdf",
            "analyze:2",
            "done:4",
        ]
    );
}

#[tokio::test]
async fn locator_and_default_queries_reach_analyze() {
    let backend = ScriptedBackend::new(200, 200);
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default());
    analyzer.run(Some(&invoice())).await.unwrap();

    let queries = backend.seen_queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            QuerySpec::new("What is the total amount due?"),
            QuerySpec::new("What is the due date?"),
        ]
    );
    assert_eq!(
        backend.seen_locator.lock().unwrap().as_ref().map(|l| l.as_str().to_string()),
        Some("s3://docs-bucket/invoice.pdf".to_string())
    );
}

#[tokio::test]
async fn upload_failure_never_contacts_analyze() {
    let backend = ScriptedBackend::new(500, 200);
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default());

    let err = analyzer.run(Some(&invoice())).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::UploadFailed { status: 500, .. }), "got: {err:?}");
    assert_eq!(analyzer.state(), AnalysisState::Failed);
    assert_eq!(analyzer.failed_stage(), Some(AnalysisState::Uploading));
    assert_eq!(backend.uploads(), 1);
    assert_eq!(backend.analyses(), 0);
}

#[tokio::test]
async fn analysis_failure_renders_nothing() {
    let backend = ScriptedBackend::new(200, 403);
    let log = Arc::new(EventLog::default());
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default())
        .with_progress(log.clone() as ProgressCallback);

    let err = analyzer.run(Some(&invoice())).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::AnalysisFailed { status: 403, .. }), "got: {err:?}");
    assert_eq!(analyzer.failed_stage(), Some(AnalysisState::Analyzing));
    assert_eq!(backend.analyses(), 1);
    let events = log.events();
    assert_eq!(events.last().map(String::as_str), Some("failed"));
    assert!(!events.iter().any(|e| e.starts_with("done:")));
}

#[tokio::test]
async fn missing_document_makes_no_calls() {
    let backend = ScriptedBackend::new(200, 200);
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default());

    let err = analyzer.run(None).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::NoDocument));
    assert_eq!(analyzer.state(), AnalysisState::Failed);
    assert_eq!(analyzer.failed_stage(), Some(AnalysisState::Idle));
    assert_eq!(backend.uploads(), 0);
    assert_eq!(backend.analyses(), 0);
}

#[tokio::test]
async fn unsupported_file_fails_before_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"\x89PNG").unwrap();

    let backend = ScriptedBackend::new(200, 200);
    let mut analyzer = Analyzer::new(backend.clone(), AnalyzerConfig::default());
    let err = analyzer.run_file(&path).await.unwrap_err();

    assert!(matches!(err, AnalyzerError::UnsupportedFileType { .. }), "got: {err:?}");
    assert_eq!(analyzer.failed_stage(), Some(AnalysisState::Idle));
    assert_eq!(backend.uploads(), 0);
}

#[tokio::test]
async fn run_file_uses_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("receipt.txt");
    std::fs::write(&path, "Item  Widget  $12.00").unwrap();

    let backend = ScriptedBackend::new(200, 200);
    let mut analyzer = Analyzer::new(backend, AnalyzerConfig::default());
    let outcome = analyzer.run_file(&path).await.unwrap();
    assert_eq!(outcome.locator.as_str(), "s3://docs-bucket/receipt.txt");
}

#[tokio::test]
async fn each_run_starts_fresh() {
    let mut analyzer = Analyzer::new(ScriptedBackend::new(200, 200), AnalyzerConfig::default());

    assert!(analyzer.run(None).await.is_err());
    assert_eq!(analyzer.state(), AnalysisState::Failed);

    analyzer.run(Some(&invoice())).await.unwrap();
    assert_eq!(analyzer.state(), AnalysisState::Done);
    assert_eq!(analyzer.failed_stage(), None);
}

#[tokio::test]
async fn empty_result_is_not_an_error() {
    let mut backend = ScriptedBackend::new(200, 200);
    backend.result = AnalysisResult::default();
    let mut analyzer = Analyzer::new(backend, AnalyzerConfig::default());

    let outcome = analyzer.run(Some(&invoice())).await.unwrap();
    assert!(outcome.report.is_empty());
    assert_eq!(analyzer.state(), AnalysisState::Done);
}

#[tokio::test]
async fn custom_markers_change_table_split() {
    let config = AnalyzerConfig::builder()
        .table_markers(["Item"])
        .build()
        .unwrap();
    let mut analyzer = Analyzer::new(ScriptedBackend::new(200, 200), config);

    let outcome = analyzer.run(Some(&invoice())).await.unwrap();
    assert_eq!(outcome.report.tables.len(), 1);
    assert_eq!(outcome.report.tables[0].cell(0, 0), Some("Item"));
}

// ── Injected logger ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn captured_logger() -> (SharedBuf, tracing::Dispatch) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buf, tracing::Dispatch::new(subscriber))
}

#[tokio::test]
async fn injected_logger_receives_run_logs() {
    let (buf, dispatch) = captured_logger();
    let mut analyzer = Analyzer::new(ScriptedBackend::new(500, 200), AnalyzerConfig::default())
        .with_logger(dispatch);
    let _ = analyzer.run(Some(&invoice())).await;

    let logs = buf.text();
    assert!(logs.contains("Sending document for analysis"), "logs: {logs}");
    assert!(logs.contains("Analysis failed"), "logs: {logs}");
    assert!(logs.contains("invoice.pdf"), "logs: {logs}");
}

#[tokio::test]
async fn injected_logger_receives_load_failures() {
    let (buf, dispatch) = captured_logger();
    let backend = ScriptedBackend::new(200, 200);
    let mut analyzer =
        Analyzer::new(backend.clone(), AnalyzerConfig::default()).with_logger(dispatch);

    let err = analyzer.run_file("photo.png").await.unwrap_err();
    assert!(matches!(err, AnalyzerError::UnsupportedFileType { .. }), "got: {err:?}");
    assert_eq!(analyzer.failed_stage(), Some(AnalysisState::Idle));
    assert_eq!(backend.uploads(), 0);

    let logs = buf.text();
    assert!(logs.contains("Analysis failed while Idle"), "logs: {logs}");
    assert!(logs.contains("photo.png"), "logs: {logs}");
}

#[tokio::test]
async fn injected_logger_follows_run_file_through_upload() {
    let (buf, dispatch) = captured_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("receipt.pdf");
    std::fs::write(&path, b"%PDF-1.7 receipt").unwrap();

    let mut analyzer = Analyzer::new(ScriptedBackend::new(200, 200), AnalyzerConfig::default())
        .with_logger(dispatch);
    analyzer.run_file(&path).await.unwrap();

    let logs = buf.text();
    assert!(logs.contains("receipt.pdf"), "logs: {logs}");
    assert!(logs.contains("Document processed successfully"), "logs: {logs}");
}
