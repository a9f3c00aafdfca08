//! Backend client: the only stage with network I/O.
//!
//! [`DocumentBackend`] is the seam between the orchestrator and the two
//! remote endpoints. [`HttpBackend`] is the production implementation; tests
//! substitute scripted backends to count calls and force failures.
//!
//! Each operation performs exactly one HTTP POST. There is no retry: any
//! non-200 status, transport error or timeout is returned to the caller as-is.

use crate::config::{AnalyzerConfig, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use crate::error::AnalyzerError;
use crate::model::{
    AnalysisResponse, AnalysisResult, QuerySpec, StorageLocator, UploadReceipt, UploadedDocument,
};
use crate::pipeline::{encode, envelope};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Content type sent with the upload request.
///
/// The body is JSON, but the deployed gateway routes on this header and
/// rejects `application/json` on the upload path.
pub const UPLOAD_CONTENT_TYPE: &str = "application/pdf";

/// Content type sent with the analyze request.
pub const ANALYZE_CONTENT_TYPE: &str = "application/json";

/// The two calls the orchestrator makes, in order.
pub trait DocumentBackend {
    /// Upload the document; the receipt carries the locator for [`Self::analyze_document`].
    fn submit_document(
        &self,
        doc: &UploadedDocument,
    ) -> impl Future<Output = Result<UploadReceipt, AnalyzerError>> + Send;

    /// Run analysis on a previously uploaded document.
    fn analyze_document(
        &self,
        locator: &StorageLocator,
        queries: &[QuerySpec],
    ) -> impl Future<Output = Result<AnalysisResponse, AnalyzerError>> + Send;
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    s3_uri: &'a StorageLocator,
    queries_config: &'a [QuerySpec],
}

/// [`DocumentBackend`] over HTTPS with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    upload_endpoint: String,
    analyze_endpoint: String,
    timeout_secs: u64,
}

impl HttpBackend {
    /// Build the client. The timeout is held to 1–600 s even for configs
    /// assembled without the builder.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let timeout_secs = config.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            upload_endpoint: config.upload_endpoint.clone(),
            analyze_endpoint: config.analyze_endpoint.clone(),
            timeout_secs,
        })
    }

    /// Send `request` and return status plus response text.
    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), AnalyzerError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        debug!("{} → HTTP {} ({} bytes)", endpoint, status.as_u16(), text.len());
        Ok((status, text))
    }

    fn transport_error(&self, endpoint: &str, e: reqwest::Error) -> AnalyzerError {
        if e.is_timeout() {
            AnalyzerError::NetworkTimeout {
                endpoint: endpoint.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            AnalyzerError::Network {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl DocumentBackend for HttpBackend {
    async fn submit_document(&self, doc: &UploadedDocument) -> Result<UploadReceipt, AnalyzerError> {
        info!("Sending document '{}' to upload endpoint", doc.name);
        let payload = encode::encode_document(doc);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| AnalyzerError::Internal(format!("serialising upload payload: {e}")))?;

        debug!("POST {} ({} bytes, {})", self.upload_endpoint, body.len(), UPLOAD_CONTENT_TYPE);
        let request = self
            .client
            .post(&self.upload_endpoint)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(body);
        let (status, text) = self.send(&self.upload_endpoint, request).await?;
        if status != StatusCode::OK {
            warn!("Upload rejected: HTTP {}", status.as_u16());
            return Err(AnalyzerError::UploadFailed {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw = envelope::parse_outer(&text, "upload endpoint")?;
        let locator = envelope::extract_locator(&raw)?;
        info!("Document stored at {}", locator);
        Ok(UploadReceipt { locator, raw })
    }

    async fn analyze_document(
        &self,
        locator: &StorageLocator,
        queries: &[QuerySpec],
    ) -> Result<AnalysisResponse, AnalyzerError> {
        info!("Requesting analysis of {} with {} queries", locator, queries.len());
        let request = AnalyzeRequest {
            s3_uri: locator,
            queries_config: queries,
        };
        debug!("POST {} ({})", self.analyze_endpoint, ANALYZE_CONTENT_TYPE);
        // `json` sets Content-Type: application/json itself.
        let builder = self.client.post(&self.analyze_endpoint).json(&request);
        let (status, text) = self.send(&self.analyze_endpoint, builder).await?;
        if status != StatusCode::OK {
            warn!("Analysis rejected: HTTP {}", status.as_u16());
            return Err(AnalyzerError::AnalysisFailed {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw = envelope::parse_outer(&text, "analyze endpoint")?;
        let result: AnalysisResult = envelope::decode_body(&raw, "analyze endpoint")?;
        debug!(
            "Analysis returned {} key-value pairs, {} table fragments, {} query answers",
            result.key_value_pairs.len(),
            result.tables.len(),
            result.queries.len()
        );
        Ok(AnalysisResponse { result, raw })
    }
}
