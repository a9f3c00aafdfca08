//! Upload payload encoding: document bytes → base64 inside a JSON body.
//!
//! The upload endpoint sits behind an API gateway that only passes text
//! bodies through to the function, so the document travels as standard
//! (padded) base64 in the `body` field next to its file name.

use crate::model::UploadedDocument;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// JSON body of the upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Base64-encoded document content.
    pub body: String,
    pub filename: String,
}

/// Encode a document for the upload endpoint.
pub fn encode_document(doc: &UploadedDocument) -> UploadPayload {
    let body = STANDARD.encode(&doc.bytes);
    debug!("Encoded '{}' → {} bytes base64", doc.name, body.len());

    UploadPayload {
        body,
        filename: doc.name.clone(),
    }
}

/// Recover the document from an upload payload.
pub fn decode_payload(payload: &UploadPayload) -> Result<UploadedDocument, base64::DecodeError> {
    let bytes = STANDARD.decode(&payload.body)?;
    Ok(UploadedDocument::new(payload.filename.clone(), bytes))
}
