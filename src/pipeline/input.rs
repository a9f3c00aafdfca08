//! Input loading: read a user-supplied path into an [`UploadedDocument`].
//!
//! The backend only understands a handful of formats, so the extension is
//! checked before any bytes leave the machine. A wrong extension or an empty
//! file is reported here with a precise error instead of coming back later as
//! an opaque HTTP 500 from the upload endpoint.

use crate::error::AnalyzerError;
use crate::model::UploadedDocument;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a local document, validating extension and size.
///
/// `accepted` holds lower-case extensions without the leading dot. The file
/// name (not the full path) becomes the document's display name.
pub async fn load_document(
    path: impl AsRef<Path>,
    accepted: &[String],
) -> Result<UploadedDocument, AnalyzerError> {
    let path = path.as_ref().to_path_buf();
    check_extension(&path, accepted)?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => AnalyzerError::PermissionDenied { path: path.clone() },
        std::io::ErrorKind::NotFound => AnalyzerError::FileNotFound { path: path.clone() },
        _ => AnalyzerError::Internal(format!("reading '{}': {e}", path.display())),
    })?;

    if bytes.is_empty() {
        return Err(AnalyzerError::EmptyDocument { path });
    }

    let name = display_name(&path);
    debug!("Loaded document '{}' ({} bytes)", name, bytes.len());
    Ok(UploadedDocument::new(name, bytes))
}

/// Reject files whose extension is not in `accepted` (case-insensitive).
pub fn check_extension(path: &Path, accepted: &[String]) -> Result<(), AnalyzerError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if accepted.iter().any(|a| *a == extension) {
        Ok(())
    } else {
        Err(AnalyzerError::UnsupportedFileType {
            path: path.to_path_buf(),
            extension,
            accepted: accepted.join(", "),
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}
