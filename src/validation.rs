//! # Document Validation Module
//!
//! Pre-dispatch validation of uploaded documents. Runs before any OCR or
//! PDF collaborator is touched, so an invalid upload never triggers partial
//! work. Media type membership is enforced earlier, when the declared MIME
//! string is parsed into [`crate::document::MediaType`].

use tracing::warn;

use crate::config::MAX_DOCUMENT_BYTES;
use crate::document::SourceDocument;
use crate::errors::{ExtractError, ExtractResult};

/// Validate a document against the upload constraints.
///
/// # Arguments
/// * `document` - The document to validate
///
/// # Returns
/// * `Ok(())` - Document may be processed
/// * `Err(ExtractError::Validation)` - Document exceeds the size limit
pub fn validate_document(document: &SourceDocument) -> ExtractResult<()> {
    if document.size() > MAX_DOCUMENT_BYTES {
        warn!(
            size = document.size(),
            limit = MAX_DOCUMENT_BYTES,
            "rejecting oversize document"
        );
        return Err(ExtractError::Validation(format!(
            "file too large: {} bytes (maximum allowed: {} bytes)",
            document.size(),
            MAX_DOCUMENT_BYTES
        )));
    }

    Ok(())
}
