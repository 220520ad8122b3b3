//! # Extraction Error Types
//!
//! This module defines the error types surfaced by the extraction core.
//! Every error renders to a single human-readable message; nothing is
//! retried or swallowed inside the core.

use std::fmt;

/// Errors produced by one extraction request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Rejected before any processing: bad media type or oversize file.
    /// Recoverable by resubmitting a different file.
    Validation(String),
    /// Either concurrent OCR pass failed (or the image could not be decoded
    /// on the way to it). Carries the underlying cause.
    Ocr(String),
    /// The PDF collaborator failed on open or on a page. Carries the
    /// underlying cause; no partial text is returned.
    PdfExtraction(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            ExtractError::Ocr(msg) => write!(f, "[OCR] Failed to process image: {}", msg),
            ExtractError::PdfExtraction(msg) => {
                write!(f, "[PDF] Failed to process PDF: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Result type alias for convenience
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_cause_message() {
        let err = ExtractError::Ocr("engine unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "[OCR] Failed to process image: engine unavailable"
        );

        let err = ExtractError::PdfExtraction("page 3 unreadable".to_string());
        assert_eq!(err.to_string(), "[PDF] Failed to process PDF: page 3 unreadable");

        let err = ExtractError::Validation("file too large".to_string());
        assert_eq!(err.to_string(), "[VALIDATION] file too large");
    }
}
