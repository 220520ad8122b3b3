//! # Document Types Module
//!
//! This module defines the types that cross the extraction core's boundary:
//! the validated input document and the uniform extraction result.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ExtractError, ExtractResult};

/// Declared media type of an uploaded document.
///
/// The enum covers exactly the set of types the extractor accepts. Anything
/// else is rejected at parse time with a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// JPEG image (`image/jpeg`, `image/jpg`)
    Jpeg,
    /// PNG image (`image/png`)
    Png,
    /// GIF image (`image/gif`)
    Gif,
    /// TIFF image (`image/tiff`)
    Tiff,
    /// PDF document (`application/pdf`)
    Pdf,
}

impl MediaType {
    /// Parse a declared MIME string into a supported media type.
    ///
    /// Accepts the `image/jpg` alias some browsers report alongside the
    /// canonical `image/jpeg`.
    pub fn from_mime(mime: &str) -> ExtractResult<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            "image/gif" => Ok(MediaType::Gif),
            "image/tiff" => Ok(MediaType::Tiff),
            "application/pdf" => Ok(MediaType::Pdf),
            other => Err(ExtractError::Validation(format!(
                "unsupported media type: {} (expected an image or PDF file)",
                other
            ))),
        }
    }

    /// Canonical MIME string for this media type.
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::Tiff => "image/tiff",
            MediaType::Pdf => "application/pdf",
        }
    }

    /// Whether this document takes the PDF text-layer path instead of OCR.
    pub fn is_pdf(&self) -> bool {
        matches!(self, MediaType::Pdf)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

/// An uploaded document awaiting extraction.
///
/// Immutable once constructed. Size limits are enforced by
/// [`crate::validation::validate_document`] before any processing starts,
/// not by the constructor.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    bytes: Vec<u8>,
    media_type: MediaType,
}

impl SourceDocument {
    /// Create a document from raw bytes and an already-parsed media type.
    pub fn new(bytes: Vec<u8>, media_type: MediaType) -> Self {
        Self { bytes, media_type }
    }

    /// Create a document from raw bytes and the MIME string declared by the
    /// uploader. Fails with a validation error for MIME types outside the
    /// supported set.
    pub fn from_upload(bytes: Vec<u8>, declared_mime: &str) -> ExtractResult<Self> {
        let media_type = MediaType::from_mime(declared_mime)?;
        Ok(Self::new(bytes, media_type))
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared media type.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Document size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The uniform output of one extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted (and, on the OCR path, post-corrected) text.
    pub text: String,
    /// Confidence score in 0-100. Fixed at 100 on the PDF path, where the
    /// text layer carries no native confidence.
    pub confidence: f32,
    /// Media type of the source document.
    pub media_type: MediaType,
}

impl ExtractionResult {
    /// Number of characters in the extracted text. Derived, never stored.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_accepts_supported_types() {
        assert_eq!(MediaType::from_mime("image/jpeg").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("image/jpg").unwrap(), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("image/png").unwrap(), MediaType::Png);
        assert_eq!(MediaType::from_mime("image/gif").unwrap(), MediaType::Gif);
        assert_eq!(MediaType::from_mime("image/tiff").unwrap(), MediaType::Tiff);
        assert_eq!(
            MediaType::from_mime("application/pdf").unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_from_mime_rejects_unknown_types() {
        for mime in ["image/webp", "image/bmp", "text/plain", "application/zip", ""] {
            let err = MediaType::from_mime(mime).unwrap_err();
            assert!(matches!(err, ExtractError::Validation(_)), "{}", mime);
        }
    }

    #[test]
    fn test_from_upload_carries_bytes_and_type() {
        let doc = SourceDocument::from_upload(vec![1, 2, 3], "image/png").unwrap();
        assert_eq!(doc.bytes(), &[1, 2, 3]);
        assert_eq!(doc.media_type(), MediaType::Png);
        assert_eq!(doc.size(), 3);
    }

    #[test]
    fn test_char_count_is_derived_from_text() {
        let result = ExtractionResult {
            text: "héllo".to_string(),
            confidence: 87.5,
            media_type: MediaType::Jpeg,
        };
        assert_eq!(result.char_count(), 5);
    }
}
