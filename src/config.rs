//! # OCR Configuration Module
//!
//! This module defines the configuration for OCR processing: recognition
//! language, Tesseract model selection and page segmentation mode, plus the
//! document size limit enforced before dispatch.

use crate::errors::{ExtractError, ExtractResult};

/// Fixed recognition language for both OCR passes
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Maximum accepted document size in bytes (20 MiB)
pub const MAX_DOCUMENT_BYTES: u64 = 20 * 1024 * 1024;

/// Page Segmentation Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSegMode {
    /// Orientation and script detection (OSD) only
    OsdOnly = 0,
    /// Automatic page segmentation with OSD
    AutoOsd = 1,
    /// Automatic page segmentation, no OSD
    AutoNoOsd = 2,
    /// Fully automatic page segmentation
    #[default]
    Auto = 3,
    /// Assume a single column of text
    SingleColumn = 4,
    /// Assume a single uniform block of vertically aligned text
    SingleBlockVert = 5,
    /// Assume a single uniform block of text
    SingleBlock = 6,
    /// Treat the image as a single text line
    SingleLine = 7,
    /// Treat the image as a single word
    SingleWord = 8,
    /// Treat the image as a single word in a circle
    WordInCircle = 9,
    /// Treat the image as a single character
    SingleChar = 10,
    /// Find as much text as possible in no particular order
    SparseText = 11,
    /// Sparse text with OSD
    SparseTextOsd = 12,
    /// Treat the image as a single text line, bypassing Tesseract-specific hacks
    RawLine = 13,
}

impl PageSegMode {
    /// Convert PSM mode to string value for Tesseract
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSegMode::OsdOnly => "0",
            PageSegMode::AutoOsd => "1",
            PageSegMode::AutoNoOsd => "2",
            PageSegMode::Auto => "3",
            PageSegMode::SingleColumn => "4",
            PageSegMode::SingleBlockVert => "5",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SingleLine => "7",
            PageSegMode::SingleWord => "8",
            PageSegMode::WordInCircle => "9",
            PageSegMode::SingleChar => "10",
            PageSegMode::SparseText => "11",
            PageSegMode::SparseTextOsd => "12",
            PageSegMode::RawLine => "13",
        }
    }
}

/// Tesseract model type for different accuracy/speed trade-offs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ModelType {
    /// Fast model (tessdata_fast) - faster processing, lower accuracy
    #[default]
    Fast,
    /// Best model (tessdata_best) - slower processing, higher accuracy
    Best,
}

impl ModelType {
    /// Get the tessdata directory name for this model type
    pub fn tessdata_dir(&self) -> &'static str {
        match self {
            ModelType::Fast => "tessdata_fast",
            ModelType::Best => "tessdata_best",
        }
    }
}

/// Configuration structure for OCR processing
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// OCR language code (single fixed language, e.g. "eng")
    pub language: String,
    /// Tesseract model type (Fast vs Best accuracy)
    pub model_type: ModelType,
    /// Page segmentation mode for OCR
    pub psm_mode: PageSegMode,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            model_type: ModelType::default(),
            psm_mode: PageSegMode::default(),
        }
    }
}

impl OcrConfig {
    /// Validate OCR configuration parameters
    pub fn validate(&self) -> ExtractResult<()> {
        if self.language.trim().is_empty() {
            return Err(ExtractError::Validation(
                "OCR language cannot be empty".to_string(),
            ));
        }
        if self.language.contains('+') {
            return Err(ExtractError::Validation(format!(
                "a single recognition language is required, got combination: {}",
                self.language
            )));
        }
        Ok(())
    }
}
