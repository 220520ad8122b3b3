//! # Document Processing Pipeline
//!
//! The router tying the pieces together. One call to
//! [`Extractor::process`] handles one document: validation first, then
//! dispatch by declared media type to either the PDF text-layer path or the
//! image pipeline (binarize, dual-pass recognize, correct), normalized to a
//! single [`ExtractionResult`] shape.

use std::sync::Arc;
use tracing::info;

use crate::config::OcrConfig;
use crate::document::{ExtractionResult, SourceDocument};
use crate::error_correction::correct_ocr_text;
use crate::errors::{ExtractError, ExtractResult};
use crate::ocr::{recognize_image, OcrEngine, TesseractEngine};
use crate::pdf::{extract_pdf_text, PdfExtractOpener, PdfOpener};
use crate::preprocessing::{binarize, decode_image, encode_png};
use crate::progress::ProgressReporter;
use crate::validation::validate_document;

/// One-document-per-call text extractor.
///
/// Owns the two external collaborators; every `process` call is otherwise
/// self-contained, so a single `Extractor` can serve concurrent requests.
pub struct Extractor {
    engine: Arc<dyn OcrEngine>,
    pdf_opener: Arc<dyn PdfOpener>,
}

impl Extractor {
    /// Create an extractor wired to the production collaborators
    /// (Tesseract OCR, `pdf-extract`).
    pub fn new(config: OcrConfig) -> Self {
        Self {
            engine: Arc::new(TesseractEngine::new(config)),
            pdf_opener: Arc::new(PdfExtractOpener),
        }
    }

    /// Create an extractor with caller-supplied collaborators.
    pub fn with_collaborators(
        engine: Arc<dyn OcrEngine>,
        pdf_opener: Arc<dyn PdfOpener>,
    ) -> Self {
        Self { engine, pdf_opener }
    }

    /// Extract text from one document.
    ///
    /// Validates the document before any collaborator is invoked, then runs
    /// the media-type-appropriate path. `progress` receives a monotonically
    /// non-decreasing fraction in [0, 1] over the lifetime of the call.
    pub async fn process(
        &self,
        document: &SourceDocument,
        progress: &ProgressReporter,
    ) -> ExtractResult<ExtractionResult> {
        validate_document(document)?;

        info!(
            media_type = %document.media_type(),
            size = document.size(),
            "processing document"
        );

        let result = if document.media_type().is_pdf() {
            self.process_pdf(document, progress)?
        } else {
            self.process_image(document, progress).await?
        };

        info!(
            chars = result.char_count(),
            confidence = result.confidence,
            "extraction completed"
        );

        Ok(result)
    }

    /// PDF path: text-layer extraction page by page, fixed confidence 100.
    fn process_pdf(
        &self,
        document: &SourceDocument,
        progress: &ProgressReporter,
    ) -> ExtractResult<ExtractionResult> {
        let pages = self
            .pdf_opener
            .open(document.bytes())
            .map_err(|e| ExtractError::PdfExtraction(e.to_string()))?;

        let text = extract_pdf_text(pages.as_ref(), progress)
            .map_err(|e| ExtractError::PdfExtraction(e.to_string()))?;

        Ok(ExtractionResult {
            text,
            confidence: 100.0,
            media_type: document.media_type(),
        })
    }

    /// Raster path: binarize, recognize both variants concurrently, correct
    /// the winner's text.
    async fn process_image(
        &self,
        document: &SourceDocument,
        progress: &ProgressReporter,
    ) -> ExtractResult<ExtractionResult> {
        let decoded = decode_image(document.bytes())
            .map_err(|e| ExtractError::Ocr(format!("{:#}", e)))?;
        let binarized = binarize(&decoded.to_rgba8());
        let binarized_png =
            encode_png(&binarized).map_err(|e| ExtractError::Ocr(format!("{:#}", e)))?;

        let pass = recognize_image(
            document.bytes().to_vec(),
            binarized_png,
            Arc::clone(&self.engine),
            progress,
        )
        .await?;

        Ok(ExtractionResult {
            text: correct_ocr_text(&pass.text),
            confidence: pass.confidence,
            media_type: document.media_type(),
        })
    }
}
