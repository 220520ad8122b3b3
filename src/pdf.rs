//! # PDF Text Extraction Module
//!
//! PDF documents carry a text layer, so no OCR runs on this path. The
//! parser is an external collaborator behind the [`PdfOpener`]/[`PdfPages`]
//! traits; the production backend is the `pdf-extract` crate. Page texts are
//! concatenated with a blank-line separator after each page.

use tracing::debug;

use crate::progress::ProgressReporter;

/// An opened PDF document exposing per-page plain text.
pub trait PdfPages: Send {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Plain text of the page at `index` (zero-based).
    fn page_text(&self, index: usize) -> anyhow::Result<String>;
}

/// Opens PDF bytes into a [`PdfPages`] document.
pub trait PdfOpener: Send + Sync {
    /// Parse raw PDF bytes.
    fn open(&self, bytes: &[u8]) -> anyhow::Result<Box<dyn PdfPages>>;
}

/// Production [`PdfOpener`] backed by the `pdf-extract` crate.
pub struct PdfExtractOpener;

impl PdfOpener for PdfExtractOpener {
    fn open(&self, bytes: &[u8]) -> anyhow::Result<Box<dyn PdfPages>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| anyhow::anyhow!("could not read PDF document: {}", e))?;
        debug!(page_count = pages.len(), "opened PDF document");
        Ok(Box::new(ExtractedPages { pages }))
    }
}

/// Pages materialized by `pdf-extract` at open time.
struct ExtractedPages {
    pages: Vec<String>,
}

impl PdfPages for ExtractedPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> anyhow::Result<String> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("page index {} out of range", index))
    }
}

/// Concatenate every page's text, appending a blank-line separator after
/// each page, and report progress as `pages_done / page_count`.
pub fn extract_pdf_text(
    document: &dyn PdfPages,
    progress: &ProgressReporter,
) -> anyhow::Result<String> {
    let page_count = document.page_count();
    let mut full_text = String::new();

    for index in 0..page_count {
        let page_text = document.page_text(index)?;
        full_text.push_str(&page_text);
        full_text.push_str("\n\n");
        progress.report((index + 1) as f64 / page_count as f64);
    }

    Ok(full_text)
}
