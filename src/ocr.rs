//! # OCR Processing Module
//!
//! This module provides the dual-pass text recognition at the heart of the
//! image pipeline. Every image is recognized twice, concurrently: once as
//! uploaded, and once after binarization with the output restricted to a
//! fixed character whitelist. The pass reporting the higher confidence wins.
//!
//! The OCR engine itself is an external collaborator behind the
//! [`OcrEngine`] trait; the production implementation drives Tesseract
//! through the `leptess` bindings with instances pooled by
//! [`crate::instance_manager::OcrInstanceManager`].

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::OcrConfig;
use crate::errors::{ExtractError, ExtractResult};
use crate::instance_manager::OcrInstanceManager;
use crate::progress::ProgressReporter;

/// Characters the binarized pass is allowed to produce: Latin letters,
/// digits, common punctuation and space.
pub const OCR_CHAR_WHITELIST: &str =
    r#"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789.,!@#$%^&*()_+-=[]{}|;:"<>?/\' "#;

/// Raw outcome of a single OCR engine invocation.
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    /// Recognized text as reported by the engine
    pub text: String,
    /// Mean confidence in 0-100
    pub confidence: f32,
}

/// Which buffer a recognition pass ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassSource {
    /// The undistorted upload
    Original,
    /// The thresholded black/white variant
    Binarized,
}

/// Result of one completed OCR pass, tagged with its source buffer.
#[derive(Debug, Clone)]
pub struct RecognitionPass {
    /// Recognized text
    pub text: String,
    /// Confidence score in 0-100
    pub confidence: f32,
    /// Buffer the pass ran against
    pub source: PassSource,
}

/// An opaque best-effort text recognizer.
///
/// `recognize` blocks for the duration of the pass; callers run it on a
/// blocking task. Progress is reported through `progress` as a fraction of
/// this pass in [0, 1].
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image.
    fn recognize(
        &self,
        image: &[u8],
        char_whitelist: Option<&str>,
        progress: &ProgressReporter,
    ) -> anyhow::Result<OcrOutcome>;
}

/// Tesseract-backed [`OcrEngine`] using pooled `leptess` instances.
pub struct TesseractEngine {
    config: OcrConfig,
    instances: OcrInstanceManager,
}

impl TesseractEngine {
    /// Create an engine for the given configuration with an empty
    /// instance pool.
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            instances: OcrInstanceManager::new(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(
        &self,
        image: &[u8],
        char_whitelist: Option<&str>,
        progress: &ProgressReporter,
    ) -> anyhow::Result<OcrOutcome> {
        let start_time = std::time::Instant::now();

        let instance = self.instances.get_instance(&self.config, char_whitelist)?;
        let mut tess = instance.lock();
        progress.report(0.0);

        tess.set_image_from_mem(image)
            .map_err(|e| anyhow::anyhow!("Failed to load image for OCR: {}", e))?;
        progress.report(0.25);

        // leptess exposes no incremental recognition callbacks, so progress
        // within a pass is limited to these coarse milestones.
        let text = tess
            .get_utf8_text()
            .map_err(|e| anyhow::anyhow!("Failed to extract text from image: {}", e))?;
        let confidence = tess.mean_text_conf() as f32;
        progress.report(1.0);

        debug!(
            duration_ms = start_time.elapsed().as_millis() as u64,
            confidence,
            chars = text.len(),
            whitelisted = char_whitelist.is_some(),
            "OCR pass completed"
        );

        Ok(OcrOutcome { text, confidence })
    }
}

/// Run both OCR passes concurrently and keep the more confident one.
///
/// The original upload is recognized unrestricted while the binarized PNG is
/// recognized against [`OCR_CHAR_WHITELIST`]; both results are required (a
/// barrier, not a race). The original pass reports progress into [0, 0.5]
/// and the binarized pass into [0.5, 1.0] of `progress`. The binarized pass
/// wins only on strictly greater confidence; a tie keeps the original pass.
///
/// # Errors
///
/// If either pass fails, the whole recognition fails with
/// [`ExtractError::Ocr`] carrying the underlying cause. No partial result is
/// returned.
pub async fn recognize_image(
    original: Vec<u8>,
    binarized: Vec<u8>,
    engine: Arc<dyn OcrEngine>,
    progress: &ProgressReporter,
) -> ExtractResult<RecognitionPass> {
    let original_window = progress.slice(0.0, 0.5);
    let binarized_window = progress.slice(0.5, 0.5);

    let original_engine = Arc::clone(&engine);
    let original_task = tokio::task::spawn_blocking(move || {
        original_engine.recognize(&original, None, &original_window)
    });
    let binarized_task = tokio::task::spawn_blocking(move || {
        engine.recognize(&binarized, Some(OCR_CHAR_WHITELIST), &binarized_window)
    });

    let (original_result, binarized_result) = tokio::try_join!(original_task, binarized_task)
        .map_err(|e| ExtractError::Ocr(format!("OCR worker task failed: {}", e)))?;

    let original_outcome = original_result.map_err(|e| {
        warn!(error = %e, "original-image OCR pass failed");
        ExtractError::Ocr(e.to_string())
    })?;
    let binarized_outcome = binarized_result.map_err(|e| {
        warn!(error = %e, "binarized-image OCR pass failed");
        ExtractError::Ocr(e.to_string())
    })?;

    debug!(
        original_confidence = original_outcome.confidence,
        binarized_confidence = binarized_outcome.confidence,
        "selecting recognition pass"
    );

    // The binarized pass wins only when strictly more confident.
    let pass = if binarized_outcome.confidence > original_outcome.confidence {
        RecognitionPass {
            text: binarized_outcome.text,
            confidence: binarized_outcome.confidence,
            source: PassSource::Binarized,
        }
    } else {
        RecognitionPass {
            text: original_outcome.text,
            confidence: original_outcome.confidence,
            source: PassSource::Original,
        }
    };

    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine returning canned outcomes, distinguished by whitelist presence.
    struct FakeEngine {
        original: OcrOutcome,
        binarized: OcrOutcome,
    }

    impl OcrEngine for FakeEngine {
        fn recognize(
            &self,
            _image: &[u8],
            char_whitelist: Option<&str>,
            progress: &ProgressReporter,
        ) -> anyhow::Result<OcrOutcome> {
            progress.report(1.0);
            Ok(match char_whitelist {
                None => self.original.clone(),
                Some(_) => self.binarized.clone(),
            })
        }
    }

    fn outcome(text: &str, confidence: f32) -> OcrOutcome {
        OcrOutcome {
            text: text.to_string(),
            confidence,
        }
    }

    #[tokio::test]
    async fn test_higher_confidence_pass_wins() {
        let engine = Arc::new(FakeEngine {
            original: outcome("original", 70.0),
            binarized: outcome("binarized", 90.0),
        });

        let pass = recognize_image(vec![0], vec![1], engine, &ProgressReporter::disabled())
            .await
            .unwrap();
        assert_eq!(pass.source, PassSource::Binarized);
        assert_eq!(pass.text, "binarized");
        assert_eq!(pass.confidence, 90.0);
    }

    #[tokio::test]
    async fn test_tie_keeps_original_pass() {
        let engine = Arc::new(FakeEngine {
            original: outcome("original", 80.0),
            binarized: outcome("binarized", 80.0),
        });

        let pass = recognize_image(vec![0], vec![1], engine, &ProgressReporter::disabled())
            .await
            .unwrap();
        assert_eq!(pass.source, PassSource::Original);
        assert_eq!(pass.text, "original");
    }

    #[tokio::test]
    async fn test_failing_pass_fails_the_recognition() {
        struct FailingEngine;
        impl OcrEngine for FailingEngine {
            fn recognize(
                &self,
                _image: &[u8],
                char_whitelist: Option<&str>,
                _progress: &ProgressReporter,
            ) -> anyhow::Result<OcrOutcome> {
                match char_whitelist {
                    None => Ok(OcrOutcome {
                        text: "fine".to_string(),
                        confidence: 99.0,
                    }),
                    Some(_) => Err(anyhow::anyhow!("engine exploded")),
                }
            }
        }

        let err = recognize_image(
            vec![0],
            vec![1],
            Arc::new(FailingEngine),
            &ProgressReporter::disabled(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
        assert!(err.to_string().contains("engine exploded"));
    }

    #[test]
    fn test_whitelist_contents() {
        assert!(OCR_CHAR_WHITELIST.contains("ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
        assert!(OCR_CHAR_WHITELIST.contains("abcdefghijklmnopqrstuvwxyz"));
        assert!(OCR_CHAR_WHITELIST.contains("0123456789"));
        assert!(OCR_CHAR_WHITELIST.contains('\\'));
        assert!(OCR_CHAR_WHITELIST.contains('\''));
        assert!(OCR_CHAR_WHITELIST.ends_with(' '));
    }
}
