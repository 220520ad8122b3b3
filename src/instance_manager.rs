//! # OCR Instance Manager Module
//!
//! This module provides thread-safe OCR instance management for reusing
//! Tesseract instances. Reusing instances avoids the initialization overhead
//! of creating a new engine per request. The two passes of one request use
//! different pool keys (plain vs. whitelisted), so they lock different
//! instances and can run concurrently.

use leptess::LepTess;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::{ModelType, OcrConfig};

/// Thread-safe pool of reusable Tesseract instances.
///
/// Instances are keyed by language, model type and character whitelist; a
/// whitelist is baked into an instance at creation time, so a whitelisted
/// pass never shares an instance with an unrestricted one.
pub struct OcrInstanceManager {
    instances: Mutex<HashMap<String, Arc<Mutex<LepTess>>>>,
}

impl OcrInstanceManager {
    /// Create a new OCR instance manager with an empty pool.
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create an OCR instance for the given configuration and
    /// optional character whitelist.
    ///
    /// # Errors
    ///
    /// Returns an error if Tesseract initialization fails (e.g. missing
    /// language data) or a variable cannot be applied.
    pub fn get_instance(
        &self,
        config: &OcrConfig,
        char_whitelist: Option<&str>,
    ) -> anyhow::Result<Arc<Mutex<LepTess>>> {
        let key = format!(
            "{}:{}:{}",
            config.language,
            config.model_type.tessdata_dir(),
            char_whitelist.unwrap_or("")
        );

        // Try to get existing instance
        {
            let instances = self.instances.lock();
            if let Some(instance) = instances.get(&key) {
                return Ok(Arc::clone(instance));
            }
        }

        info!(
            language = %config.language,
            model = config.model_type.tessdata_dir(),
            whitelisted = char_whitelist.is_some(),
            "creating new OCR instance"
        );

        let tessdata_path = Self::get_tessdata_path(config.model_type);

        let mut tess = LepTess::new(tessdata_path.as_deref(), &config.language)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Tesseract OCR instance: {}", e))?;

        tess.set_variable(
            leptess::Variable::TesseditPagesegMode,
            config.psm_mode.as_str(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to set PSM mode: {}", e))?;

        if let Some(whitelist) = char_whitelist {
            tess.set_variable(leptess::Variable::TesseditCharWhitelist, whitelist)
                .map_err(|e| anyhow::anyhow!("Failed to set character whitelist: {}", e))?;
        }

        let instance = Arc::new(Mutex::new(tess));

        {
            let mut instances = self.instances.lock();
            instances.insert(key, Arc::clone(&instance));
        }

        Ok(instance)
    }

    /// Get the tessdata path for the specified model type.
    ///
    /// Tries the common installation directories for the model type and
    /// falls back to Tesseract's default lookup when none exists.
    fn get_tessdata_path(model_type: ModelType) -> Option<String> {
        let possible_paths = match model_type {
            ModelType::Fast => vec![
                "/usr/share/tesseract-ocr/5/tessdata_fast",
                "/usr/share/tesseract-ocr/4.00/tessdata_fast",
                "/usr/share/tessdata_fast",
                "/usr/local/share/tessdata_fast",
            ],
            ModelType::Best => vec![
                "/usr/share/tesseract-ocr/5/tessdata_best",
                "/usr/share/tesseract-ocr/4.00/tessdata_best",
                "/usr/share/tessdata_best",
                "/usr/local/share/tessdata_best",
            ],
        };

        for path in possible_paths {
            if std::path::Path::new(path).exists() {
                info!("Using tessdata path: {}", path);
                return Some(path.to_string());
            }
        }

        None
    }

    /// Number of cached instances.
    pub fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }
}

impl Default for OcrInstanceManager {
    fn default() -> Self {
        Self::new()
    }
}
