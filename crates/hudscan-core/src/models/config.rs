//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the hudscan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HudscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Value extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Upload service configuration.
    pub server: ServerConfig,
}

impl Default for HudscanConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            extraction: ExtractionConfig::default(),
            models: ModelConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition confidence threshold (0.0 - 1.0). Detections below the
    /// threshold are dropped before extraction.
    pub recognition_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            recognition_threshold: 0.0, // Disabled - CTC confidence scores are inherently low
        }
    }
}

/// Value extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keyword labels to look for, in output order.
    pub keywords: Vec<String>,

    /// Vertical alignment tolerance for neighbor search, as a multiple of
    /// the taller of the two boxes being compared.
    pub row_tolerance: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "现金".to_string(),
                "获得经验".to_string(),
                "储备金".to_string(),
            ],
            row_tolerance: 0.6,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "rec.onnx".to_string(),
            dictionary: "ch_dict.txt".to_string(),
        }
    }
}

/// Upload service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Directory where uploaded images are persisted.
    pub upload_dir: PathBuf,

    /// Directory where per-account state files are persisted.
    pub state_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            upload_dir: PathBuf::from("uploads"),
            state_dir: PathBuf::from("state"),
        }
    }
}

impl HudscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
