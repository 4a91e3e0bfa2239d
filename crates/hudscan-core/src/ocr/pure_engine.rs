//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::{OcrOutput, RawDetection, RecognitionEngine};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct OnnxOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl OnnxOcrEngine {
    /// Create an engine from the model files described by `models`.
    pub fn from_config(models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = models.model_dir.join(&models.detection_model);
        let rec_path = models.model_dir.join(&models.recognition_model);
        let dict_path = models.model_dir.join(&models.dictionary);
        Self::from_paths(&det_path, &rec_path, &dict_path, config)
    }

    /// Create an engine from explicit model file paths.
    pub fn from_paths(
        det_path: &Path,
        rec_path: &Path,
        dict_path: &Path,
        config: OcrConfig,
    ) -> Result<Self, OcrError> {
        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(det_path)
            .rec_model_path(rec_path)
            .dictionary_path(dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine (det: {}, rec: {})",
            det_path.display(),
            rec_path.display()
        );

        Ok(Self { engine, config })
    }
}

impl RecognitionEngine for OnnxOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Recognizing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        // Keep the engine's emission order; the pipeline's overwrite
        // semantics depend on it staying stable.
        let detections: Vec<RawDetection> = results
            .iter()
            .filter(|r| r.confidence >= self.config.recognition_threshold)
            .map(|r| RawDetection {
                quad: polygon_to_quad(&r.bounding_box),
                text: r.text.clone(),
                confidence: r.confidence,
            })
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Recognition complete: {} detections in {}ms",
            detections.len(),
            processing_time_ms
        );

        Ok(OcrOutput {
            detections,
            processing_time_ms,
            image_size: (width, height),
        })
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` quad format.
///
/// Extracts the first 4 exterior points (quadrilateral) as
/// `[x1, y1, x2, y2, x3, y3, x4, y4]`.
fn polygon_to_quad(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut quad = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        quad[i * 2] = coord.x as f32;
        quad[i * 2 + 1] = coord.y as f32;
    }
    quad
}
