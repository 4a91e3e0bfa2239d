//! Text-recognition boundary.
//!
//! The extraction pipeline consumes recognition output as a black box: a
//! list of detections, each with text, a confidence score, and a
//! quadrilateral in image pixel coordinates. The concrete engine lives
//! behind [`RecognitionEngine`] so tests and alternative backends can
//! supply detections directly.

mod pure_engine;

pub use pure_engine::OnnxOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// One recognized text region as emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    /// Quadrilateral corners (x1, y1, x2, y2, x3, y3, x4, y4) in image
    /// pixel coordinates.
    pub quad: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

/// Result of running recognition on one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Detections in the engine's emission order. The order carries no
    /// meaning beyond serving as a stable iteration order downstream, so
    /// it must not be re-sorted.
    pub detections: Vec<RawDetection>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrOutput {
    /// Create an empty result. Zero detections is a normal outcome.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            detections: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }
}

/// Boundary trait for the text-recognition collaborator.
pub trait RecognitionEngine {
    /// Run recognition over an image. Returns zero or more detections;
    /// an empty list is not an error.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError>;
}
