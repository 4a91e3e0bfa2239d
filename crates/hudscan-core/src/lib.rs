//! Core library for game-screenshot value extraction.
//!
//! This crate provides:
//! - A text-recognition boundary with a pure Rust ONNX adapter
//! - Fragment normalization from raw detection geometry
//! - Numeric token extraction from noisy recognized text
//! - Keyword-to-value resolution and the extraction pipeline

pub mod error;
pub mod models;
pub mod ocr;
pub mod values;

pub use error::{HudscanError, OcrError, Result};
pub use models::config::{
    ExtractionConfig, HudscanConfig, ModelConfig, OcrConfig, ServerConfig,
};
pub use ocr::{OcrOutput, OnnxOcrEngine, RawDetection, RecognitionEngine};
pub use values::{
    build_fragments, extract_number, ExtractedValues, Fragment, ValueExtractor, ValueResolver,
};
