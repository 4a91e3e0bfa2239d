//! Keyword/value extraction over recognized text fragments.
//!
//! The game UI lays labels and values out as "label: value" pairs on the
//! same visual row. Extraction normalizes raw detections into fragments
//! with a center and height, then resolves each configured keyword to the
//! numeric value printed in or next to the fragment carrying the label.

mod fragments;
mod number;
mod pipeline;
mod resolver;

pub use fragments::{build_fragments, Fragment};
pub use number::extract_number;
pub use pipeline::{ExtractedValues, ValueExtractor};
pub use resolver::ValueResolver;
