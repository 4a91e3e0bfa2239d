//! Fragment normalization from raw detection geometry.

use serde::{Deserialize, Serialize};

use crate::ocr::RawDetection;

/// One recognized text region, normalized for geometric matching.
///
/// Immutable after construction. `height` is positive for any detection
/// with non-degenerate geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Recognized text, trimmed of surrounding whitespace.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,

    /// Arithmetic mean of the four quad corners (x, y).
    pub center: (f32, f32),

    /// Vertical extent: max corner y minus min corner y.
    pub height: f32,
}

impl Fragment {
    /// Build a fragment from one raw detection.
    pub fn from_detection(detection: &RawDetection) -> Self {
        let quad = &detection.quad;
        let xs = [quad[0], quad[2], quad[4], quad[6]];
        let ys = [quad[1], quad[3], quad[5], quad[7]];

        let cx = xs.iter().sum::<f32>() / 4.0;
        let cy = ys.iter().sum::<f32>() / 4.0;
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        Self {
            text: detection.text.trim().to_string(),
            confidence: detection.confidence,
            center: (cx, cy),
            height: max_y - min_y,
        }
    }
}

/// Normalize raw detections into fragments, preserving emission order.
///
/// Zero detections produce an empty vector; that is a normal recognizer
/// outcome, not an error.
pub fn build_fragments(detections: &[RawDetection]) -> Vec<Fragment> {
    detections.iter().map(Fragment::from_detection).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detection(text: &str, quad: [f32; 8]) -> RawDetection {
        RawDetection {
            quad,
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_center_and_height_from_quad() {
        let det = detection("现金: 500", [10.0, 20.0, 110.0, 20.0, 110.0, 60.0, 10.0, 60.0]);
        let fragments = build_fragments(&[det]);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].center, (60.0, 40.0));
        assert_eq!(fragments[0].height, 40.0);
    }

    #[test]
    fn test_skewed_quad_uses_vertical_extent() {
        // A tilted box: height is the y-span, not an edge length.
        let det = detection("123", [0.0, 10.0, 100.0, 0.0, 100.0, 30.0, 0.0, 40.0]);
        let fragments = build_fragments(&[det]);

        assert_eq!(fragments[0].height, 40.0);
        assert_eq!(fragments[0].center, (50.0, 20.0));
    }

    #[test]
    fn test_text_is_trimmed() {
        let det = detection("  储备金 1200  ", [0.0; 8]);
        let fragments = build_fragments(&[det]);

        assert_eq!(fragments[0].text, "储备金 1200");
    }

    #[test]
    fn test_empty_input_is_normal() {
        assert_eq!(build_fragments(&[]), Vec::new());
    }
}
