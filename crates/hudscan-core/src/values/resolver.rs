//! Keyword-to-value resolution.

use tracing::debug;

use super::fragments::Fragment;
use super::number::extract_number;

/// Default vertical alignment tolerance for neighbor search, as a multiple
/// of the taller of the two boxes being compared. Large enough to absorb
/// recognition jitter in vertical centering, small enough not to cross
/// into the next row.
pub const DEFAULT_ROW_TOLERANCE: f32 = 0.6;

/// Resolves the numeric value associated with one keyword-bearing fragment.
///
/// Resolution runs three ordered stages, stopping at the first success:
///
/// 1. parse the text immediately after the keyword inside the same fragment,
/// 2. parse the whole fragment text (the value may precede the label),
/// 3. search the other fragments for the nearest qualifying numeric
///    neighbor strictly to the right on the same visual row.
#[derive(Debug, Clone)]
pub struct ValueResolver {
    row_tolerance: f32,
}

impl ValueResolver {
    pub fn new() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
        }
    }

    /// Override the vertical alignment tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Resolve the value for `keyword`, whose text occurs in
    /// `fragments[index]`.
    pub fn resolve(&self, keyword: &str, index: usize, fragments: &[Fragment]) -> Option<String> {
        let fragment = &fragments[index];

        // Stage 1: the text right after the keyword in the same fragment.
        if let Some(pos) = fragment.text.find(keyword) {
            let after = &fragment.text[pos + keyword.len()..];
            if let Some(value) = extract_number(after) {
                debug!(keyword, %value, "resolved after keyword");
                return Some(value);
            }
        }

        // Stage 2: anywhere in the same fragment.
        if let Some(value) = extract_number(&fragment.text) {
            debug!(keyword, %value, "resolved within fragment");
            return Some(value);
        }

        // Stage 3: nearest numeric neighbor to the right.
        self.find_neighbor_value(index, fragments)
    }

    /// Pick the nearest numeric fragment to the right of the keyword
    /// fragment. Candidates are ranked by ascending horizontal distance,
    /// then by descending confidence; remaining ties keep the earlier
    /// fragment in emission order.
    fn find_neighbor_value(&self, index: usize, fragments: &[Fragment]) -> Option<String> {
        let reference = &fragments[index];
        let mut best: Option<(f32, f32, String)> = None;

        for (j, candidate) in fragments.iter().enumerate() {
            if j == index {
                continue;
            }
            let Some(value) = extract_number(&candidate.text) else {
                continue;
            };
            if candidate.center.0 <= reference.center.0 {
                continue;
            }
            let dy = (candidate.center.1 - reference.center.1).abs();
            if dy > self.row_tolerance * reference.height.max(candidate.height) {
                continue;
            }

            let dx = candidate.center.0 - reference.center.0;
            let better = match &best {
                None => true,
                Some((best_dx, best_confidence, _)) => {
                    dx < *best_dx || (dx == *best_dx && candidate.confidence > *best_confidence)
                }
            };
            if better {
                best = Some((dx, candidate.confidence, value));
            }
        }

        if let Some((dx, confidence, value)) = best {
            debug!(dx, confidence, %value, "resolved from neighbor");
            return Some(value);
        }
        None
    }
}

impl Default for ValueResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(text: &str, center: (f32, f32), height: f32, confidence: f32) -> Fragment {
        Fragment {
            text: text.to_string(),
            confidence,
            center,
            height,
        }
    }

    #[test]
    fn test_value_after_keyword_in_same_fragment() {
        let fragments = vec![fragment("现金: 1,250", (10.0, 10.0), 10.0, 0.9)];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("1250".to_string())
        );
    }

    #[test]
    fn test_value_before_keyword_in_same_fragment() {
        let fragments = vec![fragment("800 现金", (10.0, 10.0), 10.0, 0.9)];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("800".to_string())
        );
    }

    #[test]
    fn test_neighbor_on_same_row() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("500", (50.0, 11.0), 10.0, 0.8),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("500".to_string())
        );
    }

    #[test]
    fn test_left_side_candidate_never_selected() {
        let fragments = vec![
            fragment("500", (5.0, 10.0), 10.0, 0.9),
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(resolver.resolve("现金", 1, &fragments), None);
    }

    #[test]
    fn test_vertical_offset_beyond_tolerance_excluded() {
        // dy = 7, tolerance = 0.6 * max(10, 10) = 6.
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("500", (50.0, 17.0), 10.0, 0.9),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(resolver.resolve("现金", 0, &fragments), None);
    }

    #[test]
    fn test_taller_candidate_widens_tolerance() {
        // dy = 7 passes because max(10, 20) * 0.6 = 12.
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("500", (50.0, 17.0), 20.0, 0.9),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("500".to_string())
        );
    }

    #[test]
    fn test_nearest_dx_wins() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("999", (90.0, 10.0), 10.0, 0.99),
            fragment("500", (50.0, 10.0), 10.0, 0.5),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("500".to_string())
        );
    }

    #[test]
    fn test_equal_dx_higher_confidence_wins() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("111", (50.0, 8.0), 10.0, 0.6),
            fragment("222", (50.0, 12.0), 10.0, 0.8),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("222".to_string())
        );
    }

    #[test]
    fn test_equal_dx_and_confidence_keeps_earlier_fragment() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("111", (50.0, 8.0), 10.0, 0.7),
            fragment("222", (50.0, 12.0), 10.0, 0.7),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("111".to_string())
        );
    }

    #[test]
    fn test_non_numeric_neighbors_ignored() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("暂无", (50.0, 10.0), 10.0, 0.9),
        ];
        let resolver = ValueResolver::new();

        assert_eq!(resolver.resolve("现金", 0, &fragments), None);
    }

    #[test]
    fn test_custom_row_tolerance() {
        let fragments = vec![
            fragment("现金:", (10.0, 10.0), 10.0, 0.9),
            fragment("500", (50.0, 17.0), 10.0, 0.9),
        ];
        let resolver = ValueResolver::new().with_row_tolerance(1.0);

        assert_eq!(
            resolver.resolve("现金", 0, &fragments),
            Some("500".to_string())
        );
    }
}
