//! First-numeric-token extraction.

/// Extract the first numeric token from `text`.
///
/// A token is an optional leading `+` or `-` sign followed by one or more
/// ASCII digit groups separated by `.` or `,`, with no embedded whitespace.
/// Grouping commas are stripped from the returned string; the decimal point
/// is kept. Returns `None` when the text contains no digits.
///
/// The scanner is a hand-written automaton rather than a regex so the
/// maximal-match behavior is pinned: a separator is consumed only when at
/// least one digit follows it, so `"12.,5"` yields `"12"` and `"..,,"`
/// never matches.
pub fn extract_number(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        // A token starts at a digit, or at a sign immediately before one.
        let digits_at = match bytes[start] {
            b'0'..=b'9' => start,
            b'+' | b'-' if start + 1 < bytes.len() && bytes[start + 1].is_ascii_digit() => {
                start + 1
            }
            _ => {
                start += 1;
                continue;
            }
        };

        let mut end = digits_at;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }

        // Consume separator groups only when digits follow the separator.
        while end + 1 < bytes.len()
            && (bytes[end] == b'.' || bytes[end] == b',')
            && bytes[end + 1].is_ascii_digit()
        {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }

        // `start..end` sits on ASCII boundaries, so slicing is safe even
        // when the surrounding text is multi-byte.
        return Some(text[start..end].replace(',', ""));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_digits_after_label() {
        assert_eq!(extract_number("cash1234"), Some("1234".to_string()));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(extract_number("no digits here"), None);
        assert_eq!(extract_number(""), None);
    }

    #[test]
    fn test_separators_without_digits_never_match() {
        assert_eq!(extract_number("..,,"), None);
        assert_eq!(extract_number("- + ."), None);
    }

    #[test]
    fn test_grouping_comma_removed_decimal_point_kept() {
        assert_eq!(extract_number("1,234.56"), Some("1234.56".to_string()));
        assert_eq!(extract_number("1,234,567"), Some("1234567".to_string()));
    }

    #[test]
    fn test_leading_sign() {
        assert_eq!(extract_number("-12"), Some("-12".to_string()));
        assert_eq!(extract_number("+0.5"), Some("+0.5".to_string()));
    }

    #[test]
    fn test_sign_without_digit_does_not_start_a_token() {
        // The dash is dead; the scan resumes and finds the plain number.
        assert_eq!(extract_number("- 42"), Some("42".to_string()));
    }

    #[test]
    fn test_only_first_token_returned() {
        assert_eq!(extract_number("10 and 20"), Some("10".to_string()));
        assert_eq!(extract_number("7-12"), Some("7".to_string()));
    }

    #[test]
    fn test_trailing_separator_not_consumed() {
        assert_eq!(extract_number("12."), Some("12".to_string()));
        assert_eq!(extract_number("12.,5"), Some("12".to_string()));
    }

    #[test]
    fn test_multibyte_surroundings() {
        assert_eq!(extract_number("现金: 1,250"), Some("1250".to_string()));
        assert_eq!(extract_number("获得经验"), None);
    }
}
