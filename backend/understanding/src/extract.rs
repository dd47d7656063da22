//! Plate extraction: picks the first plate-shaped token out of OCR text blocks.
//!
//! A plate is three letters followed by three digits, or four letters
//! followed by two digits. OCR output tends to split plates with spaces or
//! hyphens ("ABC-123", "AB CD 12"), so those are removed before matching.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Characters dropped from a block before matching.
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]+").unwrap());

/// 3+3 is listed first so it wins when both shapes match at the same offset.
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{3}[0-9]{3}|[A-Za-z]{4}[0-9]{2}").unwrap());

/// Remove whitespace and hyphens from a recognized text block.
pub fn clean_block(block: &str) -> String {
    SEPARATOR_RE.replace_all(block, "").into_owned()
}

/// Find a plate inside a single block, lowercased.
pub fn find_plate(block: &str) -> Option<String> {
    let cleaned = clean_block(block);
    PLATE_RE
        .find(&cleaned)
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Return the plate from the first block that contains one.
///
/// Blocks after the first match are not inspected. `None` means no block
/// holds a plate, and the caller should not go on to query storage.
pub fn extract_plate<I, S>(blocks: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (index, block) in blocks.into_iter().enumerate() {
        if let Some(plate) = find_plate(block.as_ref()) {
            debug!(block = index, plate = %plate, "Plate candidate found");
            return Some(plate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_block_wins() {
        assert_eq!(
            extract_plate(["foo", "ABC123", "xyz99"]),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_plate(["BCDF12", "ABC123"]),
            Some("bcdf12".to_string())
        );
    }

    #[test]
    fn non_matching_blocks_are_skipped() {
        assert_eq!(
            extract_plate(["CHILE", "no plate here", "gh-jk-45"]),
            Some("ghjk45".to_string())
        );
    }

    #[test]
    fn separators_are_removed_before_matching() {
        assert_eq!(clean_block("AB-CD 12\n"), "ABCD12");
        assert_eq!(find_plate("ab cd-12"), Some("abcd12".to_string()));
        assert_eq!(find_plate("XYZ - 987"), Some("xyz987".to_string()));
    }

    #[test]
    fn two_letters_four_digits_is_not_a_plate() {
        assert_eq!(extract_plate(["AB-12 34"]), None);
    }

    #[test]
    fn match_may_sit_inside_a_longer_block() {
        assert_eq!(find_plate("**RT4521CHILE"), None);
        assert_eq!(find_plate("CL: hjkl45 2019"), Some("hjkl45".to_string()));
        assert_eq!(find_plate("2019KLM456END"), Some("klm456".to_string()));
    }

    #[test]
    fn leftmost_match_wins_over_shape_preference() {
        // At offset 0 only the 4+2 shape fits.
        assert_eq!(find_plate("XABC123"), Some("xabc12".to_string()));
    }

    #[test]
    fn three_three_preferred_at_same_offset() {
        assert_eq!(find_plate("abc1234"), Some("abc123".to_string()));
    }

    #[test]
    fn non_ascii_letters_do_not_match() {
        assert_eq!(find_plate("ÑÁÉ123"), None);
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(extract_plate(Vec::<String>::new()), None);
        assert_eq!(extract_plate([""]), None);
    }
}
