use crate::document::Document;
use crate::error::{Error, Result};

/// A batch mutation applied to the text of every matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Numeric-aware addition: trailing digit runs are treated as a counter.
    Increment(i64),
    /// Unconditional literal overwrite.
    Replace(String),
}

/// Compute an element's new text under `op`.
///
/// `text` is the element's current text, `None` when the element has none.
pub fn apply_to_text(op: &Operation, text: Option<&str>) -> String {
    match op {
        Operation::Replace(value) => value.clone(),
        Operation::Increment(delta) => increment_text(text.unwrap_or(""), *delta),
    }
}

/// The three-way increment rule, first matching case wins:
///
/// 1. Text is non-empty and all ASCII digits: parsed, `delta` added,
///    rendered in decimal (the sum may go negative).
/// 2. Text is non-empty and its last char is an ASCII digit: the counter
///    is *every* digit in the string concatenated, while the prefix is the
///    text with only the trailing digit run stripped. Interior digits thus
///    appear both in the prefix and in the counter: `"v1x2"` + 1 is
///    `"v1x13"`.
/// 3. Otherwise: `delta` rendered in decimal is appended to the text.
///
/// A counter too large for `i64` (or a sum that would overflow) leaves the
/// text unchanged.
fn increment_text(text: &str, delta: i64) -> String {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        match text.parse::<i64>().ok().and_then(|n| n.checked_add(delta)) {
            Some(sum) => sum.to_string(),
            None => text.to_string(),
        }
    } else if text.bytes().last().map_or(false, |b| b.is_ascii_digit()) {
        let prefix = text.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.parse::<i64>().ok().and_then(|n| n.checked_add(delta)) {
            Some(sum) => format!("{}{}", prefix, sum),
            None => text.to_string(),
        }
    } else {
        format!("{}{}", text, delta)
    }
}

/// Apply `op` to the text of every descendant element named `tag`.
///
/// Matching covers any depth under the document's root element, like an
/// XPath `.//tag` lookup; the root element itself is not a candidate.
/// Returns the number of mutated elements.
///
/// # Errors
///
/// - [`Error::NoMatch`]: the document has no such descendant. Scoped to
/// this one document; callers processing a batch continue with the rest.
pub fn apply(document: &mut Document, tag: &str, op: &Operation) -> Result<usize> {
    let matches = match document.root_element() {
        Some(root) => root.find_all(document, tag),
        None => Vec::new(),
    };
    if matches.is_empty() {
        return Err(Error::NoMatch {
            tag: tag.to_string(),
        });
    }
    for elem in &matches {
        let new_text = apply_to_text(op, elem.text(document).as_deref());
        elem.set_text(document, new_text);
    }
    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incr(text: Option<&str>, delta: i64) -> String {
        apply_to_text(&Operation::Increment(delta), text)
    }

    #[test]
    fn test_increment_all_digits() {
        assert_eq!(incr(Some("7"), 5), "12");
        assert_eq!(incr(Some("100"), -1), "99");
        assert_eq!(incr(Some("3"), -5), "-2");
        assert_eq!(incr(Some("007"), 1), "8");
    }

    #[test]
    fn test_increment_trailing_digit_run() {
        assert_eq!(incr(Some("item9"), 1), "item10");
        assert_eq!(incr(Some("item10"), -1), "item9");
        assert_eq!(incr(Some("a 42"), 8), "a 50");
        // splits into prefix "-" and counter 5
        assert_eq!(incr(Some("-5"), -1), "-4");
    }

    #[test]
    fn test_increment_collects_interior_digits() {
        // all digits form the counter, only the trailing run leaves the prefix
        assert_eq!(incr(Some("v1x2"), 1), "v1x13");
        assert_eq!(incr(Some("1a2b3"), 10), "1a2b133");
    }

    #[test]
    fn test_increment_appends_when_not_ending_in_digit() {
        assert_eq!(incr(Some("abc"), 3), "abc3");
        assert_eq!(incr(Some("9末"), 4), "9末4");
        assert_eq!(incr(Some(""), 2), "2");
        assert_eq!(incr(None, 2), "2");
        assert_eq!(incr(Some("x"), -7), "x-7");
    }

    #[test]
    fn test_increment_overflow_leaves_text() {
        let huge = "99999999999999999999999999";
        assert_eq!(incr(Some(huge), 1), huge);
        assert_eq!(incr(Some(&i64::MAX.to_string()), 1), i64::MAX.to_string());
    }

    #[test]
    fn test_replace() {
        let op = Operation::Replace("fixed".to_string());
        assert_eq!(apply_to_text(&op, Some("anything")), "fixed");
        assert_eq!(apply_to_text(&op, None), "fixed");
        // idempotent
        assert_eq!(apply_to_text(&op, Some("fixed")), "fixed");
    }

    #[test]
    fn test_apply_mutates_all_matches() {
        let mut doc = Document::parse_str("<r><n>1</n><s><n>a7</n><m/></s></r>").unwrap();
        let count = apply(&mut doc, "n", &Operation::Increment(2)).unwrap();
        assert_eq!(count, 2);
        let root = doc.root_element().unwrap();
        let found = root.find_all(&doc, "n");
        assert_eq!(found[0].text(&doc).unwrap(), "3");
        assert_eq!(found[1].text(&doc).unwrap(), "a9");
        // <m/> untouched: still no text
        assert_eq!(root.find_all(&doc, "m")[0].text(&doc), None);
    }

    #[test]
    fn test_apply_no_match() {
        let mut doc = Document::parse_str("<r><a>1</a></r>").unwrap();
        let err = apply(&mut doc, "missing", &Operation::Increment(1)).unwrap_err();
        assert!(matches!(err, Error::NoMatch { ref tag } if tag == "missing"));
    }
}
