use crate::error::{Error, Result};
use encoding_rs::Encoding;
use regex::bytes::Regex;
use std::sync::OnceLock;

/// How many leading bytes of a file the detector looks at.
///
/// A declaration sits at the very start of a well-formed document, so a
/// small fixed prefix is enough.
pub const DETECT_PREFIX_LEN: usize = 100;

fn declaration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^<\?xml[^>]*encoding=["']([^"']*)["']"#).unwrap())
}

/// Detect a document's encoding from the start of its raw bytes.
///
/// Searches the given prefix (at most [`DETECT_PREFIX_LEN`] bytes of it)
/// for an XML declaration's encoding attribute and returns the quoted
/// label. Absence of a declaration or of the attribute is a normal case,
/// not an error: the fallback is `"utf-8"`.
pub fn detect(prefix: &[u8]) -> String {
    let prefix = &prefix[..prefix.len().min(DETECT_PREFIX_LEN)];
    declaration_pattern()
        .captures(prefix)
        .and_then(|caps| caps.get(1))
        .and_then(|label| std::str::from_utf8(label.as_bytes()).ok())
        .map(|label| label.to_string())
        .unwrap_or_else(|| "utf-8".to_string())
}

/// Resolve an encoding label to an [`encoding_rs`] encoding.
///
/// # Errors
///
/// - [`Error::CannotDecode`]: the label is not a known encoding.
pub fn resolve(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or(Error::CannotDecode)
}
