use regex::Regex;
use std::sync::OnceLock;

fn opening_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `<` not followed by `/`, then a run excluding `>` and whitespace.
    PATTERN.get_or_init(|| Regex::new(r"<([^/>\s][^>\s]*)").unwrap())
}

/// Scan raw document text for opening-tag names.
///
/// A lexical pass, not a parse: it tolerates malformed or partial fragments
/// and exists only to feed autocompletion. Returns the distinct names in
/// lexicographic order.
pub fn extract(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = opening_tag_pattern()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Sorted set of distinct tag names, driving an autocomplete widget.
///
/// Derived from the raw text of the first successfully loaded file of a
/// batch (not the union across files).
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: Vec<String>,
}

impl TagIndex {
    pub fn from_content(content: &str) -> TagIndex {
        TagIndex {
            tags: extract(content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// All known tag names, sorted.
    pub fn all(&self) -> &[String] {
        &self.tags
    }

    /// Tags containing `typed`, case-insensitively. `""` matches every tag.
    pub fn filter(&self, typed: &str) -> Vec<&str> {
        let typed = typed.to_lowercase();
        self.tags
            .iter()
            .filter(|tag| tag.to_lowercase().contains(&typed))
            .map(|tag| tag.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sorted_distinct() {
        assert_eq!(extract("<a><b>1</b><b>2</b></a>"), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_skips_closing_tags() {
        let tags = extract("</only-closing> <z>text</z>");
        assert_eq!(tags, vec!["z"]);
    }

    #[test]
    fn test_extract_takes_name_up_to_space_or_gt() {
        let tags = extract(r#"<item id="3"><empty/></item>"#);
        assert_eq!(tags, vec!["empty/", "item"]);
    }

    #[test]
    fn test_extract_tolerates_malformed() {
        let tags = extract("<<a <b>> <unclosed");
        assert_eq!(tags, vec!["<a", "b", "unclosed"]);
    }

    #[test]
    fn test_filter_case_insensitive_containment() {
        let index = TagIndex::from_content("<Price>1</Price><priceList>2</priceList><name>n</name>");
        assert_eq!(index.filter("price"), vec!["Price", "priceList"]);
        assert_eq!(index.filter("LIST"), vec!["priceList"]);
        assert_eq!(index.filter(""), vec!["Price", "name", "priceList"]);
        assert!(index.filter("zzz").is_empty());
    }
}
