//! Regex extraction helpers shared by the resolvers
//!
//! Embed pages are semi-structured HTML with inline scripts. Every pattern
//! the resolvers depend on lives next to its resolver as a named
//! `LazyLock<Regex>`; these helpers only pull captures out of them.

use regex::Regex;

/// Text of a named capture group on the first match
pub fn named_capture<'h>(re: &Regex, haystack: &'h str, name: &str) -> Option<&'h str> {
    re.captures(haystack)?.name(name).map(|m| m.as_str())
}

/// Named capture parsed as an unsigned integer
pub fn named_capture_u64(re: &Regex, haystack: &str, name: &str) -> Option<u64> {
    named_capture(re, haystack, name)?.parse().ok()
}

/// Text of a capture group by index on the first match
pub fn indexed_capture<'h>(re: &Regex, haystack: &'h str, index: usize) -> Option<&'h str> {
    re.captures(haystack)?.get(index).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_capture() {
        let re = Regex::new(r"id=(?<id>\d+)").unwrap();
        assert_eq!(named_capture(&re, "?id=42&ep=1", "id"), Some("42"));
        assert_eq!(named_capture(&re, "?ep=1", "id"), None);
        assert_eq!(named_capture(&re, "?id=42", "missing"), None);
    }

    #[test]
    fn test_named_capture_u64() {
        let re = Regex::new(r"ep=(?<ep>\d+)").unwrap();
        assert_eq!(named_capture_u64(&re, "ep=7", "ep"), Some(7));
        assert_eq!(named_capture_u64(&re, "ep=99999999999999999999999", "ep"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let re = Regex::new(r#"src: (".*?")"#).unwrap();
        let body = r#"src: "/a.mp4", src: "/b.mp4""#;
        assert_eq!(indexed_capture(&re, body, 1), Some(r#""/a.mp4""#));
    }
}
