//! Character-aware text helpers
//!
//! Offsets coming back from the inference API count Unicode scalar values,
//! not bytes, so every slice here goes through char boundaries.

/// Return at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Collapse every run of whitespace into a single space and trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Slices a text by character offsets.
///
/// Boundaries are computed once, so slicing many spans of the same text stays
/// linear in the text length. Out-of-range offsets clamp to the end of the
/// text and an inverted range yields an empty slice.
pub struct CharSlicer<'a> {
    text: &'a str,
    // Byte offset of every char start, plus text.len() as a sentinel
    bounds: Vec<usize>,
}

impl<'a> CharSlicer<'a> {
    pub fn new(text: &'a str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    /// Number of characters in the underlying text
    pub fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return "";
        }
        &self.text[self.bounds[start]..self.bounds[end]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Each of these is more than one byte in UTF-8
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  graph \n\t databases  "), "graph databases");
        assert_eq!(normalize_whitespace("single"), "single");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_char_slicer_clamps() {
        let slicer = CharSlicer::new("abcdef");
        assert_eq!(slicer.char_len(), 6);
        assert_eq!(slicer.slice(1, 4), "bcd");
        assert_eq!(slicer.slice(4, 100), "ef");
        assert_eq!(slicer.slice(100, 200), "");
        assert_eq!(slicer.slice(4, 2), "");
    }

    #[test]
    fn test_char_slicer_multibyte_offsets() {
        let slicer = CharSlicer::new("café au lait");
        assert_eq!(slicer.slice(0, 4), "café");
        assert_eq!(slicer.slice(5, 7), "au");
    }
}
