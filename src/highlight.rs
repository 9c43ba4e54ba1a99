use std::ops::Range;

use regex::RegexBuilder;

/// Byte ranges of every case-insensitive occurrence of `query` in `text`.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    let Ok(regex) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    regex.find_iter(text).map(|mat| mat.range()).collect()
}

/// Splits `text` into `(segment, highlighted)` pieces covering it fully.
pub fn split_highlighted<'a>(text: &'a str, query: &str) -> Vec<(&'a str, bool)> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for range in highlight_ranges(text, query) {
        if range.start > last {
            pieces.push((&text[last..range.start], false));
        }
        pieces.push((&text[range.clone()], true));
        last = range.end;
    }
    if last < text.len() {
        pieces.push((&text[last..], false));
    }
    pieces
}
