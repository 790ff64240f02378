use std::borrow::Cow;
use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less cannot hold a character plus the ellipsis, so the
/// string is simply cut to whatever fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS.len() {
        max_width
    } else {
        max_width - ELLIPSIS.len()
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS.len() {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    }
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Labels come from a remote document and are drawn straight into the
/// terminal. Tab, newline and carriage return are kept. Returns the input
/// borrowed when there is nothing to strip.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_control(c: char) -> bool {
        c == '\x1b' || c == '\x7f' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
    }

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            // CSI: parameters until a final byte in @..~
            Some('[') => {
                chars.next();
                for n in chars.by_ref() {
                    if ('@'..='~').contains(&n) {
                        break;
                    }
                }
            }
            // OSC: until BEL or ESC \
            Some(']') => {
                chars.next();
                while let Some(n) = chars.next() {
                    if n == '\x07' {
                        break;
                    }
                    if n == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out)
}

/// Every non-overlapping case-insensitive occurrence of `needle` in
/// `haystack`, as byte ranges into `haystack`.
///
/// Lowercasing may change byte lengths, so matching runs on a lowered copy
/// and each hit is mapped back to the original characters it covers.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    // For each byte of the lowered copy: the original char's start and end
    let mut lowered = String::with_capacity(haystack.len());
    let mut origin: Vec<(usize, usize)> = Vec::with_capacity(haystack.len());
    for (idx, c) in haystack.char_indices() {
        let span = (idx, idx + c.len_utf8());
        for lc in c.to_lowercase() {
            lowered.push(lc);
            origin.extend(std::iter::repeat(span).take(lc.len_utf8()));
        }
    }

    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (start, matched) in lowered.match_indices(needle.as_str()) {
        let from = origin[start].0;
        let to = origin[start + matched.len() - 1].1;
        // Two hits inside one expanded char map to the same range
        if ranges.last().is_some_and(|last| last.end > from) {
            continue;
        }
        ranges.push(from..to);
    }
    ranges
}
