//! Text transforms for Graphviz labels.
//!
//! A label goes through [`word_wrap`], then [`escape`], and finally has its
//! remaining line breaks turned into the two-character `\n` sequence so it
//! can sit inside a double-quoted attribute value ([`format_label`]).

/// Characters escaped inside any double-quoted attribute value.
pub const QUOTE_SPECIALS: &[char] = &['\\', '"'];

/// Characters escaped inside one field of a `shape=record` label.
pub const RECORD_SPECIALS: &[char] = &['\\', '"', '|', '<', '>', '{', '}'];

/// Greedy word wrap on single spaces.
///
/// A break replaces the space before a word whenever the current line length
/// plus the length of the word's first line reaches `width`. Line breaks
/// already in `text` are kept and restart the count. Words are never split,
/// so one longer than `width` overflows.
#[must_use]
pub fn word_wrap(text: &str, width: usize) -> String {
    let mut words = text.split(' ');
    let mut out = String::with_capacity(text.len());
    let mut line_len = 0;

    if let Some(first) = words.next() {
        out.push_str(first);
        line_len = tail_len(first, 0);
    }

    for word in words {
        let head_len = word.split('\n').next().map_or(0, |head| head.chars().count());
        if line_len + head_len >= width {
            out.push('\n');
            line_len = 0;
        } else {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len = tail_len(word, line_len);
    }

    out
}

/// Length of the line after appending `chunk` to a line of `line_len` chars.
fn tail_len(chunk: &str, line_len: usize) -> usize {
    match chunk.rfind('\n') {
        Some(pos) => chunk[pos + 1..].chars().count(),
        None => line_len + chunk.chars().count(),
    }
}

/// Prefix every occurrence of each character in `specials` with a backslash.
///
/// Single pass over `text`, so the result does not depend on the order of
/// `specials` even when the backslash itself is listed.
#[must_use]
pub fn escape(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape`] for the same `specials`.
#[must_use]
pub fn unescape(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '\\' && specials.contains(next) => {
                out.push(*next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Turn real line breaks into the `\n` escape Graphviz understands.
#[must_use]
pub fn newlines_to_escapes(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Wrap, escape and newline-encode free text for a quoted label.
#[must_use]
pub fn format_label(text: &str, width: usize, specials: &[char]) -> String {
    newlines_to_escapes(&escape(&word_wrap(text, width), specials))
}

/// Quote an attribute value that is not wrapped (colors, URLs, names).
#[must_use]
pub fn quote(text: &str) -> String {
    format!("\"{}\"", newlines_to_escapes(&escape(text, QUOTE_SPECIALS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(word_wrap("fix the login", 30), "fix the login");
    }

    #[test]
    fn wraps_before_the_word_that_reaches_the_limit() {
        // line "aaaa bbbb" is 9 chars, next word 4: 13 >= 10
        assert_eq!(word_wrap("aaaa bbbb cccc", 10), "aaaa bbbb\ncccc");
    }

    #[test]
    fn reaching_the_limit_exactly_breaks() {
        // line "abc" (3) + "defg" (4) = 7 >= 7
        assert_eq!(word_wrap("abc defg", 7), "abc\ndefg");
        assert_eq!(word_wrap("abc defg", 8), "abc defg");
    }

    #[test]
    fn long_word_overflows_without_split() {
        let out = word_wrap("a supercalifragilistic word", 5);
        assert_eq!(out, "a\nsupercalifragilistic\nword");
    }

    #[test]
    fn existing_breaks_restart_the_count() {
        let out = word_wrap("aaaaaaaa\nbb cc", 10);
        assert_eq!(out, "aaaaaaaa\nbb cc");
        // The head of "x\nyyyy" is just "x".
        assert_eq!(word_wrap("aaaaaaa x\nyyyy zz", 10), "aaaaaaa x\nyyyy zz");
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(word_wrap("héllo wörld", 12), "héllo wörld");
    }

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi" \o/"#, QUOTE_SPECIALS), r#"say \"hi\" \\o/"#);
    }

    #[test]
    fn record_escape_covers_delimiters() {
        assert_eq!(escape("{a|b<c>}", RECORD_SPECIALS), r"\{a\|b\<c\>\}");
        assert_eq!(escape("{a|b}", QUOTE_SPECIALS), "{a|b}");
    }

    #[test]
    fn unescape_inverts_escape() {
        let raw = r#"odd \" mix | of {things}"#;
        assert_eq!(unescape(&escape(raw, RECORD_SPECIALS), RECORD_SPECIALS), raw);
    }

    #[test]
    fn format_label_encodes_breaks_after_escaping() {
        assert_eq!(format_label("a \"quoted\" title", 6, QUOTE_SPECIALS), r#"a\n\"quoted\"\ntitle"#);
    }

    #[test]
    fn quote_wraps_in_double_quotes() {
        assert_eq!(quote("#4ECDC4"), "\"#4ECDC4\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }
}
