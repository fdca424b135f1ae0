//! Escaping of bracketed property values.
//!
//! Inside `[` ... `]` only two characters need escaping: the closing bracket
//! and the backslash itself. A backslash directly before a line break is a
//! soft line break and disappears when unescaping.

/// Escapes `\` and `]` so that `text` can be written between brackets.
///
/// `[` is valid unescaped inside a value and is left alone.
///
/// # Examples
///
/// ```rust
/// use sgf_format::escape;
///
/// assert_eq!(escape("hello\\world"), "hello\\\\world");
/// assert_eq!(escape("hello]world"), "hello\\]world");
/// assert_eq!(escape("hello[world"), "hello[world");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            ']' => result.push_str("\\]"),
            _ => result.push(ch),
        }
    }
    result
}

/// Resolves escapes in the raw text between a value's brackets.
///
/// A backslash followed by `\n`, `\r`, `\r\n`, or `\n\r` is removed together
/// with the line break. A backslash followed by any other character yields
/// that character. A trailing lone backslash is dropped.
///
/// # Examples
///
/// ```rust
/// use sgf_format::unescape;
///
/// assert_eq!(unescape("he\\]llo wor\\\\ld"), "he]llo wor\\ld");
/// assert_eq!(unescape("hello\\\r\nworld"), "helloworld");
/// assert_eq!(unescape("h\\e\\llo"), "hello");
/// ```
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some(first @ ('\n' | '\r')) => {
                let pair = if first == '\n' { '\r' } else { '\n' };
                chars.next_if_eq(&pair);
            }
            Some(escaped) => result.push(escaped),
            None => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_line_breaks() {
        assert_eq!(unescape("hello\\\nworld"), "helloworld");
        assert_eq!(unescape("hello\\\rworld"), "helloworld");
        assert_eq!(unescape("hello\\\n\rworld"), "helloworld");
        assert_eq!(unescape("hello\\\r\nworld"), "helloworld");
    }

    #[test]
    fn test_only_one_line_break_is_swallowed() {
        assert_eq!(unescape("a\\\n\nb"), "a\nb");
        assert_eq!(unescape("a\\\r\n\r\nb"), "a\r\nb");
    }

    #[test]
    fn test_unescape_brackets_and_backslashes() {
        assert_eq!(unescape("hello wor\\]ld"), "hello wor]ld");
        assert_eq!(unescape("hello wor\\\\ld"), "hello wor\\ld");
        assert_eq!(unescape("hello\\ world"), "hello world");
    }

    #[test]
    fn test_raw_line_breaks_are_kept() {
        assert_eq!(unescape("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(unescape("abc\\"), "abc");
    }

    #[test]
    fn test_unescape_is_left_inverse() {
        for text in ["He()llo Wor\\\\[Foo;Bar]ld\\", "Hello\\! []World!", ""] {
            assert_eq!(unescape(&escape(text)), text);
        }
    }
}
