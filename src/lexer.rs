//! SGF tokenization.
//!
//! This module turns SGF text into a flat stream of position-annotated
//! [`Token`]s. The tokenizer never fails: characters that cannot start a
//! token become one-character [`TokenKind::Invalid`] tokens and scanning
//! continues behind them, leaving recovery to the parser.
//!
//! ## Token Kinds
//!
//! | Kind | Lexeme |
//! |------|--------|
//! | `Parenthesis` | `(` or `)` |
//! | `Semicolon` | `;` |
//! | `PropIdent` | a run of ASCII letters, e.g. `B`, `SZ`, `CoPyright` |
//! | `Value` | `[` ... `]`, closed by the first unescaped `]` |
//! | `Invalid` | any other character |
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::{tokenize, TokenKind};
//!
//! let kinds: Vec<_> = tokenize("(;B[aa])").map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Parenthesis,
//!         TokenKind::Semicolon,
//!         TokenKind::PropIdent,
//!         TokenKind::Value,
//!         TokenKind::Parenthesis,
//!     ]
//! );
//! ```

use serde::Serialize;
use std::ops::Range;

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Parenthesis,
    Semicolon,
    PropIdent,
    Value,
    Invalid,
}

/// A lexeme together with its position in the source.
///
/// `row` and `col` are zero-based and refer to the first character of the
/// token. `pos` is the zero-based character index, `offset` the byte offset
/// of the same character. `progress` is `pos` relative to the last character
/// of the source, so it lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    pub row: usize,
    pub col: usize,
    pub pos: usize,
    pub offset: usize,
    pub progress: f64,
}

/// A token without a borrowed slice, as produced by [`Scanner`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawToken {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub row: usize,
    pub col: usize,
    pub pos: usize,
}

/// Cursor state of the tokenizer.
///
/// The scanner does not hold on to the text; every call receives it. This
/// lets the parser swap the decoded text underneath a running scan when the
/// encoding changes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scanner {
    offset: usize,
    pos: usize,
    row: usize,
    col: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the cursor from the start of `text` to byte `offset`, keeping
    /// row and column exact.
    pub fn seek(&mut self, text: &str, offset: usize) {
        *self = Scanner::new();
        if let Some(prefix) = text.get(..offset) {
            self.advance(prefix);
        }
    }

    fn advance(&mut self, consumed: &str) {
        for ch in consumed.chars() {
            self.offset += ch.len_utf8();
            self.pos += 1;
            if ch == '\n' {
                self.row += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_whitespace(&mut self, text: &str) {
        let rest = &text[self.offset..];
        let len = rest
            .find(|ch: char| !ch.is_whitespace())
            .unwrap_or(rest.len());
        self.advance(&rest[..len]);
    }

    /// Length in bytes of a bracketed value at the start of `rest`, closing
    /// bracket included, or `None` if it is never closed.
    fn value_len(rest: &str) -> Option<usize> {
        let mut escaped = false;
        for (i, ch) in rest.char_indices().skip(1) {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                ']' => return Some(i + 1),
                _ => {}
            }
        }
        None
    }

    pub fn scan(&mut self, text: &str) -> Option<RawToken> {
        self.skip_whitespace(text);
        let rest = &text[self.offset..];
        let ch = rest.chars().next()?;

        let (kind, len) = match ch {
            '(' | ')' => (TokenKind::Parenthesis, 1),
            ';' => (TokenKind::Semicolon, 1),
            '[' => match Self::value_len(rest) {
                Some(len) => (TokenKind::Value, len),
                None => (TokenKind::Invalid, 1),
            },
            c if c.is_ascii_alphabetic() => {
                let len = rest
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(rest.len());
                (TokenKind::PropIdent, len)
            }
            c => (TokenKind::Invalid, c.len_utf8()),
        };

        let token = RawToken {
            kind,
            span: self.offset..self.offset + len,
            row: self.row,
            col: self.col,
            pos: self.pos,
        };
        self.advance(&rest[..len]);
        Some(token)
    }
}

/// Progress of a character position relative to the last character.
pub(crate) fn progress(pos: usize, chars: usize) -> f64 {
    if chars <= 1 {
        0.0
    } else {
        pos as f64 / (chars - 1) as f64
    }
}

/// Lazy token iterator over SGF text, created by [`tokenize`].
///
/// Iteration is restartable only by creating a new tokenizer.
pub struct Tokenizer<'a> {
    text: &'a str,
    scanner: Scanner,
    chars: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            scanner: Scanner::new(),
            chars: text.chars().count(),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let raw = self.scanner.scan(text)?;
        Some(Token {
            kind: raw.kind,
            value: &text[raw.span.clone()],
            row: raw.row,
            col: raw.col,
            pos: raw.pos,
            offset: raw.span.start,
            progress: progress(raw.pos, self.chars),
        })
    }
}

/// Tokenizes SGF text.
///
/// # Examples
///
/// ```rust
/// use sgf_format::tokenize;
///
/// let tokens: Vec<_> = tokenize("(;C[bl\nah])").collect();
/// let close = tokens.last().unwrap();
/// assert_eq!((close.row, close.col, close.pos), (1, 3, 10));
/// assert_eq!(close.progress, 1.0);
/// ```
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    Tokenizer::new(text)
}
