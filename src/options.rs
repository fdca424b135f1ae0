//! Configuration options for parsing and stringifying SGF.
//!
//! This module provides types to customize both directions of the pipeline:
//!
//! - [`ParseOptions`]: first node id, explicit encoding, recognized encodings
//! - [`StringifyOptions`]: line break and indentation of the output
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::{parse, stringify_with_options, StringifyOptions};
//!
//! let forest = parse("(;B[aa];W[bb])");
//!
//! // Single line, no indentation
//! let options = StringifyOptions::new().with_line_break("");
//! assert_eq!(stringify_with_options(&forest, &options), "(;B[aa];W[bb])");
//!
//! // Windows line endings, four spaces per level
//! let options = StringifyOptions::new().with_line_break("\r\n").with_indent("    ");
//! assert_eq!(
//!     stringify_with_options(&forest, &options),
//!     "(\r\n    ;B[aa]\r\n    ;W[bb]\r\n)\r\n"
//! );
//! ```

use crate::{EncodingTable, NodeId};

/// Configuration options for parsing.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{EncodingTable, ParseOptions};
///
/// // Defaults: ids start at 0, encoding detected from the input
/// let options = ParseOptions::new();
/// assert_eq!(options.first_id, 0);
/// assert!(options.encoding.is_none());
///
/// // Custom configuration
/// let options = ParseOptions::new()
///     .with_first_id(1000)
///     .with_encoding("Shift_JIS")
///     .with_encodings(EncodingTable::new().with_label("sjis", encoding_rs::SHIFT_JIS));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Id assigned to the first node created.
    pub first_id: NodeId,
    /// Encoding asserted by the caller; skips byte-order-mark and `CA`
    /// detection when the label is known. Only affects byte input.
    pub encoding: Option<String>,
    /// Labels recognized in `CA` properties and in `encoding`.
    pub encodings: EncodingTable,
}

impl ParseOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the id of the first created node. Later nodes count up from it.
    ///
    /// Useful when several parses feed one external store that needs ids to
    /// stay unique.
    #[must_use]
    pub fn with_first_id(mut self, first_id: NodeId) -> Self {
        self.first_id = first_id;
        self
    }

    /// Asserts the encoding of byte input.
    #[must_use]
    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = Some(label.to_string());
        self
    }

    /// Replaces the table of recognized encoding labels.
    #[must_use]
    pub fn with_encodings(mut self, encodings: EncodingTable) -> Self {
        self.encodings = encodings;
        self
    }
}

/// Configuration options for stringifying.
///
/// Indentation is only written when the line break is non-empty.
///
/// # Examples
///
/// ```rust
/// use sgf_format::StringifyOptions;
///
/// let options = StringifyOptions::new();
/// assert_eq!(options.line_break, "\n");
/// assert_eq!(options.indent, "  ");
///
/// let compact = StringifyOptions::compact();
/// assert_eq!(compact.line_break, "");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringifyOptions {
    pub line_break: String,
    pub indent: String,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        StringifyOptions {
            line_break: "\n".to_string(),
            indent: "  ".to_string(),
        }
    }
}

impl StringifyOptions {
    /// Creates default options (`\n` line breaks, two-space indentation).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for single-line output.
    #[must_use]
    pub fn compact() -> Self {
        StringifyOptions {
            line_break: String::new(),
            ..Default::default()
        }
    }

    /// Sets the line break written after every node and parenthesis group.
    #[must_use]
    pub fn with_line_break(mut self, line_break: &str) -> Self {
        self.line_break = line_break.to_string();
        self
    }

    /// Sets the indentation written once per nesting level.
    #[must_use]
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }
}
