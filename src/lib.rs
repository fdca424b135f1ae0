//! # sgf_format
//!
//! A reader and writer for the Smart Game Format (SGF).
//!
//! ## What is SGF?
//!
//! SGF is the plain-text format used to record board games, most of all Go.
//! A record is a tree: a sequence of moves with alternative variations
//! branching off at any point.
//!
//! ```text
//! (;GM[1]SZ[19]PB[Black]PW[White]
//!   ;B[pd];W[dp]
//!   (;B[pp])
//!   (;B[dd]C[Alternative opening])
//! )
//! ```
//!
//! Each `;` starts a node. A node holds properties, an uppercase identifier
//! followed by one or more bracketed values. Parentheses wrap variations.
//!
//! ## Key Features
//!
//! - **Forgiving**: Parsing never fails; malformed input is recovered from
//! - **Encoding-Aware**: Byte input honors byte-order marks and the `CA`
//!   property, re-decoding values read before it, and falls back to charset
//!   detection for files that declare nothing
//! - **Streaming**: [`Nodes`] yields nodes one by one as they are parsed
//! - **No Recursion**: Long games parse and stringify without deep stacks
//! - **Codecs**: Board points ([`parse_vertex`]) and `DT` dates
//!   ([`parse_dates`])
//!
//! ## Quick Start
//!
//! ```rust
//! use sgf_format::{parse, stringify};
//!
//! let forest = parse("(;B[aa]SZ[19];AB[cc][dd:ee])");
//! let root = &forest[0];
//!
//! assert_eq!(root.data.first("SZ"), Some("19"));
//! assert_eq!(root.children[0].data.get("AB").unwrap(), ["cc", "dd:ee"]);
//!
//! // Stringify back
//! let text = stringify(&forest);
//! assert_eq!(text, "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)\n");
//! ```
//!
//! ### Variations
//!
//! The first child of a node continues the main line; later children are
//! alternatives.
//!
//! ```rust
//! use sgf_format::parse;
//!
//! let forest = parse("(;B[hh](;W[ii])(;W[hi]C[h]))");
//! let variations: Vec<_> = forest[0]
//!     .children
//!     .iter()
//!     .map(|child| child.data.first("W").unwrap())
//!     .collect();
//! assert_eq!(variations, vec!["ii", "hi"]);
//! ```
//!
//! ### Reading Files
//!
//! Files should be parsed as bytes so that their declared encoding is used:
//!
//! ```rust
//! use sgf_format::{from_reader, ParseOptions};
//! use std::io::Cursor;
//!
//! let (bytes, _, _) = encoding_rs::EUC_KR.encode("(;CA[EUC-KR]PB[이세돌])");
//! let forest = from_reader(Cursor::new(bytes), &ParseOptions::default()).unwrap();
//! assert_eq!(forest[0].data.first("PB"), Some("이세돌"));
//! ```
//!
//! ### Building Trees
//!
//! ```rust
//! use sgf_format::{props, stringify_with_options, Node, StringifyOptions};
//!
//! let mut root = Node::with_data(props! { "GM" => ["1"], "SZ" => ["9"] });
//! root.children.push(Node::with_data(props! { "B" => ["ee"] }));
//!
//! let text = stringify_with_options(&[root], &StringifyOptions::compact());
//! assert_eq!(text, "(;GM[1]SZ[9];B[ee])");
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: encoding decisions at `debug`,
//! skipped tokens and dropped identifiers at `trace`. Install any subscriber
//! to see them.

use std::io;

pub mod date;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod parser;
pub mod property;
pub mod ser;
pub mod vertex;

pub use date::{from_naive_date, parse_dates, stringify_dates, to_naive_date};
pub use encoding::{decode, Decoded, EncodingTable};
pub use error::{Error, Result};
pub use escape::{escape, unescape};
pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use map::PropertyMap;
pub use node::{forest_content_eq, Descendants, Forest, Node, NodeId};
pub use options::{ParseOptions, StringifyOptions};
pub use parser::{
    build_forest, parse, parse_bytes, parse_bytes_with, parse_bytes_with_options, parse_with,
    parse_with_options, Nodes,
};
pub use property::{is_canonical, normalize};
pub use ser::{stringify, stringify_node, stringify_with_options, Stringifier};
pub use vertex::{parse_compressed_vertices, parse_vertex, stringify_vertex, Vertex, NO_VERTEX};

/// Stringify a forest into an I/O stream.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{parse, to_writer, StringifyOptions};
///
/// let forest = parse("(;B[aa])");
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &forest, &StringifyOptions::compact()).unwrap();
/// assert_eq!(buffer, b"(;B[aa])");
/// ```
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, forest: &[Node], options: &StringifyOptions) -> Result<()>
where
    W: io::Write,
{
    let text = stringify_with_options(forest, options);
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse a forest from an I/O stream of SGF bytes.
///
/// The whole stream is read, then parsed with [`parse_bytes_with_options`].
///
/// # Errors
///
/// Returns an error if reading from the reader fails. Malformed SGF is not
/// an error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, options: &ParseOptions) -> Result<Forest>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(parse_bytes_with_options(&bytes, options))
}
