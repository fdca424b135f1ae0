//! Character-encoding resolution for raw SGF bytes.
//!
//! SGF files declare their character set in the `CA` property of the first
//! node, which can only be read after decoding at least part of the file. The
//! resolver therefore works in two states:
//!
//! - **Tentative**: no byte-order mark and no explicit encoding were given.
//!   The buffer is decoded as UTF-8 if it is valid UTF-8, otherwise with the
//!   encoding guessed by [`chardetng`]. An offset map back to the raw bytes
//!   is kept.
//! - **Settled**: the encoding is final. Further `CA` values are ignored.
//!
//! A `CA` value read while tentative that names a known, different,
//! ASCII-compatible encoding forces the single transition
//! `Tentative(guess) -> Settled(new)`: the parser re-decodes the whole buffer
//! and re-decodes the values it already holds from their byte spans.
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::{decode, ParseOptions};
//!
//! let decoded = decode(b"\xEF\xBB\xBF(;C[bom])", &ParseOptions::default());
//! assert_eq!(decoded.text, "(;C[bom])");
//! assert_eq!(decoded.encoding, "UTF-8");
//! assert!(decoded.settled);
//! ```

use crate::ParseOptions;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use indexmap::IndexMap;
use std::ops::Range;
use tracing::{debug, warn};

/// Maps encoding labels, as found in `CA` properties, to decoders.
///
/// Lookups are case-insensitive and ignore surrounding whitespace. Labels
/// added with [`with_label`](EncodingTable::with_label) take precedence over
/// the WHATWG label registry, which can be switched off to restrict the set
/// of recognized encodings.
///
/// # Examples
///
/// ```rust
/// use sgf_format::EncodingTable;
///
/// let table = EncodingTable::new().with_label("sjis-win", encoding_rs::SHIFT_JIS);
/// assert_eq!(table.lookup("SJIS-WIN").map(|e| e.name()), Some("Shift_JIS"));
/// assert_eq!(table.lookup("gb2312").map(|e| e.name()), Some("GBK"));
/// assert!(table.lookup("no-such-charset").is_none());
///
/// let strict = EncodingTable::empty();
/// assert!(strict.lookup("utf-8").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct EncodingTable {
    labels: IndexMap<String, &'static Encoding>,
    whatwg: bool,
}

impl Default for EncodingTable {
    fn default() -> Self {
        EncodingTable {
            labels: IndexMap::new(),
            whatwg: true,
        }
    }
}

impl EncodingTable {
    /// Creates a table backed by the WHATWG label registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table that recognizes no label at all.
    #[must_use]
    pub fn empty() -> Self {
        EncodingTable {
            labels: IndexMap::new(),
            whatwg: false,
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, label: &str, encoding: &'static Encoding) -> Self {
        self.labels.insert(label.trim().to_ascii_lowercase(), encoding);
        self
    }

    /// Enables or disables the WHATWG label registry fallback.
    #[must_use]
    pub fn with_whatwg_labels(mut self, enabled: bool) -> Self {
        self.whatwg = enabled;
        self
    }

    /// Finds the encoding for `label`.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&'static Encoding> {
        let key = label.trim().to_ascii_lowercase();
        if let Some(encoding) = self.labels.get(&key) {
            return Some(*encoding);
        }
        if self.whatwg {
            Encoding::for_label(key.as_bytes())
        } else {
            None
        }
    }
}

/// Result of the initial decoding decision for a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// Canonical name of the encoding used, e.g. `"UTF-8"` or `"UTF-16LE"`.
    pub encoding: &'static str,
    /// `false` while a `CA` property may still change the encoding.
    pub settled: bool,
}

/// Decodes `bytes` the way the parser starts out: explicit encoding first,
/// then byte-order mark, then UTF-8 or a detected encoding.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{decode, ParseOptions};
///
/// let decoded = decode(b"(;C[caf\xE9])", &ParseOptions::new().with_encoding("latin1"));
/// assert_eq!(decoded.text, "(;C[café])");
/// assert!(decoded.settled);
///
/// let decoded = decode("(;C[café])".as_bytes(), &ParseOptions::default());
/// assert_eq!(decoded.text, "(;C[café])");
/// assert_eq!(decoded.encoding, "UTF-8");
/// assert!(!decoded.settled);
/// ```
#[must_use]
pub fn decode(bytes: &[u8], options: &ParseOptions) -> Decoded {
    let resolver = Resolver::new(bytes, options);
    Decoded {
        encoding: resolver.encoding().name(),
        settled: resolver.is_settled(),
        text: resolver.text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodingState {
    Tentative(&'static Encoding),
    Settled(&'static Encoding),
}

/// Maps byte offsets in tentatively decoded text back to byte offsets in
/// the raw buffer.
///
/// Each entry marks a point from which text and buffer advance in lockstep.
/// A new entry is recorded wherever a character or a U+FFFD replacement has
/// a different length than the bytes it came from.
#[derive(Debug, Clone, Default)]
struct OffsetMap {
    points: Vec<(usize, usize)>,
}

impl OffsetMap {
    fn mark(&mut self, text_offset: usize, source: usize) {
        if let Some(&(text, start)) = self.points.last() {
            if text_offset - text == source - start {
                return;
            }
        }
        self.points.push((text_offset, source));
    }

    fn to_source(&self, text_offset: usize) -> usize {
        let index = self
            .points
            .partition_point(|&(text, _)| text <= text_offset)
            .saturating_sub(1);
        match self.points.get(index) {
            Some(&(text, source)) => source + (text_offset - text),
            None => text_offset,
        }
    }
}

/// Decodes `bytes` one byte at a time so that every character boundary can
/// be traced back to the buffer.
///
/// A byte that ends a malformed sequence without belonging to it comes out
/// last, after the replacement characters of that sequence.
fn decode_mapped(encoding: &'static Encoding, bytes: &[u8]) -> (String, OffsetMap) {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut text = String::with_capacity(bytes.len());
    let mut map = OffsetMap {
        points: vec![(0, 0)],
    };
    let capacity = decoder.max_utf8_buffer_length(1).unwrap_or(16).max(16);
    let mut chunk = String::with_capacity(capacity);

    for (source, byte) in bytes.iter().enumerate() {
        chunk.clear();
        let last = source + 1 == bytes.len();
        let _ = decoder.decode_to_string(std::slice::from_ref(byte), &mut chunk, last);

        let mut chars = chunk.chars();
        let Some(tail) = chars.next_back() else {
            continue;
        };
        let head = chars.as_str();
        if !head.is_empty() {
            text.push_str(head);
            map.mark(text.len(), source);
        }
        text.push(tail);
        map.mark(text.len(), source + 1);
    }

    (text, map)
}

/// Guesses the encoding of a buffer that is not valid UTF-8.
///
/// Guesses that cannot be tokenized as ASCII fall back to UTF-8.
fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, false);
    if guess.is_ascii_compatible() {
        guess
    } else {
        UTF_8
    }
}

/// A re-decode forced by a `CA` declaration.
#[derive(Debug)]
pub(crate) struct Redecode {
    pub text: String,
    /// Offset in the new text where scanning resumes.
    pub resume: usize,
}

/// Owns the raw buffer and the current encoding decision for one parse.
#[derive(Debug)]
pub(crate) struct Resolver<'b> {
    bytes: &'b [u8],
    state: EncodingState,
    offsets: OffsetMap,
    table: EncodingTable,
    pub text: String,
}

impl<'b> Resolver<'b> {
    pub fn new(bytes: &'b [u8], options: &ParseOptions) -> Self {
        let table = options.encodings.clone();
        let explicit = options.encoding.as_deref().and_then(|label| {
            let found = table.lookup(label);
            if found.is_none() {
                warn!(label, "ignoring unknown explicit encoding");
            }
            found
        });

        if let Some(encoding) = explicit {
            let (text, _) = encoding.decode_with_bom_removal(bytes);
            debug!(encoding = encoding.name(), "using explicit encoding");
            return Self::settled(bytes, encoding, text.into_owned(), table);
        }

        if let Some((encoding, bom)) = Encoding::for_bom(bytes) {
            debug!(encoding = encoding.name(), "byte-order mark found");
            let (text, _) = encoding.decode_without_bom_handling(&bytes[bom..]);
            return Self::settled(bytes, encoding, text.into_owned(), table);
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            return Resolver {
                bytes,
                state: EncodingState::Tentative(UTF_8),
                offsets: OffsetMap::default(),
                table,
                text: text.to_owned(),
            };
        }
        let guess = detect(bytes);
        debug!(encoding = guess.name(), "detected encoding");
        Self::tentative(bytes, guess, table)
    }

    fn tentative(bytes: &'b [u8], encoding: &'static Encoding, table: EncodingTable) -> Self {
        let (text, offsets) = decode_mapped(encoding, bytes);
        Resolver {
            bytes,
            state: EncodingState::Tentative(encoding),
            offsets,
            table,
            text,
        }
    }

    fn settled(
        bytes: &'b [u8],
        encoding: &'static Encoding,
        text: String,
        table: EncodingTable,
    ) -> Self {
        Resolver {
            bytes,
            state: EncodingState::Settled(encoding),
            offsets: OffsetMap::default(),
            table,
            text,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        match self.state {
            EncodingState::Tentative(encoding) | EncodingState::Settled(encoding) => encoding,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, EncodingState::Settled(_))
    }

    /// Fixes the current encoding for the rest of the parse.
    pub fn settle(&mut self) {
        self.state = EncodingState::Settled(self.encoding());
    }

    /// Byte range in the raw buffer of a byte range in the current text.
    ///
    /// Only meaningful while tentative.
    pub fn source_span(&self, span: Range<usize>) -> Range<usize> {
        self.offsets.to_source(span.start)..self.offsets.to_source(span.end)
    }

    /// Decodes a raw byte range with the current encoding.
    pub fn decode_span(&self, span: Range<usize>) -> String {
        match self.bytes.get(span) {
            Some(raw) => self
                .encoding()
                .decode_without_bom_handling(raw)
                .0
                .into_owned(),
            None => String::new(),
        }
    }

    /// Handles a `CA` value. `consumed` is the offset in the current text
    /// just behind the value token.
    ///
    /// Returns the re-decoded text when the encoding changed.
    pub fn declare(&mut self, label: &str, consumed: usize) -> Option<Redecode> {
        let EncodingState::Tentative(current) = self.state else {
            return None;
        };
        let Some(declared) = self.table.lookup(label) else {
            debug!(label, "ignoring unknown encoding");
            return None;
        };
        if declared == current {
            self.settle();
            return None;
        }
        if declared == UTF_16LE || declared == UTF_16BE || !declared.is_ascii_compatible() {
            debug!(label, "ignoring encoding that cannot describe this buffer");
            return None;
        }

        let cut = self.offsets.to_source(consumed).min(self.bytes.len());
        let (prefix, _) = declared.decode_without_bom_handling(&self.bytes[..cut]);
        let (text, _) = declared.decode_without_bom_handling(self.bytes);
        let resume = prefix.len();
        if !text.is_char_boundary(resume) {
            debug!(label, "declared encoding does not align with the buffer");
            return None;
        }

        debug!(
            from = current.name(),
            to = declared.name(),
            "re-decoding buffer after CA property"
        );
        self.state = EncodingState::Settled(declared);
        self.offsets = OffsetMap::default();
        Some(Redecode {
            text: text.into_owned(),
            resume,
        })
    }
}
