//! SGF tree parsing.
//!
//! This module turns SGF text (or raw bytes) into game trees.
//!
//! ## Overview
//!
//! Parsing happens in two layers:
//!
//! - [`Nodes`] is a generator: it walks the token stream and yields every
//!   node as soon as its properties are final, in creation (pre-)order, with
//!   `id` and `parent_id` set and `children` still empty. Consumers that keep
//!   their own tree store can ingest nodes from it one at a time.
//! - [`build_forest`] links such a stream into owned trees.
//!
//! The `parse*` functions combine both.
//!
//! ## Grammar
//!
//! The input is treated as one implicit outer record. A record is a sequence
//! of `;`-nodes followed by nested `(` ... `)` records, the variations. The
//! first variation continues the main line, later ones are alternatives.
//! Parsing never fails:
//!
//! - a missing outer `(` or a missing first `;` is implied
//! - empty records `()` produce nothing
//! - unclosed records are closed at the end of input
//! - stray tokens (values without identifier, invalid characters, a `)`
//!   without matching `(` at the outer level) are skipped
//!
//! ```rust
//! use sgf_format::parse;
//!
//! let implicit = parse("B[hh];W[ii]");
//! let explicit = parse("(;B[hh];W[ii])");
//! assert_eq!(implicit, explicit);
//! ```
//!
//! ## Encodings
//!
//! Byte input goes through the encoding resolver. While the first node is
//! being read, a `CA` property may switch the encoding; values read before it
//! are re-decoded from the original bytes.
//!
//! ```rust
//! use sgf_format::parse_bytes;
//!
//! let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("(;PB[本因坊]CA[Shift_JIS];B[dd])");
//! let forest = parse_bytes(&bytes);
//! assert_eq!(forest[0].data.first("PB"), Some("本因坊"));
//! ```

use crate::encoding::{Redecode, Resolver};
use crate::lexer::{progress, RawToken, Scanner, TokenKind};
use crate::property::{normalize, CHARSET};
use crate::{unescape, Forest, Node, NodeId, ParseOptions};
use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sequence,
    Variations,
}

/// One open record.
#[derive(Debug)]
struct Frame {
    parent_id: Option<NodeId>,
    last_id: Option<NodeId>,
    phase: Phase,
}

impl Frame {
    fn new(parent_id: Option<NodeId>) -> Self {
        Frame {
            parent_id,
            last_id: None,
            phase: Phase::Sequence,
        }
    }

    /// Parent for the next node or nested record.
    fn tail(&self) -> Option<NodeId> {
        self.last_id.or(self.parent_id)
    }
}

/// Raw byte span of a value, kept while the encoding is tentative.
#[derive(Debug)]
struct ValueSpan {
    key: String,
    index: usize,
    source: Range<usize>,
}

#[derive(Debug)]
struct PendingNode {
    node: Node,
    property: Option<String>,
    spans: Vec<ValueSpan>,
}

/// Generator of parsed nodes in creation order.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{Nodes, ParseOptions};
///
/// let nodes: Vec<_> = Nodes::new("(;B[hh](;W[ii])(;W[hi];C[h]))", &ParseOptions::default())
///     .map(|node| (node.id, node.parent_id))
///     .collect();
/// assert_eq!(nodes, vec![(0, None), (1, Some(0)), (2, Some(0)), (3, Some(2))]);
/// ```
pub struct Nodes<'a> {
    text: Cow<'a, str>,
    resolver: Option<Resolver<'a>>,
    scanner: Scanner,
    chars: usize,
    stack: Vec<Frame>,
    pending: Option<PendingNode>,
    next_id: NodeId,
    emitted: usize,
    progress: f64,
}

impl<'a> Nodes<'a> {
    /// Creates a generator over already decoded text.
    pub fn new(text: &'a str, options: &ParseOptions) -> Self {
        Self::with_source(Cow::Borrowed(text), None, options)
    }

    /// Creates a generator over raw bytes, resolving their encoding.
    pub fn from_bytes(bytes: &'a [u8], options: &ParseOptions) -> Self {
        let mut resolver = Resolver::new(bytes, options);
        let text = std::mem::take(&mut resolver.text);
        Self::with_source(Cow::Owned(text), Some(resolver), options)
    }

    fn with_source(
        text: Cow<'a, str>,
        resolver: Option<Resolver<'a>>,
        options: &ParseOptions,
    ) -> Self {
        Nodes {
            chars: text.chars().count(),
            text,
            resolver,
            scanner: Scanner::new(),
            stack: vec![Frame::new(None)],
            pending: None,
            next_id: options.first_id,
            emitted: 0,
            progress: 0.0,
        }
    }

    /// Progress of the last consumed token, between 0 and 1.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Name of the encoding the text was decoded with, for byte input.
    #[must_use]
    pub fn encoding(&self) -> Option<&'static str> {
        self.resolver.as_ref().map(|r| r.encoding().name())
    }

    fn start_node(&mut self) {
        let parent_id = self.stack.last().and_then(Frame::tail);
        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(PendingNode {
            node: Node::new(id, parent_id),
            property: None,
            spans: Vec::new(),
        });
    }

    fn finish_node(&mut self) -> Option<Node> {
        let pending = self.pending.take()?;
        if let Some(frame) = self.stack.last_mut() {
            frame.last_id = Some(pending.node.id);
        }
        self.emitted += 1;
        if self.emitted == 1 {
            if let Some(resolver) = self.resolver.as_mut() {
                resolver.settle();
            }
        }
        Some(pending.node)
    }

    fn set_property(&mut self, span: Range<usize>) {
        if self.pending.is_none() {
            self.start_node();
        }
        let raw = &self.text[span];
        let ident = normalize(raw).into_owned();
        let property = if ident.is_empty() {
            trace!(ident = raw, "dropping identifier without uppercase letters");
            None
        } else {
            Some(ident)
        };
        if let Some(pending) = self.pending.as_mut() {
            pending.property = property;
        }
    }

    fn push_value(&mut self, token: &RawToken) {
        let Some(pending) = self.pending.as_mut() else {
            trace!(row = token.row, col = token.col, "skipping value outside a node");
            return;
        };
        let Some(key) = pending.property.clone() else {
            trace!(row = token.row, col = token.col, "skipping value without identifier");
            return;
        };

        let inner = token.span.start + 1..token.span.end - 1;
        let value = unescape(&self.text[inner.clone()]);
        let index = pending.node.data.append(key.clone(), value.clone());

        let Some(resolver) = self.resolver.as_mut() else {
            return;
        };
        if resolver.is_settled() {
            return;
        }
        pending.spans.push(ValueSpan {
            source: resolver.source_span(inner),
            key: key.clone(),
            index,
        });
        if key != CHARSET {
            return;
        }

        let Some(redecode) = resolver.declare(&value, token.span.end) else {
            return;
        };
        for span in pending.spans.drain(..) {
            let raw = resolver.decode_span(span.source);
            pending.node.data.set_value(&span.key, span.index, unescape(&raw));
        }
        self.restart(redecode);
    }

    /// Continues scanning in re-decoded text, from the start of the text up
    /// to the resume offset.
    fn restart(&mut self, redecode: Redecode) {
        self.text = Cow::Owned(redecode.text);
        self.chars = self.text.chars().count();
        self.scanner.seek(&self.text, redecode.resume);
    }

    fn step(&mut self, token: RawToken) -> Option<Node> {
        let phase = self.stack.last().map_or(Phase::Sequence, |f| f.phase);

        match (token.kind, phase) {
            (TokenKind::Parenthesis, _) if &self.text[token.span.clone()] == "(" => {
                let finished = self.finish_node();
                let parent_id = self.stack.last_mut().and_then(|frame| {
                    frame.phase = Phase::Variations;
                    frame.tail()
                });
                self.stack.push(Frame::new(parent_id));
                finished
            }
            (TokenKind::Parenthesis, _) => {
                let finished = self.finish_node();
                if self.stack.len() > 1 {
                    self.stack.pop();
                } else {
                    trace!(row = token.row, col = token.col, "skipping unmatched ')'");
                }
                finished
            }
            (TokenKind::Semicolon, Phase::Sequence) => {
                let finished = self.finish_node();
                self.start_node();
                finished
            }
            (TokenKind::PropIdent, Phase::Sequence) => {
                self.set_property(token.span);
                None
            }
            (TokenKind::Value, Phase::Sequence) => {
                self.push_value(&token);
                None
            }
            (kind, _) => {
                trace!(?kind, row = token.row, col = token.col, "skipping token");
                None
            }
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(token) = self.scanner.scan(&self.text) else {
                return self.finish_node();
            };
            self.progress = progress(token.pos, self.chars);
            if let Some(node) = self.step(token) {
                return Some(node);
            }
        }
    }
}

/// Links a stream of childless nodes into a forest.
///
/// Parents must precede their children, as they do in a [`Nodes`] stream.
/// Siblings keep stream order. A node whose parent never appeared becomes a
/// root. Works without recursion, so arbitrarily long games are fine.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{build_forest, Nodes, ParseOptions};
///
/// let mut seen = Vec::new();
/// let nodes = Nodes::new("(;B[aa];W[bb])(;B[cc])", &ParseOptions::default())
///     .inspect(|node| seen.push(node.id));
/// let forest = build_forest(nodes);
///
/// assert_eq!(seen, vec![0, 1, 2]);
/// assert_eq!(forest.len(), 2);
/// assert_eq!(forest[0].children[0].id, 1);
/// ```
pub fn build_forest<I>(nodes: I) -> Forest
where
    I: IntoIterator<Item = Node>,
{
    let mut slots: Vec<Option<Node>> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut positions: HashMap<NodeId, usize> = HashMap::new();

    for node in nodes {
        let parent = node
            .parent_id
            .and_then(|id| positions.get(&id).copied());
        positions.insert(node.id, slots.len());
        parents.push(parent);
        slots.push(Some(node));
    }

    let mut adopted: Vec<Vec<Node>> = vec![Vec::new(); slots.len()];
    let mut roots = Vec::new();

    for i in (0..slots.len()).rev() {
        let Some(mut node) = slots[i].take() else {
            continue;
        };
        node.children.extend(std::mem::take(&mut adopted[i]).into_iter().rev());
        match parents[i] {
            Some(parent) => adopted[parent].push(node),
            None => roots.push(node),
        }
    }

    roots.reverse();
    roots
}

/// Parses SGF text into a forest.
///
/// # Examples
///
/// ```rust
/// use sgf_format::parse;
///
/// let forest = parse("(;B[aa]SZ[19];AB[cc][dd:ee])");
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].data.first("B"), Some("aa"));
/// assert_eq!(forest[0].children[0].data.get("AB").unwrap(), ["cc", "dd:ee"]);
///
/// assert!(parse("").is_empty());
/// ```
#[must_use]
pub fn parse(text: &str) -> Forest {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses SGF text with custom options.
#[must_use]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Forest {
    build_forest(Nodes::new(text, options))
}

/// Parses SGF text, calling `on_node_created` once per node in creation
/// order, before the node is linked under its parent.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{parse_with, ParseOptions};
///
/// let mut created = Vec::new();
/// parse_with("(;B[hh](;W[ii])(;W[hi];C[h]))", &ParseOptions::default(), |node| {
///     created.push((node.id, node.parent_id, node.data.keys().cloned().collect::<Vec<_>>()));
/// });
/// assert_eq!(created[3], (3, Some(2), vec!["C".to_string()]));
/// ```
pub fn parse_with<F>(text: &str, options: &ParseOptions, mut on_node_created: F) -> Forest
where
    F: FnMut(&Node),
{
    build_forest(Nodes::new(text, options).inspect(|node| on_node_created(node)))
}

/// Parses raw SGF bytes, detecting their encoding.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> Forest {
    parse_bytes_with_options(bytes, &ParseOptions::default())
}

/// Parses raw SGF bytes with custom options.
#[must_use]
pub fn parse_bytes_with_options(bytes: &[u8], options: &ParseOptions) -> Forest {
    build_forest(Nodes::from_bytes(bytes, options))
}

/// Parses raw SGF bytes, calling `on_node_created` once per node.
pub fn parse_bytes_with<F>(bytes: &[u8], options: &ParseOptions, mut on_node_created: F) -> Forest
where
    F: FnMut(&Node),
{
    build_forest(Nodes::from_bytes(bytes, options).inspect(|node| on_node_created(node)))
}
