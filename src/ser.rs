//! SGF stringification.
//!
//! This module provides the [`Stringifier`] that renders game trees as SGF
//! text.
//!
//! ## Layout
//!
//! - Every node is written on its own line as `;` followed by its properties.
//! - A main line without branches stays at one indentation level.
//! - Each variation is wrapped in `(` ... `)` and indented one level deeper.
//! - Every top-level tree is wrapped in parentheses.
//!
//! Only canonical identifiers (uppercase letters) with at least one value are
//! written, and every value is escaped.
//!
//! ## Usage
//!
//! ```rust
//! use sgf_format::{parse, stringify};
//!
//! let forest = parse("(;B[aa]SZ[19];AB[cc][dd:ee])");
//! assert_eq!(stringify(&forest), "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)\n");
//! ```
//!
//! ## Direct Stringifier Usage
//!
//! ```rust
//! use sgf_format::{parse, Stringifier, StringifyOptions};
//!
//! let forest = parse("(;B[aa];W[bb])");
//! let mut stringifier = Stringifier::new(StringifyOptions::compact());
//! stringifier.write_forest(&forest);
//! stringifier.write_forest(&forest);
//! assert_eq!(stringifier.into_inner(), "(;B[aa];W[bb])(;B[aa];W[bb])");
//! ```

use crate::{escape, is_canonical, Node, PropertyMap, StringifyOptions};

/// Pending output step; the stack of these replaces recursion over
/// variations.
enum Step<'a> {
    Sequence {
        data: Option<&'a PropertyMap>,
        children: &'a [Node],
        level: usize,
    },
    Open,
    Close {
        level: usize,
    },
    LineBreak,
}

/// The SGF stringifier.
///
/// Accumulates output in an internal buffer; created via
/// [`Stringifier::new`].
pub struct Stringifier {
    output: String,
    options: StringifyOptions,
}

impl Stringifier {
    pub fn new(options: StringifyOptions) -> Self {
        Stringifier {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes a sequence of top-level trees.
    pub fn write_forest(&mut self, forest: &[Node]) {
        self.write_tree(None, forest, 0);
    }

    /// Writes one node at the outer level. Its children, if any, are
    /// wrapped in parentheses.
    pub fn write_node(&mut self, node: &Node) {
        self.write_tree(Some(&node.data), &node.children, 0);
    }

    fn write_indent(&mut self, level: usize) {
        if self.options.line_break.is_empty() {
            return;
        }
        for _ in 0..level {
            self.output.push_str(&self.options.indent);
        }
    }

    fn write_line_break(&mut self) {
        self.output.push_str(&self.options.line_break);
    }

    fn write_properties(&mut self, data: &PropertyMap) {
        for (key, values) in data {
            if !is_canonical(key) || values.is_empty() {
                continue;
            }
            self.output.push_str(key);
            for value in values {
                self.output.push('[');
                self.output.push_str(&escape(value));
                self.output.push(']');
            }
        }
    }

    fn write_tree(&mut self, data: Option<&PropertyMap>, children: &[Node], level: usize) {
        let mut steps = vec![Step::Sequence {
            data,
            children,
            level,
        }];

        while let Some(step) = steps.pop() {
            match step {
                Step::Sequence {
                    mut data,
                    mut children,
                    level,
                } => loop {
                    if let Some(data) = data {
                        self.write_indent(level);
                        self.output.push(';');
                        self.write_properties(data);
                        self.write_line_break();
                    }

                    match children {
                        [] => break,
                        [child] if level > 0 => {
                            data = Some(&child.data);
                            children = &child.children;
                        }
                        _ => {
                            self.write_indent(level);
                            steps.push(Step::LineBreak);
                            for child in children.iter().rev() {
                                steps.push(Step::Close { level });
                                steps.push(Step::Sequence {
                                    data: Some(&child.data),
                                    children: &child.children,
                                    level: level + 1,
                                });
                                steps.push(Step::Open);
                            }
                            break;
                        }
                    }
                },
                Step::Open => {
                    self.output.push('(');
                    self.write_line_break();
                }
                Step::Close { level } => {
                    self.write_indent(level);
                    self.output.push(')');
                }
                Step::LineBreak => self.write_line_break(),
            }
        }
    }
}

/// Stringifies a forest with default options.
#[must_use]
pub fn stringify(forest: &[Node]) -> String {
    stringify_with_options(forest, &StringifyOptions::default())
}

/// Stringifies a forest with custom options.
///
/// # Examples
///
/// ```rust
/// use sgf_format::{parse, stringify_with_options, StringifyOptions};
///
/// let forest = parse("(;B[aa];W[bb])(;CP[Copyright](;B[ab])(;W[ac]))");
/// let options = StringifyOptions::new().with_line_break("");
/// assert_eq!(
///     stringify_with_options(&forest, &options),
///     "(;B[aa];W[bb])(;CP[Copyright](;B[ab])(;W[ac]))"
/// );
/// ```
#[must_use]
pub fn stringify_with_options(forest: &[Node], options: &StringifyOptions) -> String {
    let mut stringifier = Stringifier::new(options.clone());
    stringifier.write_forest(forest);
    stringifier.into_inner()
}

/// Stringifies a single node, and its subtrees, with default options.
#[must_use]
pub fn stringify_node(node: &Node) -> String {
    let mut stringifier = Stringifier::new(StringifyOptions::default());
    stringifier.write_node(node);
    stringifier.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    fn node(data: PropertyMap, children: Vec<Node>) -> Node {
        let mut node = Node::with_data(data);
        node.children = children;
        node
    }

    fn sample() -> Vec<Node> {
        vec![
            node(
                props! { "B" => ["aa"], "SZ" => ["19"] },
                vec![node(props! { "AB" => ["cc", "dd:ee"] }, vec![])],
            ),
            node(
                props! { "CP" => ["Copyright"] },
                vec![
                    node(props! { "B" => ["ab"] }, vec![]),
                    node(props! { "W" => ["ac"] }, vec![]),
                ],
            ),
        ]
    }

    #[test]
    fn test_single_tree() {
        let forest = sample();
        assert_eq!(stringify(&forest[..1]), "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)\n");
    }

    #[test]
    fn test_multiple_trees() {
        assert_eq!(
            stringify(&sample()),
            "(\n  ;B[aa]SZ[19]\n  ;AB[cc][dd:ee]\n)(\n  ;CP[Copyright]\n  (\n    ;B[ab]\n  )(\n    ;W[ac]\n  )\n)\n"
        );
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            stringify_with_options(&sample(), &StringifyOptions::compact()),
            "(;B[aa]SZ[19];AB[cc][dd:ee])(;CP[Copyright](;B[ab])(;W[ac]))"
        );
    }

    #[test]
    fn test_empty_forest() {
        assert_eq!(stringify(&[]), "");
    }

    #[test]
    fn test_skips_non_canonical_and_empty_entries() {
        let mut data = props! { "B" => ["ab"] };
        data.append("board", "19x19");
        let node = Node::with_data(data);
        assert_eq!(stringify_node(&node), ";B[ab]\n");

        let empty = Node::with_data(PropertyMap::new());
        assert_eq!(stringify_node(&empty), ";\n");
    }

    #[test]
    fn test_values_are_escaped() {
        let node = Node::with_data(props! { "C" => ["a]b\\c"] });
        assert_eq!(stringify_node(&node), ";C[a\\]b\\\\c]\n");
    }

    #[test]
    fn test_write_node_wraps_children() {
        let root = node(
            props! { "B" => ["aa"] },
            vec![node(props! { "W" => ["bb"] }, vec![])],
        );
        assert_eq!(stringify_node(&root), ";B[aa]\n(\n  ;W[bb]\n)\n");
    }
}
