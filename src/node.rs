//! Game-tree nodes produced by the parser.
//!
//! A [`Node`] is one `;`-delimited unit of an SGF record together with the
//! subtrees that follow it. Nodes own their children exclusively; a parse
//! produces a fresh tree every time.
//!
//! ## Identity
//!
//! Every node carries an [`id`](Node::id) assigned in creation order during
//! a parse, and the id of its parent (`None` for a root). Ids are unique
//! within one parse and have no meaning across parses unless the parser was
//! given distinct first ids (see [`ParseOptions::with_first_id`]).
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::parse;
//!
//! let forest = parse("(;B[aa]SZ[19];AB[cc][dd:ee])");
//! let root = &forest[0];
//!
//! assert_eq!(root.parent_id, None);
//! assert_eq!(root.data.first("SZ"), Some("19"));
//! assert_eq!(root.children[0].parent_id, Some(root.id));
//! ```
//!
//! [`ParseOptions::with_first_id`]: crate::ParseOptions::with_first_id

use crate::PropertyMap;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a node during a parse.
pub type NodeId = usize;

/// An ordered sequence of top-level game trees.
pub type Forest = Vec<Node>;

/// One node of a game tree.
///
/// The first entry of `children` is the main line (the trunk); later entries
/// are alternative variations in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub data: PropertyMap,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node without properties or children.
    #[must_use]
    pub fn new(id: NodeId, parent_id: Option<NodeId>) -> Self {
        Node {
            id,
            parent_id,
            data: PropertyMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates a parentless node holding `data`, mostly useful for building
    /// trees to stringify.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::{props, stringify_node, Node};
    ///
    /// let node = Node::with_data(props! { "B" => ["ab"] });
    /// assert_eq!(stringify_node(&node), ";B[ab]\n");
    /// ```
    #[must_use]
    pub fn with_data(data: PropertyMap) -> Self {
        Node {
            id: 0,
            parent_id: None,
            data,
            children: Vec::new(),
        }
    }

    /// Returns `true` if the node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the values of a property.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.data.get(key)
    }

    /// Iterates over this node and all of its descendants in pre-order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::parse;
    ///
    /// let forest = parse("(;B[hh](;W[ii])(;W[hi];C[h]))");
    /// let ids: Vec<_> = forest[0].descendants().map(|n| n.id).collect();
    /// assert_eq!(ids, vec![0, 1, 2, 3]);
    /// ```
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Compares two trees by content only: property order, values, and
    /// structure must match, ids are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::{parse, ParseOptions, parse_with_options};
    ///
    /// let a = parse("(;B[aa];W[bb])");
    /// let b = parse_with_options("(;B[aa];W[bb])", &ParseOptions::new().with_first_id(100));
    /// assert_ne!(a[0], b[0]);
    /// assert!(a[0].content_eq(&b[0]));
    /// ```
    #[must_use]
    pub fn content_eq(&self, other: &Node) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.children.len() != b.children.len() || !a.data.iter().eq(b.data.iter()) {
                return false;
            }
            pending.extend(a.children.iter().zip(b.children.iter()));
        }
        true
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Compares two forests with [`Node::content_eq`].
#[must_use]
pub fn forest_content_eq(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str, value: &str) -> Node {
        let mut node = Node::new(0, None);
        node.data.append(key, value);
        node
    }

    #[test]
    fn test_content_eq_ignores_ids() {
        let mut a = leaf("B", "aa");
        a.children.push(leaf("W", "bb"));
        let mut b = a.clone();
        b.id = 7;
        b.children[0].id = 8;
        b.children[0].parent_id = Some(7);

        assert!(a.content_eq(&b));
    }

    #[test]
    fn test_content_eq_respects_property_order() {
        let mut a = Node::new(0, None);
        a.data.append("B", "aa");
        a.data.append("C", "x");
        let mut b = Node::new(0, None);
        b.data.append("C", "x");
        b.data.append("B", "aa");

        assert!(!a.content_eq(&b));
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut root = leaf("B", "aa");
        let mut first = leaf("W", "bb");
        first.children.push(leaf("B", "cc"));
        root.children.push(first);
        root.children.push(leaf("W", "dd"));

        let values: Vec<_> = root
            .descendants()
            .filter_map(|n| n.data.iter().next().map(|(_, v)| v[0].clone()))
            .collect();
        assert_eq!(values, vec!["aa", "bb", "cc", "dd"]);
    }

    #[test]
    fn test_json_shape() {
        let mut root = leaf("B", "aa");
        root.children.push(Node {
            id: 1,
            parent_id: Some(0),
            ..leaf("W", "bb")
        });

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["data"]["B"][0], "aa");
        assert_eq!(json["children"][0]["parent_id"], 0);
        assert!(json["parent_id"].is_null());
    }
}
