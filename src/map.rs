//! Ordered property map for SGF nodes.
//!
//! This module provides [`PropertyMap`], a wrapper around [`IndexMap`] that
//! maps property identifiers to their value lists while maintaining insertion
//! order. Order matters for SGF: the stringifier writes properties in the
//! order they were first seen, so a parse/stringify cycle reproduces the
//! source layout.
//!
//! ## Why IndexMap?
//!
//! - **Deterministic output**: Properties serialize in a consistent order
//! - **Iteration order**: Properties are iterated in insertion order
//! - **Compatibility**: Easier testing and debugging with predictable output
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::PropertyMap;
//!
//! let mut map = PropertyMap::new();
//! map.append("B", "aa");
//! map.append("SZ", "19");
//! map.append("B", "bb");
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("B"), Some(&["aa".to_string(), "bb".to_string()][..]));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map of property identifiers to value lists.
///
/// Keys are not validated: a key that is not a canonical identifier can be
/// inserted, but the stringifier skips it. Value lists are never empty;
/// inserting an empty list removes the key instead. Deserialization drops
/// empty lists the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Vec<String>>",
    into = "IndexMap<String, Vec<String>>"
)]
pub struct PropertyMap(IndexMap<String, Vec<String>>);

impl PropertyMap {
    /// Creates an empty `PropertyMap`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::PropertyMap;
    ///
    /// let map = PropertyMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        PropertyMap(IndexMap::new())
    }

    /// Appends a value to the list stored under `key`, creating the entry if
    /// needed. Returns the index of the new value within that list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::PropertyMap;
    ///
    /// let mut map = PropertyMap::new();
    /// assert_eq!(map.append("AB", "cc"), 0);
    /// assert_eq!(map.append("AB", "dd"), 1);
    /// ```
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        let values = self.0.entry(key.into()).or_default();
        values.push(value.into());
        values.len() - 1
    }

    /// Replaces the value list stored under `key`.
    ///
    /// An empty list is equivalent to the property being absent, so it
    /// removes the key. Returns the previous list, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::PropertyMap;
    ///
    /// let mut map = PropertyMap::new();
    /// map.insert("C", vec!["hello".to_string()]);
    /// assert!(map.contains_key("C"));
    ///
    /// map.insert("C", Vec::new());
    /// assert!(!map.contains_key("C"));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        let key = key.into();
        if values.is_empty() {
            self.0.shift_remove(&key)
        } else {
            self.0.insert(key, values)
        }
    }

    /// Removes a property, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.shift_remove(key)
    }

    /// Returns the values stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns the first value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::PropertyMap;
    ///
    /// let mut map = PropertyMap::new();
    /// map.append("SZ", "19");
    /// assert_eq!(map.first("SZ"), Some("19"));
    /// assert_eq!(map.first("KM"), None);
    /// ```
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// Returns `true` if the map holds a value list under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwrites a single value in place.
    pub(crate) fn set_value(&mut self, key: &str, index: usize, value: String) {
        if let Some(slot) = self.0.get_mut(key).and_then(|v| v.get_mut(index)) {
            *slot = value;
        }
    }

    /// Returns the number of properties in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the identifiers, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Vec<String>> {
        self.0.keys()
    }

    /// Returns an iterator over the identifier/value-list pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }
}

impl From<IndexMap<String, Vec<String>>> for PropertyMap {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<PropertyMap> for IndexMap<String, Vec<String>> {
    fn from(map: PropertyMap) -> Self {
        map.0
    }
}

impl IntoIterator for PropertyMap {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut map = PropertyMap::new();
        for (key, values) in iter {
            map.insert(key, values);
        }
        map
    }
}
