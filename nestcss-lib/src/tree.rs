use crate::style::keys;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

pub mod style_tree {
    use super::*;

    /// Ordered mapping from key to either a CSS value or a nested scope.
    ///
    /// Key order is significant: declarations are emitted in the order they
    /// are found.
    pub type StyleTree = IndexMap<String, Node>;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Node {
        Value(EndValue),
        Tree(StyleTree),
    }

    /// A leaf of the style tree, rendered as a CSS value.
    #[derive(Debug, Clone, PartialEq)]
    pub enum EndValue {
        String(String),
        Number(f64),
        Bool(bool),
        Null,
        /// Space-joined on output, e.g. `["1px", "solid", "red"]`.
        List(Vec<ListItem>),
        /// Reference to a custom property; `var` is used verbatim.
        Var { var: String, name: Option<String> },
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum ListItem {
        String(String),
        Number(f64),
    }

    impl Node {
        pub fn as_tree(&self) -> Option<&StyleTree> {
            match self {
                Node::Tree(tree) => Some(tree),
                Node::Value(_) => None,
            }
        }
    }

    impl EndValue {
        pub fn var(var: impl Into<String>) -> Self {
            EndValue::Var {
                var: var.into(),
                name: None,
            }
        }

        /// Returns the first number in this value that cannot be written as CSS.
        pub fn non_finite(&self) -> Option<f64> {
            match self {
                EndValue::Number(n) if !n.is_finite() => Some(*n),
                EndValue::List(items) => items.iter().find_map(|item| match item {
                    ListItem::Number(n) if !n.is_finite() => Some(*n),
                    _ => None,
                }),
                _ => None,
            }
        }
    }

    impl From<&str> for Node {
        fn from(value: &str) -> Self {
            Node::Value(EndValue::String(value.to_string()))
        }
    }

    impl From<String> for Node {
        fn from(value: String) -> Self {
            Node::Value(EndValue::String(value))
        }
    }

    impl From<f64> for Node {
        fn from(value: f64) -> Self {
            Node::Value(EndValue::Number(value))
        }
    }

    impl From<i32> for Node {
        fn from(value: i32) -> Self {
            Node::Value(EndValue::Number(f64::from(value)))
        }
    }

    impl From<bool> for Node {
        fn from(value: bool) -> Self {
            Node::Value(EndValue::Bool(value))
        }
    }

    impl From<EndValue> for Node {
        fn from(value: EndValue) -> Self {
            Node::Value(value)
        }
    }

    impl From<StyleTree> for Node {
        fn from(tree: StyleTree) -> Self {
            Node::Tree(tree)
        }
    }

    impl<K: Into<String>, const N: usize> From<[(K, Node); N]> for Node {
        fn from(entries: [(K, Node); N]) -> Self {
            Node::Tree(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
        }
    }

    impl From<&str> for ListItem {
        fn from(value: &str) -> Self {
            ListItem::String(value.to_string())
        }
    }

    impl From<f64> for ListItem {
        fn from(value: f64) -> Self {
            ListItem::Number(value)
        }
    }
}

use style_tree::{EndValue, ListItem, Node, StyleTree};

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a CSS value or a nested style object")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Number(v as f64)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Number(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Number(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Value(EndValue::String(v.to_owned())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Value(EndValue::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Value(EndValue::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<ListItem>()? {
            items.push(item);
        }
        Ok(Node::Value(EndValue::List(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut tree = StyleTree::new();
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            tree.insert(key, value);
        }
        Ok(keys::tree_or_var(tree))
    }
}

impl<'de> Deserialize<'de> for ListItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ListItemVisitor)
    }
}

struct ListItemVisitor;

impl<'de> Visitor<'de> for ListItemVisitor {
    type Value = ListItem;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number inside a value array")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ListItem, E> {
        Ok(ListItem::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ListItem, E> {
        Ok(ListItem::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ListItem, E> {
        Ok(ListItem::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ListItem, E> {
        Ok(ListItem::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ListItem, E> {
        Ok(ListItem::String(v))
    }
}

/// Parses a style tree from JSON text, keeping key order.
pub fn from_json(json: &str) -> serde_json::Result<StyleTree> {
    serde_json::from_str(json)
}
