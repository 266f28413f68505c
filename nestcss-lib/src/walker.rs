//! Depth-first traversal of a style tree and the role each node plays.

use crate::style::keys::is_end_value;
use crate::tree::style_tree::{EndValue, Node, StyleTree};

/// What a node means to the compiler, decided from its key and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `@layer a, b` with a string or null value.
    LayerStatement,
    /// `@layer name` with a nested block.
    LayerBlock,
    /// `@container expr` with a nested block.
    ContainerBlock,
    /// A root-level `@media` map of expression -> block.
    StandaloneMedia,
    /// A CSS property with a leaf value.
    Declaration,
    /// Any other `@` key: prefix, literal `@media expr`, or named media query.
    AtRuleReference,
    /// A nested selector scope.
    SelectorScope,
}

/// One visited node. `path` runs from the root to this node's own key.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a Node,
    pub path: &'a [&'a str],
}

impl<'a> Visit<'a> {
    pub fn key(&self) -> &'a str {
        self.path.last().copied().unwrap_or("")
    }

    /// Keys above this node.
    pub fn parents(&self) -> &'a [&'a str] {
        &self.path[..self.path.len().saturating_sub(1)]
    }

    /// True below any `@` key; such nodes belong to that at-rule's bucket and
    /// are compiled when the bucket is.
    pub fn in_at_rule(&self) -> bool {
        self.parents().iter().any(|key| key.starts_with('@'))
    }

    pub fn kind(&self) -> NodeKind {
        classify(self.node, self.path)
    }
}

/// Visits every node depth-first, children before their parent. Leaf values
/// (including arrays and variable records) are never entered.
pub fn walk<'t, E, F>(tree: &'t StyleTree, visit: &mut F) -> Result<(), E>
where
    F: FnMut(Visit<'_>) -> Result<(), E>,
{
    let mut path: Vec<&'t str> = Vec::new();
    walk_tree(tree, &mut path, visit)
}

fn walk_tree<'t, E, F>(tree: &'t StyleTree, path: &mut Vec<&'t str>, visit: &mut F) -> Result<(), E>
where
    F: FnMut(Visit<'_>) -> Result<(), E>,
{
    for (key, node) in tree {
        path.push(key.as_str());
        if let Node::Tree(children) = node {
            if !is_end_value(node) {
                walk_tree(children, path, visit)?;
            }
        }
        visit(Visit {
            node,
            path: path.as_slice(),
        })?;
        path.pop();
    }
    Ok(())
}

/// First match wins: layer statement, layer block, container block, raw
/// media map, declaration, at-rule reference, selector scope.
pub fn classify(node: &Node, path: &[&str]) -> NodeKind {
    let key = path.last().copied().unwrap_or("");
    let leaf = is_end_value(node);

    if key.starts_with("@layer") {
        match node {
            Node::Value(EndValue::String(_)) | Node::Value(EndValue::Null) => {
                return NodeKind::LayerStatement
            }
            _ if !leaf => return NodeKind::LayerBlock,
            _ => {}
        }
    }
    if key.starts_with("@container") && !leaf {
        return NodeKind::ContainerBlock;
    }
    if path == ["@media"] && !leaf {
        return NodeKind::StandaloneMedia;
    }
    if key.starts_with('@') {
        NodeKind::AtRuleReference
    } else if leaf {
        NodeKind::Declaration
    } else {
        NodeKind::SelectorScope
    }
}
