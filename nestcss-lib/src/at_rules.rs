//! Buckets for everything that compiles into its own at-rule wrapper.
//!
//! Each bucket holds a tree shaped like a top-level input: the raw selector
//! segments above the `@` key are re-nested around its block, so compiling
//! the bucket re-derives the same selectors.

use crate::config::CompileOptions;
use crate::style::keys::is_end_value;
use crate::style::selector::descendant_marker;
use crate::tree::style_tree::{Node, StyleTree};
use indexmap::IndexMap;
use log::debug;

/// Where an at-rule reference is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A configured prefix; holds the prefix selector.
    Prefix(String),
    /// A media block; holds the bare media expression.
    Media(String),
}

/// Resolves an `@` key: configured prefix, then literal `@media <expr>`,
/// then named media query.
pub fn resolve(key: &str, options: &CompileOptions) -> Option<Target> {
    let name = key.strip_prefix('@').unwrap_or(key).trim_start();

    if let Some(selector) = options.media_prefixes.get(name) {
        return Some(Target::Prefix(selector.clone()));
    }
    if let Some(expr) = literal_media(key) {
        return Some(Target::Media(expr.to_string()));
    }
    options
        .media_queries
        .get(name)
        .map(|expr| Target::Media(expr.clone()))
}

/// `@media <expr>` with whitespace after `@media` and a non-empty expression.
fn literal_media(key: &str) -> Option<&str> {
    let rest = key.strip_prefix("@media")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let expr = rest.trim();
    (!expr.is_empty()).then_some(expr)
}

/// Expression for one entry of a root-level `@media` map. Keys without `@`
/// are raw expressions; `@` keys must be a literal `@media <expr>` or a
/// named media query.
pub fn standalone_media_expr(key: &str, options: &CompileOptions) -> Option<String> {
    if let Some(expr) = literal_media(key) {
        return Some(expr.to_string());
    }
    match key.strip_prefix('@') {
        Some(name) => options.media_queries.get(name.trim_start()).cloned(),
        None => Some(key.trim().to_string()).filter(|expr| !expr.is_empty()),
    }
}

/// Wraps `block` in one nested map per segment, outermost first.
pub fn nest<S: AsRef<str>>(segments: &[S], block: &StyleTree) -> StyleTree {
    segments.iter().rev().fold(block.clone(), |inner, segment| {
        let mut outer = StyleTree::new();
        outer.insert(segment.as_ref().to_string(), Node::Tree(inner));
        outer
    })
}

/// Deep merge. Subtrees merge key by key; any other collision is won by
/// `source`, keeping the key's original position.
pub fn merge_tree(target: &mut StyleTree, source: StyleTree) {
    for (key, node) in source {
        if let Node::Tree(incoming) = node {
            if let Some(Node::Tree(existing)) = target.get_mut(&key) {
                merge_tree(existing, incoming);
                continue;
            }
            target.insert(key, Node::Tree(incoming));
        } else {
            target.insert(key, node);
        }
    }
}

/// Everything collected from one level of the walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtRules {
    pub layer_statements: Vec<String>,
    pub layers: IndexMap<String, StyleTree>,
    pub containers: IndexMap<String, StyleTree>,
    /// Keyed by bare media expression.
    pub media: IndexMap<String, StyleTree>,
    /// Keyed by prefix selector at the top level of the tree.
    pub prefixes: StyleTree,
}

impl AtRules {
    pub fn new() -> Self {
        AtRules::default()
    }

    /// Records `@layer a, b;` once, in first-seen order.
    pub fn add_layer_statement(&mut self, key: &str, names: Option<&str>) {
        let statement = match names.map(str::trim) {
            Some(names) if !names.is_empty() => format!("{key} {names};"),
            _ => format!("{key};"),
        };
        if !self.layer_statements.contains(&statement) {
            self.layer_statements.push(statement);
        }
    }

    pub fn add_layer_block(&mut self, header: &str, parents: &[&str], block: &StyleTree) {
        debug!("layer `{header}` <- {parents:?}");
        merge_into(&mut self.layers, header.trim(), parents, block);
    }

    pub fn add_container_block(&mut self, header: &str, parents: &[&str], block: &StyleTree) {
        debug!("container `{header}` <- {parents:?}");
        merge_into(&mut self.containers, header.trim(), parents, block);
    }

    pub fn add_media_block(&mut self, expr: &str, parents: &[&str], block: &StyleTree) {
        debug!("media `{expr}` <- {parents:?}");
        merge_into(&mut self.media, expr, parents, block);
    }

    /// Files `block` under the prefix selector. The first selector segment
    /// is marked as a descendant so it composes under the prefix. With no
    /// selector above the `@` key, the block's own selector keys are marked.
    pub fn add_prefix_block(&mut self, selector: &str, parents: &[&str], block: &StyleTree) {
        debug!("prefix `{selector}` <- {parents:?}");
        let mut segments = Vec::with_capacity(parents.len() + 1);
        segments.push(selector.to_string());

        let mut marked = false;
        for parent in parents {
            if !marked && !parent.trim().is_empty() {
                segments.push(descendant_marker(parent));
                marked = true;
            } else {
                segments.push(parent.to_string());
            }
        }
        let tree = if marked {
            nest(&segments, block)
        } else {
            nest(&segments, &mark_selector_keys(block))
        };
        merge_tree(&mut self.prefixes, tree);
    }

    pub fn route(&mut self, target: Target, parents: &[&str], block: &StyleTree) {
        match target {
            Target::Prefix(selector) => self.add_prefix_block(&selector, parents, block),
            Target::Media(expr) => self.add_media_block(&expr, parents, block),
        }
    }

    /// The subtree filed under `selector`, if it holds anything.
    pub fn prefix_content(&self, selector: &str) -> Option<&StyleTree> {
        self.prefixes
            .get(selector)
            .and_then(Node::as_tree)
            .filter(|tree| !tree.is_empty())
    }
}

/// Marks every selector key of `block` as a descendant. Nested `@` blocks
/// are marked through, since their keys still sit directly under the prefix.
fn mark_selector_keys(block: &StyleTree) -> StyleTree {
    let mut marked = StyleTree::with_capacity(block.len());
    for (key, node) in block {
        match node {
            Node::Tree(children) if !is_end_value(node) => {
                if key.starts_with('@') {
                    marked.insert(key.clone(), Node::Tree(mark_selector_keys(children)));
                } else if key.trim().is_empty() {
                    marked.insert(key.clone(), node.clone());
                } else {
                    marked.insert(descendant_marker(key), node.clone());
                }
            }
            _ => {
                marked.insert(key.clone(), node.clone());
            }
        }
    }
    marked
}

fn merge_into(
    buckets: &mut IndexMap<String, StyleTree>,
    key: &str,
    parents: &[&str],
    block: &StyleTree,
) {
    let tree = buckets.entry(key.to_string()).or_default();
    merge_tree(tree, nest(parents, block));
}
