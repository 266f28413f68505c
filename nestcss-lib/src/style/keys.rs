use crate::tree::style_tree::{EndValue, ListItem, Node, StyleTree};

/// True if the node is a leaf CSS value and must not be recursed into.
///
/// Trees built in code may hold a `{ var, name? }` record as a plain map, so
/// those count as leaves as well.
pub fn is_end_value(node: &Node) -> bool {
    match node {
        Node::Value(_) => true,
        Node::Tree(tree) => var_record(tree).is_some(),
    }
}

/// Returns the leaf value of a node, reading variable records out of maps.
pub fn end_value(node: &Node) -> Option<EndValue> {
    match node {
        Node::Value(value) => Some(value.clone()),
        Node::Tree(tree) => var_record(tree),
    }
}

/// Turns a freshly read map into a variable record when it has that shape.
pub(crate) fn tree_or_var(tree: StyleTree) -> Node {
    match var_record(&tree) {
        Some(value) => Node::Value(value),
        None => Node::Tree(tree),
    }
}

/// `{ var: string, name?: string }` and nothing else.
fn var_record(tree: &StyleTree) -> Option<EndValue> {
    let var = match tree.get("var") {
        Some(Node::Value(EndValue::String(var))) => var.clone(),
        _ => return None,
    };
    let name = match tree.get("name") {
        None => None,
        Some(Node::Value(EndValue::String(name))) => Some(name.clone()),
        Some(_) => return None,
    };
    if tree.keys().any(|k| k != "var" && k != "name") {
        return None;
    }
    Some(EndValue::Var { var, name })
}

/// Converts a camelCase key to a kebab-case CSS name.
///
/// A leading run of `-` (vendor prefix or custom property) is kept verbatim
/// and acronyms split at their last capital: `XMLParser` -> `xml-parser`.
pub fn js_key_to_css_key(key: &str) -> String {
    let base = key.trim_start_matches('-');
    let prefix = &key[..key.len() - base.len()];

    let chars: Vec<char> = base.chars().collect();
    let mut kebab = String::with_capacity(key.len() + 4);
    kebab.push_str(prefix);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                kebab.push('-');
            }
            kebab.extend(ch.to_lowercase());
        } else {
            kebab.push(ch);
        }
    }
    kebab
}

/// Renders a number the way CSS expects it: no trailing `.0`, no `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

/// Serializes a leaf for a declaration. `None` means nothing is emitted.
pub fn css_value(value: &EndValue) -> Option<String> {
    match value {
        EndValue::String(s) => Some(s.clone()),
        EndValue::Number(n) => Some(format_number(*n)),
        EndValue::Bool(b) => Some(b.to_string()),
        EndValue::Null => None,
        EndValue::List(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    ListItem::String(s) => s.clone(),
                    ListItem::Number(n) => format_number(*n),
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
        EndValue::Var { var, .. } => Some(var.clone()),
    }
}
