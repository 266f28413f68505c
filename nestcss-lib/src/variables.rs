use crate::error::{display_path, CompileError};
use crate::style::emit::wrap_block;
use crate::style::keys::{css_value, end_value, is_end_value};
use crate::tree::style_tree::{Node, StyleTree};

/// Custom-property declarations flattened out of a nested theme tree.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssVariables {
    /// `(--name, value)` pairs in tree order.
    pub declarations: Vec<(String, String)>,
}

impl CssVariables {
    /// Flattens `tree`. Every leaf becomes `--<path>`, with `_` in keys
    /// turned into `-` and an optional leading `prefix` segment.
    pub fn build(tree: &StyleTree, prefix: Option<&str>) -> Result<Self, CompileError> {
        let mut variables = CssVariables::default();
        let mut path: Vec<&str> = prefix.into_iter().collect();
        Self::traverse(tree, &mut path, &mut variables)?;
        Ok(variables)
    }

    /// Recursively walk the tree, one declaration per leaf.
    fn traverse<'t>(
        tree: &'t StyleTree,
        path: &mut Vec<&'t str>,
        variables: &mut CssVariables,
    ) -> Result<(), CompileError> {
        for (key, node) in tree {
            path.push(key.as_str());
            match node {
                Node::Tree(children) if !is_end_value(node) => {
                    Self::traverse(children, path, variables)?;
                }
                _ => {
                    if let Some(value) = end_value(node) {
                        if let Some(number) = value.non_finite() {
                            return Err(CompileError::NonFiniteNumber {
                                path: display_path(path.as_slice()),
                                value: number,
                            });
                        }
                        // null leaves declare nothing
                        if let Some(css) = css_value(&value) {
                            variables.declarations.push((variable_name(path), css));
                        }
                    }
                }
            }
            path.pop();
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// One `--name: value;` line per declaration.
    pub fn to_lines(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn variable_name(path: &[&str]) -> String {
    let segments: Vec<String> = path
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('_', "-"))
        .collect();
    format!("--{}", segments.join("-"))
}

/// `--a-b-c: value;` lines for every leaf of `tree`.
pub fn css_variables(tree: &StyleTree, prefix: Option<&str>) -> Result<String, CompileError> {
    Ok(CssVariables::build(tree, prefix)?.to_lines())
}

/// The flattened variables as one rule for `selector`, e.g. `:root`.
pub fn variables_block(selector: &str, tree: &StyleTree) -> Result<String, CompileError> {
    let variables = CssVariables::build(tree, None)?;
    if variables.is_empty() {
        return Ok(String::new());
    }
    Ok(wrap_block(selector, &variables.to_lines()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::from_json;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flatten_nested_theme() {
        let tree = from_json(
            r##"{
                "colors": { "paper": { "normal": "#212121", "dim_ish": "#333" } },
                "space": [4, "px"],
                "accent": { "var": "var(--brand)" },
                "unset": null
            }"##,
        )
        .unwrap();
        assert_eq!(
            css_variables(&tree, None).unwrap(),
            "--colors-paper-normal: #212121;\n--colors-paper-dim-ish: #333;\n--space: 4 px;\n--accent: var(--brand);"
        );
    }

    #[test]
    fn test_prefix_segment() {
        let tree = from_json(r#"{ "phone": { "gap": "8px" } }"#).unwrap();
        assert_eq!(css_variables(&tree, Some("device")).unwrap(), "--device-phone-gap: 8px;");
    }

    #[test]
    fn test_variables_block() {
        let tree = from_json(r#"{ "font_size": { "base": 16 } }"#).unwrap();
        assert_eq!(
            variables_block(":root", &tree).unwrap(),
            ":root {\n  --font-size-base: 16;\n}"
        );
        assert_eq!(variables_block(":root", &StyleTree::new()).unwrap(), "");
    }

    #[test]
    fn test_non_finite_leaf_is_an_error() {
        let mut tree = StyleTree::new();
        tree.insert("ratio".into(), Node::from(f64::INFINITY));
        assert_eq!(
            css_variables(&tree, None),
            Err(CompileError::NonFiniteNumber {
                path: "ratio".into(),
                value: f64::INFINITY,
            })
        );
    }
}
