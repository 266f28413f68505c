use crate::at_rules::{merge_tree, nest, resolve, standalone_media_expr, AtRules};
use crate::config::CompileOptions;
use crate::error::{display_path, CompileError, Diagnostic, DiagnosticKind};
use crate::style::content::content_value;
use crate::style::emit::{join_sections, wrap_block};
use crate::style::keys::{css_value, end_value, is_end_value, js_key_to_css_key};
use crate::style::rules::RuleSet;
use crate::style::selector::build_selectors;
use crate::tree::style_tree::{EndValue, Node, StyleTree};
use crate::walker::{walk, NodeKind, Visit};
use indexmap::IndexMap;
use log::{debug, warn};

pub mod nest_css {
    use super::*;

    /// Compiled CSS plus every non-fatal problem met on the way.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Compilation {
        pub css: String,
        pub diagnostics: Vec<Diagnostic>,
    }

    /// Compiles a style tree to CSS, logging diagnostics at `warn`.
    pub fn compile(tree: &StyleTree, options: &CompileOptions) -> Result<String, CompileError> {
        let compilation = compile_with_diagnostics(tree, options)?;
        for diagnostic in &compilation.diagnostics {
            warn!("{}", diagnostic);
        }
        Ok(compilation.css)
    }

    /// Compiles a style tree to CSS and hands diagnostics back to the caller.
    ///
    /// The output is a pure function of `tree` and `options`.
    pub fn compile_with_diagnostics(
        tree: &StyleTree,
        options: &CompileOptions,
    ) -> Result<Compilation, CompileError> {
        let mut compiler = Compiler {
            options,
            diagnostics: Vec::new(),
        };
        let css = compiler.compile_tree(tree, &[], true)?;

        let mut diagnostics: Vec<Diagnostic> = Vec::with_capacity(compiler.diagnostics.len());
        for diagnostic in compiler.diagnostics {
            if !diagnostics.contains(&diagnostic) {
                diagnostics.push(diagnostic);
            }
        }
        Ok(Compilation { css, diagnostics })
    }
}

struct Compiler<'o> {
    options: &'o CompileOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> Compiler<'o> {
    /// One level of the pipeline. `scope` holds the headers of the at-rules
    /// this tree was bucketed under; it only feeds diagnostic paths.
    fn compile_tree(
        &mut self,
        tree: &StyleTree,
        scope: &[String],
        with_auto: bool,
    ) -> Result<String, CompileError> {
        debug!("compiling {} keys under {:?}", tree.len(), scope);
        let (rules, at_rules) = self.collect(tree, scope)?;

        let mut sections = vec![at_rules.layer_statements.join("\n"), rules.to_string()];
        for (header, bucket) in &at_rules.layers {
            sections.push(self.compile_block(header, bucket, scope, true)?);
        }
        for (header, bucket) in &at_rules.containers {
            sections.push(self.compile_block(header, bucket, scope, true)?);
        }
        for (expr, bucket) in &at_rules.media {
            sections.push(self.compile_block(&format!("@media {expr}"), bucket, scope, true)?);
        }
        if !at_rules.prefixes.is_empty() {
            sections.push(self.compile_tree(&at_rules.prefixes, scope, false)?);
            if with_auto {
                sections.extend(self.compile_auto(&at_rules, scope)?);
            }
        }
        Ok(join_sections(sections))
    }

    /// Compiles a bucket and wraps it in its at-rule header.
    fn compile_block(
        &mut self,
        header: &str,
        bucket: &StyleTree,
        scope: &[String],
        with_auto: bool,
    ) -> Result<String, CompileError> {
        let mut inner = scope.to_vec();
        inner.push(header.to_string());
        let body = self.compile_tree(bucket, &inner, with_auto)?;
        if body.is_empty() {
            return Ok(String::new());
        }
        Ok(wrap_block(header, &body))
    }

    /// For each auto mode whose prefix has content, the same rules under the
    /// mode's media query and auto selector.
    fn compile_auto(
        &mut self,
        at_rules: &AtRules,
        scope: &[String],
    ) -> Result<Vec<String>, CompileError> {
        let options = self.options;
        let Some(auto) = &options.auto else {
            return Ok(Vec::new());
        };

        let mut buckets: IndexMap<&str, StyleTree> = IndexMap::new();
        for (mode, (auto_selector, expr)) in auto {
            let Some(prefix) = options.media_prefixes.get(mode) else {
                continue;
            };
            let Some(content) = at_rules.prefix_content(prefix) else {
                continue;
            };
            debug!("auto `{mode}`: {prefix} -> {auto_selector} under {expr}");
            let bucket = buckets.entry(expr.as_str()).or_default();
            merge_tree(bucket, nest(&[auto_selector], content));
        }

        // Same subtrees as the prefix compile, which already reported on them.
        let reported = self.diagnostics.len();
        let mut sections = Vec::with_capacity(buckets.len());
        for (expr, bucket) in &buckets {
            sections.push(self.compile_block(&format!("@media {expr}"), bucket, scope, false)?);
        }
        self.diagnostics.truncate(reported);
        Ok(sections)
    }

    /// Walks one tree, filing declarations into a rule set and everything
    /// under an `@` key into its bucket.
    fn collect(
        &mut self,
        tree: &StyleTree,
        scope: &[String],
    ) -> Result<(RuleSet, AtRules), CompileError> {
        let options = self.options;
        let diagnostics = &mut self.diagnostics;
        let mut rules = RuleSet::default();
        let mut at_rules = AtRules::new();

        walk(tree, &mut |visit: Visit<'_>| -> Result<(), CompileError> {
            if visit.in_at_rule() {
                return Ok(());
            }
            let report = |kind: DiagnosticKind, path: &[&str], message: String| {
                Diagnostic::new(kind, scoped_path(scope, path), message)
            };

            match visit.kind() {
                NodeKind::SelectorScope => {}
                NodeKind::Declaration => {
                    if let Some(diagnostic) = declare(&mut rules, visit, scope)? {
                        diagnostics.push(diagnostic);
                    }
                }
                NodeKind::LayerStatement => {
                    let names = match visit.node {
                        Node::Value(EndValue::String(names)) => Some(names.as_str()),
                        _ => None,
                    };
                    at_rules.add_layer_statement(visit.key(), names);
                }
                NodeKind::LayerBlock => {
                    if let Some(block) = block(visit.node) {
                        at_rules.add_layer_block(visit.key(), visit.parents(), block);
                    }
                }
                NodeKind::ContainerBlock => {
                    if let Some(block) = block(visit.node) {
                        at_rules.add_container_block(visit.key(), visit.parents(), block);
                    }
                }
                NodeKind::StandaloneMedia => {
                    for (key, entry) in block(visit.node).into_iter().flatten() {
                        let mut path = visit.path.to_vec();
                        path.push(key.as_str());
                        match (block(entry), standalone_media_expr(key, options)) {
                            (Some(entry), Some(expr)) => {
                                at_rules.add_media_block(&expr, &[], entry);
                            }
                            (None, _) => diagnostics.push(report(
                                DiagnosticKind::InvalidMediaEntry,
                                &path,
                                format!("media entry `{key}` must hold a block of rules"),
                            )),
                            (Some(_), None) => diagnostics.push(report(
                                DiagnosticKind::UnresolvedAtRule,
                                &path,
                                format!("media query type `{key}` is unknown; the block is dropped"),
                            )),
                        }
                    }
                }
                NodeKind::AtRuleReference => match block(visit.node) {
                    None => diagnostics.push(report(
                        DiagnosticKind::AtRuleWithoutBlock,
                        visit.path,
                        format!("`{}` must hold a block of rules", visit.key()),
                    )),
                    Some(block) => match resolve(visit.key(), options) {
                        Some(target) => at_rules.route(target, visit.parents(), block),
                        None => diagnostics.push(report(
                            DiagnosticKind::UnresolvedAtRule,
                            visit.path,
                            format!(
                                "media query type `{}` is unknown; the block is dropped",
                                visit.key()
                            ),
                        )),
                    },
                },
            }
            Ok(())
        })?;

        Ok((rules, at_rules))
    }
}

/// Files one declaration under every selector its path expands to.
fn declare(
    rules: &mut RuleSet,
    visit: Visit<'_>,
    scope: &[String],
) -> Result<Option<Diagnostic>, CompileError> {
    let Some(value) = end_value(visit.node) else {
        return Ok(None);
    };
    if let Some(number) = value.non_finite() {
        return Err(CompileError::NonFiniteNumber {
            path: scoped_path(scope, visit.path),
            value: number,
        });
    }

    let property = js_key_to_css_key(visit.key());
    let css = if property == "content" {
        Some(content_value(&value))
    } else {
        css_value(&value)
    };
    let Some(css) = css else {
        return Ok(None);
    };

    let selectors = build_selectors(visit.parents());
    if selectors.is_empty() {
        return Ok(Some(Diagnostic::new(
            DiagnosticKind::OrphanDeclaration,
            scoped_path(scope, visit.path),
            format!("`{property}` has no selector above it"),
        )));
    }
    for selector in &selectors {
        rules.insert(selector, &property, &css);
    }
    Ok(None)
}

/// A nested block, as opposed to a leaf or variable record.
fn block(node: &Node) -> Option<&StyleTree> {
    if is_end_value(node) {
        None
    } else {
        node.as_tree()
    }
}

fn scoped_path(scope: &[String], path: &[&str]) -> String {
    let segments: Vec<&str> = scope
        .iter()
        .map(String::as_str)
        .chain(path.iter().copied())
        .collect();
    display_path(&segments)
}
