use std::fmt;
use thiserror::Error;

/// Failures that stop a compile. The path names the offending node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("`{path}` holds the number {value}, which has no CSS form")]
    NonFiniteNumber { path: String, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An `@` key that matches no prefix, media query or literal at-rule.
    UnresolvedAtRule,
    /// An `@` key holding a plain value where a nested block is required.
    AtRuleWithoutBlock,
    /// A declaration with no selector above it.
    OrphanDeclaration,
    /// An entry of a raw `@media` map that is not a nested block.
    InvalidMediaEntry,
}

/// A non-fatal problem; the affected subtree is dropped and compilation
/// carries on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: String, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Renders a node path for messages, e.g. `div -> @phone -> fontSize`.
pub fn display_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" -> ")
}
