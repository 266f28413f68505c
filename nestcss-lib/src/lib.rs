//! Compiles nested style trees into CSS text.

pub mod at_rules;
pub mod compile;
pub mod config;
pub mod error;
pub mod tree;
pub mod variables;
pub mod walker;

pub mod style {
    pub mod content;
    pub mod emit;
    pub mod keys;
    pub mod rules;
    pub mod selector;
    pub mod tags;
}

pub use compile::nest_css::{compile, compile_with_diagnostics, Compilation};
pub use config::{CompileOptions, StyleConfig};
pub use error::{CompileError, Diagnostic, DiagnosticKind};
pub use tree::style_tree::{EndValue, ListItem, Node, StyleTree};
