//! AST representing a template.
//!
//! The tree is built once by the parser and is never mutated afterwards. It
//! holds no references into the renderer so a single parsed template can be
//! shared between threads and evaluated against many different tables.

use crate::convert::Conversion;
use crate::types::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub source: String,
    pub root: Sequence,
}

/// An ordered sequence of nodes, rendered by concatenation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Value(Value),
    Condition(Condition),
}

/// A substitution, e.g. `%[user!j]%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub ident: Ident,
    pub conversions: Vec<Conversion>,
    pub span: Span,
}

/// A branch, e.g. `%[% !ping %|% yes %|% no %]%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub not: bool,
    pub ident: Ident,
    pub raw: bool,
    pub then_branch: Option<Sequence>,
    pub else_branch: Option<Sequence>,
}

/// An identifier, already case folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Sequence {
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends literal text, merging it with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.nodes.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => self.nodes.push(Node::Text(text.to_owned())),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }
}
