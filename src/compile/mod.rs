//! Compile the template source into a tree that can be evaluated by the
//! renderer.
//!
//! This process has two stages:
//! - The lexer chunks the template source into tokens.
//! - The parser constructs the tree from the token stream.

mod lex;
mod parse;

use crate::types::ast;
use crate::Result;

/// Compile a template into a tree.
pub fn template(source: &str) -> Result<ast::Template> {
    parse::Parser::new(source).parse_template()
}
