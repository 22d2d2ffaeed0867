//! Evaluate a template tree against the value and condition tables.

mod dedent;

use crate::bindings::Tables;
use crate::convert;
use crate::render::dedent::dedent;
use crate::types::ast;
use crate::{Engine, Error, Result};

/// Render the template to a string.
pub(crate) fn template(engine: &Engine, template: &ast::Template, tables: &Tables) -> Result<String> {
    Renderer { engine, tables }.render(template, 0)
}

/// Walks the tree, nothing is written to the output until the whole template
/// has rendered successfully.
struct Renderer<'a> {
    engine: &'a Engine,
    tables: &'a Tables,
}

impl Renderer<'_> {
    fn render(&self, template: &ast::Template, depth: usize) -> Result<String> {
        let mut buf = String::with_capacity(template.source.len());
        self.render_sequence(&mut buf, &template.source, &template.root, depth)?;
        Ok(buf)
    }

    fn render_sequence(
        &self,
        buf: &mut String,
        source: &str,
        seq: &ast::Sequence,
        depth: usize,
    ) -> Result<()> {
        for node in &seq.nodes {
            self.render_node(buf, source, node, depth)?;
        }
        Ok(())
    }

    fn render_node(&self, buf: &mut String, source: &str, node: &ast::Node, depth: usize) -> Result<()> {
        match node {
            ast::Node::Text(text) => {
                buf.push_str(text);
            }

            ast::Node::Value(value) => {
                let s = self.eval_value(source, value, depth)?;
                buf.push_str(&s);
            }

            ast::Node::Condition(cond) => {
                self.render_condition(buf, source, cond, depth)?;
            }
        }
        Ok(())
    }

    fn eval_value(&self, source: &str, value: &ast::Value, depth: usize) -> Result<String> {
        let ast::Ident { name, span } = &value.ident;

        let raw = self
            .tables
            .value(name)
            .ok_or_else(|| Error::unknown_variable(name, source, *span))?;

        let s = if self.tables.is_recursive(name) {
            let max = self.engine.max_recursion_depth;
            if depth >= max {
                return Err(Error::recursion_limit(max, name, source, value.span));
            }
            log::trace!("expanding `{name}` as a template at depth {}", depth + 1);
            let nested = self.engine.compile_cached(raw)?;
            self.render(&nested, depth + 1)?
        } else {
            raw.to_owned()
        };

        Ok(convert::apply_all(&value.conversions, s))
    }

    fn render_condition(
        &self,
        buf: &mut String,
        source: &str,
        cond: &ast::Condition,
        depth: usize,
    ) -> Result<()> {
        let ast::Ident { name, span } = &cond.ident;

        let holds = self
            .tables
            .condition(name)
            .ok_or_else(|| Error::unknown_condition(name, source, *span))?;

        let branch = if holds != cond.not {
            &cond.then_branch
        } else {
            &cond.else_branch
        };

        let Some(branch) = branch else {
            return Ok(());
        };

        let mut text = String::new();
        self.render_sequence(&mut text, source, branch, depth)?;

        if !cond.raw && (text.starts_with('\n') || text.starts_with("\r\n")) {
            buf.push_str(&dedent(&text));
        } else {
            buf.push_str(&text);
        }
        Ok(())
    }
}
