use crate::compile::lex::{Lexer, Token};
use crate::convert::Conversion;
use crate::types::ast;
use crate::types::span::Span;
use crate::{Error, Result};

/// The maximum number of conditions that can be open at the same time.
///
/// Rendering and dropping the tree both recurse once per nested condition so
/// the nesting must be bounded.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A parser that constructs an AST from a token stream.
///
/// The parser is implemented as a simple hand written parser with no
/// recursion. Conditions that are still open are kept on a stack so that tags
/// belonging to a nested condition never close an outer one.
pub struct Parser<'source> {
    /// A lexer that tokenizes the template source.
    tokens: Lexer<'source>,
}

/// A partial condition, opened with `%[% ... %|%` and not yet closed.
struct Block {
    /// The parsed header of the condition.
    header: Header,
    /// The span of the condition header.
    span: Span,
    /// The branch rendered when the condition holds.
    then_branch: ast::Sequence,
    /// The branch rendered otherwise, present after a second `%|%`.
    else_branch: Option<ast::Sequence>,
}

/// Everything between `%[%` and the first `%|%` or `%]%`.
struct Header {
    not: bool,
    ident: ast::Ident,
    raw: bool,
}

impl Block {
    /// The branch currently collecting nodes.
    fn active(&mut self) -> &mut ast::Sequence {
        match &mut self.else_branch {
            Some(branch) => branch,
            None => &mut self.then_branch,
        }
    }

    fn finish(self) -> ast::Node {
        let Header { not, ident, raw } = self.header;
        ast::Node::Condition(ast::Condition {
            not,
            ident,
            raw,
            then_branch: Some(self.then_branch),
            else_branch: self.else_branch,
        })
    }
}

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: Lexer::new(source),
        }
    }

    /// Parses a template.
    ///
    /// Nodes are pushed to the active branch of the innermost open condition,
    /// or to the root sequence if there is none.
    pub fn parse_template(mut self) -> Result<ast::Template> {
        let mut root = ast::Sequence::new();
        let mut blocks: Vec<Block> = Vec::new();

        while let Some(next) = self.tokens.next()? {
            let node = match next {
                // Simply raw template, append it to the current text.
                (Token::Raw, span) => {
                    let text = &self.source()[span];
                    current(&mut root, &mut blocks).push_text(text);
                    continue;
                }

                // An escaped `%%` or a `%` that doesn't start a tag.
                (Token::Escape | Token::Percent, _) => {
                    current(&mut root, &mut blocks).push_text("%");
                    continue;
                }

                // The start of a value, e.g. `%[user!u]%`
                (Token::BeginValue, begin) => ast::Node::Value(self.parse_value(begin)?),

                // The start of a condition, e.g. `%[% !ping %|%`
                (Token::BeginCondition, begin) => {
                    let (header, tk, end) = self.parse_header(begin)?;
                    let span = begin.combine(end);
                    match tk {
                        // The header is followed by the true branch. We must
                        // push a block to the stack since the branch collects
                        // nodes until the matching `%|%` or `%]%`.
                        Token::Pipe => {
                            if blocks.len() >= MAX_NESTING_DEPTH {
                                return Err(Error::syntax(
                                    format!(
                                        "exceeded maximum condition nesting depth ({MAX_NESTING_DEPTH})"
                                    ),
                                    self.source(),
                                    span,
                                ));
                            }
                            blocks.push(Block {
                                header,
                                span,
                                then_branch: ast::Sequence::new(),
                                else_branch: None,
                            });
                            continue;
                        }

                        // A condition with no branches at all, e.g.
                        //
                        //   %[% ping %]%
                        //
                        // It always renders to an empty string but the
                        // identifier must still exist.
                        _ => {
                            let Header { not, ident, raw } = header;
                            ast::Node::Condition(ast::Condition {
                                not,
                                ident,
                                raw,
                                then_branch: None,
                                else_branch: None,
                            })
                        }
                    }
                }

                // The start of the false branch of the innermost condition.
                (Token::Pipe, span) => {
                    let block = blocks.last_mut().ok_or_else(|| {
                        Error::syntax("unexpected `%|%` outside of a condition", self.source(), span)
                    })?;
                    if block.else_branch.is_some() {
                        return Err(Error::syntax(
                            "unexpected `%|%`, condition already has a false branch",
                            self.source(),
                            span,
                        ));
                    }
                    block.else_branch = Some(ast::Sequence::new());
                    continue;
                }

                // The end of the innermost condition.
                (Token::EndCondition, span) => {
                    let block = blocks.pop().ok_or_else(|| {
                        Error::syntax("unexpected `%]%` outside of a condition", self.source(), span)
                    })?;
                    block.finish()
                }

                (tk, span) => {
                    unreachable!("lexer bug: received token `{tk:?}` at {span:?}");
                }
            };
            current(&mut root, &mut blocks).push(node);
        }

        if let Some(block) = blocks.first() {
            return Err(Error::syntax(
                "unclosed condition, expected `%]%`",
                self.source(),
                block.span,
            ));
        }

        Ok(ast::Template {
            source: self.source().to_owned(),
            root,
        })
    }

    /// Parses the rest of a value tag, the begin tag has already been
    /// consumed.
    ///
    ///   user]%
    ///
    ///   user!jl]%
    ///
    fn parse_value(&mut self, begin: Span) -> Result<ast::Value> {
        let ident = self.parse_ident(begin)?;

        let mut conversions = Vec::new();
        let end = match self.next_in(begin)? {
            (Token::EndValue, end) => end,
            (Token::Bang, _) => match self.next_in(begin)? {
                (Token::EndValue, end) => end,
                (Token::Ident, span) => {
                    conversions = self.parse_conversions(span)?;
                    self.expect(Token::EndValue, begin)?
                }
                (tk, span) => return Err(self.err_unexpected_token("conversion", tk, span)),
            },
            (tk, span) => return Err(self.err_unexpected_token(Token::EndValue.human(), tk, span)),
        };

        Ok(ast::Value {
            ident,
            conversions,
            span: begin.combine(end),
        })
    }

    /// Parses a condition header, the begin tag has already been consumed.
    /// Returns the header and the token that ended it, either `%|%` or `%]%`.
    ///
    ///   ping%|%
    ///
    ///    !ping!r %]%
    ///
    fn parse_header(&mut self, begin: Span) -> Result<(Header, Token, Span)> {
        let mut next = self.next_in(begin)?;
        if next.0 == Token::Whitespace {
            next = self.next_in(begin)?;
        }

        let not = next.0 == Token::Bang;
        if not {
            next = self.next_in(begin)?;
        }

        let ident = match next {
            (Token::Ident, span) => self.ident(span),
            (tk, span) => return Err(self.err_unexpected_token("identifier", tk, span)),
        };

        let mut raw = false;
        next = self.next_in(begin)?;
        if next.0 == Token::Bang {
            match self.next_in(begin)? {
                (Token::Ident, span) => {
                    raw = self.parse_condition_conversions(span)?;
                }
                (tk, span) => return Err(self.err_unexpected_token("`r`", tk, span)),
            }
            next = self.next_in(begin)?;
        }

        if next.0 == Token::Whitespace {
            next = self.next_in(begin)?;
        }

        match next {
            (tk @ (Token::Pipe | Token::EndCondition), span) => {
                Ok((Header { not, ident, raw }, tk, span))
            }
            (tk, span) => Err(self.err_unexpected_token("`%|%` or `%]%`", tk, span)),
        }
    }

    /// Parses the conversion codes of a value.
    fn parse_conversions(&self, span: Span) -> Result<Vec<Conversion>> {
        self.source()[span]
            .char_indices()
            .map(|(d, c)| {
                Conversion::from_char(c).ok_or_else(|| {
                    Error::unknown_conversion(c, self.source(), Span::char_at(span.m + d, c))
                })
            })
            .collect()
    }

    /// Parses the conversion codes of a condition. The only conversion is
    /// `r`, which disables dedenting of the rendered branch.
    fn parse_condition_conversions(&self, span: Span) -> Result<bool> {
        for (d, c) in self.source()[span].char_indices() {
            if !c.eq_ignore_ascii_case(&'r') {
                let at = Span::char_at(span.m + d, c);
                return Err(Error::unknown_conversion(c, self.source(), at));
            }
        }
        Ok(true)
    }

    fn parse_ident(&mut self, begin: Span) -> Result<ast::Ident> {
        let span = self.expect(Token::Ident, begin)?;
        Ok(self.ident(span))
    }

    fn ident(&self, span: Span) -> ast::Ident {
        ast::Ident {
            name: self.source()[span].to_ascii_lowercase(),
            span,
        }
    }

    /// Expects the next token to be the given one.
    fn expect(&mut self, exp: Token, begin: Span) -> Result<Span> {
        match self.next_in(begin)? {
            (tk, span) if tk == exp => Ok(span),
            (tk, span) => Err(self.err_unexpected_token(exp.human(), tk, span)),
        }
    }

    /// Returns the next token within a tag, the template must not end before
    /// the tag is closed.
    fn next_in(&mut self, begin: Span) -> Result<(Token, Span)> {
        match self.tokens.next()? {
            Some(next) => Ok(next),
            None => {
                let what = match self.source().get(begin.m..begin.n) {
                    Some("%[%") => "unclosed condition tag, expected `%|%` or `%]%`",
                    _ => "unclosed value tag, expected `]%`",
                };
                Err(Error::syntax(what, self.source(), begin))
            }
        }
    }

    fn source(&self) -> &'source str {
        self.tokens.source
    }

    fn err_unexpected_token(&self, exp: &str, tk: Token, span: Span) -> Error {
        Error::syntax(
            format!("expected {exp}, found {}", tk.human()),
            self.source(),
            span,
        )
    }
}

/// Returns the sequence that new nodes should be pushed to.
fn current<'a>(root: &'a mut ast::Sequence, blocks: &'a mut [Block]) -> &'a mut ast::Sequence {
    match blocks.last_mut() {
        Some(block) => block.active(),
        None => root,
    }
}
