use crate::types::span::Span;
use crate::{Error, Result};

/// A lexer that tokenizes the template source into distinct chunks so that the
/// parser doesn't have to operate on raw text.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method to return the next
/// token until [`None`] is returned. Unlike other template syntaxes whitespace
/// is significant within a condition tag so it is returned as a token.
#[derive(Debug)]
pub struct Lexer<'source> {
    /// The original template source.
    pub source: &'source str,

    /// A cursor over the template source.
    cursor: usize,

    /// The current state of the lexer.
    state: State,
}

/// The state of the lexer.
///
/// The lexer requires state because the tokenization is different when
/// tokenizing text between tags, e.g. `%[user]%` and `%[% ping %|%`.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Within raw template, including a condition branch.
    Template,

    /// Between the value tags `%[` and `]%`.
    Value {
        /// The span of the begin tag.
        begin: Span,
    },

    /// Between the condition tag `%[%` and the first `%|%` or `%]%`.
    Condition {
        /// The span of the begin tag.
        begin: Span,
    },
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Raw template not containing any `%`
    Raw,
    /// An escaped percent sign `%%`
    Escape,
    /// A lone percent sign that is not part of a tag
    Percent,
    /// Begin value tag `%[`
    BeginValue,
    /// End value tag `]%`
    EndValue,
    /// Begin condition tag `%[%`
    BeginCondition,
    /// Branch separator `%|%`
    Pipe,
    /// End condition tag `%]%`
    EndCondition,
    /// `!`
    Bang,
    /// A sequence of ASCII letters, digits and underscores
    Ident,
    /// Sequence of spaces, tabs, carriage returns and newlines
    Whitespace,
}

impl<'source> Lexer<'source> {
    /// Construct a new lexer.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            state: State::Template,
        }
    }

    /// Returns the next token and span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;

        if self.source[i..].is_empty() {
            return Ok(None);
        }

        let (tk, j) = match self.state {
            State::Template => self.lex_template(i)?,
            State::Value { begin } => self.lex_value(begin, i)?,
            State::Condition { begin } => self.lex_condition(begin, i)?,
        };

        self.cursor = j;
        Ok(Some((tk, Span::from(i..j))))
    }

    fn lex_template(&mut self, i: usize) -> Result<(Token, usize)> {
        // We are within raw template, that means all we have to do is find
        // the next `%` and decide what kind of tag, if any, it starts.
        //
        // xxxxxxx%[xxxxxx
        //    ^   ^
        //    i   j

        let rest = &self.source[i..];

        if !rest.starts_with('%') {
            let j = rest.find('%').map(|d| i + d).unwrap_or(self.source.len());
            return Ok((Token::Raw, j));
        }

        let tk = match rest.as_bytes().get(1) {
            Some(b'%') => (Token::Escape, i + 2),
            Some(b'[') => {
                if rest[2..].starts_with('%') {
                    let begin = Span::from(i..i + 3);
                    self.state = State::Condition { begin };
                    (Token::BeginCondition, i + 3)
                } else {
                    let begin = Span::from(i..i + 2);
                    self.state = State::Value { begin };
                    (Token::BeginValue, i + 2)
                }
            }
            Some(b'|') => match rest.as_bytes().get(2) {
                Some(b'%') => (Token::Pipe, i + 3),
                _ => return Err(self.err_incomplete_tag(Token::Pipe, i)),
            },
            Some(b']') => match rest.as_bytes().get(2) {
                Some(b'%') => (Token::EndCondition, i + 3),
                _ => return Err(self.err_incomplete_tag(Token::EndCondition, i)),
            },
            _ => (Token::Percent, i + 1),
        };
        Ok(tk)
    }

    fn lex_value(&mut self, begin: Span, i: usize) -> Result<(Token, usize)> {
        // We are between the value tags %[ ... ]% that means we only expect
        // an identifier, an optional `!` followed by the conversion codes,
        // and the end tag.

        let rest = &self.source[i..];

        if rest.starts_with("]%") {
            self.state = State::Template;
            return Ok((Token::EndValue, i + 2));
        }

        // We can `.unwrap()` since we've already checked that there is more
        // text remaining.
        let c = rest.chars().next().unwrap();
        match c {
            '!' => Ok((Token::Bang, i + 1)),
            c if is_ident(c) => Ok(self.lex_while(Token::Ident, i, is_ident)),
            '%' if rest.starts_with("%[") => Err(self.err_unclosed(begin, Token::EndValue)),
            _ => Err(self.err_unexpected_character(Span::char_at(i, c))),
        }
    }

    fn lex_condition(&mut self, begin: Span, i: usize) -> Result<(Token, usize)> {
        // We are between the begin condition tag and the first branch
        // separator or end tag, e.g. `%[% !ping!r %|%` so we lex the
        // negation, identifier and conversion, as well as any surrounding
        // whitespace.

        let rest = &self.source[i..];

        if rest.starts_with("%|%") {
            self.state = State::Template;
            return Ok((Token::Pipe, i + 3));
        }
        if rest.starts_with("%]%") {
            self.state = State::Template;
            return Ok((Token::EndCondition, i + 3));
        }

        let c = rest.chars().next().unwrap();
        match c {
            '!' => Ok((Token::Bang, i + 1)),
            c if is_whitespace(c) => Ok(self.lex_while(Token::Whitespace, i, is_whitespace)),
            c if is_ident(c) => Ok(self.lex_while(Token::Ident, i, is_ident)),
            '%' if rest.starts_with("%[") => Err(self.err_unclosed(begin, Token::EndCondition)),
            _ => Err(self.err_unexpected_character(Span::char_at(i, c))),
        }
    }

    /// Lexes a token made of characters that all satisfy the predicate.
    fn lex_while(&self, tk: Token, i: usize, pred: fn(char) -> bool) -> (Token, usize) {
        let rest = &self.source[i..];
        let j = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(d, _)| i + d)
            .unwrap_or(self.source.len());
        (tk, j)
    }

    fn err_incomplete_tag(&self, tk: Token, i: usize) -> Error {
        Error::syntax(
            format!(
                "expected {}, use `%%` for a literal percent sign",
                tk.human()
            ),
            self.source,
            i..i + 2,
        )
    }

    fn err_unclosed(&self, begin: Span, end: Token) -> Error {
        let msg = format!("unclosed {}, expected {}", begin_human(end), end.human());
        Error::syntax(msg, self.source, begin)
    }

    fn err_unexpected_character(&self, span: impl Into<Span>) -> Error {
        Error::syntax("unexpected character", self.source, span)
    }
}

impl Token {
    /// A human readable name for the token.
    pub fn human(&self) -> &'static str {
        match self {
            Self::Raw => "raw template",
            Self::Escape => "`%%`",
            Self::Percent => "`%`",
            Self::BeginValue => "`%[`",
            Self::EndValue => "`]%`",
            Self::BeginCondition => "`%[%`",
            Self::Pipe => "`%|%`",
            Self::EndCondition => "`%]%`",
            Self::Bang => "`!`",
            Self::Ident => "identifier",
            Self::Whitespace => "whitespace",
        }
    }
}

fn begin_human(end: Token) -> &'static str {
    match end {
        Token::EndValue => "value tag",
        _ => "condition tag",
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
