use std::cmp::max;
use std::fmt;

use crate::types::span::Span;

/// The kind of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The template is malformed.
    Syntax,
    /// A value directive referenced an identifier with no bound value.
    UnknownVariable,
    /// A condition directive referenced an identifier with no condition.
    UnknownCondition,
    /// A directive used a conversion code that doesn't exist.
    UnknownConversion,
    /// Recursive expansion of bound values went too deep.
    RecursionLimit,
    /// Bindings could not be built from a serializable value.
    Serialize,
}

/// An error that can occur during template compilation or rendering.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    ident: Option<String>,
    span: Option<(String, Span)>,
}

impl Error {
    /// Constructs a syntax error pointing at a region of the source.
    pub(crate) fn syntax(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::span(ErrorKind::Syntax, msg, source, span)
    }

    pub(crate) fn unknown_conversion(c: char, source: &str, span: impl Into<Span>) -> Self {
        Self::span(
            ErrorKind::UnknownConversion,
            format!("unknown conversion `{c}`"),
            source,
            span,
        )
    }

    pub(crate) fn unknown_variable(name: &str, source: &str, span: Span) -> Self {
        Self::span(ErrorKind::UnknownVariable, "unknown variable", source, span)
            .with_ident(name)
    }

    pub(crate) fn unknown_condition(name: &str, source: &str, span: Span) -> Self {
        Self::span(ErrorKind::UnknownCondition, "unknown condition", source, span)
            .with_ident(name)
    }

    pub(crate) fn recursion_limit(max: usize, name: &str, source: &str, span: Span) -> Self {
        Self::span(
            ErrorKind::RecursionLimit,
            format!("reached maximum recursion depth ({max})"),
            source,
            span,
        )
        .with_ident(name)
    }

    #[cfg(feature = "serde")]
    pub(crate) fn serialize(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Serialize,
            msg: msg.into(),
            ident: None,
            span: None,
        }
    }

    fn span(kind: ErrorKind, msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            ident: None,
            span: Some((source.to_owned(), span.into())),
        }
    }

    fn with_ident(mut self, name: &str) -> Self {
        self.ident = Some(name.to_owned());
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message without any location information.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the case folded identifier this error is about, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// Returns the one based line and column in the template source where
    /// this error occurred, if known.
    ///
    /// The column is counted in characters.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        let (source, span) = self.span.as_ref()?;
        Some(span.line_col(source))
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, display_width(&source[span]));
    let code = lines.get(line).or(lines.last()).copied().unwrap_or("");

    let num = (line + 1).to_string();
    let pad = display_width(&num);
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, display_width(&line[..offset - n]));
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| display_width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn display_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn display_width(s: &str) -> usize {
    s.chars().count()
}
