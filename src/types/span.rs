//! Byte ranges into a template source, used to point errors at the offending
//! directive.

use std::cmp::{max, min};
use std::ops::{Index, Range};

/// A half open byte range `m..n` into a template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub m: usize,
    pub n: usize,
}

impl Span {
    /// The span of the single character `c` starting at byte `i`.
    pub fn char_at(i: usize, c: char) -> Self {
        Self {
            m: i,
            n: i + c.len_utf8(),
        }
    }

    /// The smallest span covering both, e.g. a whole condition header from
    /// its `%[%` and `%|%` tags.
    pub fn combine(self, other: Self) -> Self {
        Self {
            m: min(self.m, other.m),
            n: max(self.n, other.n),
        }
    }

    /// Returns the one based line and column of the start of the span.
    ///
    /// Lines are separated by `\n` and the column is counted in characters.
    pub fn line_col(self, source: &str) -> (usize, usize) {
        let before = &source[..self.m];
        let line = before.matches('\n').count() + 1;
        let start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[start..].chars().count() + 1;
        (line, col)
    }
}

impl Index<Span> for str {
    type Output = str;

    fn index(&self, span: Span) -> &Self::Output {
        &self[span.m..span.n]
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self {
            m: r.start,
            n: r.end,
        }
    }
}
