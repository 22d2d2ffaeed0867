//! Text conversions that can be applied to a substituted value.
//!
//! A value directive may list conversions after a `!`, for example
//! `%[user!ju]%`. They are applied left to right so `%[user!ul]%` yields the
//! lowercase value.

use std::fmt;

/// A text conversion applied to a substituted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `j`: escapes the value so that it can be placed inside a JSON string.
    Json,
    /// `u`: converts the value to uppercase.
    Upper,
    /// `l`: converts the value to lowercase.
    Lower,
}

impl Conversion {
    /// Returns the conversion for the given code, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'j' => Some(Self::Json),
            'u' => Some(Self::Upper),
            'l' => Some(Self::Lower),
            _ => None,
        }
    }

    /// The lowercase code used in templates.
    pub const fn code(self) -> char {
        match self {
            Self::Json => 'j',
            Self::Upper => 'u',
            Self::Lower => 'l',
        }
    }

    /// Applies the conversion to a string.
    pub fn apply(self, s: &str) -> String {
        match self {
            Self::Json => json_escape(s),
            Self::Upper => s.to_uppercase(),
            Self::Lower => s.to_lowercase(),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Applies each conversion in order.
pub fn apply_all(conversions: &[Conversion], s: String) -> String {
    conversions.iter().fold(s, |acc, c| c.apply(&acc))
}

/// Escapes a string so that it can be placed between the quotes of a JSON
/// string literal.
///
/// Quotes, backslashes and control characters are escaped. Any other
/// character, including non-ASCII text, is kept as is rather than written as
/// a `\uXXXX` escape, so the result is only valid in UTF-8 encoded JSON.
///
/// ```
/// assert_eq!(condfmt::json_escape("say \"hi\"\n"), r#"say \"hi\"\n"#);
/// assert_eq!(condfmt::json_escape("café 👋"), "café 👋");
/// ```
pub fn json_escape(s: &str) -> String {
    // Serializing a `str` can't fail.
    let quoted = serde_json::to_string(s).unwrap_or_default();
    match quoted.len() {
        n if n >= 2 => quoted[1..n - 1].to_owned(),
        _ => String::new(),
    }
}
