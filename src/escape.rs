//! Escaping helpers.

/// The first character of the Unicode private use area.
const PLACEHOLDER_START: u32 = 0xE000;

/// The number of characters in the Unicode private use area.
const PLACEHOLDER_COUNT: usize = 6400;

/// Escapes a string so that it renders literally when used as a template.
///
/// Every `%` is doubled, so the result never contains a directive.
///
/// ```
/// let s = "100% %[not a value]%";
/// let result = condfmt::format(&condfmt::escape(s), &condfmt::Bindings::new())?;
/// assert_eq!(result, s);
/// # Ok::<(), condfmt::Error>(())
/// ```
pub fn escape(s: &str) -> String {
    s.replace('%', "%%")
}

/// A reusable escape and unescape pair for a set of characters.
///
/// An escape sequence is the escape character followed by one of the
/// escapable characters. The escape character itself is always escapable.
///
/// This is useful when some other transformation must skip over escaped
/// text: [`protect`][Escaper::protect] hides escape sequences behind
/// private use characters, the transformation runs, and then
/// [`restore`][Escaper::restore] turns them back into the literal characters.
///
/// ```
/// use condfmt::Escaper;
///
/// let escaper = Escaper::new('%', "");
/// let label = escaper.replace("%%ROLE%% is %role%", "%ROLE%", "Admin");
/// assert_eq!(label, "%ROLE% is Admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaper {
    escape: char,
    chars: Vec<char>,
}

impl Escaper {
    /// Construct a new escaper.
    ///
    /// # Panics
    ///
    /// If more escapable characters are given than there are private use
    /// characters to stand in for them.
    pub fn new(escape: char, chars: &str) -> Self {
        let mut all = vec![escape];
        for c in chars.chars() {
            if !all.contains(&c) {
                all.push(c);
            }
        }
        assert!(
            all.len() <= PLACEHOLDER_COUNT,
            "too many escapable characters"
        );
        Self { escape, chars: all }
    }

    /// Returns the escape character.
    pub fn escape_char(&self) -> char {
        self.escape
    }

    /// Adds the escape character in front of every escapable character.
    pub fn escape(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            if self.chars.contains(&c) {
                out.push(self.escape);
            }
            out.push(c);
        }
        out
    }

    /// Replaces every escape sequence with a placeholder character.
    pub fn protect(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut iter = s.chars().peekable();
        while let Some(c) = iter.next() {
            if c == self.escape {
                if let Some(i) = iter.peek().and_then(|n| self.position(*n)) {
                    iter.next();
                    out.push(placeholder(i));
                    continue;
                }
            }
            out.push(c);
        }
        out
    }

    /// Replaces every placeholder character with the character it stands for.
    pub fn restore(&self, s: &str) -> String {
        s.chars()
            .map(|c| match self.index_of_placeholder(c) {
                Some(i) => self.chars[i],
                None => c,
            })
            .collect()
    }

    /// Removes escape characters from escape sequences.
    pub fn unescape(&self, s: &str) -> String {
        self.restore(&self.protect(s))
    }

    /// Replaces every unescaped occurrence of `pattern` with `with`, ignoring
    /// ASCII case, and unescapes the result.
    pub fn replace(&self, s: &str, pattern: &str, with: &str) -> String {
        let protected = self.protect(s);
        if pattern.is_empty() {
            return self.restore(&protected);
        }
        let mut out = String::with_capacity(protected.len());
        let mut rest = protected.as_str();
        while let Some(i) = find_ignore_ascii_case(rest, pattern) {
            out.push_str(&rest[..i]);
            out.push_str(with);
            rest = &rest[i + pattern.len()..];
        }
        out.push_str(rest);
        self.restore(&out)
    }

    fn position(&self, c: char) -> Option<usize> {
        self.chars.iter().position(|e| *e == c)
    }

    fn index_of_placeholder(&self, c: char) -> Option<usize> {
        let i = (c as u32).checked_sub(PLACEHOLDER_START)? as usize;
        (i < self.chars.len()).then_some(i)
    }
}

fn placeholder(i: usize) -> char {
    // `i` is bounded by the assertion in `Escaper::new`.
    char::from_u32(PLACEHOLDER_START + i as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        haystack
            .get(i..i + needle.len())
            .map_or(false, |window| window.eq_ignore_ascii_case(needle))
    })
}
