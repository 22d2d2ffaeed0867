/// Removes the indentation from a rendered condition branch.
///
/// A branch that starts with a newline is written on its own indented lines
/// below the condition tag, for example:
///
/// ```text
/// %[% ping %|%
///     Hey %[user]%!
///     Welcome.
/// %]%
/// ```
///
/// The first line (empty) is dropped, so is the last line if it consists of
/// only spaces and tabs, and then leading whitespace is stripped from every
/// remaining line. Lines are split on every Unicode line boundary, see
/// [`split_lines`].
pub fn dedent(text: &str) -> String {
    let mut lines = split_lines(text);
    if !lines.is_empty() {
        lines.remove(0);
    }

    if let Some(last) = lines.last() {
        if !last.is_empty() && last.chars().all(|c| c == ' ' || c == '\t') {
            lines.pop();
        }
    }

    let lines: Vec<&str> = lines.into_iter().map(str::trim_start).collect();
    lines.join("\n")
}

/// Splits text into lines without their terminators.
///
/// Unlike [`str::lines`] this breaks on every line boundary: `\n`, `\r\n`, a
/// lone `\r`, vertical tab, form feed, the file, group and record separators,
/// next line (U+0085) and the line and paragraph separators (U+2028, U+2029).
/// A terminator at the very end does not produce an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if !is_line_boundary(c) {
            continue;
        }
        lines.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some((j, '\n')) = iter.peek().copied() {
                iter.next();
                end = j + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
