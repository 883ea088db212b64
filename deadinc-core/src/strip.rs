//! Lexical stripping of C/C++ source.
//!
//! Removes `#include` lines, comments and string/character literals so the
//! usage test only sees code. Comment removal keeps every line terminator,
//! so line numbers of surviving text stay valid.
//!
//! None of these functions understand the preprocessor; they are a single
//! left-to-right scan over characters.

use crate::include::is_include_line;

/// Line separator used when rejoining lines in [`remove_includes`].
const LINE_SEPARATOR: &str = "\r\n";

/// Drops every `#include` line.
///
/// Lines are split on `\n` with a trailing `\r` trimmed, and rejoined with
/// CRLF. Include lines become empty lines so the line count is unchanged.
pub fn remove_includes(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut output = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            output.push_str(LINE_SEPARATOR);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if !is_include_line(line) {
            output.push_str(line);
        }
    }
    output
}

/// Removes `//` and `/* */` comments.
///
/// A `//` comment is dropped up to (not including) the line terminator.
/// A block comment is replaced by spaces, keeping `\r` and `\n` verbatim; an
/// unterminated block comment runs to the end of the text. String and
/// character literals are copied as-is, so comment markers inside them
/// survive.
pub fn remove_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < len {
        let next = chars.get(i + 1).copied();
        match (chars[i], next) {
            ('/', Some('/')) => {
                while i < len && chars[i] != '\r' && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => blank_block_comment(&chars, &mut i, &mut out),
            ('"', _) | ('\'', _) => copy_literal(&chars, &mut i, &mut out),
            (c, _) => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Removes string and character literals entirely, quotes included.
///
/// Comments get no special treatment; run [`remove_comments`] first.
pub fn remove_strings(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < len {
        let c = chars[i];
        if c == '"' || c == '\'' {
            i += 1;
            skip_literal_body(&chars, &mut i, c);
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// The text the usage test runs against: includes, comments and literals removed.
pub fn strip(text: &str) -> String {
    remove_strings(&remove_comments(&remove_includes(text)))
}

/// Pre: `chars[*i..]` starts with `/*`. Post: `*i` is past the closing `*/`
/// or at the end of input.
fn blank_block_comment(chars: &[char], i: &mut usize, out: &mut String) {
    let len = chars.len();
    while *i + 1 < len && !(chars[*i] == '*' && chars[*i + 1] == '/') {
        match chars[*i] {
            c @ ('\r' | '\n') => out.push(c),
            _ => out.push(' '),
        }
        *i += 1;
    }

    if *i + 1 < len {
        // closing */
        *i += 2;
        out.push_str("  ");
    } else if *i < len {
        // a lone trailing character of an unterminated comment
        match chars[*i] {
            c @ ('\r' | '\n') => out.push(c),
            _ => out.push(' '),
        }
        *i += 1;
    }
}

/// Pre: `chars[*i]` is the opening quote. Copies the literal through its
/// closing quote, or to the end of input.
fn copy_literal(chars: &[char], i: &mut usize, out: &mut String) {
    let quote = chars[*i];
    let len = chars.len();
    out.push(quote);
    *i += 1;

    while *i < len {
        let c = chars[*i];
        if c == quote {
            out.push(c);
            *i += 1;
            return;
        }
        if c == '\\' {
            out.push(c);
            if let Some(&escaped) = chars.get(*i + 1) {
                out.push(escaped);
                *i += 2;
            } else {
                *i += 1;
            }
        } else {
            out.push(c);
            *i += 1;
        }
    }
}

/// Advances `*i` past the body and closing quote of a literal whose opening
/// quote has already been consumed.
fn skip_literal_body(chars: &[char], i: &mut usize, quote: char) {
    let len = chars.len();
    while *i < len {
        let c = chars[*i];
        if c == '\\' {
            *i += 2;
        } else if c == quote {
            *i += 1;
            return;
        } else {
            *i += 1;
        }
    }
}
