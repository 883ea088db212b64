//! Raw `#include` extraction.
//!
//! Works line by line on unstripped text. A line is an include line when its
//! trimmed form starts with `#include`; anything more elaborate (macros,
//! conditional compilation) is out of reach for a lexical tool.

use serde::Serialize;

/// Directive prefix recognised by [`is_include_line`].
const INCLUDE_DIRECTIVE: &str = "#include";

/// A single `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Include {
    /// Literal path from the directive, or the resolved path once
    /// [`crate::include::IncludeResolver::resolve`] found the file.
    pub path: String,
    /// 1-based line number of the directive.
    pub line: usize,
    /// `<...>` rather than `"..."`.
    pub is_system: bool,
}

impl Include {
    pub fn new(path: impl Into<String>, line: usize, is_system: bool) -> Self {
        Self {
            path: path.into(),
            line,
            is_system,
        }
    }
}

/// Is `line` an `#include` directive?
pub fn is_include_line(line: &str) -> bool {
    line.trim().starts_with(INCLUDE_DIRECTIVE)
}

/// Path between the first `"..."` pair, or failing that the first `<...>`
/// pair. Returns an empty string when neither pair is complete.
///
/// Pre: `is_include_line(line)`.
pub fn include_path(line: &str) -> String {
    let delimited = match line.find('"').filter(|&pos| pos > 0) {
        Some(open) => line[open + 1..]
            .find('"')
            .map(|len| &line[open + 1..open + 1 + len]),
        None => line.find('<').filter(|&pos| pos > 0).and_then(|open| {
            line[open + 1..]
                .find('>')
                .map(|len| &line[open + 1..open + 1 + len])
        }),
    };
    delimited.unwrap_or_default().to_string()
}

/// Both `<` and `>` occur past the start of the line.
pub fn is_system_include(line: &str) -> bool {
    let past_start = |c: char| line.find(c).is_some_and(|pos| pos > 0);
    past_start('<') && past_start('>')
}

/// Returns the includes in `text` in file order, paths untranslated.
///
/// Malformed directives are kept with an empty path; resolution will simply
/// not find them.
pub fn extract_raw_includes(text: &str) -> Vec<Include> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| is_include_line(line))
        .map(|(idx, line)| Include::new(include_path(line), idx + 1, is_system_include(line)))
        .collect()
}
