//! Exclude paths, interface headers and ignore rules.
//!
//! All comparisons are case-insensitive. Exclude paths are prefixes;
//! interface headers and ignore rules are suffixes.

use serde::{Deserialize, Serialize};

/// A header to leave alone, optionally only when included from a given
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreRule {
    /// Source path suffix; `None` (or empty) matches every source.
    #[serde(default)]
    pub source: Option<String>,
    /// Header path suffix.
    pub header: String,
}

impl IgnoreRule {
    /// Ignores `header` wherever it is included.
    pub fn any_source(header: impl Into<String>) -> Self {
        Self {
            source: None,
            header: header.into(),
        }
    }

    /// Ignores `header` only when included from `source`.
    pub fn for_source(source: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            header: header.into(),
        }
    }

    pub fn matches(&self, source: &str, header: &str) -> bool {
        if !ends_with_ignore_case(header, &self.header) {
            return false;
        }
        match self.source.as_deref() {
            None | Some("") => true,
            Some(suffix) => ends_with_ignore_case(source, suffix),
        }
    }
}

fn ends_with_ignore_case(haystack: &str, suffix: &str) -> bool {
    haystack.to_lowercase().ends_with(&suffix.to_lowercase())
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Whether `source` lies under one of the exclude paths.
pub fn is_source_excluded(source: &str, exclude_paths: &[String]) -> bool {
    exclude_paths
        .iter()
        .any(|prefix| starts_with_ignore_case(source, prefix))
}

/// Whether `path` names a configured interface header.
pub fn is_interface_header(path: &str, interface_headers: &[String]) -> bool {
    interface_headers
        .iter()
        .any(|suffix| ends_with_ignore_case(path, suffix))
}

/// Whether the include of `header` from `source` is skipped.
///
/// True when either path lies under an exclude path, or an ignore rule
/// matches the pair.
pub fn is_header_ignored(
    source: &str,
    header: &str,
    exclude_paths: &[String],
    ignore_rules: &[IgnoreRule],
) -> bool {
    is_source_excluded(source, exclude_paths)
        || is_source_excluded(header, exclude_paths)
        || ignore_rules.iter().any(|rule| rule.matches(source, header))
}
