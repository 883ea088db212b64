//! Include path resolution against the including file and search paths.
//!
//! Candidates are built as plain strings, in the order a compiler would try
//! them: the including file's directory first for `"..."` includes, then
//! every search path in configured order. The first candidate that is a file
//! on disk wins.

use std::fs;
use std::path::{self, Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use super::closure::IncludeLister;
use super::extract::{extract_raw_includes, Include};

/// Replaces `/` with the platform separator.
pub fn native_path(include_path: &str) -> String {
    include_path.replace('/', MAIN_SEPARATOR_STR)
}

/// Returns the paths an include might point to, in lookup order.
pub fn candidate_paths(
    search_paths: &[String],
    including_file: &str,
    include: &Include,
) -> Vec<String> {
    let relative = native_path(&include.path);
    let mut candidates = Vec::with_capacity(search_paths.len() + 1);

    if !include.is_system {
        if let Some(pos) = including_file.rfind(path::is_separator) {
            candidates.push(format!("{}{}", &including_file[..=pos], relative));
        }
    }

    for dir in search_paths {
        let mut candidate = dir.clone();
        if !candidate.ends_with(MAIN_SEPARATOR) {
            candidate.push(MAIN_SEPARATOR);
        }
        candidate.push_str(&relative);
        candidates.push(candidate);
    }

    candidates
}

/// Resolves includes against an ordered list of search directories.
#[derive(Debug, Clone, Default)]
pub struct IncludeResolver {
    search_paths: Vec<String>,
}

impl IncludeResolver {
    pub fn new(search_paths: Vec<String>) -> Self {
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[String] {
        &self.search_paths
    }

    /// Rewrites `include.path` to the first existing candidate.
    ///
    /// Returns `false` and leaves the include untouched when nothing exists.
    pub fn resolve(&self, including_file: &str, include: &mut Include) -> bool {
        let found = candidate_paths(&self.search_paths, including_file, include)
            .into_iter()
            .find(|candidate| Path::new(candidate).is_file());

        match found {
            Some(candidate) => {
                include.path = candidate;
                true
            }
            None => false,
        }
    }

    /// Extracts the includes of `text` (the contents of `including_file`)
    /// and resolves each one.
    pub fn includes_in_text(&self, including_file: &str, text: &str) -> Vec<Include> {
        let mut includes = extract_raw_includes(text);
        for include in &mut includes {
            if !self.resolve(including_file, include) {
                tracing::debug!(
                    file = %including_file,
                    include = %include.path,
                    "include not resolved"
                );
            }
        }
        includes
    }
}

impl IncludeLister for IncludeResolver {
    /// Direct includes of a file on disk; empty when the file does not exist
    /// or cannot be read.
    fn direct_includes(&self, file: &str) -> Vec<Include> {
        if !Path::new(file).is_file() {
            return Vec::new();
        }

        match fs::read(file) {
            Ok(bytes) => self.includes_in_text(file, &String::from_utf8_lossy(&bytes)),
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "failed to read file for includes");
                Vec::new()
            }
        }
    }
}
