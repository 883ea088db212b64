//! Parallel, deterministic discovery of C/C++ sources with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (VCS metadata is
//!   never descended into)
//! - Suffix filtering in parallel via Rayon's `par_bridge`
//! - Sorted result, so the checking order does not depend on the walk

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions checked when the directory spec carries no wildcard.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".cpp", ".cxx", ".c", ".cc", ".h", ".hpp", ".inl"];

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &[".git", ".svn", ".hg"];

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// Splits a directory spec into the root to walk and the accepted
/// suffixes.
///
/// `include/*.h` walks `include/` for `.h` files; a spec without `*` walks
/// the whole path with [`DEFAULT_EXTENSIONS`]. An empty root means the
/// current directory.
pub fn parse_directory_spec(spec: &str) -> (PathBuf, Vec<String>) {
    match spec.split_once('*') {
        Some((dir, extension)) => {
            let root = if dir.is_empty() { "." } else { dir };
            (PathBuf::from(root), vec![extension.to_string()])
        }
        None => (
            PathBuf::from(spec),
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        ),
    }
}

/// Gathers all files under `spec` whose path ends with an accepted suffix
/// (case-sensitive), sorted.
pub fn gather_source_files(spec: &str) -> Result<Vec<PathBuf>> {
    let (root, extensions) = parse_directory_spec(spec);
    gather_files_with_extensions(&root, &extensions)
}

/// Walks `root` recursively, keeping files ending with one of `extensions`.
pub fn gather_files_with_extensions(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                if !e.file_type().is_file() {
                    return None;
                }
                let path = e.path();
                let name = path.to_string_lossy();
                if extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!("Failed to gather source files from {}", root.display()))?;

    files.sort();
    Ok(files)
}
