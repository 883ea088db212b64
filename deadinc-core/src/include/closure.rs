//! Recursive include closure with cycle guard and memoization.

use std::collections::{HashMap, HashSet};

use super::extract::Include;

/// Source of the direct includes of a file.
///
/// [`crate::include::IncludeResolver`] reads files from disk; tests supply
/// an in-memory include graph.
pub trait IncludeLister {
    /// Direct includes of `file`, resolved where possible.
    fn direct_includes(&self, file: &str) -> Vec<Include>;
}

/// Per header, the set of headers it recursively includes.
#[derive(Debug, Clone, Default)]
pub struct IncludeRecursionCache {
    entries: HashMap<String, HashSet<String>>,
}

impl IncludeRecursionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&HashSet<String>> {
        self.entries.get(header)
    }

    pub fn insert(&mut self, header: String, closure: HashSet<String>) {
        self.entries.insert(header, closure);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All headers reachable from `header`, excluding `header` itself.
///
/// `visited` is shared across the whole traversal: a header already visited
/// contributes nothing, which is what stops cycles. In a cycle the node that
/// closes it therefore gets an empty closure, and that (partial) result is
/// what lands in the cache.
pub fn recursive_closure<L: IncludeLister + ?Sized>(
    lister: &L,
    header: &str,
    visited: &mut HashSet<String>,
    cache: &mut IncludeRecursionCache,
) -> HashSet<String> {
    let mut closure = HashSet::new();
    if !visited.insert(header.to_string()) {
        return closure;
    }

    for include in lister.direct_includes(header) {
        if visited.contains(&include.path) {
            continue;
        }

        let nested = match cache.get(&include.path) {
            Some(cached) => cached.clone(),
            None => {
                let computed = recursive_closure(lister, &include.path, visited, cache);
                cache.insert(include.path.clone(), computed.clone());
                computed
            }
        };

        closure.insert(include.path);
        closure.extend(nested);
    }

    closure
}

/// [`recursive_closure`] with a fresh visited set.
pub fn include_closure<L: IncludeLister + ?Sized>(
    lister: &L,
    header: &str,
    cache: &mut IncludeRecursionCache,
) -> HashSet<String> {
    let mut visited = HashSet::new();
    recursive_closure(lister, header, &mut visited, cache)
}
