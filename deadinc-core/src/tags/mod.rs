//! Symbol tags declared by headers.
//!
//! Tags come from an external ctags executable ([`Ctags`]). The checking
//! engine only sees the [`TagSource`] trait, so tests can hand it canned
//! tag sets instead of spawning processes.

pub mod ctags;
pub mod tag;

use std::collections::HashSet;
use std::path::Path;

use crate::error::DeadincResult;

pub use ctags::{Ctags, ExtractorOutput, CTAGS_FLAGS};
pub use tag::{parse_line, parse_output, Tag, TagKind};

/// Provider of the symbols a single file declares.
pub trait TagSource {
    /// Tags declared directly in `path`, unknown kinds excluded.
    fn tags_for_file(&self, path: &Path) -> DeadincResult<HashSet<Tag>>;
}

impl<T: TagSource + ?Sized> TagSource for &T {
    fn tags_for_file(&self, path: &Path) -> DeadincResult<HashSet<Tag>> {
        (**self).tags_for_file(path)
    }
}
