//! `#include` extraction, resolution and closure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │     extract.rs      │     │     resolve.rs      │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  Raw directives     │────▶│  Candidate paths,   │
//! │  (path, line, <>)   │     │  first existing hit │
//! └─────────────────────┘     └──────────┬──────────┘
//!                                        ▼
//!                             ┌─────────────────────┐
//!                             │     closure.rs      │
//!                             │  ─────────────────  │
//!                             │  Recursive closure, │
//!                             │  cycle guard, cache │
//!                             └─────────────────────┘
//! ```

pub mod closure;
pub mod extract;
pub mod resolve;

pub use closure::{include_closure, recursive_closure, IncludeLister, IncludeRecursionCache};
pub use extract::{extract_raw_includes, include_path, is_include_line, is_system_include, Include};
pub use resolve::{candidate_paths, native_path, IncludeResolver};
