//! deadinc-core: unused `#include` detection for C and C++.
//!
//! A header include counts as unused when nothing the header declares shows
//! up in the including file once comments and string literals are removed.
//! Declarations come from an external ctags executable; matching is textual,
//! with alias spellings for classes and structs and a basename fallback.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deadinc_core::prelude::*;
//!
//! let report = Deadinc::new()
//!     .files(["src/main.cpp"])
//!     .include_paths(["include"])
//!     .analyze()?;
//!
//! for unused in &report.results {
//!     println!("{}({}): {}", unused.source_file, unused.source_line, unused.header_file);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`strip`]: Comment, literal and include-line removal
//! - [`include`]: Include extraction, path resolution, recursive closure
//! - [`tags`]: ctags bridge and typed symbol tags
//! - [`check`]: Usage checking engine and ignore rules
//! - [`scan`]: Parallel source file discovery
//! - [`config`]: Settings and deadinc.toml
//! - [`builder`]: Fluent builder API
//! - [`report`]: Console, JSON and XML output
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `xml` (default): XML result files

pub mod builder;
pub mod check;
pub mod config;
pub mod error;
pub mod include;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod strip;
pub mod tags;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{DeadincError, DeadincResult, IoResultExt};

// Builder API
pub use builder::Deadinc;

// Checking engine
pub use check::{
    contains_word, find_usage, is_header_ignored, is_interface_header, is_source_excluded,
    name_variations, BufferedOutput, CheckOutput, CheckReport, FileOutcome, HeaderTagCache,
    IgnoreRule, IncludeChecker, UnusedHeaderResult, UsageEvidence, UsageMatcher,
};

// Configuration
pub use config::{
    default_ctags_path, load_config, load_default_config, CheckSettings, DeadincConfig,
    CONFIG_FILE_NAME,
};

// Includes
pub use include::{
    candidate_paths, extract_raw_includes, include_closure, recursive_closure, Include,
    IncludeLister, IncludeRecursionCache, IncludeResolver,
};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{print_json, to_json, ConsoleOutput};
#[cfg(feature = "xml")]
pub use report::{to_xml, write_xml};

// File scanning
pub use scan::{gather_files_with_extensions, gather_source_files, parse_directory_spec, DEFAULT_EXTENSIONS};

// Stripping
pub use strip::{remove_comments, remove_includes, remove_strings, strip};

// Tags
pub use tags::{Ctags, Tag, TagKind, TagSource};
