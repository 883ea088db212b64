//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deadinc_core::prelude::*;
//! ```

// Core types
pub use crate::error::{DeadincError, DeadincResult};
pub use crate::include::Include;
pub use crate::tags::{Tag, TagKind, TagSource};

// Checking
pub use crate::check::{CheckOutput, CheckReport, IgnoreRule, IncludeChecker, UnusedHeaderResult};

// Configuration
pub use crate::config::{load_config, CheckSettings};

// Builder API
pub use crate::builder::Deadinc;
