//! Usage checking: does a source file use anything its includes declare?
//!
//! [`IncludeChecker`] runs the per-file state machine
//! `Start -> Excluded | InterfaceHeader | NotFound | Checked`, looking up
//! header tags through a [`crate::tags::TagSource`] and writing progress,
//! warnings and findings to a [`CheckOutput`].

pub mod engine;
pub mod rules;
pub mod usage;

pub use engine::{CheckReport, FileOutcome, HeaderTagCache, IncludeChecker, UnusedHeaderResult};
pub use rules::{is_header_ignored, is_interface_header, is_source_excluded, IgnoreRule};
pub use usage::{contains_word, find_usage, name_variations, UsageEvidence, UsageMatcher};

/// Sink for user-facing lines.
pub trait CheckOutput {
    /// Progress, findings, warnings, verbose diagnostics.
    fn line(&mut self, text: &str);
    /// Fatal errors.
    fn error(&mut self, text: &str);
}

impl<T: CheckOutput + ?Sized> CheckOutput for &mut T {
    fn line(&mut self, text: &str) {
        (**self).line(text);
    }

    fn error(&mut self, text: &str) {
        (**self).error(text);
    }
}

/// Keeps every line in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferedOutput {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckOutput for BufferedOutput {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }
}
