//! Builder pattern API for unused include checking.
//!
//! Provides a fluent interface for configuring and running a check:
//!
//! ```rust,ignore
//! use deadinc_core::prelude::*;
//!
//! let report = Deadinc::new()
//!     .directory("src/*.cpp")
//!     .include_paths(["include"])
//!     .type_alias_suffixes(["Ref", "Ptr"])
//!     .analyze()?;
//!
//! println!("Unused includes: {}", report.unused_headers);
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::check::{BufferedOutput, CheckOutput, CheckReport, IgnoreRule, IncludeChecker};
use crate::config::CheckSettings;
use crate::error::DeadincError;
use crate::logging::log_warn;
use crate::scan::gather_source_files;
use crate::tags::{Ctags, TagSource};

/// Builder for configuring an unused include check.
///
/// # Example
///
/// ```rust,ignore
/// let report = Deadinc::new()
///     .files(["src/main.cpp"])
///     .interface_headers(["Cars.h"])
///     .analyze()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deadinc {
    /// Engine settings
    settings: CheckSettings,

    /// Explicit source files, checked in the given order
    files: Vec<PathBuf>,

    /// Directory spec to scan instead of `files`
    directory: Option<String>,
}

impl Deadinc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already merged settings (config file plus command line).
    pub fn with_settings(settings: CheckSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Add source files to check.
    pub fn files(mut self, files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Scan a directory instead of using explicit files; `dir/*.ext` limits
    /// the scan to one extension.
    pub fn directory(mut self, spec: impl Into<String>) -> Self {
        self.directory = Some(spec.into());
        self
    }

    pub fn include_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.settings.include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn exclude_paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.settings.exclude_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn interface_headers(mut self, headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.settings.interface_headers.extend(headers.into_iter().map(Into::into));
        self
    }

    pub fn type_alias_prefixes(mut self, prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.settings.type_alias_prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn type_alias_suffixes(mut self, suffixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.settings.type_alias_suffixes.extend(suffixes.into_iter().map(Into::into));
        self
    }

    pub fn ignore_rule(mut self, rule: IgnoreRule) -> Self {
        self.settings.ignore_rules.push(rule);
        self
    }

    pub fn ctags_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.ctags_path = Some(path.into());
        self
    }

    /// Enable verbose diagnostics in the output.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.settings.verbose = enabled;
        self
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// The absolute paths of the files to check, in checking order.
    pub fn targets(&self) -> Result<Vec<String>> {
        let files = match &self.directory {
            Some(spec) => gather_source_files(spec)
                .with_context(|| format!("Failed to scan directory {}", spec))?,
            None if !self.files.is_empty() => self.files.clone(),
            None => return Err(DeadincError::invalid_argument("no file or directory specified").into()),
        };

        files
            .iter()
            .map(|file| {
                std::path::absolute(file)
                    .map(|abs| abs.to_string_lossy().into_owned())
                    .with_context(|| format!("Failed to resolve {}", file.display()))
            })
            .collect()
    }

    /// Run the check with ctags, discarding the progress output.
    pub fn analyze(&self) -> Result<CheckReport> {
        let ctags = Ctags::new(self.settings.ctags_program());
        self.analyze_with(&ctags, BufferedOutput::default())
    }

    /// Run the check with a custom tag source and output sink.
    pub fn analyze_with<S: TagSource, O: CheckOutput>(&self, tag_source: S, mut output: O) -> Result<CheckReport> {
        let targets = self.targets()?;

        let mut settings = self.settings.clone();
        anchor_relative(&mut settings.exclude_paths)?;
        anchor_relative(&mut settings.include_paths)?;

        let mut warnings = 0;
        settings.include_paths.retain(|dir| {
            let exists = Path::new(dir).is_dir();
            if !exists {
                let message = format!("Warning: include directory {} does not exist!", dir);
                log_warn(&message);
                output.line(&message);
                warnings += 1;
            }
            exists
        });

        let mut checker = IncludeChecker::new(settings, tag_source, output).with_initial_warnings(warnings);
        checker.check_files(&targets)?;
        Ok(checker.into_report())
    }
}

/// Makes relative entries absolute against the working directory, the
/// same way targets are, so prefix matching compares like with like.
fn anchor_relative(paths: &mut [String]) -> Result<()> {
    for path in paths.iter_mut() {
        if Path::new(path.as_str()).is_relative() {
            let anchored = std::path::absolute(path.as_str())
                .with_context(|| format!("Failed to resolve {}", path))?;
            *path = anchored.to_string_lossy().into_owned();
        }
    }
    Ok(())
}
