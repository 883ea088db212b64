//! Typed error handling for deadinc.
//!
//! Only one condition stops a check run: the symbol extractor failing for a
//! header whose tags are needed. Everything else (missing sources, missing
//! headers, unknown include directories) is reported as a warning and counted.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadinc operations.
#[derive(Error, Debug)]
pub enum DeadincError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The symbol extractor could not be launched or exited non-zero
    #[error("ctags failed on {path}: {message}")]
    Extractor { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Result serialization errors
    #[error("Report error: {message}")]
    Report { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeadincError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an extractor error for the header at `path`.
    pub fn extractor(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extractor {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a report error.
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this error aborts a check run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Extractor { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Extractor { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadinc results.
pub type DeadincResult<T> = Result<T, DeadincError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadincResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadincResult<T> {
        self.map_err(|e| DeadincError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = DeadincError::io(
            PathBuf::from("/test/file.cpp"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, DeadincError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/file.cpp")));
        assert!(err.to_string().contains("/test/file.cpp"));
    }

    #[test]
    fn test_extractor_error_is_fatal() {
        let err = DeadincError::extractor("/inc/a.h", "ctags: unknown option");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("ctags: unknown option"));
        assert_eq!(err.path(), Some(&PathBuf::from("/inc/a.h")));
    }

    #[test]
    fn test_other_errors_not_fatal() {
        assert!(!DeadincError::config("/deadinc.toml", "bad key").is_fatal());
        assert!(!DeadincError::report("xml").is_fatal());
        assert!(!DeadincError::invalid_argument("no files").is_fatal());
        assert_eq!(DeadincError::report("xml").path(), None);
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = result.with_path("/missing/file.h").unwrap_err();
        assert_eq!(err.path(), Some(&PathBuf::from("/missing/file.h")));
    }
}
