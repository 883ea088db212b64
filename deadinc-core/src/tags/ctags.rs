//! Bridge to an external ctags executable.
//!
//! One subprocess per header. Output is fully buffered and the call blocks
//! until ctags exits; there is no timeout.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::tag::{parse_output, Tag};
use super::TagSource;
use crate::error::{DeadincError, DeadincResult};

/// Flags passed before the file path.
///
/// `+tpx` adds typedefs, prototypes and extern variables to the C++ kinds;
/// `-x` selects one-line-per-symbol cross-reference output; `-I` keeps a
/// common SAL annotation from confusing the parser.
pub const CTAGS_FLAGS: [&str; 5] = [
    "--c++-kinds=+tpx",
    "-x",
    "-I",
    "__out_bcount_full_opt+",
    "--language-force=c++",
];

/// Raw result of one extractor run.
#[derive(Debug, Clone)]
pub struct ExtractorOutput {
    /// Standard output, one entry per line.
    pub lines: Vec<String>,
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub success: bool,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// ctags invoked as a subprocess.
#[derive(Debug, Clone)]
pub struct Ctags {
    program: PathBuf,
}

impl Ctags {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the extractor on `path` and waits for it.
    ///
    /// Fails only when the process cannot be started.
    pub fn run(&self, path: &Path) -> std::io::Result<ExtractorOutput> {
        tracing::debug!(program = %self.program.display(), file = %path.display(), "running ctags");

        let output = Command::new(&self.program)
            .args(CTAGS_FLAGS)
            .arg(path)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(ExtractorOutput {
            lines: stdout.lines().map(str::to_string).collect(),
            status: output.status.code(),
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl TagSource for Ctags {
    fn tags_for_file(&self, path: &Path) -> DeadincResult<HashSet<Tag>> {
        let output = self.run(path).map_err(|e| {
            DeadincError::extractor(
                path,
                format!("failed to launch {}: {}", self.program.display(), e),
            )
        })?;

        if !output.success {
            let status = output
                .status
                .map_or_else(|| "a signal".to_string(), |code| format!("code {}", code));
            let stderr = output.stderr.trim();
            let message = if stderr.is_empty() {
                format!("ctags exited with {}", status)
            } else {
                format!("ctags exited with {}: {}", status, stderr)
            };
            return Err(DeadincError::extractor(path, message));
        }

        Ok(parse_output(&output.lines.join("\n")))
    }
}
