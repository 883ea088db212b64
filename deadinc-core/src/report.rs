//! Output: console sink, JSON and XML result files.

use crate::check::{CheckOutput, CheckReport};
use crate::error::{DeadincError, DeadincResult};

/// Lines to stdout, errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl CheckOutput for ConsoleOutput {
    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

/// Pretty JSON: `{ unused_headers, warnings, results: [{source, line, header}] }`.
pub fn to_json(report: &CheckReport) -> DeadincResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| DeadincError::report(e.to_string()))
}

/// Prints the report as JSON to stdout.
pub fn print_json(report: &CheckReport) -> DeadincResult<()> {
    println!("{}", to_json(report)?);
    Ok(())
}

#[cfg(feature = "xml")]
mod xml {
    use std::fs;
    use std::path::Path;

    use serde::Serialize;

    use crate::check::{CheckReport, UnusedHeaderResult};
    use crate::error::{DeadincError, DeadincResult, IoResultExt};

    #[derive(Serialize)]
    #[serde(rename = "unused_headers")]
    struct XmlReport<'a> {
        #[serde(rename = "unused_header")]
        results: &'a [UnusedHeaderResult],
    }

    /// `<unused_headers><unused_header><source/><line/><header/></unused_header>...`
    pub fn to_xml(report: &CheckReport) -> DeadincResult<String> {
        let doc = XmlReport {
            results: &report.results,
        };
        quick_xml::se::to_string(&doc).map_err(|e| DeadincError::report(e.to_string()))
    }

    /// Writes the findings as an XML document to `path`.
    pub fn write_xml(report: &CheckReport, path: &Path) -> DeadincResult<()> {
        let body = to_xml(report)?;
        let doc = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n{}\n", body);
        fs::write(path, doc).with_path(path)?;
        tracing::info!(path = %path.display(), results = report.results.len(), "wrote xml report");
        Ok(())
    }
}

#[cfg(feature = "xml")]
pub use xml::{to_xml, write_xml};
