//! deadinc CLI - unused #include detector for C and C++.
//!
//! Features:
//! - Explicit files or recursive directory scans (`-D src/*.cpp`)
//! - deadinc.toml configuration, extended by command-line options
//! - Interface headers, type alias prefixes/suffixes, ignore rules
//! - JSON on stdout or XML result files
//!
//! Exit status: 0 when every include is used, 1 when unused includes were
//! found, 2 on errors.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use deadinc_core::{
    include_closure, init_structured_logging, load_config, load_default_config, print_json,
    write_xml, CheckOutput, CheckSettings, ConsoleOutput, Ctags, Deadinc, DeadincConfig,
    DeadincError, IncludeRecursionCache, IncludeResolver,
};

#[derive(Parser, Debug)]
#[command(name = "deadinc", author, version, about = "Unused #include detector for C and C++")]
pub struct Cli {
    /// Source files to check
    files: Vec<PathBuf>,

    /// Configuration file (default: deadinc.toml in the working directory)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show why each include was kept or skipped
    #[arg(short, long)]
    verbose: bool,

    /// Directory to check recursively; `dir/*.ext` checks one extension only
    #[arg(short = 'D', long, value_name = "DIR")]
    directory: Option<String>,

    /// Write unused includes to an XML file
    #[arg(short = 'x', long = "xml-output", value_name = "FILE")]
    xml_output: Option<PathBuf>,

    /// Print the results as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Include search directory (repeatable)
    #[arg(short = 'I', long = "include-path", value_name = "DIR")]
    include_paths: Vec<String>,

    /// Header file or directory to ignore (repeatable)
    #[arg(short = 'E', long = "exclude-path", value_name = "PATH")]
    exclude_paths: Vec<String>,

    /// Header checked against everything it includes (repeatable)
    #[arg(short = 'i', long = "interface-header", value_name = "FILE")]
    interface_headers: Vec<String>,

    /// Prefix of type aliases, e.g. `p` for `pFoo` (repeatable)
    #[arg(short = 't', long = "type-alias-prefix", value_name = "STRING")]
    type_alias_prefixes: Vec<String>,

    /// Suffix of type aliases, e.g. `Ref` for `FooRef` (repeatable)
    #[arg(short = 'T', long = "type-alias-suffix", value_name = "STRING")]
    type_alias_suffixes: Vec<String>,

    /// ctags executable
    #[arg(long, value_name = "PATH")]
    ctags: Option<PathBuf>,

    /// Print every header HEADER includes, recursively, and exit
    #[arg(long, value_name = "HEADER")]
    closure: Option<String>,
}

/// Swallows progress lines; errors still reach stderr.
struct QuietOutput;

impl CheckOutput for QuietOutput {
    fn line(&mut self, _text: &str) {}

    fn error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

/// Configuration file settings with command-line values appended.
fn load_settings(cli: &Cli) -> Result<CheckSettings> {
    let mut settings = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("could not read configuration file {}", path.display()))?
            .into_settings(),
        None => load_default_config(Path::new("."))
            .context("could not read deadinc.toml")?
            .map(DeadincConfig::into_settings)
            .unwrap_or_default(),
    };

    for path in &cli.exclude_paths {
        if !Path::new(path).exists() {
            bail!("exclude path {} does not exist!", path);
        }
    }

    settings.merge(CheckSettings {
        include_paths: cli.include_paths.clone(),
        exclude_paths: cli.exclude_paths.clone(),
        interface_headers: cli.interface_headers.clone(),
        type_alias_prefixes: cli.type_alias_prefixes.clone(),
        type_alias_suffixes: cli.type_alias_suffixes.clone(),
        ignore_rules: Vec::new(),
        ctags_path: cli.ctags.clone(),
        verbose: cli.verbose,
    });
    Ok(settings)
}

/// Positional files must exist; without files a directory is required.
fn validate_targets(cli: &Cli) -> Result<()> {
    if cli.files.is_empty() && cli.directory.is_none() {
        bail!("no file or directory specified.");
    }
    for path in &cli.files {
        if path.is_file() {
            continue;
        }
        if path.is_dir() {
            bail!(
                "{} is not a file. Please use --directory or -D (this will allow wildcards).",
                path.display()
            );
        }
        bail!("{} is not a file.", path.display());
    }
    Ok(())
}

fn print_closure(settings: &CheckSettings, header: &str) -> Result<()> {
    let header = std::path::absolute(header)
        .with_context(|| format!("Failed to resolve {}", header))?
        .to_string_lossy()
        .into_owned();

    let resolver = IncludeResolver::new(settings.include_paths.clone());
    let mut cache = IncludeRecursionCache::new();
    let mut closure: Vec<String> = include_closure(&resolver, &header, &mut cache).into_iter().collect();
    closure.sort();

    for path in &closure {
        println!("{}", path);
    }
    println!("{} headers included by {}", closure.len(), header);
    Ok(())
}

fn run(cli: Cli) -> Result<i32> {
    if !cli.json {
        println!("deadinc {}", env!("CARGO_PKG_VERSION"));
    }

    let settings = load_settings(&cli)?;

    if let Some(header) = &cli.closure {
        print_closure(&settings, header)?;
        return Ok(0);
    }

    validate_targets(&cli)?;

    let ctags = Ctags::new(settings.ctags_program());
    if settings.verbose && !cli.json {
        println!("    ctags path is {}", ctags.program().display());
    }

    let mut builder = Deadinc::with_settings(settings).files(cli.files.iter());
    if let Some(spec) = &cli.directory {
        builder = builder.directory(spec.as_str());
    }

    let report = if cli.json {
        let report = builder.analyze_with(&ctags, QuietOutput)?;
        print_json(&report)?;
        report
    } else {
        builder.analyze_with(&ctags, ConsoleOutput)?
    };

    if let Some(path) = &cli.xml_output {
        write_xml(&report, path)
            .with_context(|| format!("could not write XML output to {}", path.display()))?;
    }

    Ok(if report.has_findings() { 1 } else { 0 })
}

fn main() {
    let cli = Cli::parse();

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            // Extractor failures were already printed by the checker
            let reported = e
                .downcast_ref::<DeadincError>()
                .is_some_and(DeadincError::is_fatal);
            if !reported {
                eprintln!("Error: {:#}", e);
            }
            2
        }
    };
    std::process::exit(code);
}
