//! Check settings and loading them from deadinc.toml.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::check::IgnoreRule;
use crate::error::{DeadincError, DeadincResult, IoResultExt};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "deadinc.toml";

/// Everything the checking engine reads. Never mutated during a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckSettings {
    /// Search directories for include resolution, in lookup order.
    pub include_paths: Vec<String>,
    /// Path prefixes of sources and headers to skip.
    pub exclude_paths: Vec<String>,
    /// Path suffixes of headers whose tags include everything they include.
    pub interface_headers: Vec<String>,
    pub type_alias_prefixes: Vec<String>,
    pub type_alias_suffixes: Vec<String>,
    pub ignore_rules: Vec<IgnoreRule>,
    /// Symbol extractor; `None` selects [`default_ctags_path`].
    pub ctags_path: Option<PathBuf>,
    pub verbose: bool,
}

impl CheckSettings {
    /// The extractor executable to run.
    pub fn ctags_program(&self) -> PathBuf {
        self.ctags_path.clone().unwrap_or_else(default_ctags_path)
    }

    /// Appends another settings layer; `verbose` and `ctags_path` are
    /// overridden only when set in `other`.
    pub fn merge(&mut self, other: CheckSettings) {
        self.include_paths.extend(other.include_paths);
        self.exclude_paths.extend(other.exclude_paths);
        self.interface_headers.extend(other.interface_headers);
        self.type_alias_prefixes.extend(other.type_alias_prefixes);
        self.type_alias_suffixes.extend(other.type_alias_suffixes);
        self.ignore_rules.extend(other.ignore_rules);
        if other.ctags_path.is_some() {
            self.ctags_path = other.ctags_path;
        }
        self.verbose |= other.verbose;
    }
}

/// `ctags/ctags[.exe]` next to the running executable when present,
/// otherwise plain `ctags` from `PATH`.
pub fn default_ctags_path() -> PathBuf {
    let bundled = std::env::current_exe().ok().and_then(|exe| {
        exe.parent()
            .map(|dir| dir.join("ctags").join(format!("ctags{}", std::env::consts::EXE_SUFFIX)))
    });
    match bundled {
        Some(path) if path.is_file() => path,
        _ => PathBuf::from("ctags"),
    }
}

/// Contents of deadinc.toml.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeadincConfig {
    pub verbose: Option<bool>,
    pub ctags_path: Option<PathBuf>,
    #[serde(default)]
    pub include_paths: Vec<String>,
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub interface_headers: Vec<String>,
    #[serde(default)]
    pub type_alias_prefixes: Vec<String>,
    #[serde(default)]
    pub type_alias_suffixes: Vec<String>,
    /// `[[ignore_header]]` tables.
    #[serde(default, rename = "ignore_header")]
    pub ignore_headers: Vec<IgnoreRule>,
}

impl DeadincConfig {
    /// Parses TOML text; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> DeadincResult<Self> {
        toml::from_str(content).map_err(|e| DeadincError::config(path, e.to_string()))
    }

    /// Anchors relative include, exclude and interface header entries at
    /// `base`.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        for list in [
            &mut self.include_paths,
            &mut self.exclude_paths,
            &mut self.interface_headers,
        ] {
            for entry in list.iter_mut() {
                if Path::new(entry.as_str()).is_relative() {
                    *entry = base.join(entry.as_str()).to_string_lossy().into_owned();
                }
            }
        }
        self
    }

    pub fn into_settings(self) -> CheckSettings {
        CheckSettings {
            include_paths: self.include_paths,
            exclude_paths: self.exclude_paths,
            interface_headers: self.interface_headers,
            type_alias_prefixes: self.type_alias_prefixes,
            type_alias_suffixes: self.type_alias_suffixes,
            ignore_rules: self.ignore_headers,
            ctags_path: self.ctags_path,
            verbose: self.verbose.unwrap_or(false),
        }
    }
}

/// Loads a configuration file, resolving relative paths against its
/// directory.
pub fn load_config(path: &Path) -> DeadincResult<DeadincConfig> {
    if !path.is_file() {
        return Err(DeadincError::config(path, "configuration file does not exist"));
    }

    let content = fs::read_to_string(path).with_path(path)?;
    let cfg = DeadincConfig::parse(&content, path)?;

    let absolute = std::path::absolute(path).with_path(path)?;
    let base = absolute.parent().unwrap_or(Path::new(""));
    Ok(cfg.resolve_relative_to(base))
}

/// Loads deadinc.toml from `dir` if it exists.
pub fn load_default_config(dir: &Path) -> DeadincResult<Option<DeadincConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_config(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadinc_config_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SAMPLE: &str = r#"
verbose = true
ctags_path = "tools/ctags"
include_paths = ["include"]
exclude_paths = ["third_party"]
interface_headers = ["Cars.h"]
type_alias_prefixes = ["r", "rc", "p"]
type_alias_suffixes = ["Ref", "Quad"]

[[ignore_header]]
header = "pragmas.h"

[[ignore_header]]
source = "legacy.cpp"
header = "stdafx.h"
"#;

    #[test]
    fn test_parse_sample() {
        let cfg = DeadincConfig::parse(SAMPLE, Path::new("deadinc.toml")).unwrap();
        assert_eq!(cfg.verbose, Some(true));
        assert_eq!(cfg.ctags_path, Some(PathBuf::from("tools/ctags")));
        assert_eq!(cfg.type_alias_prefixes, vec!["r", "rc", "p"]);
        assert_eq!(
            cfg.ignore_headers,
            vec![
                IgnoreRule::any_source("pragmas.h"),
                IgnoreRule::for_source("legacy.cpp", "stdafx.h"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_default() {
        let cfg = DeadincConfig::parse("", Path::new("deadinc.toml")).unwrap();
        assert_eq!(cfg, DeadincConfig::default());
        assert!(!cfg.into_settings().verbose);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = DeadincConfig::parse("includes = []", Path::new("/p/deadinc.toml")).unwrap_err();
        assert!(matches!(err, DeadincError::Config { .. }));
    }

    #[test]
    fn test_ignore_header_requires_header() {
        let err = DeadincConfig::parse("[[ignore_header]]\nsource = \"a.cpp\"\n", Path::new("deadinc.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn test_relative_entries_anchor_at_config_dir() {
        let dir = create_temp_dir("relative");
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();

        let settings = load_config(&path).unwrap().into_settings();
        let base = std::path::absolute(&dir).unwrap();
        assert_eq!(settings.include_paths, vec![base.join("include").to_string_lossy().into_owned()]);
        assert_eq!(settings.exclude_paths, vec![base.join("third_party").to_string_lossy().into_owned()]);
        assert_eq!(settings.interface_headers, vec![base.join("Cars.h").to_string_lossy().into_owned()]);
        // Taken verbatim.
        assert_eq!(settings.type_alias_suffixes, vec!["Ref", "Quad"]);
        assert_eq!(settings.ctags_path, Some(PathBuf::from("tools/ctags")));

        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_entries_kept() {
        let cfg = DeadincConfig::parse(r#"include_paths = ["/opt/sdk/include"]"#, Path::new("x.toml"))
            .unwrap()
            .resolve_relative_to(Path::new("/work"));
        assert_eq!(cfg.include_paths, vec!["/opt/sdk/include"]);
    }

    #[test]
    fn test_load_default_config_missing() {
        let dir = create_temp_dir("missing");
        assert!(load_default_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let err = load_config(Path::new("/nonexistent/deadinc.toml")).unwrap_err();
        assert!(matches!(err, DeadincError::Config { .. }));
    }

    #[test]
    fn test_merge_appends_and_overrides() {
        let mut base = CheckSettings {
            include_paths: vec!["/a".into()],
            ctags_path: Some(PathBuf::from("/cfg/ctags")),
            ..Default::default()
        };
        base.merge(CheckSettings {
            include_paths: vec!["/b".into()],
            verbose: true,
            ..Default::default()
        });
        assert_eq!(base.include_paths, vec!["/a", "/b"]);
        assert_eq!(base.ctags_path, Some(PathBuf::from("/cfg/ctags")));
        assert!(base.verbose);
    }

    #[test]
    fn test_ctags_program_prefers_configured() {
        let settings = CheckSettings {
            ctags_path: Some(PathBuf::from("/usr/local/bin/ctags")),
            ..Default::default()
        };
        assert_eq!(settings.ctags_program(), PathBuf::from("/usr/local/bin/ctags"));
    }
}
