//! The include checker: per-source state machine and header tag cache.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Serialize;

use super::rules::{is_header_ignored, is_interface_header, is_source_excluded};
use super::usage::UsageMatcher;
use super::CheckOutput;
use crate::config::CheckSettings;
use crate::error::DeadincResult;
use crate::include::{self, Include, IncludeLister, IncludeRecursionCache, IncludeResolver};
use crate::logging::{log_error, log_info, log_warn};
use crate::strip::strip;
use crate::tags::{Tag, TagSource};

/// One include whose header looks unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedHeaderResult {
    #[serde(rename = "source")]
    pub source_file: String,
    #[serde(rename = "line")]
    pub source_line: usize,
    #[serde(rename = "header")]
    pub header_file: String,
}

/// Totals and findings of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub unused_headers: usize,
    pub warnings: usize,
    pub results: Vec<UnusedHeaderResult>,
}

impl CheckReport {
    pub fn has_findings(&self) -> bool {
        !self.results.is_empty()
    }
}

/// How the state machine left a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Under an exclude path.
    Excluded,
    /// Interface headers are never checked as sources.
    InterfaceHeader,
    NotFound,
    Unreadable,
    Checked { includes: usize, unused: usize },
}

/// Tags per header path, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct HeaderTagCache {
    entries: HashMap<String, HashSet<Tag>>,
}

impl HeaderTagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&HashSet<Tag>> {
        self.entries.get(&header.to_lowercase())
    }

    pub fn insert(&mut self, header: &str, tags: HashSet<Tag>) {
        self.entries.insert(header.to_lowercase(), tags);
    }

    pub fn contains(&self, header: &str) -> bool {
        self.entries.contains_key(&header.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An interface header whose includes are still being expanded.
struct InterfaceFrame {
    header: String,
    union: HashSet<Tag>,
    children: std::vec::IntoIter<Include>,
}

/// Checks source files for unused includes.
///
/// Owns all run-scoped state: both caches, the findings and the counters.
/// Two checkers never share a cache.
pub struct IncludeChecker<S, O> {
    settings: CheckSettings,
    resolver: IncludeResolver,
    tag_source: S,
    output: O,
    tag_cache: HeaderTagCache,
    recursion_cache: IncludeRecursionCache,
    matchers: HashMap<String, UsageMatcher>,
    results: Vec<UnusedHeaderResult>,
    warnings: usize,
}

impl<S: TagSource, O: CheckOutput> IncludeChecker<S, O> {
    pub fn new(settings: CheckSettings, tag_source: S, output: O) -> Self {
        let resolver = IncludeResolver::new(settings.include_paths.clone());
        Self {
            settings,
            resolver,
            tag_source,
            output,
            tag_cache: HeaderTagCache::new(),
            recursion_cache: IncludeRecursionCache::new(),
            matchers: HashMap::new(),
            results: Vec::new(),
            warnings: 0,
        }
    }

    /// Starts the warning counter at `warnings` (raised before the run,
    /// e.g. for missing include directories).
    pub fn with_initial_warnings(mut self, warnings: usize) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn results(&self) -> &[UnusedHeaderResult] {
        &self.results
    }

    pub fn unused_headers(&self) -> usize {
        self.results.len()
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn tag_cache(&self) -> &HeaderTagCache {
        &self.tag_cache
    }

    pub fn into_report(self) -> CheckReport {
        CheckReport {
            unused_headers: self.results.len(),
            warnings: self.warnings,
            results: self.results,
        }
    }

    /// Checks every file in order, then prints the summary line.
    ///
    /// Stops at the first extractor failure, which is reported through
    /// [`CheckOutput::error`] before being returned.
    pub fn check_files<P: AsRef<str>>(&mut self, files: &[P]) -> DeadincResult<()> {
        for file in files {
            if let Err(e) = self.check_file(file.as_ref()) {
                let message = format!("Error: {}", e);
                log_error(&message);
                self.output.error(&message);
                return Err(e);
            }
        }
        let summary = format!("{} unused headers, {} warnings", self.results.len(), self.warnings);
        log_info(&summary);
        self.output.line(&summary);
        Ok(())
    }

    pub fn check_file(&mut self, path: &str) -> DeadincResult<FileOutcome> {
        self.output.line(&format!("Processing file {}", path));

        if is_source_excluded(path, &self.settings.exclude_paths) {
            self.verbose("  ignored because of exclude path");
            return Ok(FileOutcome::Excluded);
        }
        if is_interface_header(path, &self.settings.interface_headers) {
            self.verbose("  ignored because of interface header");
            return Ok(FileOutcome::InterfaceHeader);
        }
        if !Path::new(path).is_file() {
            self.warn(format!("Warning: file {} doesn't exist!", path));
            return Ok(FileOutcome::NotFound);
        }

        let raw = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                self.warn(format!("Warning: could not read file {}: {}", path, e));
                return Ok(FileOutcome::Unreadable);
            }
        };
        let stripped = strip(&raw);
        let includes = self.resolver.includes_in_text(path, &raw);

        let before = self.results.len();
        for include in &includes {
            self.check_include(path, &stripped, include)?;
        }

        Ok(FileOutcome::Checked {
            includes: includes.len(),
            unused: self.results.len() - before,
        })
    }

    /// Headers recursively included by `header`, sharing this run's
    /// recursion cache.
    pub fn include_closure(&mut self, header: &str) -> HashSet<String> {
        include::include_closure(&self.resolver, header, &mut self.recursion_cache)
    }

    fn check_include(&mut self, source: &str, stripped: &str, include: &Include) -> DeadincResult<()> {
        self.verbose(&format!("  found include {}", include.path));

        let lowered = include.path.to_lowercase();
        if lowered.ends_with(".inl") || lowered.ends_with(".cpp") {
            self.verbose("    skipping (ignoring .inl and .cpp)");
            return Ok(());
        }

        if is_header_ignored(
            source,
            &include.path,
            &self.settings.exclude_paths,
            &self.settings.ignore_rules,
        ) {
            self.verbose("    ignored");
            return Ok(());
        }

        if !Path::new(&include.path).is_file() {
            self.warn(format!(
                "{}({}): Warning: header {} not found",
                source, include.line, include.path
            ));
            return Ok(());
        }

        let evidence = self.usage_matcher(&include.path)?.find(stripped);

        match evidence {
            Some(evidence) => {
                self.verbose(&format!("    found {} from header {}", evidence, include.path));
            }
            None => {
                self.verbose("    no tags found");
                self.output.line(&format!(
                    "{}({}): nothing declared in {} seems to be used.",
                    source, include.line, include.path
                ));
                self.results.push(UnusedHeaderResult {
                    source_file: source.to_string(),
                    source_line: include.line,
                    header_file: include.path.clone(),
                });
            }
        }
        Ok(())
    }

    /// The compiled usage search for `header`, built once per run.
    fn usage_matcher(&mut self, header: &str) -> DeadincResult<&UsageMatcher> {
        let key = header.to_lowercase();
        if !self.matchers.contains_key(&key) {
            let tags = self.header_tags(header)?;
            let matcher = UsageMatcher::new(
                header,
                &tags,
                &self.settings.type_alias_prefixes,
                &self.settings.type_alias_suffixes,
            );
            self.matchers.insert(key.clone(), matcher);
        }
        Ok(&self.matchers[&key])
    }

    /// Tags attributed to an include of `header`, cached per header.
    fn header_tags(&mut self, header: &str) -> DeadincResult<HashSet<Tag>> {
        if let Some(cached) = self.tag_cache.get(header) {
            tracing::debug!(header = %header, "tag cache hit");
            return Ok(cached.clone());
        }

        if is_interface_header(header, &self.settings.interface_headers) {
            self.interface_tags(header)
        } else {
            self.direct_tags(header)
        }
    }

    /// Tags declared in `header` itself, cached.
    fn direct_tags(&mut self, header: &str) -> DeadincResult<HashSet<Tag>> {
        if let Some(cached) = self.tag_cache.get(header) {
            return Ok(cached.clone());
        }
        let tags = self.tag_source.tags_for_file(Path::new(header))?;
        self.tag_cache.insert(header, tags.clone());
        Ok(tags)
    }

    /// Runs the extractor on an interface header and caches its own tags
    /// before any of its includes are looked at.
    fn open_interface(&mut self, header: &str) -> DeadincResult<InterfaceFrame> {
        let direct = self.tag_source.tags_for_file(Path::new(header))?;
        self.tag_cache.insert(header, direct.clone());
        Ok(InterfaceFrame {
            header: header.to_string(),
            union: direct,
            children: self.resolver.direct_includes(header).into_iter(),
        })
    }

    /// Union of an interface header's own tags and the tags of everything
    /// it includes, each include resolved the same way as `header_tags`.
    ///
    /// Nested interface headers get their own frame on the work stack and
    /// their finished union is cached when the frame closes. While a frame
    /// is open the cache holds that header's direct tags, so an include
    /// cycle back to it picks up only those.
    fn interface_tags(&mut self, header: &str) -> DeadincResult<HashSet<Tag>> {
        let mut stack = vec![self.open_interface(header)?];
        let mut finished = HashSet::new();

        while let Some(frame) = stack.last_mut() {
            match frame.children.next() {
                Some(child) => {
                    if !Path::new(&child.path).is_file() {
                        tracing::debug!(header = %frame.header, include = %child.path, "skipping missing include");
                        continue;
                    }
                    if let Some(cached) = self.tag_cache.get(&child.path) {
                        frame.union.extend(cached.iter().cloned());
                    } else if is_interface_header(&child.path, &self.settings.interface_headers) {
                        let nested = self.open_interface(&child.path)?;
                        stack.push(nested);
                    } else {
                        let tags = self.direct_tags(&child.path)?;
                        frame.union.extend(tags);
                    }
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    self.tag_cache.insert(&done.header, done.union.clone());
                    match stack.last_mut() {
                        Some(parent) => parent.union.extend(done.union),
                        None => finished = done.union,
                    }
                }
            }
        }

        Ok(finished)
    }

    fn verbose(&mut self, text: &str) {
        tracing::debug!(detail = %text.trim_start());
        if self.settings.verbose {
            self.output.line(text);
        }
    }

    fn warn(&mut self, text: String) {
        log_warn(&text);
        self.output.line(&text);
        self.warnings += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::BufferedOutput;
    use crate::error::DeadincError;
    use crate::tags::TagKind;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadinc_engine_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    /// Canned tags per file name; records every extractor call.
    #[derive(Default)]
    struct FakeTags {
        tags: HashMap<String, Vec<Tag>>,
        failing: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeTags {
        fn with(mut self, file: &str, tags: &[(TagKind, &str)]) -> Self {
            self.tags.insert(
                file.to_string(),
                tags.iter().map(|(kind, name)| Tag::new(*kind, *name)).collect(),
            );
            self
        }

        fn failing(mut self, file: &str) -> Self {
            self.failing.insert(file.to_string());
            self
        }

        fn call_count(&self, file: &str) -> usize {
            self.calls.borrow().iter().filter(|f| f.as_str() == file).count()
        }
    }

    impl TagSource for FakeTags {
        fn tags_for_file(&self, path: &Path) -> DeadincResult<HashSet<Tag>> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.calls.borrow_mut().push(name.clone());
            if self.failing.contains(&name) {
                return Err(DeadincError::extractor(path, "boom"));
            }
            Ok(self.tags.get(&name).cloned().unwrap_or_default().into_iter().collect())
        }
    }

    fn settings(dir: &Path) -> CheckSettings {
        CheckSettings {
            include_paths: vec![dir.to_string_lossy().into_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn test_unused_header_reported() {
        let dir = create_temp_dir("unused");
        write(&dir, "used.h", "struct Foo {};");
        let unused = write(&dir, "unused.h", "struct Bar {};");
        let main = write(&dir, "main.cpp", "#include \"used.h\"\n#include \"unused.h\"\nFoo f;\n");

        let tags = FakeTags::default()
            .with("used.h", &[(TagKind::Struct, "Foo")])
            .with("unused.h", &[(TagKind::Struct, "Bar")]);
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());

        let outcome = checker.check_file(&main).unwrap();
        assert_eq!(outcome, FileOutcome::Checked { includes: 2, unused: 1 });
        assert_eq!(
            checker.results(),
            &[UnusedHeaderResult {
                source_file: main.clone(),
                source_line: 2,
                header_file: unused.clone(),
            }]
        );
        assert!(checker
            .output()
            .lines
            .contains(&format!("{}(2): nothing declared in {} seems to be used.", main, unused)));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_progress_line_first_and_summary_last() {
        let dir = create_temp_dir("summary");
        let missing = dir.join("gone.cpp").to_string_lossy().into_owned();

        let tags = FakeTags::default();
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default())
            .with_initial_warnings(2);
        checker.check_files(&[missing.clone()]).unwrap();

        let lines = &checker.output().lines;
        assert_eq!(lines[0], format!("Processing file {}", missing));
        assert_eq!(lines[1], format!("Warning: file {} doesn't exist!", missing));
        assert_eq!(lines.last().unwrap(), "0 unused headers, 3 warnings");
        assert_eq!(checker.warnings(), 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_inl_and_cpp_includes_skipped() {
        let dir = create_temp_dir("inl");
        write(&dir, "impl.INL", "");
        write(&dir, "other.cpp", "");
        let main = write(&dir, "main.cpp", "#include \"impl.INL\"\n#include \"other.cpp\"\n");

        let tags = FakeTags::default();
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        checker.check_file(&main).unwrap();

        assert!(checker.results().is_empty());
        assert!(tags.calls.borrow().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_header_warns() {
        let dir = create_temp_dir("missing_header");
        let main = write(&dir, "main.cpp", "#include \"nowhere.h\"\n");

        let tags = FakeTags::default();
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        checker.check_file(&main).unwrap();

        assert!(checker.results().is_empty());
        assert_eq!(checker.warnings(), 1);
        assert!(checker
            .output()
            .lines
            .contains(&format!("{}(1): Warning: header nowhere.h not found", main)));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_header_silent_when_ignored() {
        let dir = create_temp_dir("missing_ignored");
        let main = write(&dir, "main.cpp", "#include <malloc.h>\n");

        let mut s = settings(&dir);
        s.ignore_rules.push(crate::check::IgnoreRule::any_source("malloc.h"));
        let tags = FakeTags::default();
        let mut checker = IncludeChecker::new(s, &tags, BufferedOutput::default());
        checker.check_file(&main).unwrap();

        assert_eq!(checker.warnings(), 0);
        assert!(checker.results().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_tags_cached_per_header_case_insensitive() {
        let dir = create_temp_dir("cache");
        write(&dir, "shared.h", "");
        let a = write(&dir, "a.cpp", "#include \"shared.h\"\n");
        let b = write(&dir, "b.cpp", "#include \"shared.h\"\n");

        let tags = FakeTags::default().with("shared.h", &[(TagKind::Function, "helper")]);
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        checker.check_files(&[a, b]).unwrap();

        assert_eq!(tags.call_count("shared.h"), 1);
        assert_eq!(checker.unused_headers(), 2);
        let header = dir.join("shared.h").to_string_lossy().to_uppercase();
        assert!(checker.tag_cache().contains(&header));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_extractor_failure_aborts_run() {
        let dir = create_temp_dir("fatal");
        write(&dir, "bad.h", "");
        write(&dir, "good.h", "");
        let first = write(&dir, "first.cpp", "#include \"bad.h\"\n");
        let second = write(&dir, "second.cpp", "#include \"good.h\"\n");

        let tags = FakeTags::default().failing("bad.h");
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        let err = checker.check_files(&[first, second.clone()]).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(checker.output().errors.len(), 1);
        assert!(checker.output().errors[0].starts_with("Error: ctags failed on"));
        assert_eq!(tags.call_count("good.h"), 0);
        assert!(!checker
            .output()
            .lines
            .contains(&format!("Processing file {}", second)));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_interface_header_cycle_terminates() {
        let dir = create_temp_dir("iface_cycle");
        write(&dir, "Api.h", "#include \"Impl.h\"\n");
        write(&dir, "Impl.h", "#include \"Api.h\"\n");
        let main = write(&dir, "main.cpp", "#include \"Api.h\"\nWidget w;\n");

        let mut s = settings(&dir);
        s.interface_headers.push("Api.h".into());
        s.interface_headers.push("Impl.h".into());
        let tags = FakeTags::default()
            .with("Api.h", &[(TagKind::Macro, "API_VERSION")])
            .with("Impl.h", &[(TagKind::Class, "Widget")]);
        let mut checker = IncludeChecker::new(s, &tags, BufferedOutput::default());
        checker.check_file(&main).unwrap();

        assert!(checker.results().is_empty());
        assert_eq!(tags.call_count("Api.h"), 1);
        assert_eq!(tags.call_count("Impl.h"), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_nested_interface_header_extracted_once() {
        let dir = create_temp_dir("iface_nested");
        write(&dir, "X.h", "#include \"Y.h\"\n");
        let y = write(&dir, "Y.h", "#include \"Z.h\"\n");
        write(&dir, "Z.h", "");
        let a = write(&dir, "a.cpp", "#include \"X.h\"\nZM;\n");
        let b = write(&dir, "b.cpp", "#include \"Y.h\"\nZM;\n");

        let mut s = settings(&dir);
        s.interface_headers = vec!["X.h".into(), "Y.h".into()];
        let tags = FakeTags::default()
            .with("X.h", &[(TagKind::Macro, "XM")])
            .with("Y.h", &[(TagKind::Macro, "YM")])
            .with("Z.h", &[(TagKind::Macro, "ZM")]);
        let mut checker = IncludeChecker::new(s, &tags, BufferedOutput::default());
        checker.check_files(&[a, b]).unwrap();

        assert!(checker.results().is_empty());
        assert_eq!(*tags.calls.borrow(), vec!["X.h", "Y.h", "Z.h"]);
        assert_eq!(
            checker.tag_cache().get(&y),
            Some(&HashSet::from([Tag::new(TagKind::Macro, "YM"), Tag::new(TagKind::Macro, "ZM")]))
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_interface_cycle_sees_partial_tags() {
        let dir = create_temp_dir("iface_partial");
        write(&dir, "X.h", "#include \"Y.h\"\n#include \"W.h\"\n");
        let y = write(&dir, "Y.h", "#include \"X.h\"\n");
        write(&dir, "W.h", "");
        let a = write(&dir, "a.cpp", "#include \"X.h\"\nwf();\n");
        let b = write(&dir, "b.cpp", "#include \"Y.h\"\nwf();\n");

        let mut s = settings(&dir);
        s.interface_headers = vec!["X.h".into(), "Y.h".into()];
        let tags = FakeTags::default()
            .with("X.h", &[(TagKind::Macro, "XM")])
            .with("Y.h", &[(TagKind::Macro, "YM")])
            .with("W.h", &[(TagKind::Function, "wf")]);
        let mut checker = IncludeChecker::new(s, &tags, BufferedOutput::default());
        checker.check_files(&[a, b.clone()]).unwrap();

        assert_eq!(
            checker.tag_cache().get(&y),
            Some(&HashSet::from([Tag::new(TagKind::Macro, "YM"), Tag::new(TagKind::Macro, "XM")]))
        );
        assert_eq!(
            checker.results(),
            &[UnusedHeaderResult {
                source_file: b,
                source_line: 1,
                header_file: y,
            }]
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_verbose_lines_only_when_enabled() {
        let dir = create_temp_dir("verbose");
        write(&dir, "a.h", "");
        let main = write(&dir, "main.cpp", "#include \"a.h\"\nA x;\n");
        let tags = FakeTags::default().with("a.h", &[(TagKind::Class, "A")]);

        let mut quiet = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        quiet.check_file(&main).unwrap();
        assert_eq!(quiet.output().lines.len(), 1);

        let mut s = settings(&dir);
        s.verbose = true;
        let mut loud = IncludeChecker::new(s, &tags, BufferedOutput::default());
        loud.check_file(&main).unwrap();
        let header = dir.join("a.h").to_string_lossy().into_owned();
        assert!(loud.output().lines.contains(&format!("  found include {}", header)));
        assert!(loud
            .output()
            .lines
            .contains(&format!("    found tag A from header {}", header)));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_include_closure_uses_run_cache() {
        let dir = create_temp_dir("closure");
        let top = write(&dir, "top.h", "#include \"mid.h\"\n");
        let mid = write(&dir, "mid.h", "#include \"leaf.h\"\n");
        let leaf = write(&dir, "leaf.h", "");

        let tags = FakeTags::default();
        let mut checker = IncludeChecker::new(settings(&dir), &tags, BufferedOutput::default());
        let closure = checker.include_closure(&top);

        assert_eq!(closure, HashSet::from([mid, leaf]));

        fs::remove_dir_all(&dir).ok();
    }
}
