//! Deciding whether stripped source text uses anything a header declares.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use regex::{Regex, RegexSet};

use crate::tags::Tag;

/// Alias spellings of a type name, bare name first.
///
/// Order: `name`, every `prefix+name`, every `name+suffix`, then every
/// `prefix+name+suffix` (prefix-major).
pub fn name_variations(name: &str, prefixes: &[String], suffixes: &[String]) -> Vec<String> {
    let mut variations = Vec::with_capacity(1 + prefixes.len() + suffixes.len() * (1 + prefixes.len()));
    variations.push(name.to_string());
    variations.extend(prefixes.iter().map(|prefix| format!("{}{}", prefix, name)));
    variations.extend(suffixes.iter().map(|suffix| format!("{}{}", name, suffix)));
    for prefix in prefixes {
        variations.extend(suffixes.iter().map(|suffix| format!("{}{}{}", prefix, name, suffix)));
    }
    variations
}

/// Case-sensitive whole-word search. Regex metacharacters in `word` are
/// matched literally.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    match Regex::new(&format!(r"\b{}\b", regex::escape(word))) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            tracing::warn!(word = %word, error = %e, "could not build word pattern");
            false
        }
    }
}

/// What made an include count as used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageEvidence {
    /// A declared symbol appears by name.
    Tag(Tag),
    /// A class or struct appears through an alias spelling.
    Alias { tag: Tag, alias: String },
    /// The header's file name without extension appears.
    Basename(String),
}

impl fmt::Display for UsageEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "tag {}", tag.name),
            Self::Alias { tag, alias } => write!(f, "alias {} of tag {}", alias, tag.name),
            Self::Basename(name) => write!(f, "string {}", name),
        }
    }
}

/// Compiled whole-word search for one header.
///
/// Candidate words are kept in evidence order: tags by name, each tag's
/// alias spellings right after it (classes and structs only), the header's
/// basename last. All of them are matched in one pass; the lowest matching
/// candidate wins.
#[derive(Debug, Clone)]
pub struct UsageMatcher {
    candidates: Vec<(String, UsageEvidence)>,
    set: Option<RegexSet>,
}

impl UsageMatcher {
    pub fn new(header: &str, tags: &HashSet<Tag>, prefixes: &[String], suffixes: &[String]) -> Self {
        let mut ordered: Vec<&Tag> = tags.iter().collect();
        ordered.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.kind.as_str().cmp(b.kind.as_str())));

        let mut candidates = Vec::new();
        for tag in ordered {
            candidates.push((tag.name.clone(), UsageEvidence::Tag(tag.clone())));
            if tag.kind.has_type_aliases() {
                for alias in name_variations(&tag.name, prefixes, suffixes).into_iter().skip(1) {
                    let evidence = UsageEvidence::Alias {
                        tag: tag.clone(),
                        alias: alias.clone(),
                    };
                    candidates.push((alias, evidence));
                }
            }
        }

        let basename = Path::new(header)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        candidates.push((basename.clone(), UsageEvidence::Basename(basename)));
        candidates.retain(|(word, _)| !word.is_empty());

        let patterns = candidates
            .iter()
            .map(|(word, _)| format!(r"\b{}\b", regex::escape(word)));
        let set = match RegexSet::new(patterns) {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::debug!(header = %header, error = %e, "falling back to per-word matching");
                None
            }
        };

        Self { candidates, set }
    }

    /// Number of candidate words.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The first candidate, in evidence order, that occurs in `text`.
    pub fn find(&self, text: &str) -> Option<UsageEvidence> {
        let index = match &self.set {
            Some(set) => set.matches(text).iter().next(),
            None => self.candidates.iter().position(|(word, _)| contains_word(text, word)),
        };
        index.map(|i| self.candidates[i].1.clone())
    }
}

/// Searches `text` for any use of `header`, given the tags it declares.
///
/// Tags are tried in name order so the reported evidence is stable. For
/// each tag the plain name comes first, then (for classes and structs) its
/// alias spellings. The header's basename is the last resort.
pub fn find_usage(
    text: &str,
    header: &str,
    tags: &HashSet<Tag>,
    prefixes: &[String],
    suffixes: &[String],
) -> Option<UsageEvidence> {
    UsageMatcher::new(header, tags, prefixes, suffixes).find(text)
}
