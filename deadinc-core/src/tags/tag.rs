//! Typed symbol tags parsed from ctags cross-reference (`-x`) output.

use std::collections::HashSet;
use std::fmt;

/// Kind of a symbol declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TagKind {
    #[default]
    Unknown,
    Class,
    Enum,
    Enumerator,
    Macro,
    Member,
    Namespace,
    Typedef,
    Struct,
    Function,
    Prototype,
    ExternVar,
    Var,
}

impl TagKind {
    /// Maps a ctags kind keyword; anything unrecognised is `Unknown`.
    pub fn from_ctags(keyword: &str) -> Self {
        match keyword {
            "class" => Self::Class,
            "typedef" => Self::Typedef,
            "struct" => Self::Struct,
            "macro" => Self::Macro,
            "enum" => Self::Enum,
            "enumerator" => Self::Enumerator,
            "function" => Self::Function,
            "member" => Self::Member,
            "namespace" => Self::Namespace,
            "prototype" => Self::Prototype,
            "externvar" => Self::ExternVar,
            "variable" => Self::Var,
            _ => Self::Unknown,
        }
    }

    /// The ctags keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Macro => "macro",
            Self::Member => "member",
            Self::Namespace => "namespace",
            Self::Typedef => "typedef",
            Self::Struct => "struct",
            Self::Function => "function",
            Self::Prototype => "prototype",
            Self::ExternVar => "externvar",
            Self::Var => "variable",
        }
    }

    /// Class and struct names are also matched through type alias
    /// prefixes and suffixes.
    pub fn has_type_aliases(&self) -> bool {
        matches!(self, Self::Class | Self::Struct)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, kinded symbol declared by a header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
}

impl Tag {
    pub fn new(kind: TagKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Parses one line of `ctags -x` output: `NAME KIND LINE FILE TEXT`.
///
/// Columns are padded with runs of spaces, so the kind is the first
/// non-empty token after the name.
pub fn parse_line(line: &str) -> Tag {
    let mut parts = line.split(' ');
    let name = parts.next().unwrap_or_default();
    let kind = parts.find(|part| !part.is_empty()).unwrap_or_default();
    Tag::new(TagKind::from_ctags(kind), name)
}

/// Parses full ctags output, dropping lines of unknown kind.
pub fn parse_output(output: &str) -> HashSet<Tag> {
    output
        .split('\n')
        .map(|line| parse_line(line.trim_end_matches('\r')))
        .filter(|tag| tag.kind != TagKind::Unknown)
        .collect()
}
