//! Enum declaration records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::scope::QualifiedPath;

/// A conversion an annotated enum can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    /// Enumerator to canonical string and back.
    StringSerialization,
    /// Enumerator to JSON scalar and back.
    JsonSerialization,
}

impl ConversionKind {
    /// Every conversion kind, in emission order.
    pub const ALL: [ConversionKind; 2] = [
        ConversionKind::StringSerialization,
        ConversionKind::JsonSerialization,
    ];

    /// Directive keyword selecting this conversion in an annotation block.
    pub fn keyword(&self) -> &'static str {
        match self {
            ConversionKind::StringSerialization => "string_serialization",
            ConversionKind::JsonSerialization => "json_serialization",
        }
    }

    /// Look up a conversion by directive keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Suffix that tags an override literal for this conversion (`"x"s`, `"x"json`).
    pub fn override_tag(&self) -> &'static str {
        match self {
            ConversionKind::StringSerialization => "s",
            ConversionKind::JsonSerialization => "json",
        }
    }

    /// Look up a conversion by override tag.
    pub fn from_override_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.override_tag() == tag)
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One enumerator with its effective values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumeratorRecord {
    /// Enumerator identifier.
    pub name: String,

    /// Value produced by string serialization.
    pub string_value: String,

    /// Value produced by JSON serialization.
    pub json_value: String,

    /// 1-based source line of the enumerator.
    pub line: usize,
}

impl EnumeratorRecord {
    /// Create a record whose values default to the bare name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            string_value: name.clone(),
            json_value: name.clone(),
            name,
            line: 0,
        }
    }

    /// Set the string override.
    pub fn with_string_value(mut self, value: impl Into<String>) -> Self {
        self.string_value = value.into();
        self
    }

    /// Set the JSON override.
    pub fn with_json_value(mut self, value: impl Into<String>) -> Self {
        self.json_value = value.into();
        self
    }

    /// Set the source line.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Effective value for a conversion kind.
    pub fn value(&self, kind: ConversionKind) -> &str {
        match kind {
            ConversionKind::StringSerialization => &self.string_value,
            ConversionKind::JsonSerialization => &self.json_value,
        }
    }
}

/// One annotated enum, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    /// Scope chain plus the enum's own name.
    pub qualified_path: QualifiedPath,

    /// Conversions requested by the annotation block. Never empty.
    pub requested_conversions: BTreeSet<ConversionKind>,

    /// Enumerators in declaration order. Never empty.
    pub enumerators: Vec<EnumeratorRecord>,

    /// Whether this is an `enum class` / `enum struct`.
    #[serde(default)]
    pub scoped: bool,

    /// 1-based source line of the `enum` keyword.
    #[serde(default)]
    pub line: usize,
}

impl EnumDeclaration {
    /// Create a declaration.
    pub fn new(
        qualified_path: QualifiedPath,
        requested_conversions: impl IntoIterator<Item = ConversionKind>,
        enumerators: Vec<EnumeratorRecord>,
    ) -> Self {
        Self {
            qualified_path,
            requested_conversions: requested_conversions.into_iter().collect(),
            enumerators,
            scoped: true,
            line: 0,
        }
    }

    /// Mark the enum as scoped or unscoped.
    pub fn with_scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }

    /// Set the source line.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// The enum's own (unqualified) name.
    pub fn name(&self) -> &str {
        &self.qualified_path.name
    }

    /// Whether a conversion was requested.
    pub fn requests(&self, kind: ConversionKind) -> bool {
        self.requested_conversions.contains(&kind)
    }

    /// Find an enumerator by name.
    pub fn enumerator(&self, name: &str) -> Option<&EnumeratorRecord> {
        self.enumerators.iter().find(|e| e.name == name)
    }

    /// `(enumerator name, value)` pairs for a conversion, in declaration order.
    pub fn values(&self, kind: ConversionKind) -> impl Iterator<Item = (&str, &str)> {
        self.enumerators
            .iter()
            .map(move |e| (e.name.as_str(), e.value(kind)))
    }

    /// Values that more than one enumerator maps to, with the enumerators sharing them.
    ///
    /// Reverse lookups resolve such values to the first enumerator.
    pub fn duplicate_values(&self, kind: ConversionKind) -> BTreeMap<&str, Vec<&str>> {
        let mut by_value: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, value) in self.values(kind) {
            by_value.entry(value).or_default().push(name);
        }
        by_value.retain(|_, names| names.len() > 1);
        by_value
    }
}
