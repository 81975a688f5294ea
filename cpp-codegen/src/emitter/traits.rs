//! Emitter trait definition.
//!
//! Each [`ConversionKind`] is rendered by one [`ConversionEmitter`]. Emitters
//! only see the declaration model; they never look at source text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::ir::{ConversionKind, EnumDeclaration};

/// Trait for conversion emitters.
///
/// # Example
///
/// ```rust
/// use cpp_codegen::{ConversionEmitter, ConversionKind, EmitConfig, EnumDeclaration, GeneratedUnit, GeneratorError};
///
/// struct CountEmitter;
///
/// impl ConversionEmitter for CountEmitter {
///     fn kind(&self) -> ConversionKind { ConversionKind::StringSerialization }
///     fn name(&self) -> &'static str { "enumerator count" }
///
///     fn emit(&self, decl: &EnumDeclaration, _config: &EmitConfig) -> Result<GeneratedUnit, GeneratorError> {
///         let header = format!("// {} values\n", decl.enumerators.len());
///         Ok(GeneratedUnit::new(self.kind()).with_header(header))
///     }
/// }
/// ```
pub trait ConversionEmitter: Send + Sync {
    /// The conversion this emitter renders.
    fn kind(&self) -> ConversionKind;

    /// Human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Render the unit for one declaration.
    ///
    /// Fails when the declaration did not request [`kind`](Self::kind) or
    /// has nothing to map.
    fn emit(
        &self,
        decl: &EnumDeclaration,
        config: &EmitConfig,
    ) -> Result<GeneratedUnit, GeneratorError>;
}

/// Emitter configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitConfig {
    /// Indentation style
    #[serde(default)]
    pub indent: IndentStyle,
}

impl EmitConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Indentation for `depth` levels.
    pub fn indent(&self, depth: usize) -> String {
        self.indent.indent(depth)
    }
}

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// 2 spaces
    Spaces2,

    /// 4 spaces
    #[default]
    Spaces4,

    /// Tabs
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Create an indentation string for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Output of one emitter for one declaration.
///
/// `header` holds declarations and `source` the matching definitions. Both
/// are written at namespace level; [`render_files`](super::render_files)
/// wraps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Conversion that produced this unit.
    pub kind: ConversionKind,

    /// Header fragment.
    pub header: String,

    /// Source fragment.
    pub source: String,

    /// `#include` targets needed by the header, e.g. `<string_view>`.
    pub header_includes: BTreeSet<String>,

    /// `#include` targets needed by the source only.
    pub source_includes: BTreeSet<String>,
}

impl GeneratedUnit {
    /// Create an empty unit.
    pub fn new(kind: ConversionKind) -> Self {
        Self {
            kind,
            header: String::new(),
            source: String::new(),
            header_includes: BTreeSet::new(),
            source_includes: BTreeSet::new(),
        }
    }

    /// Set the header fragment.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the source fragment.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Add a header include.
    pub fn with_header_include(mut self, include: impl Into<String>) -> Self {
        self.header_includes.insert(include.into());
        self
    }

    /// Add a source include.
    pub fn with_source_include(mut self, include: impl Into<String>) -> Self {
        self.source_includes.insert(include.into());
        self
    }
}
