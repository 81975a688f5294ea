//! Output file assembly.
//!
//! One declaration becomes one header/source pair. The header includes the
//! original header, so the generated functions see the enum definition.

use std::path::PathBuf;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use super::cpp::function_namespace;
use super::traits::GeneratedUnit;
use crate::ir::EnumDeclaration;

/// First words of every generated file.
pub const GENERATED_BANNER: &str = "// Generated by cpp-codegen";

/// Which name a generated file is named after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileNaming {
    /// The enum's own name: `color.hpp`.
    #[default]
    Short,
    /// The whole qualified path joined by `_`: `app_ui_color.hpp`.
    Qualified,
}

/// Case applied to file stems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCase {
    /// Keep identifiers as written.
    #[default]
    Preserve,
    /// Convert to `snake_case`.
    Snake,
}

/// Where and under which names generated files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    /// Directory, relative to the output root and to the include path.
    pub include_prefix: String,

    /// Header extension, without the dot.
    pub header_extension: String,

    /// Source extension, without the dot.
    pub source_extension: String,

    pub naming: FileNaming,
    pub case: FileCase,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            include_prefix: "converters".to_string(),
            header_extension: "hpp".to_string(),
            source_extension: "cpp".to_string(),
            naming: FileNaming::default(),
            case: FileCase::default(),
        }
    }
}

impl OutputLayout {
    /// Create a layout with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the include prefix.
    pub fn with_include_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.include_prefix = prefix.into();
        self
    }

    /// Set the header and source extensions.
    pub fn with_extensions(mut self, header: impl Into<String>, source: impl Into<String>) -> Self {
        self.header_extension = header.into();
        self.source_extension = source.into();
        self
    }

    /// Set the naming scheme.
    pub fn with_naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Set the file case.
    pub fn with_case(mut self, case: FileCase) -> Self {
        self.case = case;
        self
    }

    /// File stem for `decl`.
    pub fn stem(&self, decl: &EnumDeclaration) -> String {
        let raw = match self.naming {
            FileNaming::Short => decl.name().to_string(),
            FileNaming::Qualified => decl.qualified_path.joined("_"),
        };
        match self.case {
            FileCase::Preserve => raw,
            FileCase::Snake => raw.to_case(Case::Snake),
        }
    }

    /// Header path relative to the output root.
    pub fn header_path(&self, decl: &EnumDeclaration) -> PathBuf {
        self.path(&format!("{}.{}", self.stem(decl), self.header_extension))
    }

    /// Source path relative to the output root.
    pub fn source_path(&self, decl: &EnumDeclaration) -> PathBuf {
        self.path(&format!("{}.{}", self.stem(decl), self.source_extension))
    }

    /// Text for `#include "..."` of the generated header.
    pub fn include_path(&self, decl: &EnumDeclaration) -> String {
        let file = format!("{}.{}", self.stem(decl), self.header_extension);
        let prefix = self.include_prefix.trim_matches('/');
        if prefix.is_empty() {
            file
        } else {
            format!("{prefix}/{file}")
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        let prefix = self.include_prefix.trim_matches('/');
        if prefix.is_empty() {
            PathBuf::from(file)
        } else {
            PathBuf::from(prefix).join(file)
        }
    }
}

/// Header and source text for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFiles {
    pub header_path: PathBuf,
    pub header: String,
    pub source_path: PathBuf,
    pub source: String,
}

/// Assemble the units of one declaration into a header and a source file.
///
/// `source_include` is how the original header is included, e.g.
/// `some/cool.hpp` or `<some/cool.hpp>`.
pub fn render_files(
    decl: &EnumDeclaration,
    units: &[GeneratedUnit],
    layout: &OutputLayout,
    source_include: &str,
) -> RenderedFiles {
    let namespace = function_namespace(decl);
    let banner = format!(
        "{GENERATED_BANNER} from {}. Do not edit.\n",
        source_include.trim_matches(|c: char| c == '<' || c == '>' || c == '"')
    );

    let mut header = banner.clone();
    header.push_str("#pragma once\n\n");
    header.push_str(&format!("#include {}\n", include_directive(source_include)));
    header.push_str(&includes(units.iter().flat_map(|u| &u.header_includes)));
    header.push_str(&wrap_namespace(&namespace, units.iter().map(|u| u.header.as_str())));

    let mut source = banner;
    source.push_str(&format!(
        "#include {}\n",
        include_directive(&layout.include_path(decl))
    ));
    source.push_str(&includes(units.iter().flat_map(|u| &u.source_includes)));
    source.push_str(&wrap_namespace(&namespace, units.iter().map(|u| u.source.as_str())));

    RenderedFiles {
        header_path: layout.header_path(decl),
        header,
        source_path: layout.source_path(decl),
        source,
    }
}

fn include_directive(target: &str) -> String {
    if target.starts_with('<') || target.starts_with('"') {
        target.to_string()
    } else {
        format!("\"{target}\"")
    }
}

/// Sorted, deduplicated `#include` block preceded by a blank line.
fn includes<'a>(targets: impl Iterator<Item = &'a String>) -> String {
    let mut targets: Vec<&String> = targets.collect();
    targets.sort();
    targets.dedup();

    let mut out = String::from("\n");
    for target in targets {
        out.push_str(&format!("#include {}\n", include_directive(target)));
    }
    out
}

fn wrap_namespace<'a>(namespace: &str, fragments: impl Iterator<Item = &'a str>) -> String {
    let body = fragments
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if namespace.is_empty() {
        format!("\n{body}")
    } else {
        format!("\nnamespace {namespace} {{\n\n{body}\n}}  // namespace {namespace}\n")
    }
}
