//! Declaration model builder.
//!
//! Joins the scanner output with the directive and override grammars and
//! produces the final [`EnumDeclaration`] records. Every rejected declaration
//! leaves a [`Diagnostic`]; nothing here returns an error.

use std::collections::HashSet;
use std::path::Path;

use crate::ir::{
    ConversionKind, Diagnostic, DiagnosticKind, EnumDeclaration, EnumeratorRecord, QualifiedPath,
};
use crate::parser::{
    Annotation, DeclarationScanner, DirectiveLexer, OverrideParser, RawEnum, RawEnumerator,
    DEFAULT_MARKER,
};

/// Declarations and diagnostics built from one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    /// Annotated declarations, in source order.
    pub declarations: Vec<EnumDeclaration>,

    /// Diagnostics, sorted by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    /// Split into declarations and diagnostics.
    pub fn into_parts(self) -> (Vec<EnumDeclaration>, Vec<Diagnostic>) {
        (self.declarations, self.diagnostics)
    }

    /// Whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Configurable builder.
///
/// # Example
///
/// ```rust
/// use cpp_codegen::DeclarationBuilder;
///
/// let builder = DeclarationBuilder::new()
///     .with_marker("@delta_enable_codegen")
///     .with_strict_directives(true);
///
/// let output = builder.build("/// @delta_enable_codegen\n/// json_serialization\nenum e { a };");
/// assert_eq!(output.declarations.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    directives: DirectiveLexer,
    overrides: OverrideParser,
    strict_directives: bool,
}

impl Default for DeclarationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationBuilder {
    /// Create a builder using the default marker.
    pub fn new() -> Self {
        Self {
            directives: DirectiveLexer::new(DEFAULT_MARKER),
            overrides: OverrideParser::new(),
            strict_directives: false,
        }
    }

    /// Use a different annotation marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.directives = DirectiveLexer::new(marker);
        self
    }

    /// Drop declarations that contain unrecognized directive lines.
    pub fn with_strict_directives(mut self, strict: bool) -> Self {
        self.strict_directives = strict;
        self
    }

    /// Build declarations from one source text.
    pub fn build(&self, source: &str) -> BuildOutput {
        let outcome = DeclarationScanner::new(source).scan();

        let mut output = BuildOutput {
            declarations: Vec::new(),
            diagnostics: outcome.diagnostics,
        };
        let mut seen: HashSet<QualifiedPath> = HashSet::new();

        for raw in &outcome.enums {
            if let Some(declaration) = self.declaration(raw, &mut seen, &mut output.diagnostics) {
                output.declarations.push(declaration);
            }
        }

        output.diagnostics.sort_by_key(|d| (d.line, d.column));

        tracing::debug!(
            declarations = output.declarations.len(),
            diagnostics = output.diagnostics.len(),
            "built declarations"
        );

        output
    }

    /// Build declarations from one file, stamping `path` on every diagnostic.
    pub fn build_file(&self, path: impl AsRef<Path>, source: &str) -> BuildOutput {
        let path = path.as_ref();
        let mut output = self.build(source);
        output.diagnostics = output
            .diagnostics
            .into_iter()
            .map(|d| d.with_file(path))
            .collect();
        output
    }

    fn declaration(
        &self,
        raw: &RawEnum,
        seen: &mut HashSet<QualifiedPath>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<EnumDeclaration> {
        let lines = raw.doc.as_ref()?.lines();
        let Annotation::Present(directives) = self.directives.lex(&lines) else {
            return None;
        };

        let display_name = raw.name.as_deref().unwrap_or("<anonymous>");
        let at = |kind, message: String| Diagnostic::new(kind, raw.line, raw.column, message);

        for (line, text) in &directives.unrecognized {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnrecognizedDirective,
                *line,
                1,
                format!("unrecognized directive '{text}' on enum '{display_name}'"),
            ));
        }
        if self.strict_directives && !directives.unrecognized.is_empty() {
            tracing::debug!(name = display_name, "dropped for unrecognized directives");
            return None;
        }

        if directives.conversions.is_empty() {
            diagnostics.push(at(
                DiagnosticKind::EmptyDirectiveSet,
                format!(
                    "enum '{display_name}' is annotated but requests no conversion (expected one of: {})",
                    ConversionKind::ALL.map(|k| k.keyword()).join(", ")
                ),
            ));
            return None;
        }

        let Some(name) = raw.name.clone() else {
            diagnostics.push(at(
                DiagnosticKind::AnonymousEnum,
                "annotated enum has no name".to_string(),
            ));
            return None;
        };

        if raw.enumerators.is_empty() {
            diagnostics.push(at(
                DiagnosticKind::EmptyEnum,
                format!("annotated enum '{name}' declares no enumerators"),
            ));
            return None;
        }

        let path = QualifiedPath::new(raw.scope.clone(), name);
        if seen.contains(&path) {
            diagnostics.push(at(
                DiagnosticKind::DuplicateQualifiedName,
                format!("enum '{path}' is already declared; this definition is ignored"),
            ));
            return None;
        }

        let enumerators = self.enumerators(&path, &raw.enumerators, diagnostics);
        seen.insert(path.clone());

        tracing::debug!(
            path = %path,
            enumerators = enumerators.len(),
            "built declaration"
        );

        Some(
            EnumDeclaration::new(path, directives.conversions, enumerators)
                .with_scoped(raw.scoped)
                .with_line(raw.line),
        )
    }

    fn enumerators(
        &self,
        path: &QualifiedPath,
        raw: &[RawEnumerator],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<EnumeratorRecord> {
        let mut records: Vec<EnumeratorRecord> = Vec::with_capacity(raw.len());

        for enumerator in raw {
            let at = |kind, message: String| {
                Diagnostic::new(kind, enumerator.line, enumerator.column, message)
            };

            if records.iter().any(|r| r.name == enumerator.name) {
                diagnostics.push(at(
                    DiagnosticKind::DuplicateEnumerator,
                    format!(
                        "enumerator '{}' appears twice in '{path}'; keeping the first",
                        enumerator.name
                    ),
                ));
                continue;
            }

            let overrides = self.overrides.parse(&enumerator.override_fragments());
            for problem in &overrides.problems {
                diagnostics.push(at(
                    DiagnosticKind::MalformedOverride,
                    format!("{path}::{}: {}", enumerator.name, problem.message),
                ));
            }

            let mut record =
                EnumeratorRecord::new(enumerator.name.as_str()).with_line(enumerator.line);
            if let Some(value) = overrides.string_value {
                record = record.with_string_value(value);
            }
            if let Some(value) = overrides.json_value {
                record = record.with_json_value(value);
            }
            records.push(record);
        }

        records
    }
}

/// Build declarations from `source` with default settings.
pub fn build_all(source: &str) -> (Vec<EnumDeclaration>, Vec<Diagnostic>) {
    DeclarationBuilder::new().build(source).into_parts()
}
