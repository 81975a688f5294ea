//! Diagnostics collected while building declarations.
//!
//! Nothing in the parser aborts a scan. Every malformed construct drops the
//! smallest unit it affects and leaves a [`Diagnostic`] behind; callers decide
//! whether any of them should fail a build.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Closing brace without an open scope, scopes left open at end of
    /// input, or an enum body that never closes.
    UnbalancedScope,
    /// A directive line after the marker names no known conversion.
    UnrecognizedDirective,
    /// The marker is present but no directive line was recognized.
    EmptyDirectiveSet,
    /// An override tag without a well-formed literal, or a repeated override.
    MalformedOverride,
    /// Two annotated enums resolve to the same qualified path.
    DuplicateQualifiedName,
    /// An annotated enum declares no enumerators.
    EmptyEnum,
    /// An annotated enum has no name to qualify.
    AnonymousEnum,
    /// An enumerator name appears twice in one enum.
    DuplicateEnumerator,
}

impl DiagnosticKind {
    /// Default severity of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnrecognizedDirective
            | DiagnosticKind::MalformedOverride
            | DiagnosticKind::DuplicateEnumerator => Severity::Warning,
            DiagnosticKind::UnbalancedScope
            | DiagnosticKind::EmptyDirectiveSet
            | DiagnosticKind::DuplicateQualifiedName
            | DiagnosticKind::EmptyEnum
            | DiagnosticKind::AnonymousEnum => Severity::Error,
        }
    }

    /// Short stable identifier, printed next to messages.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnbalancedScope => "unbalanced-scope",
            DiagnosticKind::UnrecognizedDirective => "unrecognized-directive",
            DiagnosticKind::EmptyDirectiveSet => "empty-directive-set",
            DiagnosticKind::MalformedOverride => "malformed-override",
            DiagnosticKind::DuplicateQualifiedName => "duplicate-qualified-name",
            DiagnosticKind::EmptyEnum => "empty-enum",
            DiagnosticKind::AnonymousEnum => "anonymous-enum",
            DiagnosticKind::DuplicateEnumerator => "duplicate-enumerator",
        }
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Output is still produced, possibly with defaulted values.
    Warning,
    /// A declaration was dropped or the file structure is broken.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A located, non-fatal problem found in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,

    /// Severity, derived from the kind.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// 1-based line.
    pub line: usize,

    /// 1-based column.
    pub column: usize,

    /// Originating file, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a diagnostic at a position.
    pub fn new(
        kind: DiagnosticKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            line,
            column,
            file: None,
        }
    }

    /// Attach the originating file.
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.line,
            self.column,
            self.severity,
            self.kind.code(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        let warning = Diagnostic::new(DiagnosticKind::MalformedOverride, 3, 5, "detached tag");
        assert_eq!(warning.severity, Severity::Warning);
        assert!(!warning.is_error());

        let error = Diagnostic::new(DiagnosticKind::DuplicateQualifiedName, 9, 1, "dup");
        assert!(error.is_error());
    }

    #[test]
    fn test_display_without_file() {
        let diag = Diagnostic::new(DiagnosticKind::EmptyDirectiveSet, 12, 1, "nothing requested");
        assert_eq!(
            diag.to_string(),
            "12:1: error[empty-directive-set]: nothing requested"
        );
    }

    #[test]
    fn test_display_with_file() {
        let diag = Diagnostic::new(DiagnosticKind::UnrecognizedDirective, 4, 4, "unknown")
            .with_file("include/app/mode.hpp");
        assert_eq!(
            diag.to_string(),
            "include/app/mode.hpp:4:4: warning[unrecognized-directive]: unknown"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }
}
