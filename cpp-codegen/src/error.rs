//! Error types for the core crate.
//!
//! Parsing never fails: malformed input is reported through
//! [`Diagnostic`](crate::ir::Diagnostic) records instead. The errors here
//! cover scope bookkeeping and code emission.

use thiserror::Error;

use crate::ir::ConversionKind;

/// Error raised by the scope tracker on unbalanced input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A closing brace was found while no scope was open.
    #[error("closing brace without a matching open scope")]
    UnexpectedExit,

    /// Input ended while scopes were still open.
    #[error("{open} scope(s) still open at end of input (innermost opened on line {innermost_line})")]
    Unclosed {
        /// Number of scopes left open.
        open: usize,
        /// Line on which the innermost open scope started.
        innermost_line: usize,
    },
}

/// Error that occurred during code emission.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// No emitter is registered for a requested conversion.
    #[error("no emitter registered for '{0}'")]
    MissingEmitter(ConversionKind),

    /// The emitter was asked for a conversion the declaration did not request.
    #[error("enum '{enum_name}' does not request '{kind}'")]
    NotRequested {
        enum_name: String,
        kind: ConversionKind,
    },

    /// The declaration has no enumerators to map.
    #[error("enum '{enum_name}' has no enumerators")]
    EmptyDeclaration { enum_name: String },

    /// A value could not be rendered as a C++ string literal.
    #[error("failed to render literal: {0}")]
    Literal(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Create a not-requested error.
    pub fn not_requested(enum_name: impl Into<String>, kind: ConversionKind) -> Self {
        Self::NotRequested {
            enum_name: enum_name.into(),
            kind,
        }
    }

    /// Create an empty-declaration error.
    pub fn empty_declaration(enum_name: impl Into<String>) -> Self {
        Self::EmptyDeclaration {
            enum_name: enum_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_error_display() {
        let err = ScopeError::Unclosed {
            open: 2,
            innermost_line: 14,
        };
        assert_eq!(
            err.to_string(),
            "2 scope(s) still open at end of input (innermost opened on line 14)"
        );
        assert_eq!(
            ScopeError::UnexpectedExit.to_string(),
            "closing brace without a matching open scope"
        );
    }

    #[test]
    fn test_generator_error_display() {
        let err = GeneratorError::not_requested("app::mode", ConversionKind::JsonSerialization);
        assert_eq!(
            err.to_string(),
            "enum 'app::mode' does not request 'json_serialization'"
        );

        let err = GeneratorError::MissingEmitter(ConversionKind::StringSerialization);
        assert_eq!(
            err.to_string(),
            "no emitter registered for 'string_serialization'"
        );
    }
}
