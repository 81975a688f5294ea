//! # cpp-codegen
//!
//! Annotation parser and declaration model for generating string and JSON
//! converters for C++ enumerations.
//!
//! An enum participates when the documentation comment right before it
//! carries the `@cpp_codegen` marker followed by one directive per line:
//!
//! ```cpp
//! /**
//!  * @brief Shows custom values.
//!  * @cpp_codegen
//!  * string_serialization
//!  * json_serialization
//!  */
//! enum class color {
//!     red,    //< "Red"s "RED"json
//!     green,  //< "Green"s
//!             //< "GREEN"json
//! };
//! ```
//!
//! ## Architecture
//!
//! - [`parser`] - source lexer, scope tracker, directive lexer and
//!   enumerator override parser
//! - [`builder`] - assembles [`EnumDeclaration`] records and diagnostics
//!   from raw text ([`build_all`])
//! - [`ir`] - the declaration model handed to emitters
//! - [`emitter`] - renders C++ converter code from the model
//! - [`error`] - error types
//!
//! ## Usage
//!
//! ```rust
//! use cpp_codegen::{build_all, ConversionKind};
//!
//! let source = r#"
//! namespace app {
//! /// @cpp_codegen
//! /// string_serialization
//! enum class mode { fast, slow };
//! }
//! "#;
//!
//! let (declarations, diagnostics) = build_all(source);
//! assert!(diagnostics.is_empty());
//! assert_eq!(declarations[0].qualified_path.to_string(), "app::mode");
//! assert!(declarations[0].requests(ConversionKind::StringSerialization));
//! ```

pub mod builder;
pub mod emitter;
pub mod error;
pub mod ir;
pub mod parser;

// Re-export main types for convenience
pub use builder::{build_all, BuildOutput, DeclarationBuilder};
pub use emitter::{
    render_files, ConversionEmitter, EmitConfig, EmitterRegistry, FileCase, FileNaming,
    GeneratedUnit, IndentStyle, OutputLayout, RenderedFiles,
};
pub use error::{GeneratorError, ScopeError};
pub use ir::{
    ConversionKind, Diagnostic, DiagnosticKind, EnumDeclaration, EnumeratorRecord, QualifiedPath,
    ScopeFrame, ScopeKind, ScopeSegment, Severity,
};
