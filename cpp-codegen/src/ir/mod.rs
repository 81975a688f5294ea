//! Declaration model.
//!
//! This module defines the data structures produced by the builder and
//! consumed by emitters. Everything here is plain data: it carries no
//! reference back into scanner state and serializes with `serde`.

pub mod declaration;
pub mod diagnostic;
pub mod scope;

pub use declaration::{ConversionKind, EnumDeclaration, EnumeratorRecord};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use scope::{QualifiedPath, ScopeFrame, ScopeKind, ScopeSegment};
