//! C++ rendering helpers shared by the emitters.

use crate::error::GeneratorError;
use crate::ir::{ConversionKind, EnumDeclaration};

/// Render `value` as a C++ string literal.
///
/// JSON string escaping is a subset of what C++ accepts, so the JSON
/// encoding of a string is used as is.
pub fn string_literal(value: &str) -> Result<String, GeneratorError> {
    Ok(serde_json::to_string(value)?)
}

/// Fully qualified type reference, e.g. `::some::cool::color`.
pub fn type_ref(decl: &EnumDeclaration) -> String {
    decl.qualified_path.to_cpp()
}

/// Fully qualified enumerator reference, e.g. `::some::cool::color::red`.
///
/// Valid for scoped and unscoped enums alike.
pub fn enumerator_ref(decl: &EnumDeclaration, enumerator: &str) -> String {
    format!("{}::{}", type_ref(decl), enumerator)
}

/// Namespace that the free functions for `decl` are declared in, joined
/// with `::`. Empty for the global namespace.
pub fn function_namespace(decl: &EnumDeclaration) -> String {
    decl.qualified_path
        .scope
        .namespace_prefix()
        .iter()
        .map(|segment| segment.name.as_str())
        .collect::<Vec<_>>()
        .join("::")
}

/// Fail unless `decl` requested `kind` and has enumerators.
pub fn ensure_emittable(
    decl: &EnumDeclaration,
    kind: ConversionKind,
) -> Result<(), GeneratorError> {
    if !decl.requests(kind) {
        return Err(GeneratorError::not_requested(
            decl.qualified_path.to_string(),
            kind,
        ));
    }
    if decl.enumerators.is_empty() {
        return Err(GeneratorError::empty_declaration(
            decl.qualified_path.to_string(),
        ));
    }
    Ok(())
}
