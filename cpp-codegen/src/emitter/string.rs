//! String conversion emitter.
//!
//! Renders a `to_string` / `from_string` pair:
//!
//! ```cpp
//! [[nodiscard]] std::string_view to_string(::app::color value) noexcept;
//! [[nodiscard]] bool from_string(std::string_view text, ::app::color& value) noexcept;
//! ```
//!
//! Both directions are `if` chains in declaration order, so aliased
//! enumerators compile and the first declared name wins.

use super::cpp::{enumerator_ref, ensure_emittable, string_literal, type_ref};
use super::traits::{ConversionEmitter, EmitConfig, GeneratedUnit};
use crate::error::GeneratorError;
use crate::ir::{ConversionKind, EnumDeclaration};

/// Emitter for [`ConversionKind::StringSerialization`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEmitter;

impl StringEmitter {
    /// Create a new emitter.
    pub fn new() -> Self {
        Self
    }

    fn header(&self, decl: &EnumDeclaration) -> String {
        let ty = type_ref(decl);
        format!(
            "/// Canonical string of a `{path}` value; empty for values without a name.\n\
             [[nodiscard]] std::string_view to_string({ty} value) noexcept;\n\
             \n\
             /// Parse `text` into `value`. Returns false and leaves `value` untouched on failure.\n\
             [[nodiscard]] bool from_string(std::string_view text, {ty}& value) noexcept;\n",
            path = decl.qualified_path,
        )
    }

    fn source(
        &self,
        decl: &EnumDeclaration,
        config: &EmitConfig,
    ) -> Result<String, GeneratorError> {
        let ty = type_ref(decl);
        let i1 = config.indent(1);
        let i2 = config.indent(2);
        let mut out = String::new();

        out.push_str(&format!("std::string_view to_string({ty} value) noexcept {{\n"));
        for (name, value) in decl.values(ConversionKind::StringSerialization) {
            out.push_str(&format!("{i1}if (value == {}) {{\n", enumerator_ref(decl, name)));
            out.push_str(&format!("{i2}return {};\n", string_literal(value)?));
            out.push_str(&format!("{i1}}}\n"));
        }
        out.push_str(&format!("{i1}return {{}};\n"));
        out.push_str("}\n\n");

        out.push_str(&format!(
            "bool from_string(std::string_view text, {ty}& value) noexcept {{\n"
        ));
        for (name, value) in decl.values(ConversionKind::StringSerialization) {
            out.push_str(&format!("{i1}if (text == {}) {{\n", string_literal(value)?));
            out.push_str(&format!("{i2}value = {};\n", enumerator_ref(decl, name)));
            out.push_str(&format!("{i2}return true;\n"));
            out.push_str(&format!("{i1}}}\n"));
        }
        out.push_str(&format!("{i1}return false;\n"));
        out.push_str("}\n");

        Ok(out)
    }
}

impl ConversionEmitter for StringEmitter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::StringSerialization
    }

    fn name(&self) -> &'static str {
        "string serialization"
    }

    fn emit(
        &self,
        decl: &EnumDeclaration,
        config: &EmitConfig,
    ) -> Result<GeneratedUnit, GeneratorError> {
        ensure_emittable(decl, self.kind())?;

        Ok(GeneratedUnit::new(self.kind())
            .with_header(self.header(decl))
            .with_source(self.source(decl, config)?)
            .with_header_include("<string_view>"))
    }
}
