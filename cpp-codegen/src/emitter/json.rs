//! JSON conversion emitter.
//!
//! Renders nlohmann-style `to_json` / `from_json` overloads. Values are JSON
//! strings; unknown input to `from_json` throws `std::invalid_argument`.

use super::cpp::{enumerator_ref, ensure_emittable, string_literal, type_ref};
use super::traits::{ConversionEmitter, EmitConfig, GeneratedUnit};
use crate::error::GeneratorError;
use crate::ir::{ConversionKind, EnumDeclaration};

/// Emitter for [`ConversionKind::JsonSerialization`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// Create a new emitter.
    pub fn new() -> Self {
        Self
    }

    fn header(&self, decl: &EnumDeclaration) -> String {
        let ty = type_ref(decl);
        format!(
            "void to_json(nlohmann::json& json, const {ty}& value);\n\
             void from_json(const nlohmann::json& json, {ty}& value);\n"
        )
    }

    fn source(
        &self,
        decl: &EnumDeclaration,
        config: &EmitConfig,
    ) -> Result<String, GeneratorError> {
        let ty = type_ref(decl);
        let path = string_literal(&decl.qualified_path.to_string())?;
        let i1 = config.indent(1);
        let i2 = config.indent(2);
        let i3 = config.indent(3);
        let mut out = String::new();

        out.push_str(&format!(
            "void to_json(nlohmann::json& json, const {ty}& value) {{\n"
        ));
        for (name, value) in decl.values(ConversionKind::JsonSerialization) {
            out.push_str(&format!("{i1}if (value == {}) {{\n", enumerator_ref(decl, name)));
            out.push_str(&format!("{i2}json = {};\n", string_literal(value)?));
            out.push_str(&format!("{i2}return;\n"));
            out.push_str(&format!("{i1}}}\n"));
        }
        out.push_str(&format!(
            "{i1}throw std::invalid_argument(std::string(\"unnamed value of \") + {path});\n"
        ));
        out.push_str("}\n\n");

        out.push_str(&format!(
            "void from_json(const nlohmann::json& json, {ty}& value) {{\n"
        ));
        out.push_str(&format!("{i1}if (json.is_string()) {{\n"));
        out.push_str(&format!(
            "{i2}const auto& text = json.get_ref<const std::string&>();\n"
        ));
        for (name, value) in decl.values(ConversionKind::JsonSerialization) {
            out.push_str(&format!("{i2}if (text == {}) {{\n", string_literal(value)?));
            out.push_str(&format!("{i3}value = {};\n", enumerator_ref(decl, name)));
            out.push_str(&format!("{i3}return;\n"));
            out.push_str(&format!("{i2}}}\n"));
        }
        out.push_str(&format!("{i1}}}\n"));
        out.push_str(&format!(
            "{i1}throw std::invalid_argument(std::string(\"invalid \") + {path} + \" value: \" + json.dump());\n"
        ));
        out.push_str("}\n");

        Ok(out)
    }
}

impl ConversionEmitter for JsonEmitter {
    fn kind(&self) -> ConversionKind {
        ConversionKind::JsonSerialization
    }

    fn name(&self) -> &'static str {
        "json serialization"
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
            .with_header_include("<nlohmann/json.hpp>")
            .with_source_include("<stdexcept>")
            .with_source_include("<string>"))
    }
}
