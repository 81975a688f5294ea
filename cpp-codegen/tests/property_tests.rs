//! Property-based tests for cpp-codegen.
//!
//! Properties tested:
//! - Property 1: Unannotated enums never produce declarations
//! - Property 2: Enumerator order is preserved
//! - Property 3: Qualified paths follow namespace nesting
//! - Property 4: Overrides are captured in either order
//! - Property 5: Building is a pure function of the input
//! - Property 6: Trailing directive punctuation is ignored

use proptest::prelude::*;

use cpp_codegen::{build_all, ConversionKind};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a C++ identifier that is not a keyword the scanner reacts to.
fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("reserved word", |s| {
        !matches!(
            s.as_str(),
            "enum" | "class" | "struct" | "union" | "namespace" | "typedef" | "inline" | "final"
        )
    })
}

/// Generate a list of distinct identifiers.
fn arb_enumerators() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(arb_identifier(), 1..8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Generate an override payload without quotes or backslashes.
fn arb_payload() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ .-]{0,16}"
}

fn annotated_enum(name: &str, enumerators: &[String], directives: &[&str]) -> String {
    let mut source = String::from("/**\n * @cpp_codegen\n");
    for directive in directives {
        source.push_str(&format!(" * {directive}\n"));
    }
    source.push_str(&format!(" */\nenum class {name} {{\n"));
    for enumerator in enumerators {
        source.push_str(&format!("    {enumerator},\n"));
    }
    source.push_str("};\n");
    source
}

// =============================================================================
// Property 1: Unannotated enums never produce declarations
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_unannotated_enums_are_invisible(
        name in arb_identifier(),
        enumerators in arb_enumerators(),
        doc in "[A-Za-z ]{0,30}",
    ) {
        let source = format!(
            "/// {doc}\n/// string_serialization\nenum class {name} {{ {} }};\n",
            enumerators.join(", ")
        );

        let (declarations, diagnostics) = build_all(&source);
        prop_assert!(declarations.is_empty());
        prop_assert!(diagnostics.is_empty());
    }
}

// =============================================================================
// Property 2: Enumerator order is preserved
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_enumerator_order_is_preserved(
        name in arb_identifier(),
        enumerators in arb_enumerators(),
    ) {
        let source = annotated_enum(&name, &enumerators, &["string_serialization"]);
        let (declarations, diagnostics) = build_all(&source);

        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        prop_assert_eq!(declarations.len(), 1);

        let names: Vec<&str> = declarations[0]
            .enumerators
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        let expected: Vec<&str> = enumerators.iter().map(String::as_str).collect();
        prop_assert_eq!(names, expected);
    }
}

// =============================================================================
// Property 3: Qualified paths follow namespace nesting
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_qualified_path_follows_nesting(
        namespaces in prop::collection::vec(arb_identifier(), 0..5),
        nested_syntax in any::<bool>(),
        name in arb_identifier(),
    ) {
        let body = annotated_enum(&name, &["a".to_string()], &["json_serialization"]);

        let source = if nested_syntax && !namespaces.is_empty() {
            format!("namespace {} {{\n{body}}}\n", namespaces.join("::"))
        } else {
            let open: String = namespaces.iter().map(|n| format!("namespace {n} {{\n")).collect();
            let close = "}\n".repeat(namespaces.len());
            format!("{open}{body}{close}")
        };

        let (declarations, diagnostics) = build_all(&source);
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);

        let mut expected = namespaces.clone();
        expected.push(name);
        let components: Vec<&str> = declarations[0].qualified_path.components().collect();
        prop_assert_eq!(components, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

// =============================================================================
// Property 4: Overrides are captured in either order
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_overrides_in_either_order(
        string_value in arb_payload(),
        json_value in arb_payload(),
        json_first in any::<bool>(),
        split in any::<bool>(),
    ) {
        let string_part = format!("\"{string_value}\"s");
        let json_part = format!("\"{json_value}\"json");
        let (first, second) = if json_first {
            (json_part, string_part)
        } else {
            (string_part, json_part)
        };
        let trailing = if split {
            format!("//< {first}\n           //< {second}")
        } else {
            format!("//< {first} {second}")
        };

        let source = format!(
            "/// @cpp_codegen\n/// string_serialization\n/// json_serialization\nenum class e {{\n    value,  {trailing}\n}};\n"
        );

        let (declarations, diagnostics) = build_all(&source);
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);

        let record = &declarations[0].enumerators[0];
        prop_assert_eq!(record.value(ConversionKind::StringSerialization), string_value.as_str());
        prop_assert_eq!(record.value(ConversionKind::JsonSerialization), json_value.as_str());
    }
}

// =============================================================================
// Property 5: Building is a pure function of the input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_build_is_pure(source in "[ -~\n]{0,200}") {
        prop_assert_eq!(build_all(&source), build_all(&source));
    }

    #[test]
    fn prop_build_never_panics_on_fragments(
        pieces in prop::collection::vec(
            prop::sample::select(vec![
                "namespace a {", "}", "{", "enum class e {", "x,", "//< \"v\"s",
                "/// @cpp_codegen", "/// string_serialization", "};", "struct s {",
                "\"", "/*", "*/", "#define X", ";",
            ]),
            0..30,
        )
    ) {
        let source = pieces.join("\n");
        let (declarations, _) = build_all(&source);
        for decl in &declarations {
            prop_assert!(!decl.enumerators.is_empty());
            prop_assert!(!decl.requested_conversions.is_empty());
        }
    }
}

// =============================================================================
// Property 6: Trailing directive punctuation is ignored
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_directive_punctuation_is_ignored(
        punctuation in prop::sample::select(vec!["", ".", ",", ";", ":"]),
        padding in "[ \t]{0,3}",
    ) {
        let directive = format!("{padding}string_serialization{punctuation}{padding}");
        let source = annotated_enum("e", &["a".to_string()], &[directive.as_str()]);

        let (declarations, diagnostics) = build_all(&source);
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        prop_assert!(declarations[0].requests(ConversionKind::StringSerialization));
    }
}
