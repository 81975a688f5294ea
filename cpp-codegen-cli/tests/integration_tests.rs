//! Integration tests for cpp-codegen-cli.
//!
//! These tests verify end-to-end functionality of the CLI library:
//! scanning, analysis, generation, writing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use cpp_codegen::{DiagnosticKind, FileNaming, Severity};
use cpp_codegen_cli::{
    config::{Config, ConfigManager},
    error::{CliError, GenerateError},
    generator::{ConverterGenerator, DiagnosticPolicy},
    scanner::SourceScanner,
    writer::{FileStatus, FileWriter, WriteResult},
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/include")
}

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn relative_names(paths: impl Iterator<Item = PathBuf>) -> Vec<String> {
    paths
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

const MODE: &str = r#"#pragma once
namespace app {
/// @cpp_codegen
/// string_serialization
/// json_serialization
enum class mode {
    fast,  //< "FAST"s "fast-mode"json
    slow,
};
}  // namespace app
"#;

// =============================================================================
// Scanner Integration Tests
// =============================================================================

#[test]
fn test_scanner_finds_fixture_headers() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();

    assert_eq!(
        relative_names(files.iter().map(|f| f.relative_path.clone())),
        vec!["net/protocol.h", "plain.hh", "some/enum_codegen.hpp"]
    );
}

#[test]
fn test_scanner_with_filter() {
    let files = SourceScanner::new(fixtures_path())
        .with_filter("some/*.hpp")
        .unwrap()
        .scan()
        .unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0]
        .relative_path
        .to_string_lossy()
        .contains("enum_codegen.hpp"));
}

#[test]
fn test_scanner_respects_gitignore() {
    let dir = create_temp_project(&[
        (".gitignore", "build/\n"),
        ("include/mode.hpp", MODE),
        ("build/mode.hpp", MODE),
    ]);
    // The ignore crate only reads .gitignore inside a git repository
    fs::create_dir(dir.path().join(".git")).unwrap();

    let files = SourceScanner::new(dir.path()).scan().unwrap();
    assert_eq!(
        relative_names(files.iter().map(|f| f.relative_path.clone())),
        vec!["include/mode.hpp"]
    );

    let files = SourceScanner::new(dir.path())
        .with_gitignore(false)
        .scan()
        .unwrap();
    assert_eq!(files.len(), 2);
}

// =============================================================================
// Analysis Integration Tests
// =============================================================================

#[test]
fn test_analyze_fixtures() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();
    let analysis = ConverterGenerator::new(Config::default()).analyze(&files);

    assert_eq!(analysis.declaration_count(), 8);
    assert_eq!(analysis.diagnostics().count(), 0);

    let paths: Vec<String> = analysis
        .declarations()
        .map(|(_, decl)| decl.qualified_path.to_string())
        .collect();
    assert_eq!(paths[0], "net::protocol");
    assert_eq!(paths[1], "some::cool::enum_class_simple");
    assert_eq!(paths.last().unwrap(), "some::cool::parent_class::enum_simple_member");
}

#[test]
fn test_analysis_serializes_to_json() {
    let files = SourceScanner::new(fixtures_path())
        .with_filter("net/*")
        .unwrap()
        .scan()
        .unwrap();
    let analysis = ConverterGenerator::new(Config::default()).analyze(&files);

    let json: serde_json::Value = serde_json::to_value(&analysis).unwrap();
    let declaration = &json["files"][0]["declarations"][0];
    assert_eq!(declaration["enumerators"][0]["string_value"], "TCP");
    assert_eq!(declaration["enumerators"][2]["json_value"], "quic");
}

#[test]
fn test_strict_directives_from_config() {
    let dir = create_temp_project(&[(
        "a.hpp",
        "/// @cpp_codegen\n/// string_serialization\n/// yaml_serialization\nenum class a { x };\n",
    )]);
    let files = SourceScanner::new(dir.path()).scan().unwrap();

    let lenient = ConverterGenerator::new(Config::default()).analyze(&files);
    assert_eq!(lenient.declaration_count(), 1);

    let content = "[annotation]\nstrict_directives = true\n";
    let config = ConfigManager::parse(Path::new("cpp-codegen.toml"), content).unwrap();
    let strict = ConverterGenerator::new(config).analyze(&files);
    assert_eq!(strict.declaration_count(), 0);
    assert_eq!(
        strict.diagnostics().next().map(|d| d.kind),
        Some(DiagnosticKind::UnrecognizedDirective)
    );
}

#[test]
fn test_diagnostic_policy_on_errors() {
    let dir = create_temp_project(&[(
        "broken.hpp",
        "namespace a {\n/// @cpp_codegen\n/// string_serialization\nenum class e { x };\n}\n}\n",
    )]);
    let files = SourceScanner::new(dir.path()).scan().unwrap();
    let analysis = ConverterGenerator::new(Config::default()).analyze(&files);

    assert_eq!(analysis.declaration_count(), 1);
    assert_eq!(analysis.count(Severity::Error), 1);

    let strict = DiagnosticPolicy {
        strict: true,
        deny_warnings: false,
    };
    assert_eq!(strict.failures(&analysis), 1);
    assert_eq!(DiagnosticPolicy::default().failures(&analysis), 0);
}

// =============================================================================
// Generation Integration Tests
// =============================================================================

#[test]
fn test_generate_fixtures() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();
    let generator = ConverterGenerator::new(Config::default());
    let output = generator.generate(&generator.analyze(&files)).unwrap();

    assert_eq!(output.declarations, 8);
    assert_eq!(output.files.len(), 16);

    let protocol = output
        .files
        .iter()
        .find(|f| f.path == Path::new("converters/protocol.hpp"))
        .unwrap();
    assert!(protocol.content.contains("#include \"net/protocol.h\""));
    assert!(protocol.content.contains("namespace net {"));
    assert!(!protocol.content.contains("to_json"));

    let combined = output
        .files
        .iter()
        .find(|f| f.path == Path::new("converters/enum_custom_combined.cpp"))
        .unwrap();
    assert!(combined.content.contains("\"val_1_comb_string\""));
    assert!(combined.content.contains("\"val_1_comb_json\""));
}

#[test]
fn test_generation_is_deterministic() {
    let files = SourceScanner::new(fixtures_path()).scan().unwrap();
    let generator = ConverterGenerator::new(Config::default());

    let first = generator.generate(&generator.analyze(&files)).unwrap();
    let second = generator.generate(&generator.analyze(&files)).unwrap();
    assert_eq!(first.files, second.files);
}

#[test]
fn test_generate_reports_collisions() {
    let dir = create_temp_project(&[
        ("a/mode.hpp", MODE),
        ("b/mode.hpp", &MODE.replace("namespace app", "namespace other")),
    ]);
    let files = SourceScanner::new(dir.path()).scan().unwrap();
    let generator = ConverterGenerator::new(Config::default());

    let result = generator.generate(&generator.analyze(&files));
    match result {
        Err(CliError::Generate(GenerateError::OutputCollision { first, second, .. })) => {
            assert_eq!(first, "app::mode");
            assert_eq!(second, "other::mode");
        }
        other => panic!("expected collision, got {other:?}"),
    }

    let mut config = Config::default();
    config.output.file_naming = FileNaming::Qualified;
    let generator = ConverterGenerator::new(config);
    assert!(generator.generate(&generator.analyze(&files)).is_ok());
}

// =============================================================================
// Writer Integration Tests
// =============================================================================

#[test]
fn test_full_pipeline_writes_files() {
    let project = create_temp_project(&[("include/app/mode.hpp", MODE)]);
    let out = TempDir::new().unwrap();

    let files = SourceScanner::new(project.path().join("include"))
        .scan()
        .unwrap();
    let generator = ConverterGenerator::new(Config::default());
    let output = generator.generate(&generator.analyze(&files)).unwrap();

    let results = FileWriter::new(out.path(), false)
        .write_all(&output.files)
        .unwrap();
    assert!(results.iter().all(WriteResult::was_written));

    let header = fs::read_to_string(out.path().join("converters/mode.hpp")).unwrap();
    assert!(header.starts_with("// Generated by cpp-codegen from app/mode.hpp."));
    assert!(header.contains("#include \"app/mode.hpp\""));

    let source = fs::read_to_string(out.path().join("converters/mode.cpp")).unwrap();
    assert!(source.contains("#include \"converters/mode.hpp\""));
    assert!(source.contains("return \"FAST\";"));
    assert!(source.contains("json = \"fast-mode\";"));
}

#[test]
fn test_validate_detects_stale_output() {
    let project = create_temp_project(&[("mode.hpp", MODE)]);
    let out = TempDir::new().unwrap();
    let generator = ConverterGenerator::new(Config::default());
    let writer = FileWriter::new(out.path(), false);

    let files = SourceScanner::new(project.path()).scan().unwrap();
    let output = generator.generate(&generator.analyze(&files)).unwrap();

    let statuses = writer.check(&output.files).unwrap();
    assert!(statuses
        .iter()
        .all(|s| matches!(s, FileStatus::Missing(_))));

    writer.write_all(&output.files).unwrap();
    assert!(writer
        .check(&output.files)
        .unwrap()
        .iter()
        .all(FileStatus::is_fresh));

    // Change an override and regenerate in memory only
    fs::write(project.path().join("mode.hpp"), MODE.replace("FAST", "Fast")).unwrap();
    let files = SourceScanner::new(project.path()).scan().unwrap();
    let output = generator.generate(&generator.analyze(&files)).unwrap();

    let stale: Vec<_> = writer
        .check(&output.files)
        .unwrap()
        .into_iter()
        .filter(|s| !s.is_fresh())
        .collect();
    assert_eq!(stale, vec![FileStatus::Stale(out.path().join("converters/mode.cpp"))]);
}

#[test]
fn test_dry_run_leaves_disk_untouched() {
    let project = create_temp_project(&[("mode.hpp", MODE)]);
    let out = TempDir::new().unwrap();
    let generator = ConverterGenerator::new(Config::default());

    let files = SourceScanner::new(project.path()).scan().unwrap();
    let output = generator.generate(&generator.analyze(&files)).unwrap();
    let results = FileWriter::new(out.path(), true)
        .write_all(&output.files)
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| matches!(r, WriteResult::DryRun { .. })));
    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_config_file_controls_layout() {
    let project = create_temp_project(&[
        ("mode.hpp", MODE),
        (
            "cpp-codegen.toml",
            "[output]\ninclude_prefix = \"\"\nheader_extension = \"h\"\nsource_extension = \"cc\"\nfile_case = \"snake\"\n",
        ),
    ]);

    let config = ConfigManager::load(Some(&project.path().join("cpp-codegen.toml"))).unwrap();
    let files = SourceScanner::from_config(project.path(), &config.scan)
        .scan()
        .unwrap();
    let generator = ConverterGenerator::new(config);
    let output = generator.generate(&generator.analyze(&files)).unwrap();

    let paths: Vec<_> = output.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("mode.h"), PathBuf::from("mode.cc")]);
    assert!(output.files[1].content.contains("#include \"mode.h\""));
}
