//! Tests for tolerant database parsing: malformed records cost only
//! themselves, and nothing in the input makes parsing abort.

use std::path::PathBuf;

use cdb_conformance::{database, pipeline, record};
use cdb_diagnostics::DiagnosticCode;

#[test]
fn malformed_record_between_two_valid_ones() {
    let text = format!(
        "[\n{},\n{{\"directory\": \"/proj\", \"file\": \"/proj/bad.cpp\", \"arguments\": [\"-O2\",, ]}},\n{}\n]",
        record("/proj", "/proj/a.cpp", &["-Wall"]),
        record("/proj", "/proj/b.cpp", &["-Wextra"]),
    );
    let result = pipeline(&text);
    assert_eq!(result.contents.entries.len(), 2);
    assert_eq!(result.count(DiagnosticCode::MALFORMED_RECORD), 1);
    assert_eq!(
        result.part_files(),
        vec![PathBuf::from("/proj/a.cpp"), PathBuf::from("/proj/b.cpp")]
    );
}

#[test]
fn truncated_arguments_array_keeps_the_following_record() {
    let text = format!(
        "[\n{},\n{{\"directory\": \"/proj\", \"file\": \"/proj/bad.cpp\", \"arguments\": [\"c++\",\n{}\n]",
        record("/proj", "/proj/a.cpp", &["-Wall"]),
        record("/proj", "/proj/c.cpp", &["-Wextra"]),
    );
    let result = pipeline(&text);
    assert_eq!(result.contents.entries.len(), 2);
    assert_eq!(result.count(DiagnosticCode::MALFORMED_RECORD), 1);
    assert_eq!(
        result.part_files(),
        vec![PathBuf::from("/proj/a.cpp"), PathBuf::from("/proj/c.cpp")]
    );
}

#[test]
fn nested_braces_inside_strings_extend_the_slice() {
    let text = r#"[
  {"directory": "/proj", "file": "/proj/a.cpp", "command": "c++ -DJSON=\"{x}\" -c a.cpp"},
  {"directory": "/proj", "file": "/proj/b.cpp", "arguments": ["c++", "-c", "b.cpp"]}
]"#;
    let result = pipeline(text);
    assert_eq!(result.contents.entries.len(), 2);
    assert_eq!(result.count(DiagnosticCode::MALFORMED_RECORD), 0);
}

#[test]
fn truncated_trailing_record_is_skipped() {
    let text = format!(
        "[\n{},\n{{\"directory\": \"/proj\", \"file\": \"/proj/b.cpp\", \"argu",
        record("/proj", "/proj/a.cpp", &["-Wall"]),
    );
    let result = pipeline(&text);
    assert_eq!(result.contents.entries.len(), 1);
    assert_eq!(result.part_files(), vec![PathBuf::from("/proj/a.cpp")]);
}

#[test]
fn record_without_file_is_reported() {
    let text = database(&[
        r#"{"directory": "/proj", "arguments": ["-Wall"]}"#.to_string(),
        record("/proj", "/proj/a.cpp", &["-Wall"]),
    ]);
    let result = pipeline(&text);
    assert_eq!(result.contents.entries.len(), 1);
    assert_eq!(result.count(DiagnosticCode::RECORD_WITHOUT_FILE), 1);
}

#[test]
fn garbage_yields_an_empty_build() {
    let result = pipeline("not json at all }{ ]]");
    assert!(result.contents.entries.is_empty());
    assert!(result.build.parts.is_empty());
    assert!(result.tree.children.contains_key("compile_commands.json"));
}

#[test]
fn empty_input_yields_nothing() {
    let result = pipeline("");
    assert!(result.contents.entries.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn wrong_field_type_skips_only_that_record() {
    let text = database(&[
        r#"{"directory": "/proj", "file": 42}"#.to_string(),
        record("/proj", "/proj/a.cpp", &["-Wall"]),
    ]);
    let result = pipeline(&text);
    assert_eq!(result.contents.entries.len(), 1);
    assert_eq!(result.count(DiagnosticCode::MALFORMED_RECORD), 1);
}

#[test]
fn relative_file_resolves_against_directory() {
    let text = r#"{"directory": "/proj/src", "file": "a.cpp"}"#;
    let result = pipeline(text);
    assert_eq!(result.contents.entries.len(), 1);
    assert_eq!(
        result.contents.entries[0].source_file,
        PathBuf::from("/proj/src/a.cpp")
    );
}
