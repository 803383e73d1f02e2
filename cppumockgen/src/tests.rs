use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use crate::{
    Destination, Error, FrontEnd, GeneratedFiles, MockGenerator, OutputPaths, ParseRequest, Result,
    TranslationUnit,
};

const UNIT: &str = r#"{
    "diagnostics": [{ "severity": "warning", "message": "sample.h:4:1: declaration shadows" }],
    "entities": [
        { "kind": "function", "name": "function1",
          "return_type": { "name": "int", "category": { "builtin": "int" } },
          "parameters": [{ "name": "a", "type": { "name": "int", "category": { "builtin": "int" } } }] },
        { "kind": "function", "name": "function2",
          "return_type": { "name": "void", "category": "void" },
          "parameters": [{ "name": "p", "type": { "name": "char", "category": { "builtin": "char" },
                                                  "is_const": true, "pointers": [{}] } }] },
        { "kind": "function", "name": "inlined", "is_defined": true,
          "return_type": { "name": "void", "category": "void" } }
    ]
}"#;

/// Hands out a fixed translation unit and remembers how it was asked.
struct FixedFrontEnd {
    unit: TranslationUnit,
    asked_cpp: Cell<Option<(bool, bool)>>,
}

impl FixedFrontEnd {
    fn new(json: &str) -> Self {
        Self {
            unit: serde_json::from_str(json).unwrap(),
            asked_cpp: Cell::new(None),
        }
    }
}

impl FrontEnd for FixedFrontEnd {
    fn parse(&self, request: &ParseRequest<'_>) -> Result<TranslationUnit> {
        self.asked_cpp
            .set(Some((request.interpret_as_cpp, request.cpp11)));
        Ok(self.unit.clone())
    }
}

fn header(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "/* parsed through the front-end */\n").unwrap();
    path
}

#[test]
fn test_session_collects_mockable_functions() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);

    let session = MockGenerator::new().session(&frontend, &input).unwrap();

    assert_eq!(frontend.asked_cpp.get(), Some((false, false)));
    assert_eq!(session.declarations().len(), 2);
    assert_eq!(session.declarations().unmockable().len(), 1);
    assert_eq!(session.warnings().len(), 1);
    assert!(!session.interpret_as_cpp());
}

#[test]
fn test_mock_source_for_c_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);

    let mock = MockGenerator::new()
        .session(&frontend, &input)
        .unwrap()
        .mock_source()
        .unwrap();

    assert!(mock.starts_with("/*\n * This file has been auto-generated by cppumockgen v"));
    assert!(mock.contains("Contents will NOT be preserved if it is regenerated!!!"));
    assert!(!mock.contains("Generation options:"));
    assert!(mock.contains("extern \"C\" {\n#include \"sample.h\"\n}"));
    assert!(mock.contains("#include <CppUTestExt/MockSupport.h>"));
    assert!(mock.contains(
        "int function1(int a)\n{\n    return mock().actualCall(\"function1\").withIntParameter(\"a\", a).returnIntValue();\n}\n"
    ));
    assert!(mock.contains(".withStringParameter(\"p\", p);"));
    assert!(!mock.contains("inlined"));
}

#[test]
fn test_cpp_extension_drops_extern_c() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.hpp");
    let frontend = FixedFrontEnd::new(UNIT);

    let session = MockGenerator::new()
        .cpp11(true)
        .session(&frontend, &input)
        .unwrap();

    assert_eq!(frontend.asked_cpp.get(), Some((true, true)));
    let mock = session.mock_source().unwrap();
    assert!(!mock.contains("extern \"C\""));
    assert!(mock.contains("#include \"sample.hpp\""));
}

#[test]
fn test_expectation_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);
    let session = MockGenerator::new()
        .param_override("function1#a=LongInt")
        .session(&frontend, &input)
        .unwrap();

    let header = session.expectation_header().unwrap();
    assert!(header.contains("Generation options: -p function1#a=LongInt"));
    assert!(header.contains("extern \"C\" {\n#include \"sample.h\"\n}"));
    assert!(header.contains("MockExpectedCall& function1(int a, int __return__);"));
    assert!(header.contains(
        "MockExpectedCall& function1(unsigned int __numCalls__, int a, int __return__);"
    ));

    let source = session.expectation_source("sample_expect.hpp").unwrap();
    assert!(source.contains("#include \"sample_expect.hpp\""));
    assert!(source.contains(".withLongIntParameter(\"a\", a)"));
    assert!(source.contains(".andReturnValue(static_cast<int>(__return__))"));
}

#[test]
fn test_parse_errors_stop_generation() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "broken.h");
    let frontend = FixedFrontEnd::new(
        r#"{ "diagnostics": [
            { "severity": "warning", "message": "broken.h:1:1: odd" },
            { "severity": "note", "message": "broken.h:1:1: see here" },
            { "severity": "error", "message": "broken.h:2:1: unknown type name 'foo'" }
        ] }"#,
    );

    match MockGenerator::new().session(&frontend, &input) {
        Err(Error::Parse {
            path,
            errors,
            warnings,
        }) => {
            assert_eq!(path, input);
            assert_eq!(errors.len(), 1);
            assert_eq!(warnings.len(), 1);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_nothing_to_mock() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "empty.h");
    let frontend = FixedFrontEnd::new(r#"{ "entities": [] }"#);

    let err = MockGenerator::new().session(&frontend, &input).unwrap_err();
    assert!(matches!(err, Error::NothingToMock { .. }));
    assert_eq!(
        err.to_string(),
        "The input file does not contain any mockable function."
    );
}

#[test]
fn test_bad_override_is_reported_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);

    let err = MockGenerator::new()
        .type_override("#int=Bogus")
        .session(&frontend, &input)
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(frontend.asked_cpp.get(), None);
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let frontend = FixedFrontEnd::new(UNIT);

    let err = MockGenerator::new()
        .session(&frontend, dir.path().join("absent.h"))
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
}

#[test]
fn test_options_summary() {
    let mut generator = MockGenerator::new();
    assert_eq!(generator.options_summary(), "");

    generator
        .interpret_as_cpp(true)
        .underlying_typedef(true)
        .param_override("f#a=Int")
        .type_override("#const char *=String")
        .type_override("@int=LongInt");
    assert_eq!(
        generator.options_summary(),
        "-x -u -p f#a=Int -t \"#const char *=String\" -t @int=LongInt"
    );

    generator.generation_options("custom");
    assert_eq!(generator.options_summary(), "custom");
}

#[test]
fn test_output_paths() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_str().unwrap();
    let input = Path::new("include/sample.h");

    let paths = OutputPaths::resolve(input, Some(""), Some("expect/mocks.h"));
    assert_eq!(
        paths.mock,
        Some(Destination::File(PathBuf::from("sample_mock.cpp")))
    );
    assert_eq!(
        paths.expectation,
        Some((
            Destination::File(PathBuf::from("expect/mocks.hpp")),
            Destination::File(PathBuf::from("expect/mocks.cpp")),
        ))
    );

    let paths = OutputPaths::resolve(input, Some(out), Some("@"));
    assert_eq!(
        paths.mock,
        Some(Destination::File(dir.path().join("sample_mock.cpp")))
    );
    assert_eq!(
        paths.expectation,
        Some((Destination::Stdout, Destination::Stdout))
    );

    let paths = OutputPaths::resolve(input, None, Some(out));
    assert_eq!(paths.mock, None);
    assert_eq!(
        paths.expectation,
        Some((
            Destination::File(dir.path().join("sample_expect.hpp")),
            Destination::File(dir.path().join("sample_expect.cpp")),
        ))
    );
}

#[test]
fn test_write_to_files_and_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);
    let session = MockGenerator::new().session(&frontend, &input).unwrap();

    let paths = OutputPaths::resolve(&input, Some("@"), Some(dir.path().to_str().unwrap()));
    let mut stdout = Vec::new();
    let written = session.write(&paths, &mut stdout).unwrap();

    let header = dir.path().join("sample_expect.hpp");
    let source = dir.path().join("sample_expect.cpp");
    assert_eq!(
        written,
        GeneratedFiles {
            mock: None,
            expectation: Some((header.clone(), source.clone())),
        }
    );

    let stdout = String::from_utf8(stdout).unwrap();
    assert!(stdout.contains("int function1(int a)"));
    assert!(fs::read_to_string(&header)
        .unwrap()
        .contains("MockExpectedCall& function2(const char * p);"));
    assert!(fs::read_to_string(&source)
        .unwrap()
        .contains("#include \"sample_expect.hpp\""));

    // Only the three expected files remain; staging files are gone.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_failed_write_leaves_no_partial_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);
    let session = MockGenerator::new().session(&frontend, &input).unwrap();

    let mock = dir.path().join("sample_mock.cpp");
    let paths = OutputPaths {
        mock: Some(Destination::File(mock.clone())),
        expectation: Some((
            Destination::File(dir.path().join("missing/dir/e.hpp")),
            Destination::File(dir.path().join("missing/dir/e.cpp")),
        )),
    };

    let err = session.write(&paths, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
    assert!(!mock.exists());
}

#[test]
fn test_failed_rename_restores_earlier_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);
    let session = MockGenerator::new().session(&frontend, &input).unwrap();

    // An existing mock is replaced first; the expectation source cannot be
    // renamed onto a non-empty directory.
    let mock = dir.path().join("m.cpp");
    fs::write(&mock, "previous mock").unwrap();
    let blocker = dir.path().join("e.cpp");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "").unwrap();

    let paths = OutputPaths::resolve(
        &input,
        Some(mock.to_str().unwrap()),
        Some(dir.path().join("e").to_str().unwrap()),
    );
    let err = session.write(&paths, &mut Vec::new()).unwrap_err();

    match err {
        Error::Output { path, .. } => assert_eq!(path, blocker),
        other => panic!("expected an output error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&mock).unwrap(), "previous mock");
    assert!(!dir.path().join("e.hpp").exists());
    assert!(blocker.join("keep").is_file());

    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["e.cpp", "m.cpp", "sample.h"]);
}

#[test]
fn test_write_replaces_existing_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = header(dir.path(), "sample.h");
    let frontend = FixedFrontEnd::new(UNIT);
    let session = MockGenerator::new().session(&frontend, &input).unwrap();

    let mock = dir.path().join("sample_mock.cpp");
    fs::write(&mock, "stale").unwrap();
    let paths = OutputPaths::resolve(&input, Some(dir.path().to_str().unwrap()), None);
    session.write(&paths, &mut Vec::new()).unwrap();

    assert!(fs::read_to_string(&mock).unwrap().contains("int function1(int a)"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
