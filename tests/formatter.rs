use jsclean::FormatError;
use jsclean::ast::{ExprKind, JsString, StmtKind};
use jsclean::parser::parse;
use jsclean::formatter::{FormatOptions, format_source, is_formatted};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn fmt(src: &str) -> String {
    format_source(src, &FormatOptions::default()).unwrap()
}

fn fmt_with(src: &str, opts: FormatOptions) -> String {
    format_source(src, &opts).unwrap()
}

/// Find all test cases in the examples directory
fn find_test_cases() -> Vec<TestCase> {
    let examples_dir = Path::new("tests/examples");
    let mut test_cases = Vec::new();

    for entry in WalkDir::new(examples_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Inputs are named `<name>_<n>.input`
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with(".input") && file_name.contains('_') {
                if let Some(test_case) = create_test_case(path) {
                    test_cases.push(test_case);
                }
            }
        }
    }

    test_cases
}

#[derive(Debug, Clone)]
struct TestCase {
    name: String,
    input_file: PathBuf,
    expected_file: PathBuf,
}

/// Create a test case from an input file path
fn create_test_case(input_path: &Path) -> Option<TestCase> {
    let file_name = input_path.file_name()?.to_str()?;
    let parent_dir = input_path.parent()?;

    // e.g., "switch_1.input" -> "switch"
    let base_name = &file_name[..file_name.rfind('_')?];

    let expected_file = parent_dir.join(format!("{}.js", base_name));

    if expected_file.exists() {
        Some(TestCase {
            name: file_name.trim_end_matches(".input").to_string(),
            input_file: input_path.to_path_buf(),
            expected_file,
        })
    } else {
        None
    }
}

/// Run a single test case
fn run_test_case(test_case: &TestCase) -> Result<(), String> {
    let input_content = fs::read_to_string(&test_case.input_file).map_err(|e| {
        format!(
            "Failed to read input file {:?}: {}",
            test_case.input_file, e
        )
    })?;

    let expected_content = fs::read_to_string(&test_case.expected_file).map_err(|e| {
        format!(
            "Failed to read expected file {:?}: {}",
            test_case.expected_file, e
        )
    })?;

    let formatted_content = format_source(&input_content, &FormatOptions::default())
        .map_err(|e| format!("Test case '{}' failed to format: {}", test_case.name, e))?;

    if formatted_content != expected_content {
        return Err(format!(
            "Formatting mismatch for test case '{}':\n\
             Input file: {:?}\n\
             Expected file: {:?}\n\
             \n--- Expected ---\n{}\n\
             \n--- Got ---\n{}\n\
             \n--- Diff ---\n{}",
            test_case.name,
            test_case.input_file,
            test_case.expected_file,
            expected_content,
            formatted_content,
            create_diff(&expected_content, &formatted_content)
        ));
    }

    // The expected output is itself fully formatted
    let again = format_source(&expected_content, &FormatOptions::default())
        .map_err(|e| format!("Expected file {:?} failed to format: {}", test_case.expected_file, e))?;
    if again != expected_content {
        return Err(format!(
            "Expected file {:?} is not stable:\n{}",
            test_case.expected_file,
            create_diff(&expected_content, &again)
        ));
    }
    Ok(())
}

/// Create a simple diff visualization
fn create_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let mut diff = String::new();
    let max_lines = expected_lines.len().max(actual_lines.len());

    for i in 0..max_lines {
        let expected_line = expected_lines.get(i).unwrap_or(&"");
        let actual_line = actual_lines.get(i).unwrap_or(&"");

        if expected_line != actual_line {
            diff.push_str(&format!(
                "Line {}: Expected: {:?}, Got: {:?}\n",
                i + 1,
                expected_line,
                actual_line
            ));
        }
    }

    if diff.is_empty() {
        "No line differences (possibly trailing newlines)".to_string()
    } else {
        diff
    }
}

#[test]
fn example_files_formatting() {
    let test_cases = find_test_cases();

    assert!(
        !test_cases.is_empty(),
        "No test cases found in tests/examples/"
    );

    println!("Found {} test case(s):", test_cases.len());
    for test_case in &test_cases {
        println!("  - {}", test_case.name);
    }

    let mut failures = Vec::new();
    for test_case in &test_cases {
        if let Err(error) = run_test_case(test_case) {
            failures.push(error);
        }
    }

    if !failures.is_empty() {
        panic!("Test failures:\n\n{}", failures.join("\n\n"));
    }
}

#[test]
fn null_comparisons_stay_loose() {
    assert_eq!(
        fmt("a == null; b != null; c == d; null != e;"),
        "a == null;\nb != null;\nc === d;\nnull != e;\n"
    );
}

#[test]
fn last_case_gets_a_break() {
    assert_eq!(
        fmt("switch (x) { case 1: f() }"),
        "switch (x) {\ncase 1:\n\tf();\n\tbreak;\n}\n"
    );
    assert_eq!(
        fmt("switch (x) { case 1: return f() }"),
        "switch (x) {\ncase 1:\n\treturn f();\n}\n"
    );
}

#[test]
fn cases_sort_with_numbers_first() {
    assert_eq!(
        fmt("switch (x) { case 'a': break; case 10: break; case 9: break; }"),
        "switch (x) {\ncase 9:\n\tbreak;\ncase 10:\n\tbreak;\ncase 'a':\n\tbreak;\n}\n"
    );
}

#[test]
fn property_sorting_can_be_disabled() {
    let source = "x = {b: 1, a: 2};";
    assert_eq!(fmt(source), "x = {\n\ta: 2,\n\tb: 1,\n};\n");
    let opts = FormatOptions {
        sort_properties: false,
        ..FormatOptions::default()
    };
    assert_eq!(fmt_with(source, opts), "x = {\n\tb: 1,\n\ta: 2,\n};\n");
}

#[test]
fn split_declaration_keeps_comment_on_first() {
    assert_eq!(
        fmt("// two\nvar a = 1, b = 2;"),
        "// Two\nvar a = 1;\nvar b = 2;\n"
    );
}

#[test]
fn strings_with_both_quotes() {
    assert_eq!(fmt(r#"s = 'it\'s "x"\n';"#), "s = \"it's \\\"x\\\"\\n\";\n");
    assert_eq!(fmt(r#"s = "plain";"#), "s = 'plain';\n");
}

/// Value of the string assigned by the first statement of `source`.
fn assigned_string(source: &str) -> JsString {
    let program = parse(source).unwrap().program;
    let StmtKind::Expr(expr) = &program.body[0].kind else {
        panic!("not an expression statement: {source}");
    };
    match &expr.kind {
        ExprKind::Assign { right, .. } => match &right.kind {
            ExprKind::Str(value) => value.clone(),
            other => panic!("not a string: {other:?}"),
        },
        other => panic!("not an assignment: {other:?}"),
    }
}

#[test]
fn string_values_survive_reformatting() {
    let sources = [
        r#"s = '\xe9 \u2028 caf\u00e9';"#,
        r#"s = "lone \ud800 surrogate";"#,
        r#"s = 'both \' and " quotes\n';"#,
        r#"s = "tab\tback\\slash \0 \v";"#,
    ];
    for source in sources {
        let formatted = fmt(source);
        assert_eq!(assigned_string(&formatted), assigned_string(source), "{formatted}");
    }
    assert_eq!(assigned_string(r#"s = "lone \ud800 surrogate";"#).0[5], 0xd800);
}

#[test]
fn library_sorts_run_by_default() {
    assert_eq!(
        fmt("var z = require('z');\nvar a = require('a');\nclass K { run() {} constructor() {} }\n"),
        "var a = require('a');\nvar z = require('z');\n\nclass K {\n\tconstructor() {}\n\n\trun() {}\n}\n"
    );
}

#[test]
fn blank_lines_collapse() {
    assert_eq!(fmt("\n\n\na();\n\n\n\n\n\nb();\n\n\n"), "a();\nb();\n");
    assert_eq!(fmt("a();\n\n\n\n\n\n// note\nb();\n"), "a();\n\n// Note\nb();\n");
}

#[test]
fn function_runs_sort_independently() {
    assert_eq!(
        fmt("function b() {}\nfunction a() {}\nx();\nfunction d() {}\nfunction c() {}\n"),
        "function a() {}\n\nfunction b() {}\n\nx();\n\nfunction c() {}\n\nfunction d() {}\n"
    );
}

#[test]
fn braces_can_be_stripped() {
    let opts = FormatOptions {
        extra_braces: false,
        ..FormatOptions::default()
    };
    assert_eq!(
        fmt_with("if (a) { b() }\nwhile (c) { d() }", opts),
        "if (a)\n\tb();\nwhile (c)\n\td();\n"
    );
}

#[test]
fn all_rules_off_only_reprints() {
    let opts = FormatOptions {
        exact_equals: false,
        cap_comments: false,
        separate_vars: false,
        sort_cases: false,
        sort_functions: false,
        sort_properties: false,
        sort_methods: false,
        sort_vars: false,
        sort_assigns: false,
        sort_requires: false,
        sort_exports: false,
        trailing_break: false,
        ..FormatOptions::default()
    };
    assert_eq!(
        fmt_with("// keep\nvar b = 1, a = b == 2;", opts),
        "// keep\nvar b = 1, a = b == 2;\n"
    );
}

#[test]
fn formatting_is_idempotent() {
    let source = "class A { b() {} a = {y: 1, x: [1, 2]} }\nlabel: for (const k in o) if (k) continue label;\n";
    let once = fmt(source);
    assert!(is_formatted(&once, &FormatOptions::default()).unwrap());
}

#[test]
fn modules_are_rejected() {
    let err = format_source("import x from 'y';", &FormatOptions::default()).unwrap_err();
    assert!(
        matches!(err, FormatError::Unsupported { ref construct, line: 1 } if construct == "import_statement"),
        "{err:?}"
    );
}

#[test]
fn syntax_errors_report_a_location() {
    let err = format_source("a();\nb(;\n", &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::Syntax { line: 2, .. }), "{err:?}");
}
