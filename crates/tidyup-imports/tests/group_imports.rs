//! End-to-end behavior of the `group-imports` rule through the lint driver.

use serde_json::{json, Value};

use tidyup_core::output::LintOutcome;
use tidyup_imports::rules::GroupImports;
use tidyup_imports::{LintReport, Linter};

fn lint(code: &str, options: Value) -> LintReport {
    let rule = GroupImports::from_options(&options).expect("options should validate");
    Linter::new()
        .with_rule(rule)
        .verify_and_fix(code)
        .expect("code should parse")
}

fn assert_fixed(report: &LintReport, errors: usize, expected: &str) {
    assert_eq!(report.result, LintOutcome::Fixed, "issues: {:?}", report.issues);
    assert_eq!(report.issues.len(), errors, "issues: {:?}", report.issues);
    assert_eq!(report.output, expected);
    assert!(report.remaining.is_empty(), "remaining: {:?}", report.remaining);
}

// ============================================================================
// Valid code
// ============================================================================

#[test]
fn test_no_imports() {
    let report = lint("", json!([]));
    assert_eq!(report.result, LintOutcome::Valid);

    let report = lint("const a = 1;\nexport default a;\n", json!([]));
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_default_groups() {
    let code = "import 'fs';\n\nimport 'foo';\n\nimport '#internal';\n\nimport '/abs';\n\nimport './rel';\n";
    let report = lint(code, json!([]));
    assert_eq!(report.result, LintOutcome::Valid, "issues: {:?}", report.issues);
    assert_eq!(report.output, code);
}

#[test]
fn test_custom_order() {
    let report = lint(
        "import './bar';\n\nimport 'foo';\n\nimport 'fs';",
        json!([{ "class": "relative" }, { "class": "external" }, { "class": "node" }]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_explicit_matches_win_over_classes() {
    let report = lint(
        "import 'foo/a';\n\nimport 'fs';\nimport 'bar';",
        json!(["foo", [{ "class": "node" }, { "class": "external" }]]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_mixed_groups() {
    let report = lint(
        "import 'fs';\nimport 'foo';",
        json!([[{ "class": "node" }, { "class": "external" }]]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_type_imports_share_a_group() {
    let report = lint(
        "import type fs from 'fs';\nimport 'fs';\n\nimport type foo from 'foo';\nimport 'foo';",
        json!([]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_separate_type_imports() {
    let report = lint(
        "import type fs from 'fs';\n\nimport 'fs';\n\nimport type foo from 'foo';\n\nimport 'foo';",
        json!([
            { "class": "node", "types": "only" },
            { "class": "node", "types": "exclude" },
            { "path": "foo", "types": "only" },
            { "path": "foo", "types": "exclude" },
        ]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

#[test]
fn test_patterns_match_one_segment() {
    let report = lint(
        "import '@scope/a';\n\nimport '@scope/a/deep';",
        json!([{ "pattern": "@scope/*" }]),
    );
    assert_eq!(report.result, LintOutcome::Valid);
}

// ============================================================================
// Invalid code (fixable)
// ============================================================================

#[test]
fn test_missing_new_line_between_groups() {
    let report = lint("import 'fs';\nimport 'foo';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\nimport 'foo';");
    assert_eq!(report.issues[0].message, "Expected 1 empty line after import");
}

#[test]
fn test_too_many_lines_between_groups() {
    let report = lint("import 'fs';\n\n\nimport 'foo';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\nimport 'foo';");
}

#[test]
fn test_invalid_new_line_in_group() {
    let report = lint("import 'fs';\n\nimport 'path';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\nimport 'path';");
    assert_eq!(report.issues[0].message, "Expected 0 empty lines after import");
}

#[test]
fn test_wrong_group_order() {
    let report = lint("import 'foo';\n\nimport 'fs';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\nimport 'foo';");
    assert!(report.issues[0].message.starts_with("Expected import groups: "));
}

#[test]
fn test_ungrouped() {
    let report = lint("import './bar';\nimport 'foo';\nimport 'fs';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\nimport 'foo';\n\nimport './bar';");
}

#[test]
fn test_delimited_group() {
    let report = lint(
        "import 'foo';\n\nimport 'fs';\nimport 'path';\n\nimport 'bar';",
        json!([]),
    );
    assert_fixed(&report, 1, "import 'fs';\nimport 'path';\n\nimport 'foo';\nimport 'bar';");
}

#[test]
fn test_separated_groups() {
    let report = lint(
        "import 'fs';\n\nimport 'path';\n\nimport 'foo';\n\nimport 'bar';",
        json!([]),
    );
    assert_fixed(&report, 2, "import 'fs';\nimport 'path';\n\nimport 'foo';\nimport 'bar';");
}

#[test]
fn test_invalid_and_missing_new_lines() {
    let report = lint(
        "import 'fs';\n\nimport 'path';\nimport 'foo';\n\nimport 'bar';",
        json!([]),
    );
    assert_fixed(&report, 3, "import 'fs';\nimport 'path';\n\nimport 'foo';\nimport 'bar';");
}

#[test]
fn test_scope_group_and_catch_all() {
    let code = "import 'foo/a';\n\
                import 'fs';\n\
                import 'foo/b';\n\
                import '/';\n\
                import './bar';\n\
                import 'foo/c';\n\
                import 'baz';\n\
                import 'foo/d';";
    let expected = "import 'fs';\n\
                    import '/';\n\
                    \n\
                    import 'foo/a';\n\
                    import 'foo/b';\n\
                    import 'foo/c';\n\
                    import 'foo/d';\n\
                    \n\
                    import './bar';\n\
                    import 'baz';";
    let report = lint(
        code,
        json!([[{ "class": "node" }, { "class": "absolute" }], "foo"]),
    );
    assert_fixed(&report, 1, expected);
    assert_eq!(
        report.issues[0].message,
        "Expected import groups: custom, custom"
    );
}

#[test]
fn test_type_imports_fixed() {
    let report = lint(
        "import type fs from 'fs';\n\nimport 'fs';\n\nimport type foo from 'foo';\n\nimport 'foo';",
        json!([]),
    );
    assert_fixed(
        &report,
        2,
        "import type fs from 'fs';\nimport 'fs';\n\nimport type foo from 'foo';\nimport 'foo';",
    );
}

#[test]
fn test_separate_type_imports_fixed() {
    let report = lint(
        "import type fs from 'fs';\nimport 'fs';\n\nimport type foo from 'foo';\nimport 'foo';",
        json!([
            { "class": "node", "types": "only" },
            { "class": "node", "types": "exclude" },
            { "path": "foo", "types": "only" },
            { "path": "foo", "types": "exclude" },
        ]),
    );
    assert_fixed(
        &report,
        2,
        "import type fs from 'fs';\n\nimport 'fs';\n\nimport type foo from 'foo';\n\nimport 'foo';",
    );
}

#[test]
fn test_node_protocol_imports() {
    let report = lint("import 'node:fs';\nimport 'foo';", json!([]));
    assert_fixed(&report, 1, "import 'node:fs';\n\nimport 'foo';");
}

#[test]
fn test_separate_module_subpaths() {
    let report = lint("import 'a/a/a';\nimport 'a/b/c';\nimport 'a/a/b';", json!(["a/a", "a/b"]));
    assert_fixed(&report, 1, "import 'a/a/a';\nimport 'a/a/b';\n\nimport 'a/b/c';");
}

#[test]
fn test_comments_between_groups_are_kept() {
    let report = lint("import 'fs';\n// node above\nimport 'foo';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\n// node above\nimport 'foo';");
}

#[test]
fn test_blank_lines_inside_block_comment_are_not_spacing() {
    let code = "import a from 'a';\n/* note\n\n   more */\nimport b from 'b';\n";
    let report = lint(code, json!([]));
    assert_eq!(report.result, LintOutcome::Valid, "issues: {:?}", report.issues);
    assert_eq!(report.output, code);
}

#[test]
fn test_block_comment_kept_verbatim_when_respacing() {
    let report = lint("import 'fs';\n/* note\n\n   more */\nimport 'foo';", json!([]));
    assert_fixed(&report, 1, "import 'fs';\n\n/* note\n\n   more */\nimport 'foo';");
}

#[test]
fn test_exports_grouped_when_enabled() {
    let code = "export * from './a';\nexport * from 'fs';";

    let report = lint(code, json!({ "exports": true }));
    assert_fixed(&report, 1, "export * from 'fs';\n\nexport * from './a';");
    assert!(report.issues[0].message.starts_with("Expected export groups: "));

    let report = lint(code, json!({}));
    assert_eq!(report.result, LintOutcome::Valid);
}

// ============================================================================
// Invalid code (unfixable)
// ============================================================================

#[test]
fn test_other_code_between_imports() {
    let report = lint("import 'foo';\nconsole.log(0);\nimport 'bar';", json!([]));
    assert_eq!(report.result, LintOutcome::Invalid);
    assert_eq!(report.issues.len(), 1);
    assert!(!report.issues[0].is_fixable());
}

#[test]
fn test_reorder_across_comments_is_unfixable() {
    let code = "import 'foo';\n// keep me\nimport 'fs';";
    let report = lint(code, json!([]));
    assert_eq!(report.result, LintOutcome::Invalid);
    assert_eq!(report.output, code);
    assert_eq!(report.issues.len(), 1);
}
