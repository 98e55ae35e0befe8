//! End-to-end behavior of the `sort-imports` rule through the lint driver.

use serde_json::{json, Value};

use tidyup_core::output::LintOutcome;
use tidyup_core::patch::FixSet;
use tidyup_imports::rules::SortImports;
use tidyup_imports::{LintReport, Linter};

fn lint(code: &str, options: Value) -> LintReport {
    let rule = SortImports::from_options(&options).expect("options should validate");
    Linter::new()
        .with_rule(rule)
        .verify_and_fix(code)
        .expect("code should parse")
}

fn assert_valid(code: &str, options: Value) {
    let report = lint(code, options);
    assert_eq!(report.result, LintOutcome::Valid, "issues: {:?}", report.issues);
    assert_eq!(report.output, code);
}

fn assert_fixed(code: &str, options: Value, errors: usize, expected: &str) {
    let report = lint(code, options);
    assert_eq!(report.result, LintOutcome::Fixed, "issues: {:?}", report.issues);
    assert_eq!(report.issues.len(), errors, "issues: {:?}", report.issues);
    assert_eq!(report.output, expected);
    assert!(report.remaining.is_empty(), "remaining: {:?}", report.remaining);
}

// ============================================================================
// Valid code
// ============================================================================

#[test]
fn test_no_imports_or_exports() {
    assert_valid("", json!([]));
}

#[test]
fn test_sorted_modules() {
    assert_valid(
        "import 'bar';\nimport 'foo';\nexport * from 'bar';\nexport * from 'foo';",
        json!([]),
    );
}

#[test]
fn test_scoped_first_with_case_groups() {
    assert_valid("import '@angular/core';\nimport 'rxjs';", json!([{ "caseGroups": true }]));
}

#[test]
fn test_blank_line_separates_runs() {
    assert_valid("import 'foo';\n\nimport 'bar';", json!([]));
}

#[test]
fn test_comment_line_separates_runs() {
    assert_valid("import 'foo';\n// pinned\nimport 'bar';", json!([]));
}

#[test]
fn test_code_line_separates_runs() {
    assert_valid("import 'foo';\nfoo();\nimport 'bar';", json!([]));
}

#[test]
fn test_accented_modules_sort_with_base_letter() {
    assert_valid("import 'éclair';\nimport 'zod';", json!([]));
}

#[test]
fn test_sorted_specifiers() {
    assert_valid("import { a, b } from 'foo';", json!([]));
    assert_valid("import { a2, a10 } from 'foo';", json!([]));
    assert_valid("import { a as b, b as a} from 'foo';", json!([]));
}

#[test]
fn test_local_exports_ignored() {
    assert_valid("export const foo = 1;\nexport const bar = 2;", json!([]));
}

#[test]
fn test_type_imports_ignored_by_default() {
    assert_valid(
        "import type foo from 'foo';\nimport 'foo';\nimport 'bar';\nimport type bar from 'bar';",
        json!([]),
    );
}

#[test]
fn test_empty_path() {
    assert_valid("export * from '';", json!([{ "caseGroups": true }]));
}

#[test]
fn test_exports_skipped_when_disabled() {
    assert_valid(
        "export * from 'foo';\nexport * from 'bar';\nexport { b, a } from 'baz';",
        json!({ "sortExports": false }),
    );
}

// ============================================================================
// Invalid code (fixable)
// ============================================================================

#[test]
fn test_unsorted_modules() {
    assert_fixed(
        "import 'foo';\nimport 'bar';\nexport * from 'foo';\nexport * from 'bar';",
        json!([]),
        2,
        "import 'bar';\nimport 'foo';\nexport * from 'bar';\nexport * from 'foo';",
    );
}

#[test]
fn test_unsorted_specifiers() {
    assert_fixed(
        "import { b, a } from 'foo';\nexport { b, a } from 'foo';",
        json!([]),
        2,
        "import { a, b } from 'foo';\nexport { a, b } from 'foo';",
    );
}

#[test]
fn test_mixed_case_specifiers() {
    assert_fixed(
        "import { Ab, ba, Ba, ab } from 'foo';",
        json!([]),
        1,
        "import { ab, Ab, ba, Ba } from 'foo';",
    );
}

#[test]
fn test_case_groups() {
    assert_fixed(
        "import { Ab, ba, Ba, ab } from 'foo';",
        json!([{ "caseGroups": true }]),
        1,
        "import { ab, ba, Ab, Ba } from 'foo';",
    );
}

#[test]
fn test_case_groups_upper_first() {
    assert_fixed(
        "import { Ab, ba, Ba, ab } from 'foo';",
        json!([{ "caseGroups": true, "caseFirst": "upper" }]),
        1,
        "import { Ab, Ba, ab, ba } from 'foo';",
    );
}

#[test]
fn test_non_numeric_collation() {
    assert_fixed(
        "import { a2, a10 } from 'foo';",
        json!([{ "numeric": false }]),
        1,
        "import { a10, a2 } from 'foo';",
    );
}

#[test]
fn test_sort_by_rename() {
    assert_fixed(
        "import { a as b, b as a } from 'foo';",
        json!([{ "specifier": "rename" }]),
        1,
        "import { b as a, a as b } from 'foo';",
    );
}

#[test]
fn test_types_ignored_while_sorting() {
    assert_fixed(
        "import type bar from 'bar';\nimport 'foo';\nimport 'bar';\nimport type foo from 'foo';",
        json!([]),
        1,
        "import type bar from 'bar';\nimport 'bar';\nimport 'foo';\nimport type foo from 'foo';",
    );
}

#[test]
fn test_types_on_top() {
    assert_fixed(
        "import 'foo';\nimport type foo from 'foo';\nimport 'bar';\nimport type bar from 'bar';",
        json!([{ "typesInGroup": "top" }]),
        1,
        "import type bar from 'bar';\nimport type foo from 'foo';\nimport 'bar';\nimport 'foo';",
    );
}

#[test]
fn test_types_on_bottom() {
    assert_fixed(
        "import type foo from 'foo';\nimport 'foo';\nimport type bar from 'bar';\nimport 'bar';",
        json!([{ "typesInGroup": "bottom" }]),
        1,
        "import 'bar';\nimport 'foo';\nimport type bar from 'bar';\nimport type foo from 'foo';",
    );
}

#[test]
fn test_types_above_value() {
    assert_fixed(
        "import 'foo';\nimport 'bar';\nimport type foo from 'foo';\nimport type bar from 'bar';",
        json!([{ "typesInGroup": "above-value" }]),
        1,
        "import type bar from 'bar';\nimport 'bar';\nimport type foo from 'foo';\nimport 'foo';",
    );
}

#[test]
fn test_types_below_value() {
    assert_fixed(
        "import type foo from 'foo';\nimport type bar from 'bar';\nimport 'foo';\nimport 'bar';",
        json!([{ "typesInGroup": "below-value" }]),
        1,
        "import 'bar';\nimport type bar from 'bar';\nimport 'foo';\nimport type foo from 'foo';",
    );
}

#[test]
fn test_inline_types_ignored() {
    assert_fixed(
        "import { type b, a } from 'foo';",
        json!([]),
        1,
        "import { a, type b } from 'foo';",
    );
}

#[test]
fn test_inline_types_start() {
    assert_fixed(
        "import { a, type b } from 'foo';",
        json!([{ "inlineTypes": "start" }]),
        1,
        "import { type b, a } from 'foo';",
    );
}

#[test]
fn test_inline_types_end() {
    assert_fixed(
        "import { type a, b } from 'foo';",
        json!([{ "inlineTypes": "end" }]),
        1,
        "import { b, type a } from 'foo';",
    );
}

#[test]
fn test_accented_specifiers() {
    assert_fixed(
        "import { zed, étoile } from 'x';",
        json!([]),
        1,
        "import { étoile, zed } from 'x';",
    );
}

#[test]
fn test_one_fix_pass_sorts_modules_and_specifiers() {
    let code = "import { b, a } from 'z';\nimport { d, c } from 'y';\n";
    let linter = Linter::new().with_rule(SortImports::from_options(&json!([])).unwrap());

    let first = linter.verify(code).expect("code should parse");
    assert_eq!(first.issues.len(), 3);
    let fixes: FixSet = first.issues.iter().filter_map(|i| i.fix.clone()).collect();
    let output = fixes.apply(code).output;
    assert_eq!(output, "import { c, d } from 'y';\nimport { a, b } from 'z';\n");

    let second = linter.verify(&output).expect("output should parse");
    assert!(second.issues.is_empty(), "issues: {:?}", second.issues);
}

#[test]
fn test_multiline_specifiers_collapse() {
    assert_fixed(
        "import {\n  b,\n  a,\n} from 'foo';",
        json!([]),
        1,
        "import {\n  a, b,\n} from 'foo';",
    );
}

// ============================================================================
// Invalid code (unfixable)
// ============================================================================

#[test]
fn test_comment_inside_run_blocks_fix() {
    let code = "import 'foo'; /* pinned */ import 'bar';";
    let report = lint(code, json!([]));
    assert_eq!(report.result, LintOutcome::Invalid);
    assert_eq!(report.output, code);
    assert_eq!(report.issues[0].message, "Expected modules in group to be sorted");
}
