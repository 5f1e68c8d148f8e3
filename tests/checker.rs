//! Tests for the DRL syntax and style checker.
mod common;
use common::*;
use drlforge::prelude::*;

fn error_codes(result: &CheckResult) -> Vec<IssueCode> {
    result.errors.iter().map(|i| i.code).collect()
}

fn warning_codes(result: &CheckResult) -> Vec<IssueCode> {
    result.warnings.iter().map(|i| i.code).collect()
}

#[test]
fn test_valid_document_has_no_errors() {
    let result = check_syntax(VALID_DRL);
    assert!(result.valid);
    assert!(result.errors.is_empty(), "Unexpected errors: {:?}", result.errors);
    // Two-space indentation is only a style warning.
    assert!(result.has_code(IssueCode::Indentation));
}

#[test]
fn test_missing_end_is_a_single_error() {
    let drl = VALID_DRL.replace("end\n", "");
    let result = check_syntax(&drl);

    assert!(!result.valid);
    assert_eq!(error_codes(&result), vec![IssueCode::MissingEnd]);
    assert_eq!(result.errors[0].line, 2);
}

#[test]
fn test_unclosed_string_position() {
    let result = check_syntax("rule \"r");

    assert_eq!(error_codes(&result), vec![IssueCode::UnclosedString]);
    let issue = &result.errors[0];
    assert_eq!((issue.line, issue.column), (1, 7));
    assert_eq!(issue.severity, Severity::Error);
    assert!(result.has_code(IssueCode::MissingPackage));
}

#[test]
fn test_empty_and_rule_less_documents() {
    let empty = check_syntax("   \n");
    assert_eq!(error_codes(&empty), vec![IssueCode::EmptyCode]);

    let no_rule = check_syntax("package com.rules;\n");
    assert_eq!(error_codes(&no_rule), vec![IssueCode::NoRule]);
}

#[test]
fn test_package_declaration_errors() {
    let invalid = check_syntax("package Com.Rules;\nrule \"r\"\nwhen\n    $a: A()\nthen\n    doX();\nend\n");
    assert_eq!(error_codes(&invalid), vec![IssueCode::InvalidPackage]);
    assert_eq!((invalid.errors[0].line, invalid.errors[0].column), (1, 9));

    let unterminated = check_syntax("package x\nrule \"r\"\nwhen\n    $a: A()\nthen\n    doX();\nend\n");
    assert_eq!(error_codes(&unterminated), vec![IssueCode::MissingSemicolon]);
    assert_eq!(
        (unterminated.errors[0].line, unterminated.errors[0].column),
        (1, 10)
    );
}

#[test]
fn test_import_and_global_checks() {
    let drl = "package x;\n\
               import com.example.Foo\n\
               import Foo-Bar;\n\
               global results;\n\
               global java.util.List names\n\
               rule \"r\"\nwhen\n    $a: A()\nthen\n    doX();\nend\n";
    let result = check_syntax(drl);

    assert_eq!(
        error_codes(&result),
        vec![
            IssueCode::ImportMissingSemicolon,
            IssueCode::InvalidGlobal,
            IssueCode::GlobalMissingSemicolon,
        ]
    );
    assert_eq!(warning_codes(&result), vec![IssueCode::SuspiciousImport]);
    assert_eq!(result.errors[0].line, 2);
    assert_eq!(result.warnings[0].line, 3);
}

#[test]
fn test_keyword_order_and_scoping() {
    let wrong_order = check_syntax("package x;\nrule \"r\"\nthen\n    doX();\nwhen\n    $a: A()\nend\n");
    assert_eq!(error_codes(&wrong_order), vec![IssueCode::WrongOrder]);

    let second_rule_broken = "package x;\n\
                              rule \"a\"\nwhen\n    $a: A()\nthen\n    doX();\nend\n\
                              rule \"b\"\nthen\n    doY();\nend\n";
    let result = check_syntax(second_rule_broken);
    assert_eq!(error_codes(&result), vec![IssueCode::MissingWhen]);
    assert_eq!((result.errors[0].line, result.errors[0].column), (8, 1));
    assert!(result.errors[0].message.contains("\"b\""));
}

#[test]
fn test_mismatched_keyword_counts() {
    let drl = "package x;\nrule \"r\"\nwhen\n    $a: A()\nthen\nthen\n    doX();\nend\n";
    let result = check_syntax(drl);
    assert_eq!(error_codes(&result), vec![IssueCode::MismatchedKeywords]);
}

#[test]
fn test_bracket_balance_ignores_string_contents() {
    let unclosed = "package x;\nrule \"r\"\nwhen\n    $a: Foo(name == \"(\")\nthen\n    doX(;\nend\n";
    let result = check_syntax(unclosed);
    assert_eq!(error_codes(&result), vec![IssueCode::UnclosedBracket]);
    assert_eq!((result.errors[0].line, result.errors[0].column), (6, 8));

    let mismatched = check_syntax("package x;\nrule \"r\"\nwhen\n    $a: A()\nthen\n    doX(];\nend\n");
    assert_eq!(error_codes(&mismatched), vec![IssueCode::MismatchedBrackets]);

    let extra = check_syntax("package x;\nrule \"r\"\nwhen\n    $a: A()\nthen\n    doX());\nend\n");
    assert_eq!(error_codes(&extra), vec![IssueCode::UnmatchedClosing]);
}

#[test]
fn test_brackets_may_span_lines() {
    let drl = "package x;\nrule \"r\"\nwhen\n    $a: A(\n        b > 1\n    )\nthen\n    doX();\nend\n";
    assert!(check_syntax(drl).valid);
}

#[test]
fn test_single_equals_only_flagged_outside_then() {
    let drl = "package x;\nrule \"r\"\nwhen\n    $a: Foo(x = 1)\nthen\n    $a.y = 2;\nend\n";
    let result = check_syntax(drl);

    assert_eq!(error_codes(&result), vec![IssueCode::SingleEquals]);
    assert_eq!((result.errors[0].line, result.errors[0].column), (4, 15));
}

#[test]
fn test_variable_naming_warnings() {
    let drl = "package x;\nrule \"r\"\nwhen\n    $Person: Person()\n    $rule: Rule()\nthen\n    doX();\nend\n";
    let result = check_syntax(drl);

    assert!(result.valid);
    assert_eq!(
        warning_codes(&result),
        vec![IssueCode::VariableUppercase, IssueCode::VariableKeyword]
    );
    assert_eq!(result.warnings[0].column, 5);
}

#[test]
fn test_common_mistake_warnings() {
    let drl = "package x;\n\
               rule \"r\"\n\
               when\n    $a: A()\n\
               then\n\
               \x20   if ($a.b == null) {\n\
               \x20       for (int i = 0; i < 3; i++) {\n\
               \x20       }\n\
               \x20   }\n\
               end\n";
    let result = check_syntax(drl);

    assert!(result.valid, "Unexpected errors: {:?}", result.errors);
    assert!(result.has_code(IssueCode::IfStatement));
    assert!(result.has_code(IssueCode::NullCheck));
    assert!(result.has_code(IssueCode::LoopStatement));
}

#[test]
fn test_tab_indentation() {
    let result = check_syntax("package x;\nrule \"r\"\nwhen\n\t$a: A()\nthen\n\tdoX();\nend\n");
    assert!(result.valid);
    assert_eq!(
        warning_codes(&result),
        vec![IssueCode::TabCharacter, IssueCode::TabCharacter]
    );
}

#[test]
fn test_checker_is_repeatable() {
    let checker = SyntaxChecker::new();
    let drl = VALID_DRL.replace("end\n", "");
    assert_eq!(checker.check(&drl), checker.check(&drl));
}

#[test]
fn test_report_serializes_codes() {
    let drl = VALID_DRL.replace("end\n", "");
    let json = serde_json::to_value(check_syntax(&drl)).unwrap();

    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"][0]["code"], "MISSING_END");
    assert_eq!(json["errors"][0]["severity"], "error");
}
