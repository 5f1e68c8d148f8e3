//! Unit tests for core drlforge functionality.
mod common;
use drlforge::compiler::{format_action, format_condition};
use drlforge::prelude::*;
use drlforge::value::{escape_string, format_literal};
use serde_json::json;

#[test]
fn test_literal_formatting() {
    assert_eq!(format_literal(&json!(null)), "null");
    assert_eq!(format_literal(&json!(true)), "true");
    assert_eq!(format_literal(&json!(18)), "18");
    assert_eq!(format_literal(&json!(2.5)), "2.5");
    assert_eq!(format_literal(&json!("a\"b\\c\n")), "\"a\\\"b\\\\c\\n\"");
    assert_eq!(format_literal(&json!([1, "x", [true]])), "1, \"x\", true");
    assert_eq!(format_literal(&json!({"k": 1})), "{\"k\":1}");
}

#[test]
fn test_escape_string_handles_control_whitespace() {
    assert_eq!(escape_string("tab\there\r"), "tab\\there\\r");
}

#[test]
fn test_action_formatting() {
    let set = ActionConfig::new(ActionKind::Set, "score").with_value(json!(1.5));
    assert_eq!(format_action(&set), "$fact.score = 1.5;");

    let call = ActionConfig::new(ActionKind::Call, "order")
        .with_method("notify")
        .with_params(vec![json!("x"), json!(1)]);
    assert_eq!(format_action(&call), "$fact.notify(\"x\", 1);");

    let insert = ActionConfig::new(ActionKind::Insert, "Alert");
    assert_eq!(format_action(&insert), "insert(new Alert());");

    let retract = ActionConfig::new(ActionKind::Retract, "anything");
    assert_eq!(format_action(&retract), "retract($fact);");

    let modify = ActionConfig::new(ActionKind::Modify, "status").with_value(json!("done"));
    assert_eq!(format_action(&modify), "modify($fact) { status = \"done\" };");
}

#[test]
fn test_condition_operator_table() {
    let cases = [
        ("==", "=="),
        ("!=", "!="),
        ("gt", ">"),
        ("lt", "<"),
        ("gte", ">="),
        ("lte", "<="),
        (">=", ">="),
        ("contains", "contains"),
        ("in", "in"),
        ("not in", "not in"),
    ];
    for (wire, drl) in cases {
        let condition: ConditionConfig =
            serde_json::from_value(json!({ "field": "f", "operator": wire, "value": 1 })).unwrap();
        assert_eq!(format_condition(&condition), format!("$fact: f {} 1", drl));
    }
}

#[test]
fn test_node_kind_round_trip_names() {
    for kind in ["start", "end", "condition", "action", "decision", "group"] {
        assert_eq!(NodeKind::parse(kind).map(|k| k.as_str()), Some(kind));
    }
    assert_eq!(NodeKind::parse("loop"), None);
}

#[test]
fn test_error_display() {
    let err = CompileError::InvalidConfig {
        node_id: "c1".to_string(),
        message: "condition requires a non-empty 'field'".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Node 'c1' has an invalid configuration: condition requires a non-empty 'field'"
    );

    let err = ConversionError::InvalidNodeType {
        node_id: "n9".to_string(),
        type_name: "loop".to_string(),
    };
    assert_eq!(err.to_string(), "Node 'n9' has an unknown node type: 'loop'");
}

#[test]
fn test_issue_display() {
    let result = check_syntax("rule \"r");
    assert_eq!(
        result.errors[0].to_string(),
        "1:7: error [UNCLOSED_STRING] Unclosed string literal (\") (Close the string on the same line)"
    );
    assert_eq!(IssueCode::SingleEquals.to_string(), "SINGLE_EQUALS");
}
