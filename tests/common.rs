//! Common test utilities for building rule graphs, editor documents and data models.
use drlforge::prelude::*;
use serde_json::json;

#[allow(dead_code)]
pub fn start(id: &str) -> RuleNode {
    RuleNode::new(id, "Start", NodeConfig::Start)
}

#[allow(dead_code)]
pub fn end(id: &str) -> RuleNode {
    RuleNode::new(id, "End", NodeConfig::End)
}

#[allow(dead_code)]
pub fn condition(id: &str, field: &str, operator: ConditionOperator, value: serde_json::Value) -> RuleNode {
    RuleNode::new(
        id,
        "Condition",
        NodeConfig::Condition(ConditionConfig {
            field: field.to_string(),
            operator,
            value,
            logical_operator: None,
        }),
    )
}

#[allow(dead_code)]
pub fn action(id: &str, config: ActionConfig) -> RuleNode {
    RuleNode::new(id, "Action", NodeConfig::Action(config))
}

#[allow(dead_code)]
pub fn group(id: &str, config: GroupConfig) -> RuleNode {
    RuleNode::new(id, "Group", NodeConfig::Group(config))
}

#[allow(dead_code)]
pub fn decision(id: &str, config: DecisionConfig) -> RuleNode {
    RuleNode::new(id, "Decision", NodeConfig::Decision(config))
}

#[allow(dead_code)]
pub fn set_action(target: &str, value: serde_json::Value) -> ActionConfig {
    ActionConfig::new(ActionKind::Set, target).with_value(value)
}

/// Connects the given node ids in pairs: `[("a", "b"), ("b", "c")]`.
#[allow(dead_code)]
pub fn connect(pairs: &[(&str, &str)]) -> Vec<Connection> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (source, target))| Connection::new(format!("e{}", i + 1), *source, *target))
        .collect()
}

/// Creates the adult-check flow.
///
/// Logic: `start -> c1 ($fact.age >= 18) -> a1 (isAdult = true) -> end`
#[allow(dead_code)]
pub fn create_adult_flow() -> RuleGraph {
    RuleGraph::new(
        vec![
            start("s"),
            condition("c1", "$fact.age", ConditionOperator::Gte, json!(18)),
            action("a1", set_action("isAdult", json!(true))),
            end("e"),
        ],
        connect(&[("s", "c1"), ("c1", "a1"), ("a1", "e")]),
    )
}

/// The same adult-check flow as the editor persists it.
#[allow(dead_code)]
pub const ADULT_FLOW_JSON: &str = r#"{
    "nodes": [
        { "id": "s", "type": "start", "position": { "x": 0, "y": 0 }, "data": { "label": "Start" } },
        {
            "id": "c1",
            "type": "condition",
            "position": { "x": 200, "y": 0 },
            "data": {
                "label": "Is adult",
                "config": { "field": "$fact.age", "operator": "gte", "value": 18 }
            }
        },
        {
            "id": "a1",
            "type": "action",
            "data": {
                "label": "Mark adult",
                "config": { "type": "set", "target": "isAdult", "value": true }
            }
        },
        { "id": "e", "type": "end", "data": { "label": "End" } }
    ],
    "edges": [
        { "id": "e1", "source": "s", "target": "c1" },
        { "id": "e2", "source": "c1", "target": "a1", "sourceHandle": "true" },
        { "id": "e3", "source": "a1", "target": "e" }
    ],
    "metadata": { "name": "Adult Check", "version": "1.2.0" },
    "dataModels": [
        {
            "id": "m1",
            "name": "Customer",
            "packageName": "com.example.model",
            "fields": [
                { "id": "f1", "name": "name", "type": "string", "required": true },
                { "id": "f2", "name": "age", "type": "number" }
            ]
        }
    ]
}"#;

/// `Customer` with a required `name` and an optional `age`.
#[allow(dead_code)]
pub fn create_customer_model() -> DataModel {
    DataModel::new("Customer", "com.example.model")
        .with_field(DataModelField::new("name", FieldType::String).required())
        .with_field(DataModelField::new("age", FieldType::Number))
}

/// A small valid DRL document.
#[allow(dead_code)]
pub const VALID_DRL: &str = "package x;\nrule \"r\"\nwhen\n  $a: Foo()\nthen\n  doX();\nend\n";
