use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The complete, canonical definition of a rule flow, ready for compilation.
/// This is the target structure for any editor format conversion.
#[derive(Debug, Clone, Default)]
pub struct RuleGraph {
    pub nodes: Vec<RuleNode>,
    pub connections: Vec<Connection>,
}

impl RuleGraph {
    pub fn new(nodes: Vec<RuleNode>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }
}

/// A single node of the rule flow.
///
/// The node's kind is derived from its configuration variant, so a node can
/// never carry a configuration that does not belong to its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    pub id: String,
    pub label: String,
    pub config: NodeConfig,
}

impl RuleNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            config,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }
}

/// The kind of a node as the editor declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Condition,
    Action,
    Decision,
    Group,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Condition => "condition",
            NodeKind::Action => "action",
            NodeKind::Decision => "decision",
            NodeKind::Group => "group",
        }
    }

    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            "start" => Some(NodeKind::Start),
            "end" => Some(NodeKind::End),
            "condition" => Some(NodeKind::Condition),
            "action" => Some(NodeKind::Action),
            "decision" => Some(NodeKind::Decision),
            "group" => Some(NodeKind::Group),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific node configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Start,
    End,
    Condition(ConditionConfig),
    Action(ActionConfig),
    Decision(DecisionConfig),
    Group(GroupConfig),
}

impl NodeConfig {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Start => NodeKind::Start,
            NodeConfig::End => NodeKind::End,
            NodeConfig::Condition(_) => NodeKind::Condition,
            NodeConfig::Action(_) => NodeKind::Action,
            NodeConfig::Decision(_) => NodeKind::Decision,
            NodeConfig::Group(_) => NodeKind::Group,
        }
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "sourceNodeId")]
    pub source: String,
    #[serde(alias = "targetNodeId")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }
}

/// Comparison operators available to condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "gt", alias = ">")]
    Gt,
    #[serde(rename = "lt", alias = "<")]
    Lt,
    #[serde(rename = "gte", alias = ">=")]
    Gte,
    #[serde(rename = "lte", alias = "<=")]
    Lte,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

impl ConditionOperator {
    /// The DRL spelling of the operator.
    pub fn as_drl(&self) -> &'static str {
        match self {
            ConditionOperator::Eq => "==",
            ConditionOperator::Neq => "!=",
            ConditionOperator::Gt => ">",
            ConditionOperator::Lt => "<",
            ConditionOperator::Gte => ">=",
            ConditionOperator::Lte => "<=",
            ConditionOperator::Contains => "contains",
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "not in",
        }
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, ConditionOperator::In | ConditionOperator::NotIn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfig {
    #[serde(default)]
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Set,
    Call,
    Insert,
    Retract,
    Modify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl ActionConfig {
    pub fn new(kind: ActionKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            value: None,
            method: None,
            params: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(params);
        self
    }
}

/// Ambient grouping metadata applied to every rule compiled below a group node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salience: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionConfig {
    #[serde(default)]
    pub expression: String,
    #[serde(default)]
    pub then_actions: Vec<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_actions: Option<Vec<ActionConfig>>,
}
