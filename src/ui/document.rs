use crate::error::ConversionError;
use crate::flow::{
    ActionConfig, ConditionConfig, Connection, DecisionConfig, GroupConfig, IntoRuleGraph,
    NodeConfig, NodeKind, RuleGraph, RuleNode,
};
use crate::model::DataModel;
use ahash::AHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Canvas position of a node. Carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Label and raw configuration object of an editor node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorNodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub config: Value,
}

/// A node as the editor stores it: the `type` string decides how `config` is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub data: EditorNodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_flow_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_flow_version() -> String {
    "1.0.0".to_string()
}

impl Default for FlowMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            version: default_flow_version(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A saved rule-flow project: the graph, its metadata and the data models it uses.
///
/// Both `connections` and the editor's `edges` spelling are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFlow {
    #[serde(default)]
    pub nodes: Vec<EditorNode>,
    #[serde(default, alias = "edges")]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: FlowMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_models: Vec<DataModel>,
}

impl EditorFlow {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConversionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConversionError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Rule name used for generated artifacts, falling back to the rule-set default.
    pub fn rule_name(&self) -> &str {
        let name = self.metadata.name.trim();
        if name.is_empty() {
            crate::compiler::DEFAULT_RULE_SET_NAME
        } else {
            name
        }
    }
}

impl EditorNode {
    /// Resolves the raw `config` object into the configuration of the declared kind.
    pub fn resolve_config(&self) -> Result<NodeConfig, ConversionError> {
        let kind =
            NodeKind::parse(&self.node_type).ok_or_else(|| ConversionError::InvalidNodeType {
                node_id: self.id.clone(),
                type_name: self.node_type.clone(),
            })?;

        Ok(match kind {
            NodeKind::Start => NodeConfig::Start,
            NodeKind::End => NodeConfig::End,
            NodeKind::Condition => NodeConfig::Condition(self.parse_config::<ConditionConfig>()?),
            NodeKind::Action => NodeConfig::Action(self.parse_config::<ActionConfig>()?),
            NodeKind::Decision => NodeConfig::Decision(self.parse_config::<DecisionConfig>()?),
            NodeKind::Group => NodeConfig::Group(self.parse_config::<GroupConfig>()?),
        })
    }

    fn parse_config<T: DeserializeOwned>(&self) -> Result<T, ConversionError> {
        // A missing config reads as an empty object so optional-only configs still resolve.
        let raw = match &self.data.config {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        serde_json::from_value(raw).map_err(|e| ConversionError::InvalidConfig {
            node_id: self.id.clone(),
            type_name: self.node_type.clone(),
            message: e.to_string(),
        })
    }
}

impl IntoRuleGraph for EditorFlow {
    fn into_rule_graph(self) -> Result<RuleGraph, ConversionError> {
        let mut seen = AHashSet::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(ConversionError::ValidationError(format!(
                    "Duplicate node id '{}'",
                    node.id
                )));
            }
            let config = node.resolve_config()?;
            nodes.push(RuleNode::new(node.id.clone(), node.data.label.clone(), config));
        }

        Ok(RuleGraph::new(nodes, self.connections))
    }
}
