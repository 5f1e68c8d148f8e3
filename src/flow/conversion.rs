use super::definition::RuleGraph;
use crate::error::ConversionError;

/// A trait for editor formats that can be converted into a `RuleGraph`.
///
/// This is the extension point that keeps the compiler format-agnostic. The
/// built-in editor document (`crate::ui::EditorFlow`) implements it; other
/// front ends implement it on their own structs.
///
/// # Example
///
/// ```rust,no_run
/// use drlforge::error::ConversionError;
/// use drlforge::flow::{IntoRuleGraph, NodeConfig, RuleGraph, RuleNode};
///
/// struct MyNode { id: String, is_entry: bool }
/// struct MyFlow { nodes: Vec<MyNode> }
///
/// impl IntoRuleGraph for MyFlow {
///     fn into_rule_graph(self) -> Result<RuleGraph, ConversionError> {
///         let nodes = self
///             .nodes
///             .into_iter()
///             .map(|n| {
///                 let config = if n.is_entry { NodeConfig::Start } else { NodeConfig::End };
///                 RuleNode::new(n.id, "", config)
///             })
///             .collect();
///         Ok(RuleGraph::new(nodes, vec![]))
///     }
/// }
/// ```
pub trait IntoRuleGraph {
    /// Consumes the object and converts it into a compilable rule graph.
    fn into_rule_graph(self) -> Result<RuleGraph, ConversionError>;
}

impl IntoRuleGraph for RuleGraph {
    fn into_rule_graph(self) -> Result<RuleGraph, ConversionError> {
        Ok(self)
    }
}
