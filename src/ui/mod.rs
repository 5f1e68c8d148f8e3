//! The editor's persisted project document and its conversion into a
//! [`RuleGraph`](crate::flow::RuleGraph).
pub mod document;

pub use document::{EditorFlow, EditorNode, EditorNodeData, FlowMetadata, Position};
