//! Prelude module for convenient imports
//!
//! Re-exports the types and functions most callers need to load a flow,
//! compile it, check the result and package it.
//!
//! ```rust,no_run
//! use drlforge::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow = EditorFlow::from_file("path/to/flow.json")?;
//! let drl = Compiler::builder(flow.into_rule_graph()?).build().compile_to_drl()?;
//! assert!(check_syntax(&drl).valid);
//! # Ok(())
//! # }
//! ```

// Flow model and conversion
pub use crate::flow::{
    ActionConfig, ActionKind, ConditionConfig, ConditionOperator, Connection, DecisionConfig,
    GroupConfig, IntoRuleGraph, NodeConfig, NodeKind, RuleGraph, RuleNode,
};
pub use crate::ui::EditorFlow;

// Compilation and emission
pub use crate::compiler::{Compiler, RuleUnit, compile, compile_graph};
pub use crate::emitter::{RulePackage, emit};

// Checking
pub use crate::checker::{CheckResult, IssueCode, Severity, SyntaxChecker, SyntaxIssue, check_syntax};

// Data models and packaging
pub use crate::archive::{ArchiveBuilder, BuildConfig, build_archive, default_archive_name};
pub use crate::model::{DataModel, DataModelField, FieldType, generate_class};

// Error types
pub use crate::error::{ArchiveError, CompileError, ConversionError, ModelError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
