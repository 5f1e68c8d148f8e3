use crate::emitter::RulePackage;
use crate::error::CompileError;
use crate::flow::{Connection, NodeKind, RuleGraph, RuleNode};
use serde::Serialize;
use tracing::info;

mod statements;
mod traversal;

pub use statements::{format_action, format_condition};
use traversal::RuleWalker;

/// Package used when the caller does not name one.
pub const DEFAULT_PACKAGE: &str = "com.rules";
/// Import added by [`compile_graph`] so generated data-model classes resolve.
pub const DEFAULT_MODEL_IMPORT: &str = "com.model.*";
/// Name given to the compiled rule package.
pub const DEFAULT_RULE_SET_NAME: &str = "GeneratedRules";

/// One compiled `when/then` block, with optional priority and grouping metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleUnit {
    pub name: String,
    pub salience: Option<i32>,
    pub agenda_group: Option<String>,
    pub activation_group: Option<String>,
    pub no_loop: bool,
    pub when_clauses: Vec<String>,
    pub then_statements: Vec<String>,
}

/// Compiles a `RuleGraph` into rule units and DRL text.
pub struct Compiler {
    graph: RuleGraph,
    package_name: String,
    imports: Vec<String>,
    globals: Vec<String>,
    no_loop: bool,
}

pub struct CompilerBuilder {
    graph: RuleGraph,
    package_name: String,
    imports: Vec<String>,
    globals: Vec<String>,
    no_loop: bool,
}

impl CompilerBuilder {
    pub fn new(graph: RuleGraph) -> Self {
        Self {
            graph,
            package_name: DEFAULT_PACKAGE.to_string(),
            imports: Vec::new(),
            globals: Vec::new(),
            no_loop: false,
        }
    }
    pub fn package_name(mut self, package_name: &str) -> Self {
        self.package_name = package_name.to_string();
        self
    }
    pub fn with_import(mut self, import: &str) -> Self {
        self.imports.push(import.to_string());
        self
    }
    pub fn with_global(mut self, global: &str) -> Self {
        self.globals.push(global.to_string());
        self
    }
    /// Marks every emitted rule `no-loop true`.
    pub fn no_loop(mut self, no_loop: bool) -> Self {
        self.no_loop = no_loop;
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            graph: self.graph,
            package_name: self.package_name,
            imports: self.imports,
            globals: self.globals,
            no_loop: self.no_loop,
        }
    }
}

impl Compiler {
    pub fn builder(graph: RuleGraph) -> CompilerBuilder {
        CompilerBuilder::new(graph)
    }

    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    /// Walks the graph from every `Start` node and returns the rule units in
    /// emission order.
    ///
    /// Fails on the first invalid node configuration or on a cycle reachable
    /// from an entry node; no partial output is returned.
    pub fn compile(&self) -> Result<Vec<RuleUnit>, CompileError> {
        compile_units(&self.graph.nodes, &self.graph.connections, self.no_loop)
    }

    /// Compiles the graph and wraps the units into a `RulePackage` carrying this
    /// compiler's package name, imports and globals.
    pub fn compile_package(&self) -> Result<RulePackage, CompileError> {
        let mut package = RulePackage::new(DEFAULT_RULE_SET_NAME, &self.package_name);
        for import in &self.imports {
            package.add_import(import);
        }
        for global in &self.globals {
            package.add_global(global);
        }
        package.rules = self.compile()?;
        Ok(package)
    }

    pub fn compile_to_drl(&self) -> Result<String, CompileError> {
        Ok(self.compile_package()?.to_drl())
    }
}

/// Compiles nodes and connections into rule units with default options.
pub fn compile(nodes: &[RuleNode], connections: &[Connection]) -> Result<Vec<RuleUnit>, CompileError> {
    compile_units(nodes, connections, false)
}

/// Compiles nodes and connections straight to DRL text, using the default
/// package and the data-model import.
pub fn compile_graph(nodes: &[RuleNode], connections: &[Connection]) -> Result<String, CompileError> {
    let mut package = RulePackage::new(DEFAULT_RULE_SET_NAME, DEFAULT_PACKAGE);
    package.add_import(DEFAULT_MODEL_IMPORT);
    package.rules = compile(nodes, connections)?;
    Ok(package.to_drl())
}

fn compile_units(
    nodes: &[RuleNode],
    connections: &[Connection],
    no_loop: bool,
) -> Result<Vec<RuleUnit>, CompileError> {
    let mut walker = RuleWalker::new(nodes, connections, no_loop);
    let entries: Vec<&RuleNode> = nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Start)
        .collect();

    for entry in &entries {
        walker.walk_from(entry)?;
    }

    let units = walker.finish();
    info!(
        entries = entries.len(),
        rules = units.len(),
        "Compiled rule flow"
    );
    Ok(units)
}
