//! # drlforge - Rule Flow to Drools Compiler
//!
//! **drlforge** turns node-based rule flows, as drawn in a visual editor, into
//! Drools Rule Language (DRL) text, checks DRL text for structural and style
//! problems, generates Java classes for the data models the rules work on, and
//! packages everything into a deployable rule jar.
//!
//! ## Core Workflow
//!
//! The compiler is format-agnostic. It operates on a canonical [`flow::RuleGraph`]
//! and the primary workflow is:
//!
//! 1.  **Load Your Flow**: Read the editor's project document with [`ui::EditorFlow`],
//!     or implement [`flow::IntoRuleGraph`] for your own format.
//! 2.  **Compile**: Use `Compiler::builder` to configure the package, imports and
//!     globals, then compile the graph into rule units or straight to DRL.
//! 3.  **Check**: Run [`checker::check_syntax`] over generated or hand-edited DRL.
//! 4.  **Package**: Build a jar with [`archive::ArchiveBuilder`], including the
//!     generated data-model classes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drlforge::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flow = EditorFlow::from_file("path/to/flow.json")?;
//!     let models = flow.data_models.clone();
//!     let rule_name = flow.rule_name().to_string();
//!
//!     let compiler = Compiler::builder(flow.into_rule_graph()?)
//!         .package_name("com.example.rules")
//!         .with_import("com.example.model.*")
//!         .build();
//!     let drl = compiler.compile_to_drl()?;
//!
//!     let report = check_syntax(&drl);
//!     for issue in &report.warnings {
//!         println!("{}", issue);
//!     }
//!
//!     let jar = ArchiveBuilder::new(&drl, "com.example.rules", &rule_name)
//!         .with_data_models(&models)
//!         .build()?;
//!     std::fs::write(default_archive_name(&rule_name, "1.0.0"), jar)?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod checker;
pub mod compiler;
pub mod emitter;
pub mod error;
pub mod flow;
pub mod model;
pub mod prelude;
pub mod ui;
pub mod value;
