use clap::{Args, Parser, Subcommand};
use drlforge::archive::{BuildConfig, default_bundle_name, export_bundle};
use drlforge::compiler::{DEFAULT_MODEL_IMPORT, DEFAULT_PACKAGE};
use drlforge::model::generate_all;
use drlforge::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compile visual rule flows into Drools DRL, check DRL files and package rule jars
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a rule flow document to DRL
    Compile {
        #[command(flatten)]
        compile: CompileArgs,
        /// Write the DRL to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a DRL file for structural and style issues
    Check {
        /// Path to the DRL file
        drl_path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate Java sources for the data models of a rule flow document
    Models {
        /// Path to the rule flow JSON file
        flow_path: PathBuf,
        /// Directory the package tree is written into
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,
    },
    /// Build a deployable rule jar
    Jar {
        #[command(flatten)]
        compile: CompileArgs,
        /// Optional build configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output path; defaults to <rule-name>-<version>.jar
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export DRL, a README and the flow snapshot as a plain zip
    Export {
        #[command(flatten)]
        compile: CompileArgs,
        /// Output path; defaults to <rule-name>-drools-package.zip
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Path to the rule flow JSON file
    flow_path: PathBuf,
    /// Package declared at the top of the DRL
    #[arg(short, long, default_value = DEFAULT_PACKAGE)]
    package: String,
    /// Import to declare; may be repeated (defaults to the data-model import)
    #[arg(long = "import")]
    imports: Vec<String>,
    /// Global to declare, e.g. "java.util.List results"; may be repeated
    #[arg(long = "global")]
    globals: Vec<String>,
    /// Mark every rule no-loop
    #[arg(long)]
    no_loop: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile { compile, output } => run_compile(&compile, output),
        Command::Check { drl_path, json } => run_check(&drl_path, json),
        Command::Models {
            flow_path,
            output_dir,
        } => run_models(&flow_path, &output_dir),
        Command::Jar {
            compile,
            config,
            output,
        } => run_jar(&compile, config, output),
        Command::Export { compile, output } => run_export(&compile, output),
    }
}

fn load_flow(path: &Path) -> EditorFlow {
    EditorFlow::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn compile_flow(args: &CompileArgs, flow: &EditorFlow) -> String {
    let graph = flow
        .clone()
        .into_rule_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert flow: {}", e)));

    let mut builder = Compiler::builder(graph)
        .package_name(&args.package)
        .no_loop(args.no_loop);
    if args.imports.is_empty() {
        builder = builder.with_import(DEFAULT_MODEL_IMPORT);
    }
    for import in &args.imports {
        builder = builder.with_import(import);
    }
    for global in &args.globals {
        builder = builder.with_global(global);
    }

    let start = Instant::now();
    let drl = builder
        .build()
        .compile_to_drl()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    tracing::debug!(elapsed = ?start.elapsed(), "Compilation finished");
    drl
}

fn run_compile(args: &CompileArgs, output: Option<PathBuf>) {
    let flow = load_flow(&args.flow_path);
    let drl = compile_flow(args, &flow);
    match output {
        Some(path) => {
            write_file(&path, drl.as_bytes());
            println!("DRL written to {}", path.display());
        }
        None => print!("{}", drl),
    }
}

fn run_check(drl_path: &Path, json: bool) {
    let drl = fs::read_to_string(drl_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read DRL file '{}': {}",
            drl_path.display(),
            e
        ))
    });
    let report = check_syntax(&drl);

    if json {
        let text = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
        println!("{}", text);
    } else {
        for issue in report.errors.iter().chain(report.warnings.iter()) {
            println!("{}", issue);
        }
        println!(
            "\n{} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    if !report.valid {
        std::process::exit(1);
    }
}

fn run_models(flow_path: &Path, output_dir: &Path) {
    let flow = load_flow(flow_path);
    let sources = generate_all(&flow.data_models)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    for (relative, source) in &sources {
        let path = output_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                exit_with_error(&format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            });
        }
        write_file(&path, source.as_bytes());
    }
    println!(
        "Generated {} class(es) in {}",
        sources.len(),
        output_dir.display()
    );
}

fn run_jar(args: &CompileArgs, config: Option<PathBuf>, output: Option<PathBuf>) {
    let flow = load_flow(&args.flow_path);
    let drl = compile_flow(args, &flow);
    let config = match config {
        Some(path) => BuildConfig::from_file(&path).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to load build config '{}': {}",
                path.display(),
                e
            ))
        }),
        None => BuildConfig::default(),
    };

    let rule_name = flow.rule_name();
    let output =
        output.unwrap_or_else(|| PathBuf::from(default_archive_name(rule_name, &config.version)));
    let jar = ArchiveBuilder::new(&drl, &args.package, rule_name)
        .with_data_models(&flow.data_models)
        .with_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build archive: {}", e)));

    write_file(&output, &jar);
    println!("Rule archive written to {}", output.display());
}

fn run_export(args: &CompileArgs, output: Option<PathBuf>) {
    let flow = load_flow(&args.flow_path);
    let drl = compile_flow(args, &flow);
    let output = output.unwrap_or_else(|| PathBuf::from(default_bundle_name(flow.rule_name())));
    let bundle = export_bundle(&drl, &flow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to export bundle: {}", e)));

    write_file(&output, &bundle);
    println!("Export written to {}", output.display());
}

fn write_file(path: &Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
    });
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
