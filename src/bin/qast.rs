//! qast — inspect compiled query ASTs
//!
//! # Usage
//!
//! ```bash
//! # Compile a query description to AST JSON
//! qast compile query.json
//!
//! # Read from stdin, render as a tree
//! echo '{"target":"orders","limit":10}' | qast compile - --format tree
//!
//! # Explain: tree plus SQL-like rendering
//! qast explain query.json
//!
//! # Strict field reference check only
//! qast check query.json --strict
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qast::fmt::Formatter;
use qast::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile declarative query descriptions into ASTs", long_about = None)]
#[command(after_help = "EXAMPLES:
    qast compile query.json
    qast compile - --format tree < query.json
    qast explain query.json --honor-operators
    qast check query.json --strict")]
struct Cli {
    /// Config file (defaults to ./qast.toml, then the user config dir)
    #[arg(long, global = true, env = "QAST_CONFIG")]
    config: Option<PathBuf>,

    /// Reject malformed field references
    #[arg(long, global = true)]
    strict: bool,

    /// Maximum filter nesting depth
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Compile conditions with their declared operators
    #[arg(long, global = true)]
    honor_operators: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Tree,
    Sql,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query description and print the AST
    Compile {
        /// Query description JSON file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Show the AST tree and its SQL-like rendering
    Explain {
        /// Query description JSON file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Check field references without compiling
    Check {
        /// Query description JSON file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "qast=debug" } else { "qast=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    tracing::debug!(?config, "effective configuration");

    match &cli.command {
        Commands::Compile { input, format } => {
            let query = read_query(input)?;
            let ast = QueryCompiler::with_config(config).build(&query)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ast)?),
                OutputFormat::Tree => print!("{}", Formatter::new().format(&ast)?),
                OutputFormat::Sql => println!("{}", ast),
            }
        }
        Commands::Explain { input } => {
            let query = read_query(input)?;
            let ast = QueryCompiler::with_config(config).build(&query)?;
            explain(&query, &ast)?;
        }
        Commands::Check { input } => {
            let query = read_query(input)?;
            qast::validate::check_field_refs(&query)?;
            println!("{} all field references are valid", "✓".green());
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::discover()?,
    };
    if cli.strict {
        config.strict_field_refs = true;
    }
    if cli.honor_operators {
        config.honor_condition_operators = true;
    }
    if let Some(depth) = cli.max_depth {
        anyhow::ensure!(depth > 0, "--max-depth must be at least 1");
        config.max_filter_depth = depth;
    }
    Ok(config)
}

fn read_query(input: &str) -> Result<QueryDescription> {
    let json = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };
    QueryDescription::from_json(&json).with_context(|| format!("Invalid query description in {}", input))
}

fn explain(query: &QueryDescription, ast: &Ast) -> Result<()> {
    println!("{}", "Query Explanation".cyan().bold());
    println!();
    println!("  {} {}", "Target:".dimmed(), query.target.white());
    if !query.fields.is_empty() {
        println!("  {} {}", "Fields:".dimmed(), query.fields.join(", ").white());
    }
    if !query.joins.is_empty() {
        println!("  {} {}", "Joins:".dimmed(), query.joins.len().to_string().cyan());
    }
    if let Some(filter) = &query.filter {
        let leaves = count_leaves(filter);
        println!("  {} {} condition(s)", "Filter:".dimmed(), leaves.to_string().cyan());
    }
    println!();
    println!("{}", "AST:".green().bold());
    for line in Formatter::new().format(ast)?.lines() {
        println!("  {}", line);
    }
    println!();
    println!("{}", "Rendered:".green().bold());
    println!("  {}", ast.to_string().white());
    Ok(())
}

fn count_leaves(tree: &ConditionTree) -> usize {
    match tree {
        ConditionTree::Leaf(_) => 1,
        ConditionTree::Group(group) => {
            let mut count = 0;
            let mut pending = vec![group];
            while let Some(group) = pending.pop() {
                count += group.conditions.len();
                pending.extend(group.groups.iter());
            }
            count
        }
    }
}
