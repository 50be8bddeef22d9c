//! Interleave DDL CLI Tool
//!
//! Prints ordered, dialect-correct and batched DDL for a schema description.
//! Live index checks use an optional catalog snapshot file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use interleave_ddl::{
    order_tables, Direction, LiveIndexTracker, SchemaAction, SchemaConfig, SchemaTool,
};
use interleave_ddl_cli::schema_file::{format_statements, load_catalog, load_namespace};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "interleave-ddl")]
#[command(about = "DDL planner for interleaved schemas")]
#[command(version = "0.1.0")]
struct Cli {
    /// Schema description file (TOML)
    #[arg(long)]
    schema: PathBuf,

    /// Live catalog snapshot (JSON); without it existence checks are skipped
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to config/interleave.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not wrap statements in START BATCH DDL / RUN BATCH
    #[arg(long)]
    no_batch: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create all tables, parents first
    Create {
        /// Drop existing tables before creating them
        #[arg(long)]
        drop_first: bool,
    },

    /// Drop all existing tables, children first
    Drop,

    /// Create missing tables and unique keys
    Update,

    /// Print the table order
    Order {
        /// Print the drop order instead of the create order
        #[arg(long)]
        drop: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&cli) {
        Ok(()) => {
            if !cli.quiet {
                eprintln!("{}", "✔ Done".green());
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "✘ Error:".red(), e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => SchemaConfig::load_from(path)?,
        None => SchemaConfig::load()?,
    };
    if cli.no_batch {
        config = config.without_batching();
    }

    let namespace = load_namespace(&cli.schema)?;
    let catalog = cli.catalog.as_deref().map(load_catalog).transpose()?;
    let mut live = match &catalog {
        Some(catalog) => LiveIndexTracker::new(catalog),
        None => LiveIndexTracker::detached(),
    };

    let action = match cli.command {
        Commands::Create { drop_first: true } => SchemaAction::Create,
        Commands::Create { drop_first: false } => SchemaAction::CreateOnly,
        Commands::Drop => SchemaAction::Drop,
        Commands::Update => SchemaAction::Update,
        Commands::Order { drop } => {
            let direction = if drop { Direction::Drop } else { Direction::Create };
            for table in order_tables(&namespace.tables, direction)? {
                println!("{}", table.name);
            }
            return Ok(());
        }
    };

    let tool = SchemaTool::new(config.with_action(action));
    let statements = tool.run(&namespace, &mut live)?;
    print!("{}", format_statements(&statements));
    Ok(())
}
