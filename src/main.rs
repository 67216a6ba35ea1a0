// ABOUTME: CLI entry point for sqlite-seed-export
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Parser, Subcommand};
use sqlite_seed_export::commands;
use sqlite_seed_export::config::{load_export_config, ExportConfig, OrderStrategy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlite-seed-export")]
#[command(about = "Export a SQLite database to a replayable seed script", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a script that recreates the schema and non-sensitive data
    Export {
        /// Source SQLite database (opened read-only)
        #[arg(long)]
        source: PathBuf,
        /// Script to create or overwrite
        #[arg(long)]
        output: PathBuf,
        /// Path to an export config TOML file
        #[arg(long = "config")]
        config_path: Option<PathBuf>,
        /// Tables exported as structure only (comma-separated, replaces configured set)
        #[arg(long, value_delimiter = ',')]
        sensitive_tables: Vec<String>,
        /// Parent-before-child table order (comma-separated, replaces configured list)
        #[arg(long, value_delimiter = ',')]
        table_order: Vec<String>,
        /// Table ordering: 'priority' or 'foreign-keys'
        #[arg(long)]
        order_strategy: Option<OrderStrategy>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply an exported script to a SQLite database
    Replay {
        /// Script produced by the export command
        #[arg(long)]
        script: PathBuf,
        /// Target database (created if missing)
        #[arg(long)]
        target: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            source,
            output,
            config_path,
            sensitive_tables,
            table_order,
            order_strategy,
            json,
        } => {
            let mut config = match &config_path {
                Some(path) => load_export_config(path)?,
                None => ExportConfig::default(),
            };
            config
                .apply_cli_overrides(&sensitive_tables, &table_order, order_strategy)
                .map_err(|e| anyhow::anyhow!("Invalid export options: {}", e))?;

            if !commands::export(&source, &output, &config, json) {
                anyhow::bail!("Export failed");
            }
            Ok(())
        }
        Commands::Replay { script, target } => commands::replay(&script, &target),
    }
}
