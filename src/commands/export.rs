// ABOUTME: Export command - Write a replayable seed script from a SQLite database
// ABOUTME: Reports success as a boolean and prints a human-readable run summary

use crate::config::ExportConfig;
use crate::export::{export_database, ExportSummary};
use crate::utils::format_bytes;
use std::path::Path;

/// Export `source` to `output` and report the outcome
///
/// On success prints the run summary (tables exported, structure-only tables,
/// file size) to stdout, as JSON when `json` is set, and returns `true`.
/// On failure logs the error and returns `false`; a missing source or
/// an unwritable destination never leaves a partial script behind.
///
/// # Examples
///
/// ```no_run
/// # use sqlite_seed_export::commands::export;
/// # use sqlite_seed_export::config::ExportConfig;
/// # use std::path::Path;
/// let ok = export(
///     Path::new("src-tauri/data/wallets_tool.db"),
///     Path::new("src-tauri/data/init.sql"),
///     &ExportConfig::default(),
///     false,
/// );
/// assert!(ok);
/// ```
pub fn export(source: &Path, output: &Path, config: &ExportConfig, json: bool) -> bool {
    tracing::info!("Source database: {}", source.display());
    tracing::info!("Output script: {}", output.display());

    match export_database(source, output, config) {
        Ok(summary) => {
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => tracing::warn!("Failed to render summary as JSON: {}", e),
                }
            } else {
                print_summary(&summary);
            }
            true
        }
        Err(e) => {
            tracing::error!("✗ Export failed: {}", e);
            false
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("✓ Export complete");
    println!("Output file: {}", summary.output_path.display());
    println!(
        "File size: {} bytes ({})",
        summary.size_bytes,
        format_bytes(summary.size_bytes)
    );
    println!("Tables exported: {}", summary.tables_exported);
    println!("Insert statements: {}", summary.insert_count);
    println!("Indexes: {}", summary.index_count);
    println!(
        "Sensitive tables (structure only, no data): {}",
        if summary.sensitive_tables.is_empty() {
            "none".to_string()
        } else {
            summary.sensitive_tables.join(", ")
        }
    );
    if !summary.missing_schemas.is_empty() {
        println!(
            "⚠ Tables without a creation statement: {}",
            summary.missing_schemas.join(", ")
        );
    }
    println!("SHA-256: {}", summary.sha256);
}
