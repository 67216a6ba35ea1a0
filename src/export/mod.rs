// ABOUTME: Export orchestration: snapshot the source, order tables, assemble, and write
// ABOUTME: Produces a single replayable script with sensitive tables reduced to structure

pub mod script;
pub mod sequencer;

pub use script::{assemble_script, insert_statement, AssembledScript, ScriptHeader};
pub use sequencer::{drop_order, order_by_foreign_keys, order_tables};

use crate::config::{ExportConfig, OrderStrategy};
use crate::error::{ExportError, Result};
use crate::sqlite::{self, CatalogSnapshot, TableSnapshot};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name written into the script header
pub const TOOL_NAME: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub tables_exported: usize,
    /// Sensitive tables present in the source, in creation order
    pub sensitive_tables: Vec<String>,
    /// Tables whose creation statement could not be located
    pub missing_schemas: Vec<String>,
    pub insert_count: usize,
    pub index_count: usize,
    pub size_bytes: u64,
    pub sha256: String,
    pub generated_at: String,
}

/// Put snapshot tables into creation order according to the configured strategy
pub fn sequence_tables(snapshot: CatalogSnapshot, config: &ExportConfig) -> Vec<TableSnapshot> {
    let names: Vec<String> = snapshot.tables.iter().map(|t| t.name.clone()).collect();

    let order = match config.order_strategy {
        OrderStrategy::Priority => order_tables(&names, &config.table_order),
        OrderStrategy::ForeignKeys => {
            let dependencies: BTreeMap<String, Vec<String>> = snapshot
                .tables
                .iter()
                .map(|t| (t.name.clone(), t.references.clone()))
                .collect();
            order_by_foreign_keys(&names, &dependencies, &config.table_order)
        }
    };

    let mut by_name: BTreeMap<String, TableSnapshot> = snapshot
        .tables
        .into_iter()
        .map(|t| (t.name.clone(), t))
        .collect();

    order
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect()
}

/// Export a SQLite database to a replayable SQL script
///
/// Runs in four phases against one read-only connection:
/// 1. Reads the catalog and the rows of every non-sensitive table
/// 2. Orders tables parents-first
/// 3. Closes the connection and assembles the script in memory
/// 4. Writes the script atomically, replacing any previous file
///
/// # Arguments
///
/// * `source` - Path to an existing SQLite database (never modified)
/// * `output` - Path of the script to create or overwrite
/// * `config` - Sensitive tables and ordering rules
///
/// # Errors
///
/// - [`ExportError::SourceNotFound`] if `source` does not exist; nothing is written
/// - [`ExportError::Sqlite`] if the catalog or data cannot be read
/// - [`ExportError::DestinationWrite`] if the script cannot be written; any
///   previous file at `output` is left as it was
///
/// # Examples
///
/// ```no_run
/// # use sqlite_seed_export::config::ExportConfig;
/// # use sqlite_seed_export::export::export_database;
/// # use std::path::Path;
/// # fn example() -> sqlite_seed_export::error::Result<()> {
/// let summary = export_database(
///     Path::new("data/wallets_tool.db"),
///     Path::new("data/init.sql"),
///     &ExportConfig::default(),
/// )?;
/// println!("Exported {} tables", summary.tables_exported);
/// # Ok(())
/// # }
/// ```
pub fn export_database(source: &Path, output: &Path, config: &ExportConfig) -> Result<ExportSummary> {
    tracing::info!("Step 1/4: Reading catalog from {}...", source.display());
    let conn = sqlite::open_read_only(source)?;
    let snapshot = sqlite::read_snapshot(&conn, &config.sensitive_tables)?;
    drop(conn);

    let missing_schemas = snapshot.missing_schemas();
    let indexes = snapshot.indexes.clone();
    tracing::info!(
        "Found {} table(s) and {} index(es)",
        snapshot.tables.len(),
        indexes.len()
    );

    tracing::info!("Step 2/4: Ordering tables ({:?})...", config.order_strategy);
    let tables = sequence_tables(snapshot, config);
    tracing::debug!(
        "Creation order: {}",
        tables
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    tracing::info!("Step 3/4: Assembling script...");
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let header = ScriptHeader {
        tool_name: TOOL_NAME.to_string(),
        generated_at: generated_at.clone(),
    };
    let script = assemble_script(&tables, &indexes, &header);
    let contents = script.render();

    tracing::info!("Step 4/4: Writing script to {}...", output.display());
    crate::utils::write_atomically(output, contents.as_bytes()).map_err(|source| {
        ExportError::DestinationWrite {
            path: output.to_path_buf(),
            source,
        }
    })?;

    let sha256 = Sha256::digest(contents.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>();

    tracing::info!("✓ Script written ({} insert statements)", script.insert_count);

    Ok(ExportSummary {
        output_path: output.to_path_buf(),
        tables_exported: tables.len(),
        sensitive_tables: tables
            .iter()
            .filter(|t| t.sensitive)
            .map(|t| t.name.clone())
            .collect(),
        missing_schemas,
        insert_count: script.insert_count,
        index_count: indexes.len(),
        size_bytes: contents.len() as u64,
        sha256,
        generated_at,
    })
}
