// ABOUTME: SQLite source access for the exporter
// ABOUTME: Opens the source strictly read-only and exposes catalog and value types

pub mod catalog;
pub mod value;

pub use catalog::{
    foreign_keys, list_indexes, list_tables, read_rows, read_snapshot, table_columns,
    table_schema, CatalogSnapshot, ForeignKey, IndexInfo, TableSnapshot,
};
pub use value::SqlValue;

use crate::error::{ExportError, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open the source database read-only
///
/// The file must already exist: a missing source is reported as
/// [`ExportError::SourceNotFound`] before any connection attempt, so SQLite
/// never creates an empty database in its place.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// A connection that cannot modify the source.
///
/// # Examples
///
/// ```no_run
/// # use sqlite_seed_export::sqlite::open_read_only;
/// # use std::path::Path;
/// # fn example() -> sqlite_seed_export::error::Result<()> {
/// let conn = open_read_only(Path::new("data/wallets_tool.db"))?;
/// # Ok(())
/// # }
/// ```
pub fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(ExportError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!("Opening source database {} read-only", path.display());

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    Ok(conn)
}
