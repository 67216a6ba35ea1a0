// ABOUTME: Catalog introspection for the SQLite source database
// ABOUTME: Discovers tables, columns, creation statements, indexes, foreign keys, and rows

use super::value::SqlValue;
use crate::error::{ExportError, Result};
use crate::utils::{quote_identifier, sanitize_identifier};
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeSet;

/// A secondary index discovered in the source
#[derive(Debug, Clone, PartialEq)]
pub struct IndexInfo {
    pub name: String,
    pub table: String,
    pub sql: String,
}

/// A declared foreign key on a table
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub from_column: String,
    pub referenced_table: String,
    /// `None` when the constraint implicitly references the primary key
    pub referenced_column: Option<String>,
}

/// Everything the script needs to know about one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub name: String,
    pub columns: Vec<String>,
    /// `None` when the creation statement could not be located
    pub create_sql: Option<String>,
    /// Always empty for sensitive tables
    pub rows: Vec<Vec<SqlValue>>,
    pub sensitive: bool,
    /// Tables this one references through foreign keys
    pub references: Vec<String>,
}

/// One read-only pass over the source catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Tables in catalog (alphabetical) order
    pub tables: Vec<TableSnapshot>,
    pub indexes: Vec<IndexInfo>,
}

impl CatalogSnapshot {
    /// Names of tables whose creation statement could not be located
    pub fn missing_schemas(&self) -> Vec<String> {
        self.tables
            .iter()
            .filter(|t| t.create_sql.is_none())
            .map(|t| t.name.clone())
            .collect()
    }
}

/// List all user tables, excluding SQLite's internal `sqlite_` tables
///
/// Names come back in alphabetical order, which is the natural order used for
/// tables the priority list does not mention.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;

    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    tracing::debug!("Found {} tables", tables.len());

    Ok(tables)
}

/// Column names of a table in physical order
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;

    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}

/// The exact creation statement of a table
///
/// # Errors
///
/// Returns [`ExportError::SchemaMissing`] if the table has no entry (or no
/// SQL) in `sqlite_master`, for example when it was dropped after
/// enumeration. Callers are expected to absorb this and continue.
pub fn table_schema(conn: &Connection, table: &str) -> Result<String> {
    let sql: Option<Option<String>> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;

    sql.flatten().ok_or_else(|| ExportError::SchemaMissing {
        table: table.to_string(),
    })
}

/// List all user-defined indexes with their creation statements
///
/// Indexes SQLite creates for UNIQUE and PRIMARY KEY constraints have no SQL
/// and are recreated by the table definition itself, so they are skipped.
pub fn list_indexes(conn: &Connection) -> Result<Vec<IndexInfo>> {
    let mut stmt = conn.prepare(
        "SELECT name, tbl_name, sql FROM sqlite_master
         WHERE type = 'index' AND sql IS NOT NULL AND name NOT LIKE 'sqlite_%'
         ORDER BY tbl_name, name",
    )?;

    let indexes = stmt
        .query_map([], |row| {
            Ok(IndexInfo {
                name: row.get(0)?,
                table: row.get(1)?,
                sql: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    tracing::debug!("Found {} indexes", indexes.len());

    Ok(indexes)
}

/// Foreign keys declared on a table
pub fn foreign_keys(conn: &Connection, table: &str) -> Result<Vec<ForeignKey>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_identifier(table)
    ))?;

    let keys = stmt
        .query_map([], |row| {
            Ok(ForeignKey {
                referenced_table: row.get(2)?,
                from_column: row.get(3)?,
                referenced_column: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(keys)
}

/// Read every row of a table, selecting exactly `columns` in that order
///
/// Selecting the explicit column list keeps each row's length equal to the
/// column count, which the INSERT statements rely on.
pub fn read_rows(
    conn: &Connection,
    table: &str,
    columns: &[String],
) -> Result<Vec<Vec<SqlValue>>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let column_list = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!("SELECT {} FROM {}", column_list, quote_identifier(table));

    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query([])?;
    let mut result = Vec::new();

    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(SqlValue::from(row.get_ref(idx)?));
        }
        result.push(values);
    }

    Ok(result)
}

/// Take a full snapshot of the catalog and the non-sensitive data
///
/// Rows are never read for tables in `sensitive_tables`. A table whose
/// creation statement is missing is kept in the snapshot with
/// `create_sql: None` and no rows; the run carries on.
pub fn read_snapshot(
    conn: &Connection,
    sensitive_tables: &BTreeSet<String>,
) -> Result<CatalogSnapshot> {
    let names = list_tables(conn)?;
    let mut tables = Vec::with_capacity(names.len());

    for name in names {
        let display_name = sanitize_identifier(&name);
        let sensitive = sensitive_tables.contains(&name);

        let create_sql = match table_schema(conn, &name) {
            Ok(sql) => Some(sql),
            Err(e) if !e.is_fatal() => {
                tracing::warn!("⚠ {}, skipping its structure", e);
                None
            }
            Err(e) => return Err(e),
        };

        let columns = table_columns(conn, &name)?;

        let keys = foreign_keys(conn, &name)?;
        for fk in &keys {
            tracing::debug!(
                "Dependency {}.{} -> {}.{}",
                display_name,
                sanitize_identifier(&fk.from_column),
                sanitize_identifier(&fk.referenced_table),
                fk.referenced_column
                    .as_deref()
                    .map(sanitize_identifier)
                    .unwrap_or_else(|| "<primary key>".to_string())
            );
        }

        let mut references: Vec<String> = keys
            .into_iter()
            .map(|fk| fk.referenced_table)
            .filter(|referenced| referenced != &name)
            .collect();
        references.sort();
        references.dedup();

        let rows = if sensitive {
            tracing::info!("Skipping data of sensitive table '{}'", display_name);
            Vec::new()
        } else if create_sql.is_none() {
            Vec::new()
        } else {
            tracing::info!("Reading data of table '{}'", display_name);
            read_rows(conn, &name, &columns)?
        };

        tables.push(TableSnapshot {
            name,
            columns,
            create_sql,
            rows,
            sensitive,
            references,
        });
    }

    let indexes = list_indexes(conn)?;

    Ok(CatalogSnapshot { tables, indexes })
}
