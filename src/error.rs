// ABOUTME: Error taxonomy for catalog reading, script export, and configuration
// ABOUTME: Separates fatal run-level failures from per-table conditions callers absorb

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the exporter core
///
/// `SourceNotFound`, `Sqlite`, `DestinationWrite`, and `Config` abort a run.
/// `SchemaMissing` is raised per table and absorbed by the snapshot reader,
/// which omits that table's structure and keeps going.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Source database not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("No creation statement found for table '{table}'")]
    SchemaMissing { table: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to write script to {}: {source}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl ExportError {
    /// Returns true if the whole run must stop on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExportError::SchemaMissing { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_missing_is_not_fatal() {
        let err = ExportError::SchemaMissing {
            table: "chains".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("chains"));
    }

    #[test]
    fn test_source_not_found_is_fatal() {
        let err = ExportError::SourceNotFound {
            path: PathBuf::from("/nope/wallets_tool.db"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("wallets_tool.db"));
    }
}
