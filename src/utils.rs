// ABOUTME: Utility functions for identifier handling, size formatting, and file output
// ABOUTME: Provides identifier quoting, log-safe names, and all-or-nothing file writes

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Quote an identifier (table, column, or index name) for use in SQL text
///
/// Wraps the name in double quotes and doubles any embedded double quote, so
/// the result is always a single identifier token regardless of content.
///
/// # Examples
///
/// ```
/// # use sqlite_seed_export::utils::quote_identifier;
/// assert_eq!(quote_identifier("chains"), "\"chains\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Sanitize an identifier (table name, index name, etc.) for display
///
/// Removes control characters and limits length to prevent log injection and
/// keep console output readable.
///
/// **Note**: This is for display purposes only. For SQL text, use
/// [`quote_identifier`].
///
/// # Examples
///
/// ```
/// # use sqlite_seed_export::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("normal_table"), "normal_table");
/// assert_eq!(sanitize_identifier("table\nname"), "tablename");
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// Format a byte count into a human-readable string
///
/// # Examples
///
/// ```
/// # use sqlite_seed_export::utils::format_bytes;
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_idx])
}

/// Write `contents` to `path` so that readers see either the old file or the
/// complete new one
///
/// The data goes to a temporary file in the destination's directory, is
/// flushed and synced, and is then renamed over `path`. On any failure the
/// temporary file is removed and `path` is left untouched.
///
/// # Errors
///
/// Returns the underlying I/O error if the temporary file cannot be created,
/// written, synced, or renamed into place.
pub fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    tracing::debug!("Writing to temp file {}", temp.path().display());
    temp.write_all(contents)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
