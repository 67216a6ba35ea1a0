// ABOUTME: Replays an exported SQL script against a target SQLite database
// ABOUTME: Splits statements outside quoted text and tolerates per-statement failures

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Counts from a replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub executed: usize,
    pub failed: usize,
}

/// Split a script into individual statements
///
/// Statements end at `;` outside quoted text. Single quotes, double quotes,
/// and backticks quote until the matching character (a doubled quote stays
/// inside the quoted text); `[` quotes until `]`. `--` comments outside
/// quotes run to the end of the line and `/* */` comments run to the closing
/// `*/`; both are dropped. Empty statements are discarded and the trailing
/// `;` is not included.
///
/// # Examples
///
/// ```
/// # use sqlite_seed_export::replay::split_statements;
/// let statements = split_statements("-- header\nINSERT INTO t VALUES ('a;b');\nDROP TABLE x;");
/// assert_eq!(statements, vec!["INSERT INTO t VALUES ('a;b')", "DROP TABLE x"]);
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' | '`' | '[' => {
                let close = if ch == '[' { ']' } else { ch };
                current.push(ch);
                while let Some(inner) = chars.next() {
                    current.push(inner);
                    if inner == close {
                        if close != ']' && chars.peek() == Some(&close) {
                            // Doubled quote is an escaped quote
                            current.push(close);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
                // Keep the tokens on either side apart
                current.push(' ');
            }
            ';' => {
                push_statement(&mut statements, &mut current);
            }
            _ => current.push(ch),
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}

/// Execute every statement of a script on an open connection
///
/// A failing statement is logged and counted; the remaining statements still
/// run.
pub fn replay_sql(conn: &Connection, sql: &str) -> ReplayReport {
    let mut report = ReplayReport::default();

    for statement in split_statements(sql) {
        match conn.execute_batch(&statement) {
            Ok(()) => report.executed += 1,
            Err(e) => {
                let preview: String = statement.chars().take(80).collect();
                tracing::warn!("⚠ Statement failed: {} ({})", e, preview);
                report.failed += 1;
            }
        }
    }

    report
}

/// Replay a script file into a SQLite database, creating it if needed
///
/// # Arguments
///
/// * `script_path` - Path to a script produced by the exporter
/// * `target_path` - Path to the database to populate
///
/// # Errors
///
/// Returns an error if the script cannot be read or the target cannot be
/// opened. Individual statement failures are reported in the
/// [`ReplayReport`] instead.
pub fn replay_script(script_path: &Path, target_path: &Path) -> Result<ReplayReport> {
    let sql = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;

    let conn = Connection::open(target_path)
        .with_context(|| format!("Failed to open target database {}", target_path.display()))?;

    tracing::info!(
        "Replaying {} into {}",
        script_path.display(),
        target_path.display()
    );

    let report = replay_sql(&conn, &sql);

    tracing::info!(
        "✓ Replay finished: {} executed, {} failed",
        report.executed,
        report.failed
    );

    Ok(report)
}
