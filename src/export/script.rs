// ABOUTME: Assembles the replayable SQL script from an ordered catalog snapshot
// ABOUTME: Emits header, table drops, table creates, data inserts, and index rebuilds

use super::sequencer::drop_order;
use crate::sqlite::{IndexInfo, TableSnapshot};
use crate::utils::{quote_identifier, sanitize_identifier};

const BANNER: &str = "-- ============================================";

/// Metadata written into the script header
#[derive(Debug, Clone)]
pub struct ScriptHeader {
    pub tool_name: String,
    pub generated_at: String,
}

/// The assembled script plus counters for the run summary
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledScript {
    pub lines: Vec<String>,
    pub insert_count: usize,
}

impl AssembledScript {
    /// Render the script as file contents, one line per entry
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

#[derive(Default)]
struct ScriptBuilder {
    lines: Vec<String>,
    insert_count: usize,
}

impl ScriptBuilder {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn comment(&mut self, text: &str) {
        self.lines.push(format!("-- {}", text));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn section(&mut self, title: &str) {
        self.line(BANNER);
        self.comment(title);
        self.line(BANNER);
    }

    fn insert(&mut self, statement: String) {
        self.lines.push(statement);
        self.insert_count += 1;
    }
}

/// Build the INSERT statement for one row
///
/// Uses `INSERT OR IGNORE` so replaying into a partially populated database
/// skips rows that would violate a uniqueness constraint.
pub fn insert_statement(table: &TableSnapshot, row: &[crate::sqlite::SqlValue]) -> String {
    debug_assert_eq!(row.len(), table.columns.len());

    let columns = table
        .columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let values = row
        .iter()
        .map(|v| v.to_sql_literal())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT OR IGNORE INTO {} ({}) VALUES ({});",
        quote_identifier(&table.name),
        columns,
        values
    )
}

/// Assemble the full script
///
/// `tables` must already be in creation order (parents first). The script
/// contains, in order:
///
/// 1. Header comments naming the structure-only tables
/// 2. `DROP TABLE IF EXISTS` for every table, in reverse creation order
/// 3. Each located creation statement, verbatim, in creation order
/// 4. One `INSERT OR IGNORE` per row of each non-sensitive table; sensitive
///    tables get a comment instead
/// 5. `DROP INDEX IF EXISTS` for every index, then every index definition
pub fn assemble_script(
    tables: &[TableSnapshot],
    indexes: &[IndexInfo],
    header: &ScriptHeader,
) -> AssembledScript {
    let mut script = ScriptBuilder::default();

    let sensitive: Vec<String> = tables
        .iter()
        .filter(|t| t.sensitive)
        .map(|t| sanitize_identifier(&t.name))
        .collect();

    script.comment(&format!(
        "{} database initialization script",
        sanitize_identifier(&header.tool_name)
    ));
    script.comment(&format!("Generated at: {}", header.generated_at));
    script.comment("This file contains the structure of every table but only non-sensitive data");
    script.comment(&format!(
        "Sensitive tables (structure only, no data): {}",
        if sensitive.is_empty() {
            "none".to_string()
        } else {
            sensitive.join(", ")
        }
    ));
    script.blank();

    let creation_order: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();

    script.section("Step 1: Drop existing tables");
    for name in drop_order(&creation_order) {
        script.line(format!("DROP TABLE IF EXISTS {};", quote_identifier(&name)));
    }
    script.blank();

    script.section("Step 2: Create table structures");
    script.blank();
    for table in tables {
        if let Some(sql) = &table.create_sql {
            script.comment(&format!("Create table {}", sanitize_identifier(&table.name)));
            script.line(format!("{};", sql));
            script.blank();
        }
    }

    script.blank();
    script.section("Step 3: Insert non-sensitive data");
    script.blank();
    for table in tables {
        let display_name = sanitize_identifier(&table.name);

        if table.sensitive {
            script.comment(&format!(
                "Table {} contains sensitive data, data export skipped",
                display_name
            ));
            script.blank();
            continue;
        }

        if table.rows.is_empty() {
            continue;
        }

        script.comment(&format!("Insert data for {}", display_name));
        for row in &table.rows {
            script.insert(insert_statement(table, row));
        }
        script.blank();
    }

    script.blank();
    script.section("Step 4: Create indexes");
    script.blank();
    if !indexes.is_empty() {
        for index in indexes {
            script.line(format!("DROP INDEX IF EXISTS {};", quote_identifier(&index.name)));
        }
        script.blank();
        for index in indexes {
            script.line(format!("{};", index.sql));
        }
    }

    AssembledScript {
        lines: script.lines,
        insert_count: script.insert_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqlValue;

    fn table(name: &str, columns: &[&str], rows: Vec<Vec<SqlValue>>, sensitive: bool) -> TableSnapshot {
        TableSnapshot {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            create_sql: Some(format!(
                "CREATE TABLE {} ({})",
                name,
                columns.join(", ")
            )),
            rows,
            sensitive,
            references: Vec::new(),
        }
    }

    fn header() -> ScriptHeader {
        ScriptHeader {
            tool_name: "sqlite-seed-export".to_string(),
            generated_at: "2026-01-02 03:04:05".to_string(),
        }
    }

    fn sample_tables() -> Vec<TableSnapshot> {
        vec![
            table(
                "chains",
                &["id", "name"],
                vec![
                    vec![SqlValue::Integer(1), SqlValue::Text("Ethereum".into())],
                    vec![SqlValue::Integer(2), SqlValue::Text("BNB's Chain".into())],
                ],
                false,
            ),
            table("wallets", &["id", "private_key"], Vec::new(), true),
        ]
    }

    fn positions(lines: &[String], prefix: &str) -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_header_lists_sensitive_tables() {
        let script = assemble_script(&sample_tables(), &[], &header());

        assert_eq!(script.lines[0], "-- sqlite-seed-export database initialization script");
        assert_eq!(script.lines[1], "-- Generated at: 2026-01-02 03:04:05");
        assert!(script
            .lines
            .contains(&"-- Sensitive tables (structure only, no data): wallets".to_string()));
    }

    #[test]
    fn test_header_without_sensitive_tables() {
        let tables = vec![table("chains", &["id"], Vec::new(), false)];
        let script = assemble_script(&tables, &[], &header());
        assert!(script
            .lines
            .contains(&"-- Sensitive tables (structure only, no data): none".to_string()));
    }

    #[test]
    fn test_drops_are_reverse_of_creates() {
        let tables = vec![
            table("chains", &["id"], Vec::new(), false),
            table("tokens", &["id"], Vec::new(), false),
            table("wallets", &["id"], Vec::new(), true),
        ];
        let script = assemble_script(&tables, &[], &header());

        let drops: Vec<&String> = script
            .lines
            .iter()
            .filter(|l| l.starts_with("DROP TABLE"))
            .collect();
        let creates: Vec<&String> = script
            .lines
            .iter()
            .filter(|l| l.starts_with("CREATE TABLE"))
            .collect();

        assert_eq!(
            drops,
            vec![
                "DROP TABLE IF EXISTS \"wallets\";",
                "DROP TABLE IF EXISTS \"tokens\";",
                "DROP TABLE IF EXISTS \"chains\";",
            ]
        );
        assert_eq!(
            creates,
            vec![
                "CREATE TABLE chains (id);",
                "CREATE TABLE tokens (id);",
                "CREATE TABLE wallets (id);",
            ]
        );
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let indexes = vec![IndexInfo {
            name: "idx_chains_name".to_string(),
            table: "chains".to_string(),
            sql: "CREATE INDEX idx_chains_name ON chains(name)".to_string(),
        }];
        let script = assemble_script(&sample_tables(), &indexes, &header());
        let lines = &script.lines;

        let last_drop = *positions(lines, "DROP TABLE").last().unwrap();
        let first_create = positions(lines, "CREATE TABLE")[0];
        let last_create = *positions(lines, "CREATE TABLE").last().unwrap();
        let first_insert = positions(lines, "INSERT")[0];
        let last_insert = *positions(lines, "INSERT").last().unwrap();
        let drop_index = positions(lines, "DROP INDEX")[0];
        let create_index = positions(lines, "CREATE INDEX")[0];

        assert!(last_drop < first_create);
        assert!(last_create < first_insert);
        assert!(last_insert < drop_index);
        assert!(drop_index < create_index);
        assert_eq!(lines[create_index], "CREATE INDEX idx_chains_name ON chains(name);");
    }

    #[test]
    fn test_sensitive_table_has_structure_but_no_inserts() {
        let mut tables = sample_tables();
        // Even if rows slipped into the snapshot, none may be emitted
        tables[1].rows = vec![vec![SqlValue::Integer(1), SqlValue::Text("secret".into())]];

        let script = assemble_script(&tables, &[], &header());

        assert!(script
            .lines
            .iter()
            .all(|l| !l.starts_with("INSERT OR IGNORE INTO \"wallets\"")));
        assert!(script
            .lines
            .contains(&"CREATE TABLE wallets (id, private_key);".to_string()));
        assert!(script
            .lines
            .contains(&"-- Table wallets contains sensitive data, data export skipped".to_string()));
        assert!(script.lines.iter().all(|l| !l.contains("secret")));
    }

    #[test]
    fn test_one_insert_per_row_with_full_column_list() {
        let script = assemble_script(&sample_tables(), &[], &header());

        let inserts: Vec<&String> = script
            .lines
            .iter()
            .filter(|l| l.starts_with("INSERT"))
            .collect();

        assert_eq!(script.insert_count, 2);
        assert_eq!(
            inserts,
            vec![
                "INSERT OR IGNORE INTO \"chains\" (\"id\", \"name\") VALUES (1, 'Ethereum');",
                "INSERT OR IGNORE INTO \"chains\" (\"id\", \"name\") VALUES (2, 'BNB''s Chain');",
            ]
        );
    }

    #[test]
    fn test_missing_schema_omits_create_only() {
        let mut tables = sample_tables();
        tables[0].create_sql = None;

        let script = assemble_script(&tables, &[], &header());

        assert!(script.lines.contains(&"DROP TABLE IF EXISTS \"chains\";".to_string()));
        assert!(!script.lines.iter().any(|l| l.starts_with("CREATE TABLE chains")));
        assert!(!script.lines.contains(&"-- Create table chains".to_string()));
    }

    #[test]
    fn test_no_indexes_leaves_section_empty() {
        let script = assemble_script(&sample_tables(), &[], &header());
        assert!(!script.lines.iter().any(|l| l.contains("INDEX IF EXISTS")));
        let len = script.lines.len();
        assert_eq!(script.lines[len - 1], "");
        assert_eq!(script.lines[len - 3], "-- Step 4: Create indexes");
    }

    #[test]
    fn test_render_ends_with_newline() {
        let script = assemble_script(&sample_tables(), &[], &header());
        let rendered = script.render();
        assert!(rendered.ends_with('\n'));
        assert_eq!(rendered.lines().count(), script.lines.len());
    }
}
