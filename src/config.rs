// ABOUTME: Export configuration: sensitive tables, priority order, and ordering strategy
// ABOUTME: Loads from TOML files and merges command-line overrides on top

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// How tables are ordered in the generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStrategy {
    /// Static priority list first, remaining tables alphabetically
    #[default]
    Priority,
    /// Topological sort over declared foreign keys, ties broken by priority
    ForeignKeys,
}

impl std::str::FromStr for OrderStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "priority" => Ok(OrderStrategy::Priority),
            "foreign-keys" => Ok(OrderStrategy::ForeignKeys),
            other => Err(format!(
                "unknown order strategy '{}', expected 'priority' or 'foreign-keys'",
                other
            )),
        }
    }
}

/// Settings that shape one export run
///
/// Example `export-config.toml`:
///
/// ```toml
/// sensitive_tables = ["wallets", "wallet_groups", "app_config"]
/// table_order = ["chains", "rpc_providers", "tokens"]
/// order_strategy = "foreign-keys"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Tables whose structure is exported but whose rows never are
    pub sensitive_tables: BTreeSet<String>,
    /// Parent-before-child ordering hint
    pub table_order: Vec<String>,
    pub order_strategy: OrderStrategy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sensitive_tables: ["wallets", "wallet_groups", "app_config"]
                .into_iter()
                .map(String::from)
                .collect(),
            table_order: [
                "chains",
                "rpc_providers",
                "tokens",
                "notification_configs",
                "monitor_configs",
                "monitor_history",
                "app_config",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            order_strategy: OrderStrategy::Priority,
        }
    }
}

impl ExportConfig {
    /// Check names are non-empty and the priority list has no duplicates
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(name) = self
            .sensitive_tables
            .iter()
            .chain(self.table_order.iter())
            .find(|name| name.trim().is_empty())
        {
            return Err(format!("table names cannot be empty (got '{}')", name));
        }

        let mut seen = HashSet::new();
        for name in &self.table_order {
            if !seen.insert(name.as_str()) {
                return Err(format!("table '{}' appears twice in table_order", name));
            }
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration
    ///
    /// A non-empty list replaces the configured one entirely rather than
    /// extending it.
    pub fn apply_cli_overrides(
        &mut self,
        sensitive_tables: &[String],
        table_order: &[String],
        order_strategy: Option<OrderStrategy>,
    ) -> std::result::Result<(), String> {
        if !sensitive_tables.is_empty() {
            self.sensitive_tables = sensitive_tables
                .iter()
                .map(|s| s.trim().to_string())
                .collect();
        }
        if !table_order.is_empty() {
            self.table_order = table_order.iter().map(|s| s.trim().to_string()).collect();
        }
        if let Some(strategy) = order_strategy {
            self.order_strategy = strategy;
        }
        self.validate()
    }
}

/// Load an export configuration from a TOML file
///
/// Keys missing from the file keep their default values.
///
/// # Errors
///
/// Returns [`ExportError::Config`] if the file cannot be read, is not valid
/// TOML, contains unknown keys, or fails validation.
pub fn load_export_config(path: &Path) -> Result<ExportConfig> {
    let config_error = |message: String| ExportError::Config {
        path: path.to_path_buf(),
        message,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config: ExportConfig = toml::from_str(&contents).map_err(|e| config_error(e.to_string()))?;
    config.validate().map_err(config_error)?;

    tracing::debug!(
        "Loaded export config from {}: {} sensitive tables, {} ordered tables",
        path.display(),
        config.sensitive_tables.len(),
        config.table_order.len()
    );

    Ok(config)
}
