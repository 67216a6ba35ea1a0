// ABOUTME: Table ordering so referenced (parent) tables are created before dependents
// ABOUTME: Static priority ordering plus an opt-in foreign-key topological sort

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Order tables by a fixed priority list
///
/// Tables named in `priority` come first, in the list's relative order;
/// priority entries missing from `tables` are skipped. Every other table
/// follows in the order given by `tables` (the catalog's alphabetical order).
/// The result is a permutation of `tables`.
///
/// # Examples
///
/// ```
/// # use sqlite_seed_export::export::sequencer::order_tables;
/// let tables = vec!["app_config".to_string(), "chains".to_string(), "wallets".to_string()];
/// let priority = vec!["chains".to_string(), "tokens".to_string(), "app_config".to_string()];
/// assert_eq!(order_tables(&tables, &priority), vec!["chains", "app_config", "wallets"]);
/// ```
pub fn order_tables(tables: &[String], priority: &[String]) -> Vec<String> {
    let present: HashSet<&str> = tables.iter().map(String::as_str).collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(tables.len());
    let mut ordered = Vec::with_capacity(tables.len());

    for name in priority {
        if present.contains(name.as_str()) && placed.insert(name.as_str()) {
            ordered.push(name.clone());
        }
    }

    for name in tables {
        if placed.insert(name.as_str()) {
            ordered.push(name.clone());
        }
    }

    ordered
}

/// Order tables so every table comes after the tables it references
///
/// Kahn's algorithm over `dependencies` (table → referenced tables). Among
/// tables whose dependencies are all placed, the one ranked earliest by
/// [`order_tables`] goes next, so the result matches the priority order
/// whenever that order is already consistent with the foreign keys.
/// Self-references and references to unknown tables are ignored. Tables
/// caught in a reference cycle are appended in priority order.
pub fn order_by_foreign_keys(
    tables: &[String],
    dependencies: &BTreeMap<String, Vec<String>>,
    priority: &[String],
) -> Vec<String> {
    let base = order_tables(tables, priority);
    let rank: HashMap<&str, usize> = base
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let mut in_degree = vec![0usize; base.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); base.len()];

    for (idx, name) in base.iter().enumerate() {
        let parents: BTreeSet<usize> = dependencies
            .get(name)
            .into_iter()
            .flatten()
            .filter(|parent| *parent != name)
            .filter_map(|parent| rank.get(parent.as_str()).copied())
            .collect();

        in_degree[idx] = parents.len();
        for parent in parents {
            dependents[parent].push(idx);
        }
    }

    let mut ready: BTreeSet<usize> = (0..base.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut emitted = vec![false; base.len()];
    let mut ordered = Vec::with_capacity(base.len());

    while let Some(next) = ready.pop_first() {
        emitted[next] = true;
        ordered.push(base[next].clone());

        for &child in &dependents[next] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if ordered.len() < base.len() {
        let cyclic: Vec<&String> = base
            .iter()
            .enumerate()
            .filter(|(idx, _)| !emitted[*idx])
            .map(|(_, name)| name)
            .collect();
        tracing::warn!(
            "⚠ Circular foreign key references between {} tables, keeping priority order for them",
            cyclic.len()
        );
        ordered.extend(cyclic.into_iter().cloned());
    }

    ordered
}

/// Order for DROP statements: the exact reverse of the creation order
pub fn drop_order(creation_order: &[String]) -> Vec<String> {
    creation_order.iter().rev().cloned().collect()
}
