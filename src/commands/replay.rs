// ABOUTME: Replay command - Apply an exported script to a SQLite database
// ABOUTME: Prints how many statements ran and how many failed

use crate::replay::replay_script;
use anyhow::{bail, Result};
use std::path::Path;

/// Replay `script` into the database at `target`
///
/// Individual statement failures are tolerated and counted, matching how the
/// seed script is consumed at application start-up. Fails only if nothing at
/// all could be executed or the files cannot be opened.
pub fn replay(script: &Path, target: &Path) -> Result<()> {
    let report = replay_script(script, target)?;

    println!();
    println!("Statements executed: {}", report.executed);
    println!("Statements failed: {}", report.failed);

    if report.executed == 0 && report.failed > 0 {
        bail!("No statement from {} could be executed", script.display());
    }

    Ok(())
}
