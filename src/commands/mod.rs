// ABOUTME: Command implementations behind the CLI subcommands
// ABOUTME: Exports the export and replay commands

pub mod export;
pub mod replay;

pub use export::export;
pub use replay::replay;
