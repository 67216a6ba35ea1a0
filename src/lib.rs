// ABOUTME: Library module for sqlite-seed-export
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod replay;
pub mod sqlite;
pub mod utils;
