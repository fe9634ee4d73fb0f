//! Command-Line Interface
//!
//! Subcommand implementations live under [`commands`]; argument parsing is
//! in `main.rs`.

pub mod commands;
