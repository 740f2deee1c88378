//! # gripview
//!
//! Library half of the gripview binary: configuration loading, the CLI
//! definition and the command implementations. `main.rs` only sets up
//! logging and dispatches.

pub mod cli;
pub mod config;
pub mod error;
