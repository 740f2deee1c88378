//! # CLI Errors

use gripview_bindings::BindingsError;
use gripview_core::InspectorError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Inspector(#[from] InspectorError),

    #[error(transparent)]
    Bindings(#[from] BindingsError),

    /// A file could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The configuration file is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command argument or input file is invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
