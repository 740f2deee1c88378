//! # gripview-bindings
//!
//! Source-mapped variable renaming for debugger expressions.
//!
//! A user paused in original (pre-build) source types expressions using the
//! original names; the running code knows them under generated, minified
//! names. [`replace_original_variable_name`] rewrites the expression against
//! the scope bindings recovered from the source map.
//!
//! ```text
//! first*second   with { first -> n, second -> u }   =>   n*u
//! window.first                                      =>   window.first
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod rename;

pub use rename::{MappedScopeBindings, replace_original_variable_name};

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while rewriting an expression.
#[derive(Debug, Error)]
pub enum BindingsError {
    /// The JavaScript grammar could not be loaded or run.
    #[error("Language error: {0}")]
    Language(String),

    /// The expression does not parse.
    #[error("Syntax error at byte {offset}")]
    Syntax { offset: usize },
}
