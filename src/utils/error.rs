//! Driver-level errors for stopc
//!
//! Problems in the compiled program are not errors in this sense: they are
//! [`Diagnostic`](crate::utils::Diagnostic)s collected during analysis.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Compiler error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Code generation error: {0}")]
    CodeGen(String),

    #[error("Code generation refused: {0} diagnostic(s) reported")]
    Diagnostics(usize),
}
