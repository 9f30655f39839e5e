//! Diagnostics reported against stop source programs
//!
//! Both the parser and the semantic analyzer report into the same ordered
//! list. Each message names its category so the list can be printed as is.

use serde::Serialize;
use thiserror::Error;

use crate::types::Type;
use crate::utils::Span;

/// Phase that discovered a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Parsing,
    Semantic,
}

/// A single problem found in the source program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    // ==================== Parsing ====================

    #[error("parsing error: `{found}` is not a valid expression term")]
    InvalidTerm { found: String, span: Span },

    #[error("parsing error: standalone expression `{name}` is not allowed, expected `<-` after it")]
    StandaloneExpression { name: String, span: Span },

    #[error("parsing error: block is missing its terminator `pare`")]
    MissingTerminator { span: Span },

    #[error("parsing error: literal `{text}` cannot start a statement")]
    LiteralStatement { text: String, span: Span },

    #[error("parsing error: assignment `<-` has no target")]
    StrayAssign { span: Span },

    #[error("parsing error: `senao` without a matching `se`")]
    StrayElse { span: Span },

    #[error("parsing error: `pare` without a matching `va`")]
    StrayEnd { span: Span },

    #[error("parsing error: expected {expected}, found `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    // ==================== Semantic ====================

    #[error("semantic error: undeclared variable `{name}`")]
    UndeclaredVariable { name: String, span: Span },

    #[error("semantic error: cannot determine the type of the value assigned to `{name}`")]
    InvalidAssignment { name: String, span: Span },

    #[error("semantic error: type mismatch in assignment to `{name}`: declared {declared}, found {found}")]
    TypeMismatch {
        name: String,
        declared: Type,
        found: Type,
        span: Span,
    },

    #[error("semantic error: operator `{op}` applied to mismatched types {left} and {right}")]
    OperandMismatch {
        op: String,
        left: Type,
        right: Type,
        span: Span,
    },

    #[error("semantic error: operands of `{op}` have no valid type")]
    InvalidOperands { op: String, span: Span },

    #[error("semantic error: malformed literal `{text}`")]
    MalformedLiteral { text: String, span: Span },
}

impl Diagnostic {
    /// Phase that produces this diagnostic
    pub fn category(&self) -> Category {
        match self {
            Self::InvalidTerm { .. }
            | Self::StandaloneExpression { .. }
            | Self::MissingTerminator { .. }
            | Self::LiteralStatement { .. }
            | Self::StrayAssign { .. }
            | Self::StrayElse { .. }
            | Self::StrayEnd { .. }
            | Self::UnexpectedToken { .. } => Category::Parsing,
            Self::UndeclaredVariable { .. }
            | Self::InvalidAssignment { .. }
            | Self::TypeMismatch { .. }
            | Self::OperandMismatch { .. }
            | Self::InvalidOperands { .. }
            | Self::MalformedLiteral { .. } => Category::Semantic,
        }
    }

    /// Get the span associated with this diagnostic
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidTerm { span, .. }
            | Self::StandaloneExpression { span, .. }
            | Self::MissingTerminator { span }
            | Self::LiteralStatement { span, .. }
            | Self::StrayAssign { span }
            | Self::StrayElse { span }
            | Self::StrayEnd { span }
            | Self::UnexpectedToken { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::InvalidAssignment { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::OperandMismatch { span, .. }
            | Self::InvalidOperands { span, .. }
            | Self::MalformedLiteral { span, .. } => *span,
        }
    }
}
