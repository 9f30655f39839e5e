//! Structured Feedback Module
//!
//! Provides machine-readable output of a compilation:
//! - JSON diagnostic reports with locations
//! - Compilation statistics

use serde::Serialize;

use crate::compiler::Compilation;
use crate::utils::{Category, Diagnostic};

// ==================== Structured Error Report ====================

/// A structured diagnostic report
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Phase that found the problem
    pub category: Category,

    /// Human-readable message
    pub message: String,

    /// Location information
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl ErrorReport {
    pub fn from_diagnostic(diag: &Diagnostic, source: &str) -> Self {
        Self {
            category: diag.category(),
            message: diag.to_string(),
            location: diag
                .span()
                .location(source)
                .map(|(line, column)| Location { line, column }),
        }
    }
}

// ==================== Compilation Feedback ====================

/// Complete compilation feedback
#[derive(Debug, Clone, Serialize)]
pub struct CompilationFeedback {
    /// Compilation status
    pub success: bool,

    /// Source file
    pub source_file: String,

    /// All diagnostics in discovery order
    pub diagnostics: Vec<ErrorReport>,

    /// Compilation statistics
    pub stats: CompilationStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompilationStats {
    pub token_count: usize,
    pub statement_count: usize,
    pub symbol_count: usize,
    pub diagnostic_count: usize,
}

impl CompilationFeedback {
    pub fn new(source_file: &str, source: &str, compilation: &Compilation) -> Self {
        Self {
            success: compilation.diagnostics().is_empty(),
            source_file: source_file.to_string(),
            diagnostics: compilation
                .diagnostics()
                .iter()
                .map(|d| ErrorReport::from_diagnostic(d, source))
                .collect(),
            stats: CompilationStats {
                token_count: compilation.tokens.len(),
                statement_count: compilation.program.nodes.len(),
                symbol_count: compilation.symbols().len(),
                diagnostic_count: compilation.diagnostics().len(),
            },
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
