//! Code Generation trait - Backend abstraction

use crate::frontend::ast::Program;
use crate::frontend::semantic::SemanticAnalyzer;
use crate::utils::Result;

/// Code generation backend trait
pub trait CodeGen {
    /// Generate target source from an analyzed program.
    ///
    /// Must refuse to run when the analyzer reported diagnostics.
    fn generate(&mut self, program: &Program, analyzer: &SemanticAnalyzer) -> Result<String>;

    /// Get the backend name
    fn name(&self) -> &str;
}
