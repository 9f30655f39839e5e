//! Compilation pipeline: lex, parse, analyze, then emit C when the program
//! is free of diagnostics.

use crate::backend::{CCodeGen, CodeGen};
use crate::frontend::ast::Program;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::semantic::{SemanticAnalyzer, SymbolTable};
use crate::frontend::token::Token;
use crate::utils::{Diagnostic, Result};

/// Everything produced for one compilation unit
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub analyzer: SemanticAnalyzer,
    /// Emitted C source, present only when there are no diagnostics
    pub output: Option<String>,
}

impl Compilation {
    /// Run the front end only
    pub fn analyze(source: &str) -> Self {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        let tokens = parser.into_tokens();

        let mut analyzer = SemanticAnalyzer::new();
        analyzer.analyze(&program);
        for (name, ty) in analyzer.symbols().iter() {
            log::trace!("symbol {}: {}", name, ty);
        }

        Self {
            tokens,
            program,
            analyzer,
            output: None,
        }
    }

    /// Diagnostics in discovery order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.analyzer.diagnostics()
    }

    /// Symbols declared by the analysis
    pub fn symbols(&self) -> &SymbolTable {
        self.analyzer.symbols()
    }
}

/// Compile a source program.
///
/// Diagnostics in the program are a normal outcome: the compilation is
/// returned without output. `Err` is reserved for backend failures.
pub fn compile(source: &str) -> Result<Compilation> {
    let mut compilation = Compilation::analyze(source);

    if compilation.diagnostics().is_empty() {
        let mut codegen = CCodeGen::new();
        let code = codegen.generate(&compilation.program, &compilation.analyzer)?;
        log::debug!("{} backend emitted {} bytes", codegen.name(), code.len());
        compilation.output = Some(code);
    }

    Ok(compilation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::Node;
    use crate::types::Type;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end_no_errors() {
        let compilation = compile("x <- 1\ny <- |hi|\nescreva x").unwrap();

        assert!(compilation.diagnostics().is_empty());
        let output = compilation.output.unwrap();
        assert!(output.contains("long long x = 1;"));
        assert!(output.contains("printf(\"%lld\\n\", x);"));
    }

    #[test]
    fn test_end_to_end_mismatch() {
        let compilation = compile("x <- 1\nx <- |hi|").unwrap();

        assert_eq!(compilation.diagnostics().len(), 1);
        assert!(matches!(
            compilation.diagnostics()[0],
            Diagnostic::TypeMismatch { .. }
        ));
        assert!(compilation.output.is_none());
        assert_eq!(compilation.symbols().lookup("x"), Some(Type::Int));
    }

    #[test]
    fn test_int_literal_beyond_64_bits() {
        let compilation = compile("y <- 9223372036854775808").unwrap();

        assert_eq!(compilation.diagnostics().len(), 1);
        assert!(matches!(
            compilation.diagnostics()[0],
            Diagnostic::InvalidAssignment { ref name, .. } if name == "y"
        ));
        assert!(compilation.output.is_none());
    }

    #[test]
    fn test_missing_terminator() {
        let compilation = compile("va\n  x <- 1\n  escreva x").unwrap();

        assert_eq!(compilation.diagnostics().len(), 1);
        assert!(matches!(
            compilation.diagnostics()[0],
            Diagnostic::MissingTerminator { .. }
        ));
        assert!(compilation.diagnostics()[0].to_string().contains("missing its terminator"));
        assert!(compilation.output.is_none());
    }

    #[test]
    fn test_empty_program() {
        let compilation = compile("").unwrap();

        assert_eq!(compilation.tokens.len(), 1);
        assert!(compilation.program.nodes.is_empty());
        assert_eq!(
            compilation.output.as_deref(),
            Some("#include <stdio.h>\n\nint main(void) {\n    return 0;\n}\n")
        );
    }

    #[test]
    fn test_errors_in_document_order() {
        let source = "escreva a\nva b pare\nx <- 1 + |s|\n<-\nescreva c";
        let compilation = Compilation::analyze(source);
        let messages: Vec<String> = compilation
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect();

        assert_eq!(
            messages,
            vec![
                "semantic error: undeclared variable `a`",
                "parsing error: standalone expression `b` is not allowed, expected `<-` after it",
                "semantic error: cannot determine the type of the value assigned to `x`",
                "parsing error: assignment `<-` has no target",
                "semantic error: undeclared variable `c`",
            ]
        );
        assert!(compilation.output.is_none());
    }

    #[test]
    fn test_demo_program() {
        let compilation = compile(include_str!("../demos/hello.stp")).unwrap();

        assert!(compilation.diagnostics().is_empty());
        let output = compilation.output.unwrap();
        assert!(output.contains("    const char *maior = \"\";\n"));
        assert!(output.contains("    if ((n > 2)) {\n"));
        assert!(output.contains("    printf(\"%lld\\n\", (n - 1));\n"));
    }

    #[test]
    fn test_unknown_characters_are_ignored() {
        let compilation = compile("x <- 1 ; # escreva x !").unwrap();

        assert!(compilation.diagnostics().is_empty());
        assert!(matches!(compilation.program.nodes[1], Node::Print(_)));
        assert!(compilation.output.is_some());
    }
}
