//! Semantic Analysis for stop
//!
//! Performs:
//! - Symbol table management (one flat table per compilation)
//! - Type checking of assignments and operators
//!
//! The analysis is a single forward pass that never stops early: every node
//! is visited and every problem found is appended to the diagnostics list.

use std::collections::HashMap;

use crate::frontend::ast::*;
use crate::types::Type;
use crate::utils::Diagnostic;

// ==================== Symbol Table ====================

/// Flat symbol table. A name is bound by its first successful assignment and
/// its type never changes afterwards.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Type>,
    /// Names in declaration order
    order: Vec<String>,
}

impl SymbolTable {
    /// Bind `name` to `ty` unless it is already bound.
    ///
    /// An existing binding is left untouched; its type is returned as the
    /// error when it differs from `ty`.
    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), Type> {
        match self.symbols.get(name) {
            Some(&declared) if declared != ty => Err(declared),
            Some(_) => Ok(()),
            None => {
                self.symbols.insert(name.to_string(), ty);
                self.order.push(name.to_string());
                Ok(())
            }
        }
    }

    /// Look up the declared type of a symbol
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.symbols.get(name).copied()
    }

    /// Symbols in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Type)> + '_ {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.symbols[name]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

// ==================== Semantic Analyzer ====================

/// Semantic analyzer. Owns the symbol table and diagnostics of one
/// compilation; create a fresh analyzer per program.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a program, returning every diagnostic in discovery order.
    ///
    /// Error nodes left by the parser are reported in tree order alongside
    /// the semantic problems.
    pub fn analyze(&mut self, program: &Program) -> &[Diagnostic] {
        for node in &program.nodes {
            self.check(node);
        }

        log::debug!(
            "semantic analysis: {} symbol(s), {} diagnostic(s)",
            self.symbols.len(),
            self.diagnostics.len()
        );
        &self.diagnostics
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Type of a node against the current symbol table, without reporting.
    /// Used by backends once analysis has succeeded.
    pub fn type_of(&self, node: &Node) -> Option<Type> {
        self.resolve(node, &mut Vec::new())
    }

    /// Infer the type of a node. Undeclared identifiers are reported
    /// wherever they appear, including inside nested expressions.
    fn infer(&mut self, node: &Node) -> Option<Type> {
        let mut found = Vec::new();
        let ty = self.resolve(node, &mut found);
        self.diagnostics.extend(found);
        ty
    }

    /// Shared type resolution. Never writes the symbol table.
    fn resolve(&self, node: &Node, found: &mut Vec<Diagnostic>) -> Option<Type> {
        match node {
            Node::Ident(ident) => {
                let ty = self.symbols.lookup(&ident.name);
                if ty.is_none() {
                    found.push(Diagnostic::UndeclaredVariable {
                        name: ident.name.clone(),
                        span: ident.span,
                    });
                }
                ty
            }
            Node::Literal(lit) => Type::classify_literal(&lit.raw),
            Node::BinOp(binop) => {
                // Both sides are resolved so each reports its own problems
                let left = self.resolve(&binop.left, found);
                let right = self.resolve(&binop.right, found);
                match (left, right) {
                    (Some(l), Some(r)) if l == r => Some(l),
                    _ => None,
                }
            }
            Node::Assign(assign) => {
                let ty = self.resolve(&assign.expr, found)?;
                match self.symbols.lookup(&assign.target.name) {
                    Some(declared) if declared != ty => None,
                    _ => Some(ty),
                }
            }
            Node::Block(_) => Some(Type::Unit),
            Node::If(_) | Node::Print(_) | Node::Error(_) => None,
        }
    }

    /// Validate a statement, declaring bindings as assignments succeed
    fn check(&mut self, node: &Node) {
        match node {
            Node::Ident(_) => {
                self.infer(node);
            }
            Node::Literal(lit) => {
                if self.infer(node).is_none() {
                    self.diagnostics.push(Diagnostic::MalformedLiteral {
                        text: lit.raw.clone(),
                        span: lit.span,
                    });
                }
            }
            Node::Assign(assign) => self.check_assign(assign),
            Node::BinOp(binop) => self.check_binop(binop),
            Node::If(if_node) => {
                // Any well-typed condition is accepted
                self.check(&if_node.cond);
                self.check_block(&if_node.then_block);
                if let Some(else_block) = &if_node.else_block {
                    self.check_block(else_block);
                }
            }
            Node::Print(print) => self.check(&print.expr),
            Node::Block(block) => self.check_block(block),
            Node::Error(diag) => self.diagnostics.push(diag.clone()),
        }
    }

    fn check_assign(&mut self, assign: &Assign) {
        let name = &assign.target.name;
        let Some(ty) = self.infer(&assign.expr) else {
            self.diagnostics.push(Diagnostic::InvalidAssignment {
                name: name.clone(),
                span: assign.span,
            });
            return;
        };

        if let Err(declared) = self.symbols.declare(name, ty) {
            self.diagnostics.push(Diagnostic::TypeMismatch {
                name: name.clone(),
                declared,
                found: ty,
                span: assign.span,
            });
        }
    }

    fn check_binop(&mut self, binop: &BinOp) {
        let reported = self.diagnostics.len();
        let left = self.infer(&binop.left);
        let right = self.infer(&binop.right);

        match (left, right) {
            (Some(l), Some(r)) if l != r => {
                self.diagnostics.push(Diagnostic::OperandMismatch {
                    op: binop.op.clone(),
                    left: l,
                    right: r,
                    span: binop.span,
                });
            }
            (Some(_), Some(_)) => {}
            // Failures already explained by an operand are not repeated
            _ if self.diagnostics.len() > reported => {}
            _ => {
                self.diagnostics.push(Diagnostic::InvalidOperands {
                    op: binop.op.clone(),
                    span: binop.span,
                });
            }
        }
    }

    /// Check every statement of a block, even after a failing sibling
    fn check_block(&mut self, block: &Block) {
        for node in &block.nodes {
            self.check(node);
        }
    }
}
