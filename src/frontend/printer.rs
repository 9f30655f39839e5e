//! Tree and token printers
//!
//! Outputs human-readable dumps for debugging.

use std::fmt::Write;

use crate::frontend::ast::*;
use crate::frontend::token::Token;

/// Render a token stream, one `N. KIND(text)` line per token
pub fn print_tokens(tokens: &[Token]) -> String {
    let mut output = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let _ = writeln!(output, "{}. {}({})", i, token.kind, token.text);
    }
    output
}

/// Render a program as an indented tree
pub fn print_tree(program: &Program) -> String {
    let mut printer = TreePrinter::default();
    for node in &program.nodes {
        printer.print_node(node);
    }
    printer.output
}

#[derive(Default)]
struct TreePrinter {
    output: String,
    indent: usize,
}

impl TreePrinter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn print_node(&mut self, node: &Node) {
        match node {
            Node::Ident(ident) => self.line(&format!("Ident {}", ident.name)),
            Node::Literal(lit) => self.line(&format!("Literal {}", lit.raw)),
            Node::Assign(assign) => {
                self.line(&format!("Assign {}", assign.target.name));
                self.nested(|p| p.print_node(&assign.expr));
            }
            Node::If(if_node) => {
                self.line("If");
                self.nested(|p| {
                    p.print_node(&if_node.cond);
                    p.print_block(&if_node.then_block);
                    if let Some(else_block) = &if_node.else_block {
                        p.line("Else");
                        p.nested(|p| p.print_block(else_block));
                    }
                });
            }
            Node::Print(print) => {
                self.line("Print");
                self.nested(|p| p.print_node(&print.expr));
            }
            Node::BinOp(binop) => {
                self.line(&format!("BinOp {}", binop.op));
                self.nested(|p| {
                    p.print_node(&binop.left);
                    p.print_node(&binop.right);
                });
            }
            Node::Block(block) => self.print_block(block),
            Node::Error(diag) => self.line(&format!("Error: {}", diag)),
        }
    }

    fn print_block(&mut self, block: &Block) {
        self.line("Block");
        self.nested(|p| {
            for node in &block.nodes {
                p.print_node(node);
            }
        });
    }
}
