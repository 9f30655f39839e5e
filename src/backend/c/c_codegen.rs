//! C Code Generator
//!
//! Translates an analyzed stop tree to C source.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::backend::codegen::CodeGen;
use crate::frontend::ast::*;
use crate::frontend::semantic::SemanticAnalyzer;
use crate::types::Type;
use crate::utils::{Error, Result};

/// Names that cannot be used verbatim as C identifiers
const C_RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "main", "printf",
    "register", "restrict", "return", "short", "signed", "sizeof", "static", "struct",
    "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

/// C code generator
#[derive(Default)]
pub struct CCodeGen {
    output: String,
    indent: usize,
    /// Variables already declared in the emitted code
    declared: HashSet<String>,
}

impl CCodeGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write indented line
    fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Convert a stop type to a C declaration of `name`
    fn declaration(ty: Type, name: &str) -> Result<String> {
        match ty {
            Type::Int => Ok(format!("long long {}", c_ident(name))),
            Type::String => Ok(format!("const char *{}", c_ident(name))),
            Type::Unit => Err(Error::CodeGen(format!("`{}` has no value type", name))),
        }
    }

    /// Zero value used for hoisted declarations
    fn zero_value(ty: Type) -> &'static str {
        match ty {
            Type::String => "\"\"",
            Type::Int | Type::Unit => "0",
        }
    }

    /// Convert operator to C operator
    fn binop_to_c(op: &str) -> &str {
        match op {
            "=" => "==",
            other => other,
        }
    }

    fn type_of(analyzer: &SemanticAnalyzer, node: &Node) -> Result<Type> {
        analyzer
            .type_of(node)
            .ok_or_else(|| Error::CodeGen("expression has no resolved type".to_string()))
    }

    /// Declare upfront every variable first assigned inside a block, so it
    /// stays visible after that block closes.
    fn hoist_declarations(&mut self, program: &Program, analyzer: &SemanticAnalyzer) -> Result<()> {
        let mut seen = HashSet::new();
        let mut nested = Vec::new();
        collect_first_assignments(&program.nodes, 0, &mut seen, &mut nested);

        for name in nested {
            let ty = analyzer
                .symbols()
                .lookup(name)
                .ok_or_else(|| Error::CodeGen(format!("`{}` is not declared", name)))?;
            let decl = Self::declaration(ty, name)?;
            self.writeln(&format!("{} = {};", decl, Self::zero_value(ty)));
            self.declared.insert(name.to_string());
        }
        Ok(())
    }

    fn generate_stmt(&mut self, node: &Node, analyzer: &SemanticAnalyzer) -> Result<()> {
        match node {
            Node::Assign(assign) => {
                let name = &assign.target.name;
                let ty = Self::type_of(analyzer, &assign.expr)?;
                let value = self.generate_expr(&assign.expr, analyzer)?;
                if self.declared.insert(name.clone()) {
                    let decl = Self::declaration(ty, name)?;
                    self.writeln(&format!("{} = {};", decl, value));
                } else {
                    self.writeln(&format!("{} = {};", c_ident(name), value));
                }
            }
            Node::Print(print) => {
                let format = match Self::type_of(analyzer, &print.expr)? {
                    Type::Int => "%lld\\n",
                    Type::String => "%s\\n",
                    Type::Unit => {
                        return Err(Error::CodeGen("cannot print a statement".to_string()))
                    }
                };
                let value = self.generate_expr(&print.expr, analyzer)?;
                self.writeln(&format!("printf(\"{}\", {});", format, value));
            }
            Node::If(if_node) => {
                let cond = self.generate_expr(&if_node.cond, analyzer)?;
                self.writeln(&format!("if ({}) {{", cond));
                self.generate_body(&if_node.then_block, analyzer)?;
                if let Some(else_block) = &if_node.else_block {
                    self.writeln("} else {");
                    self.generate_body(else_block, analyzer)?;
                }
                self.writeln("}");
            }
            Node::Block(block) => {
                self.writeln("{");
                self.generate_body(block, analyzer)?;
                self.writeln("}");
            }
            Node::Ident(_) | Node::Literal(_) | Node::BinOp(_) => {
                let value = self.generate_expr(node, analyzer)?;
                self.writeln(&format!("{};", value));
            }
            Node::Error(diag) => {
                return Err(Error::CodeGen(format!("tree still contains an error: {}", diag)));
            }
        }
        Ok(())
    }

    fn generate_body(&mut self, block: &Block, analyzer: &SemanticAnalyzer) -> Result<()> {
        self.indent += 1;
        for node in &block.nodes {
            self.generate_stmt(node, analyzer)?;
        }
        self.indent -= 1;
        Ok(())
    }

    fn generate_expr(&self, node: &Node, analyzer: &SemanticAnalyzer) -> Result<String> {
        match node {
            Node::Ident(ident) => Ok(c_ident(&ident.name).into_owned()),
            Node::Literal(lit) => match Type::classify_literal(&lit.raw) {
                Some(Type::String) => Ok(c_string(&lit.raw[1..lit.raw.len() - 1])),
                Some(_) => Ok(lit.raw.clone()),
                None => Err(Error::CodeGen(format!("malformed literal `{}`", lit.raw))),
            },
            Node::BinOp(binop) => {
                // C has no operators over string values
                if Self::type_of(analyzer, &binop.left)? == Type::String {
                    return Err(Error::CodeGen(format!(
                        "operator `{}` on strings has no C translation",
                        binop.op
                    )));
                }
                Ok(format!(
                    "({} {} {})",
                    self.generate_expr(&binop.left, analyzer)?,
                    Self::binop_to_c(&binop.op),
                    self.generate_expr(&binop.right, analyzer)?
                ))
            }
            Node::Assign(_) | Node::If(_) | Node::Print(_) | Node::Block(_) | Node::Error(_) => {
                Err(Error::CodeGen("statement used as an expression".to_string()))
            }
        }
    }
}

impl CodeGen for CCodeGen {
    fn generate(&mut self, program: &Program, analyzer: &SemanticAnalyzer) -> Result<String> {
        let reported = analyzer.diagnostics().len();
        if reported > 0 {
            return Err(Error::Diagnostics(reported));
        }

        self.output.clear();
        self.indent = 0;
        self.declared.clear();

        self.writeln("#include <stdio.h>");
        self.writeln("");
        self.writeln("int main(void) {");
        self.indent += 1;

        self.hoist_declarations(program, analyzer)?;
        for node in &program.nodes {
            self.generate_stmt(node, analyzer)?;
        }

        self.writeln("return 0;");
        self.indent -= 1;
        self.writeln("}");

        Ok(std::mem::take(&mut self.output))
    }

    fn name(&self) -> &str {
        "c"
    }
}

/// Record, in source order, the names whose first assignment is nested in a block
fn collect_first_assignments<'a>(
    nodes: &'a [Node],
    depth: usize,
    seen: &mut HashSet<&'a str>,
    nested: &mut Vec<&'a str>,
) {
    for node in nodes {
        match node {
            Node::Assign(assign) => {
                let name = assign.target.name.as_str();
                if seen.insert(name) && depth > 0 {
                    nested.push(name);
                }
            }
            Node::If(if_node) => {
                collect_first_assignments(&if_node.then_block.nodes, depth + 1, seen, nested);
                if let Some(else_block) = &if_node.else_block {
                    collect_first_assignments(&else_block.nodes, depth + 1, seen, nested);
                }
            }
            Node::Block(block) => collect_first_assignments(&block.nodes, depth + 1, seen, nested),
            Node::Ident(_) | Node::Literal(_) | Node::Print(_) | Node::BinOp(_) | Node::Error(_) => {}
        }
    }
}

/// Stop identifiers are letters only, so a trailing underscore cannot clash
fn c_ident(name: &str) -> Cow<'_, str> {
    if C_RESERVED.contains(&name) {
        Cow::Owned(format!("{}_", name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Quote text as a C string literal
fn c_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
