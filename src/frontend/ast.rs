//! Abstract Syntax Tree definitions for stop

use crate::utils::{Diagnostic, Span};

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub nodes: Vec<Node>,
}

/// A tree node. Parse failures are kept in the tree as [`Node::Error`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Ident(Ident),
    Literal(Literal),
    Assign(Assign),
    If(If),
    Print(Print),
    BinOp(BinOp),
    Block(Block),
    Error(Diagnostic),
}

impl Node {
    /// Source span covered by this node
    pub fn span(&self) -> Span {
        match self {
            Node::Ident(ident) => ident.span,
            Node::Literal(lit) => lit.span,
            Node::Assign(assign) => assign.span,
            Node::If(if_node) => if_node.span,
            Node::Print(print) => print.span,
            Node::BinOp(binop) => binop.span,
            Node::Block(block) => block.span,
            Node::Error(diag) => diag.span(),
        }
    }
}

/// Identifier with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Literal in its raw surface form. The type is classified on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub raw: String,
    pub span: Span,
}

/// `target <- expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub expr: Box<Node>,
    pub span: Span,
}

/// `se cond va ... pare [senao va ... pare]`
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cond: Box<Node>,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// `escreva expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub expr: Box<Node>,
    pub span: Span,
}

/// Binary operation, `op` holds the operator text
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub op: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: Span,
}

/// `va ... pare`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub nodes: Vec<Node>,
    pub span: Span,
}
