//! Token definitions for stop

use std::fmt;

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, verbatim
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            span,
        }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ============ Data ============
    /// Identifier (variable name)
    Ident,
    /// Integer literal
    Int,
    /// String literal, delimiters included
    Str,

    // ============ Keywords ============
    /// se
    If,
    /// senao
    Else,
    /// va (block open)
    Do,
    /// pare (block close)
    End,
    /// escreva
    Print,

    // ============ Symbols ============
    /// <-
    Assign,
    /// + or -
    Op,
    /// =
    Eq,
    /// <
    Lt,
    /// >
    Gt,

    // ============ Special ============
    /// End of file
    Eof,
}

impl TokenKind {
    /// Try to convert a word to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "se" => Some(TokenKind::If),
            "senao" => Some(TokenKind::Else),
            "va" => Some(TokenKind::Do),
            "pare" => Some(TokenKind::End),
            "escreva" => Some(TokenKind::Print),
            _ => None,
        }
    }

    /// Check if this token is an arithmetic or comparison operator
    pub fn is_binary_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Op | TokenKind::Eq | TokenKind::Lt | TokenKind::Gt
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Ident => "ID",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::If => "SE",
            TokenKind::Else => "SENAO",
            TokenKind::Do => "VA",
            TokenKind::End => "PARE",
            TokenKind::Print => "ESCREVA",
            TokenKind::Assign => "<-",
            TokenKind::Op => "OP",
            TokenKind::Eq => "=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eof => "EOF",
        };
        write!(f, "{}", name)
    }
}
