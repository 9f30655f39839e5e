//! Parser for stop
//!
//! Recursive descent parser with inline error recovery. Productions return
//! `ParseResult`; statement-level failures are folded into the tree as
//! [`Node::Error`] so that parsing always yields a complete [`Program`].
//!
//! Every loop in the parser consumes at least one token per iteration. Error
//! paths that do not otherwise consume advance past the offending token.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Diagnostic, Span};

type ParseResult<T> = std::result::Result<T, Diagnostic>;

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from a lexer
    pub fn new(mut lexer: Lexer<'_>) -> Self {
        Self::from_tokens(lexer.tokenize())
    }

    /// Create a parser from pre-tokenized input.
    ///
    /// A missing end marker is appended so the cursor always has a token.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::eof(Span::new(end, end)));
        }
        Self { tokens, pos: 0 }
    }

    /// Give back the token stream once parsing is done
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| t.kind)
    }

    /// Consume the current token. The end marker is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn expect(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(Diagnostic::UnexpectedToken {
                expected: format!("`{}`", expected.to_string().to_lowercase()),
                found: describe(self.current()),
                span: self.current().span,
            })
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Program {
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            nodes.push(self.parse_statement());
        }

        log::debug!("parsed {} top-level statements", nodes.len());
        Program { nodes }
    }

    /// Parse a statement, keeping a failure in the tree
    fn parse_statement(&mut self) -> Node {
        match self.parse_stmt() {
            Ok(node) => node,
            Err(diag) => {
                log::trace!("recovered from: {}", diag);
                Node::Error(diag)
            }
        }
    }

    fn parse_stmt(&mut self) -> ParseResult<Node> {
        match self.current_kind() {
            TokenKind::Ident => self.parse_assignment(),
            TokenKind::Do => Ok(Node::Block(self.parse_block()?)),
            TokenKind::If => self.parse_if(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Int | TokenKind::Str => {
                let token = self.advance();
                Err(Diagnostic::LiteralStatement {
                    text: token.text,
                    span: token.span,
                })
            }
            TokenKind::Assign => {
                let token = self.advance();
                Err(Diagnostic::StrayAssign { span: token.span })
            }
            TokenKind::Else => {
                let token = self.advance();
                Err(Diagnostic::StrayElse { span: token.span })
            }
            TokenKind::End => {
                let token = self.advance();
                Err(Diagnostic::StrayEnd { span: token.span })
            }
            TokenKind::Op | TokenKind::Eq | TokenKind::Lt | TokenKind::Gt | TokenKind::Eof => {
                let token = self.advance();
                Err(Diagnostic::UnexpectedToken {
                    expected: "a statement".to_string(),
                    found: describe(&token),
                    span: token.span,
                })
            }
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Node> {
        if self.peek_kind() != Some(TokenKind::Assign) {
            let token = self.advance();
            return Err(Diagnostic::StandaloneExpression {
                name: token.text,
                span: token.span,
            });
        }

        let target = self.parse_ident()?;
        self.expect(TokenKind::Assign)?;
        let expr = self.parse_expr()?;

        Ok(Node::Assign(Assign {
            span: target.span.merge(&expr.span()),
            target,
            expr: Box::new(expr),
        }))
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: token.text,
            span: token.span,
        })
    }

    /// Parse a conditional. A failing condition or then-block aborts the
    /// whole statement.
    fn parse_if(&mut self) -> ParseResult<Node> {
        let start = self.expect(TokenKind::If)?.span;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let else_block = if self.check(TokenKind::Else) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = else_block.as_ref().unwrap_or(&then_block).span;
        Ok(Node::If(If {
            cond: Box::new(cond),
            then_block,
            else_block,
            span: start.merge(&end),
        }))
    }

    fn parse_print(&mut self) -> ParseResult<Node> {
        let start = self.expect(TokenKind::Print)?.span;
        let expr = self.parse_expr()?;

        Ok(Node::Print(Print {
            span: start.merge(&expr.span()),
            expr: Box::new(expr),
        }))
    }

    /// Parse a block. A failing statement inside the block stays in the
    /// block as an error node and parsing continues with its siblings.
    fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect(TokenKind::Do)?;

        let mut nodes = Vec::new();
        while !self.check(TokenKind::End) && !self.is_at_end() {
            nodes.push(self.parse_statement());
        }

        if self.is_at_end() {
            return Err(Diagnostic::MissingTerminator { span: open.span });
        }
        let close = self.expect(TokenKind::End)?;

        Ok(Block {
            nodes,
            span: open.span.merge(&close.span),
        })
    }

    /// Parse an expression: terms joined by operators, folded to the left
    fn parse_expr(&mut self) -> ParseResult<Node> {
        let mut left = self.parse_term()?;

        while self.current_kind().is_binary_op() {
            let op = self.advance();
            let right = self.parse_term()?;
            left = Node::BinOp(BinOp {
                op: op.text,
                span: left.span().merge(&right.span()),
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        match self.current_kind() {
            TokenKind::Int | TokenKind::Str => {
                let token = self.advance();
                Ok(Node::Literal(Literal {
                    raw: token.text,
                    span: token.span,
                }))
            }
            TokenKind::Ident => Ok(Node::Ident(self.parse_ident()?)),
            _ => {
                let token = self.advance();
                Err(Diagnostic::InvalidTerm {
                    found: describe(&token),
                    span: token.span,
                })
            }
        }
    }
}

/// Human-readable text of a token for diagnostics
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => token.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        Parser::new(Lexer::new(source)).parse_program()
    }

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::default())
    }

    fn errors(program: &Program) -> Vec<&Diagnostic> {
        program
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Error(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    fn ident(name: &str) -> Node {
        Node::Ident(Ident {
            name: name.to_string(),
            span: Span::default(),
        })
    }

    #[test]
    fn test_only_end_marker() {
        let program = Parser::from_tokens(vec![Token::eof(Span::default())]).parse_program();
        assert!(program.nodes.is_empty());

        let program = Parser::from_tokens(Vec::new()).parse_program();
        assert!(program.nodes.is_empty());
    }

    #[test]
    fn test_into_tokens_returns_stream() {
        let mut parser = Parser::new(Lexer::new("escreva 1"));
        parser.parse_program();
        let tokens = parser.into_tokens();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_left_associative_fold() {
        let mut parser = Parser::from_tokens(vec![
            tok(TokenKind::Ident, "a"),
            tok(TokenKind::Op, "+"),
            tok(TokenKind::Ident, "b"),
            tok(TokenKind::Op, "-"),
            tok(TokenKind::Ident, "c"),
            Token::eof(Span::default()),
        ]);
        let expr = parser.parse_expr().unwrap();

        let expected = Node::BinOp(BinOp {
            op: "-".to_string(),
            left: Box::new(Node::BinOp(BinOp {
                op: "+".to_string(),
                left: Box::new(ident("a")),
                right: Box::new(ident("b")),
                span: Span::default(),
            })),
            right: Box::new(ident("c")),
            span: Span::default(),
        });
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_assignment() {
        let program = parse("x <- 1 + 2");
        assert_eq!(program.nodes.len(), 1);

        match &program.nodes[0] {
            Node::Assign(assign) => {
                assert_eq!(assign.target.name, "x");
                assert!(matches!(*assign.expr, Node::BinOp(ref b) if b.op == "+"));
                assert_eq!(assign.span, Span::new(0, 10));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_standalone_expression() {
        let program = parse("x escreva x");

        assert_eq!(program.nodes.len(), 2);
        assert!(matches!(
            program.nodes[0],
            Node::Error(Diagnostic::StandaloneExpression { ref name, .. }) if name == "x"
        ));
        assert!(matches!(program.nodes[1], Node::Print(_)));
    }

    #[test]
    fn test_if_else() {
        let program = parse("se x = 1 va escreva |um| pare senao va escreva |outro| pare");
        assert_eq!(program.nodes.len(), 1);

        match &program.nodes[0] {
            Node::If(if_node) => {
                assert!(matches!(*if_node.cond, Node::BinOp(ref b) if b.op == "="));
                assert_eq!(if_node.then_block.nodes.len(), 1);
                assert_eq!(if_node.else_block.as_ref().map(|b| b.nodes.len()), Some(1));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        let program = parse("se x va pare escreva x");

        assert_eq!(program.nodes.len(), 2);
        assert!(matches!(program.nodes[0], Node::If(ref i) if i.else_block.is_none()));
    }

    #[test]
    fn test_if_missing_then_block_aborts_statement() {
        let program = parse("se x escreva x");

        // Nothing past the condition is consumed, so the print survives.
        assert_eq!(program.nodes.len(), 2);
        assert!(matches!(
            program.nodes[0],
            Node::Error(Diagnostic::UnexpectedToken { ref expected, .. }) if expected == "`va`"
        ));
        assert!(matches!(program.nodes[1], Node::Print(_)));
    }

    #[test]
    fn test_if_bad_condition_does_not_consume_block() {
        // The condition error consumes only the offending token, the block
        // is then parsed as its own statement.
        let program = parse("se <- va pare");

        assert_eq!(program.nodes.len(), 2);
        assert!(matches!(program.nodes[0], Node::Error(Diagnostic::InvalidTerm { .. })));
        assert!(matches!(program.nodes[1], Node::Block(_)));
    }

    #[test]
    fn test_missing_terminator() {
        let program = parse("va x <- 1");

        assert_eq!(program.nodes.len(), 1);
        assert!(matches!(
            program.nodes[0],
            Node::Error(Diagnostic::MissingTerminator { .. })
        ));
    }

    #[test]
    fn test_block_keeps_failed_children() {
        let program = parse("va 5 x <- 1 <- pare");

        match &program.nodes[0] {
            Node::Block(block) => {
                assert_eq!(block.nodes.len(), 3);
                assert!(matches!(block.nodes[0], Node::Error(Diagnostic::LiteralStatement { .. })));
                assert!(matches!(block.nodes[1], Node::Assign(_)));
                assert!(matches!(block.nodes[2], Node::Error(Diagnostic::StrayAssign { .. })));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_stray_tokens() {
        let program = parse("senao pare |s| + <- 3");
        let errs = errors(&program);

        assert_eq!(errs.len(), 6);
        assert!(matches!(errs[0], Diagnostic::StrayElse { .. }));
        assert!(matches!(errs[1], Diagnostic::StrayEnd { .. }));
        assert!(matches!(errs[2], Diagnostic::LiteralStatement { .. }));
        assert!(matches!(errs[3], Diagnostic::UnexpectedToken { .. }));
        assert!(matches!(errs[4], Diagnostic::StrayAssign { .. }));
        assert!(matches!(errs[5], Diagnostic::LiteralStatement { .. }));
    }

    #[test]
    fn test_expression_at_end_of_input() {
        let program = parse("escreva x +");

        assert_eq!(program.nodes.len(), 1);
        assert!(matches!(
            program.nodes[0],
            Node::Error(Diagnostic::InvalidTerm { ref found, .. }) if found == "end of input"
        ));
    }

    #[test]
    fn test_nested_blocks() {
        let program = parse("va va x <- 1 pare escreva x pare");

        match &program.nodes[0] {
            Node::Block(outer) => {
                assert_eq!(outer.nodes.len(), 2);
                assert!(matches!(outer.nodes[0], Node::Block(ref inner) if inner.nodes.len() == 1));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_terminates_on_every_short_stream() {
        let kinds = [
            TokenKind::Ident,
            TokenKind::Int,
            TokenKind::Str,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Do,
            TokenKind::End,
            TokenKind::Print,
            TokenKind::Assign,
            TokenKind::Op,
            TokenKind::Eq,
            TokenKind::Lt,
            TokenKind::Gt,
        ];

        for a in kinds {
            for b in kinds {
                for c in kinds {
                    let tokens = vec![tok(a, "a"), tok(b, "b"), tok(c, "c")];
                    let program = Parser::from_tokens(tokens).parse_program();
                    assert!(program.nodes.len() <= 3);
                }
            }
        }
    }
}
