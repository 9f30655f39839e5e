//! Lexer for stop
//!
//! Converts source code into a stream of tokens. Characters outside the
//! lexical grammar are skipped without a diagnostic.

use crate::frontend::token::{Token, TokenKind};
use crate::types::STRING_DELIMITER;
use crate::utils::Span;

/// The lexer state
pub struct Lexer<'src> {
    source: &'src str,
    /// Characters with their byte offsets
    chars: Vec<(usize, char)>,
    /// Current position in `chars`
    pos: usize,
    /// Start position of current token
    start: usize,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            start: 0,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Byte offset of a character position
    fn offset(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map(|&(offset, _)| offset)
            .unwrap_or(self.source.len())
    }

    fn make_span(&self) -> Span {
        Span::new(self.offset(self.start), self.offset(self.pos))
    }

    /// Create a token from the text between `start` and the current position
    fn make_token(&self, kind: TokenKind) -> Token {
        let span = self.make_span();
        Token::new(kind, &self.source[span.start..span.end], span)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read an identifier or keyword
    fn read_word(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphabetic() {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.make_span();
        let text = &self.source[span.start..span.end];
        let kind = TokenKind::keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, span)
    }

    fn read_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Int)
    }

    /// Read a string literal, keeping both delimiters in the token text.
    ///
    /// An unterminated literal runs to the end of input and keeps only its
    /// opening delimiter.
    fn read_string(&mut self) -> Token {
        self.advance(); // opening delimiter
        while let Some(c) = self.advance() {
            if c == STRING_DELIMITER {
                break;
            }
        }
        self.make_token(TokenKind::Str)
    }

    /// Get the next token, or `None` once the input is exhausted
    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();
            self.start = self.pos;

            let c = self.peek()?;
            if c.is_ascii_digit() {
                return Some(self.read_number());
            }
            if c.is_alphabetic() {
                return Some(self.read_word());
            }
            if c == STRING_DELIMITER {
                return Some(self.read_string());
            }

            if c == '<' && self.peek_next() == Some('-') {
                self.advance();
                self.advance();
                return Some(self.make_token(TokenKind::Assign));
            }

            self.advance();
            let kind = match c {
                '<' => TokenKind::Lt,
                '>' => TokenKind::Gt,
                '=' => TokenKind::Eq,
                '+' | '-' => TokenKind::Op,
                // Unknown characters are dropped
                _ => continue,
            };
            return Some(self.make_token(kind));
        }
    }

    /// Tokenize the entire source, ending with exactly one `Eof` token
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        let end = self.source.len();
        tokens.push(Token::eof(Span::new(end, end)));
        log::debug!("lexed {} tokens", tokens.len());
        tokens
    }
}
