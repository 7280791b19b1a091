//! Constraint tokenizer
//!
//! Scans a requirement string one token at a time on demand. The stream
//! ends after the first `Error` or `Eof` token.

use std::fmt;

use crate::Version;

/// Kind of a scanned token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Full `major.minor.patch` version with optional suffix
    Version,
    /// `<`, `<=`, `>`, `>=` or `=`
    Operator,
    /// Single space separating comparators of a set
    Set,
    /// `||` separating alternative sets
    Range,
    /// `~`, `^` or the `-` of a hyphen range
    Advanced,
    /// Version with missing or wildcard fields (`1.2`, `1.x`, `*`)
    Partial,
    /// Lexical error; the text carries the diagnostic
    Error,
    /// End of input
    Eof,
}

/// A scanned token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            _ => write!(f, "{:?}", self.text),
        }
    }
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_wildcard(b: u8) -> bool {
    matches!(b, b'x' | b'X' | b'*')
}

fn is_version_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'+')
}

/// Pull-based tokenizer over a constraint string
pub struct Lexer<'a> {
    input: &'a str,
    // start of the token being scanned
    start: usize,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            start: 0,
            pos: 0,
            done: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    /// Consume the next byte if it satisfies `valid`
    fn accept(&mut self, valid: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(b) if valid(b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn accept_run(&mut self, valid: impl Fn(u8) -> bool) {
        while self.accept(&valid) {}
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, &self.input[self.start..self.pos]);
        self.start = self.pos;
        token
    }

    fn error(&mut self, message: String) -> Token {
        Token::new(TokenKind::Error, message)
    }

    /// Report the character under the cursor as unexpected
    fn unexpected(&mut self) -> Token {
        match self.input[self.pos..].chars().next() {
            Some(c) => self.error(format!("invalid character at position {}: {:?}", self.pos, c)),
            None => self.error(format!("unexpected end of input at position {}", self.pos)),
        }
    }

    fn lex_main(&mut self) -> Token {
        match self.peek() {
            None => {
                self.ignore();
                Token::new(TokenKind::Eof, "")
            }
            Some(b) if is_digit(b) || is_wildcard(b) => self.lex_version(),
            Some(b'<' | b'>' | b'=') => self.lex_operator(),
            Some(b'~' | b'^') => self.lex_advanced(),
            Some(b'|') => self.lex_range(),
            Some(b' ') => self.lex_set(),
            Some(_) => self.unexpected(),
        }
    }

    fn lex_version(&mut self) -> Token {
        let mut fields = 0;
        let mut wildcard = false;

        loop {
            if self.accept(is_wildcard) {
                wildcard = true;
            } else if !wildcard && self.accept(is_digit) {
                self.accept_run(is_digit);
            } else {
                return self.unexpected();
            }
            fields += 1;

            if fields == 3 || !self.accept(|b| b == b'.') {
                break;
            }
        }

        let kind = if fields == 3 && !wildcard {
            if self.accept(|b| b == b'-' || b == b'+') {
                self.accept_run(is_version_char);
            }
            TokenKind::Version
        } else {
            TokenKind::Partial
        };

        // Versions must be separated from whatever follows them
        if !matches!(self.peek(), None | Some(b' ' | b'|')) {
            return self.unexpected();
        }

        if kind == TokenKind::Version {
            let text = &self.input[self.start..self.pos];
            if let Err(err) = Version::parse(text) {
                return self.error(format!("invalid version {:?}: {}", text, err));
            }
        }

        self.emit(kind)
    }

    fn lex_operator(&mut self) -> Token {
        if self.accept(|b| b == b'<' || b == b'>') {
            self.accept(|b| b == b'=');
        } else {
            self.accept(|b| b == b'=');
        }

        match self.peek() {
            Some(b) if is_digit(b) => self.emit(TokenKind::Operator),
            _ => self.unexpected(),
        }
    }

    fn lex_advanced(&mut self) -> Token {
        self.bump();

        match self.peek() {
            Some(b) if is_digit(b) => self.emit(TokenKind::Advanced),
            _ => self.unexpected(),
        }
    }

    fn lex_set(&mut self) -> Token {
        if self.pos == 0 {
            return self.error("leading space at position 0".to_string());
        }
        if self.input.as_bytes()[self.pos - 1] == b' ' {
            return self.error(format!("double space at position {}", self.pos));
        }

        self.bump();
        match self.peek() {
            Some(b'|') => {
                self.ignore();
                self.lex_range()
            }
            Some(b'-') => {
                self.ignore();
                self.lex_hyphen()
            }
            Some(b' ') => self.error(format!("double space at position {}", self.pos)),
            None => self.error(format!("trailing space at position {}", self.pos - 1)),
            Some(_) => self.emit(TokenKind::Set),
        }
    }

    fn lex_range(&mut self) -> Token {
        self.bump();
        if !self.accept(|b| b == b'|') {
            return self.unexpected();
        }

        let token = self.emit(TokenKind::Range);
        if self.peek() == Some(b' ') {
            self.bump();
            self.ignore();
        }
        token
    }

    fn lex_hyphen(&mut self) -> Token {
        self.bump();
        if self.peek() != Some(b' ') {
            return self.unexpected();
        }

        let token = self.emit(TokenKind::Advanced);
        self.bump();
        self.ignore();
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        let token = self.lex_main();
        if matches!(token.kind, TokenKind::Error | TokenKind::Eof) {
            self.done = true;
        }

        log::trace!("token {:?} {:?}", token.kind, token.text);
        Some(token)
    }
}
