//! Recursive-descent constraint parser
//!
//! ```text
//! range      := set ( "||" set )*
//! set        := comparator ( " " comparator )*
//! comparator := operator operand
//!             | operand [ "-" operand ]
//!             | ( "~" | "^" ) operand
//! operand    := version | partial
//! ```

use super::expand::{self, Operand, Partial};
use super::lexer::{Lexer, Token, TokenKind};
use super::node::{Comparison, Node};
use super::{ConstraintError, Operator};
use crate::Version;

/// Pulls tokens from a [`Lexer`] with one token of pushback
pub struct Parser<'a> {
    tokens: Lexer<'a>,
    pushback: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            tokens: Lexer::new(input),
            pushback: None,
        }
    }

    /// Parse the whole input. Failures come back as [`Node::Error`].
    pub fn parse(mut self) -> Node {
        match self.parse_range() {
            Ok(node) => node,
            Err(err) => {
                log::debug!("Could not parse constraint: {}", err);
                Node::Error(err)
            }
        }
    }

    fn next(&mut self) -> Token {
        if let Some(token) = self.pushback.take() {
            return token;
        }
        // The lexer stops after its terminal token; keep reporting the end
        self.tokens.next().unwrap_or_else(|| Token::new(TokenKind::Eof, ""))
    }

    fn backup(&mut self, token: Token) {
        debug_assert!(self.pushback.is_none(), "only one token of pushback");
        self.pushback = Some(token);
    }

    fn parse_range(&mut self) -> Result<Node, ConstraintError> {
        let first = self.next();
        if first.kind == TokenKind::Eof {
            return Err(ConstraintError::Empty);
        }
        self.backup(first);

        let mut sets = Vec::new();
        loop {
            sets.push(self.parse_set()?);

            let token = self.next();
            match token.kind {
                TokenKind::Range => continue,
                TokenKind::Eof => break,
                _ => return Err(unexpected(token, "\"||\" or end of input")),
            }
        }

        Ok(Node::Range(sets))
    }

    fn parse_set(&mut self) -> Result<Node, ConstraintError> {
        let mut comparisons = self.parse_comparator()?;

        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Set => comparisons.extend(self.parse_comparator()?),
                TokenKind::Range | TokenKind::Eof => {
                    self.backup(token);
                    break;
                }
                _ => return Err(unexpected(token, "a space, \"||\" or end of input")),
            }
        }

        Ok(Node::Set(comparisons.into_iter().map(Node::Comparison).collect()))
    }

    fn parse_comparator(&mut self) -> Result<Vec<Comparison>, ConstraintError> {
        let token = self.next();

        match token.kind {
            TokenKind::Version | TokenKind::Partial => {
                let lower = operand(token)?;

                let after = self.next();
                if after.kind == TokenKind::Advanced && after.text == "-" {
                    let upper = self.expect_operand("a version after \"-\"")?;
                    return Ok(expand::hyphen(&lower, &upper));
                }
                self.backup(after);

                Ok(match lower {
                    Operand::Version(version) => vec![Comparison::new(Operator::Equal, version)],
                    Operand::Partial(partial) => expand::x_range(&partial),
                })
            }
            TokenKind::Operator => {
                let operator = Operator::from_str(&token.text).map_err(|_| ConstraintError::UnexpectedToken {
                    expected: "an operator",
                    found: token.text.clone(),
                })?;
                let operand = self.expect_operand("a version after operator")?;
                Ok(expand::primitive(operator, &operand))
            }
            TokenKind::Advanced if token.text == "~" => {
                let operand = self.expect_operand("a version after \"~\"")?;
                Ok(expand::tilde(&operand))
            }
            TokenKind::Advanced if token.text == "^" => {
                let operand = self.expect_operand("a version after \"^\"")?;
                Ok(expand::caret(&operand))
            }
            _ => Err(unexpected(token, "a comparator")),
        }
    }

    fn expect_operand(&mut self, expected: &'static str) -> Result<Operand, ConstraintError> {
        let token = self.next();
        match token.kind {
            TokenKind::Version | TokenKind::Partial => operand(token),
            _ => Err(unexpected(token, expected)),
        }
    }
}

fn operand(token: Token) -> Result<Operand, ConstraintError> {
    let parsed = match token.kind {
        TokenKind::Version => Version::parse(&token.text).map(Operand::Version),
        _ => Partial::parse(&token.text).map(Operand::Partial),
    };

    parsed.map_err(|source| ConstraintError::InvalidVersion {
        version: token.text,
        source,
    })
}

fn unexpected(token: Token, expected: &'static str) -> ConstraintError {
    match token.kind {
        TokenKind::Error => ConstraintError::Lexical(token.text),
        TokenKind::Eof => ConstraintError::UnexpectedEnd { expected },
        _ => ConstraintError::UnexpectedToken {
            expected,
            found: token.to_string(),
        },
    }
}
