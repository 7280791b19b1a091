//! Constraint parsing and evaluation

pub mod constraint;
mod expand;
pub mod lexer;
mod node;
mod operator;
pub mod parser;

pub use constraint::{Constraint, ConstraintError};
pub use expand::{Operand, Partial};
pub use lexer::{Lexer, Token, TokenKind};
pub use node::{Comparison, Node};
pub use operator::{InvalidOperatorError, Operator};
pub use parser::Parser;
