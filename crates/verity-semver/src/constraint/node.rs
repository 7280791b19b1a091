//! Expression tree produced by the constraint parser

use std::fmt;

use super::{ConstraintError, Operator};
use crate::Version;

/// A single `operator version` test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    operator: Operator,
    version: Version,
}

impl Comparison {
    pub fn new(operator: Operator, version: Version) -> Self {
        Comparison { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check whether `candidate` satisfies this comparison
    pub fn run(&self, candidate: &Version) -> bool {
        self.operator.accepts(candidate.compare(&self.version))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// Node of a parsed constraint.
///
/// Trees are immutable once built and can be evaluated from any number of
/// threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Comparison(Comparison),
    /// All children must match (space separated comparators)
    Set(Vec<Node>),
    /// Any child must match (`||` separated sets)
    Range(Vec<Node>),
    /// Parsing failed; never matches
    Error(ConstraintError),
}

impl Node {
    pub fn run(&self, candidate: &Version) -> bool {
        match self {
            Node::Comparison(comparison) => comparison.run(candidate),
            Node::Set(children) => children.iter().all(|child| child.run(candidate)),
            Node::Range(children) => children.iter().any(|child| child.run(candidate)),
            Node::Error(_) => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error(_))
    }
}

impl From<Comparison> for Node {
    fn from(comparison: Comparison) -> Self {
        Node::Comparison(comparison)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Node], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison(comparison) => write!(f, "{}", comparison),
            Node::Set(children) if children.is_empty() => f.write_str("*"),
            Node::Set(children) => write_joined(f, children, " "),
            Node::Range(children) => write_joined(f, children, " || "),
            Node::Error(err) => write!(f, "error: {}", err),
        }
    }
}
