//! Compiled version constraint

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::node::Node;
use super::parser::Parser;
use crate::version::VersionError;
use crate::Version;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("empty constraint")]
    Empty,
    #[error("{0}")]
    Lexical(String),
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: &'static str, found: String },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("invalid version \"{version}\": {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: VersionError,
    },
}

/// A parsed constraint such as `>=1.2.9 <2.0.0 || 1.2.7`.
///
/// Parse once and call [`Constraint::matches`] as often as needed; the
/// tree is immutable and can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pretty_string: String,
    root: Node,
}

impl Constraint {
    /// Parse a constraint string. A parse error is never returned as a partial tree.
    pub fn parse(constraint: &str) -> Result<Self, ConstraintError> {
        match Parser::new(constraint).parse() {
            Node::Error(err) => Err(err),
            root => Ok(Constraint {
                pretty_string: constraint.to_string(),
                root,
            }),
        }
    }

    /// Check if a version satisfies this constraint
    pub fn matches(&self, version: &Version) -> bool {
        self.root.run(version)
    }

    /// The constraint as it was written
    pub fn pretty_string(&self) -> &str {
        &self.pretty_string
    }

    /// The expanded expression tree
    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s)
    }
}

/// Renders the expanded form, e.g. `~1.2.3` as `>=1.2.3 <1.3.0`
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Constraint;

    impl Serialize for Constraint {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.pretty_string)
        }
    }

    impl<'de> Deserialize<'de> for Constraint {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct ConstraintVisitor;

            impl<'de> Visitor<'de> for ConstraintVisitor {
                type Value = Constraint;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a version constraint as a string")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Constraint::parse(v).map_err(de::Error::custom)
                }
            }

            deserializer.deserialize_str(ConstraintVisitor)
        }
    }
}
