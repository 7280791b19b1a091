//! Semantic Versioning 2.0.0 versions and npm style range constraints
//!
//! ```
//! use verity_semver::{Constraint, Version};
//!
//! let constraint = Constraint::parse("1.2.7 || >=1.2.9 <2.0.0").unwrap();
//! assert!(constraint.matches(&Version::parse("1.4.6").unwrap()));
//! assert!(!constraint.matches(&Version::parse("1.2.8").unwrap()));
//! ```
//!
//! Constraints support `~` and `^` ranges, hyphen ranges (`1.0.0 - 2.0.0`)
//! and wildcards (`1.2.x`, `2.*`, `*`). They are expanded into plain
//! comparisons at parse time.

pub mod constraint;
mod comparator;
mod semver;
mod version;

pub use comparator::Comparator;
pub use constraint::{Comparison, Constraint, ConstraintError, Node, Operator};
pub use semver::Semver;
pub use version::{Identifier, Version, VersionError};
