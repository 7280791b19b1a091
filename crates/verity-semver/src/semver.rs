//! Semver facade providing high-level version operations

use std::cmp::Ordering;

use crate::constraint::{Constraint, ConstraintError};
use crate::Version;

/// Main facade for string level versioning operations.
///
/// Strings that are not valid versions never satisfy anything and are
/// dropped from sorted output.
pub struct Semver;

impl Semver {
    /// Check if a version satisfies a constraint
    pub fn satisfies(version: &str, constraints: &str) -> bool {
        let version = match Version::parse(version) {
            Ok(v) => v,
            Err(_) => return false,
        };

        match Constraint::parse(constraints) {
            Ok(c) => c.matches(&version),
            Err(_) => false,
        }
    }

    /// Return all versions that satisfy the given constraints
    pub fn satisfied_by(versions: &[&str], constraints: &str) -> Vec<String> {
        let parsed_constraints = match Constraint::parse(constraints) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        versions
            .iter()
            .filter(|v| Self::satisfies_parsed(v, &parsed_constraints))
            .map(|v| v.to_string())
            .collect()
    }

    /// Highest version satisfying the constraints
    pub fn max_satisfying(versions: &[&str], constraints: &str) -> Option<String> {
        Self::select(versions, constraints, Ordering::Greater)
    }

    /// Lowest version satisfying the constraints
    pub fn min_satisfying(versions: &[&str], constraints: &str) -> Option<String> {
        Self::select(versions, constraints, Ordering::Less)
    }

    /// Parse constraints and return a reusable representation.
    pub fn parse_constraints(constraints: &str) -> Result<Constraint, ConstraintError> {
        Constraint::parse(constraints)
    }

    /// Check a version against pre-parsed constraints.
    pub fn satisfies_parsed(version: &str, constraints: &Constraint) -> bool {
        Version::parse(version).is_ok_and(|v| constraints.matches(&v))
    }

    /// Sort versions in ascending order
    pub fn sort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, true)
    }

    /// Sort versions in descending order (reverse sort)
    pub fn rsort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, false)
    }

    fn select(versions: &[&str], constraints: &str, wanted: Ordering) -> Option<String> {
        let parsed_constraints = Constraint::parse(constraints).ok()?;

        let mut best: Option<(Version, &str)> = None;
        for v in versions {
            let Ok(version) = Version::parse(v) else {
                continue;
            };
            if !parsed_constraints.matches(&version) {
                continue;
            }
            // First of several equal versions wins
            let better = match &best {
                Some((current, _)) => version.compare(current) == wanted,
                None => true,
            };
            if better {
                best = Some((version, *v));
            }
        }

        best.map(|(_, v)| v.to_string())
    }

    fn usort(versions: &[&str], ascending: bool) -> Vec<String> {
        let mut parsed: Vec<(Version, usize)> = versions
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((Version::parse(v).ok()?, i)))
            .collect();

        // Stable, so versions equal by precedence keep their input order
        parsed.sort_by(|(a, _), (b, _)| {
            let cmp = a.compare(b);
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        // Return original versions in sorted order
        parsed
            .into_iter()
            .map(|(_, i)| versions[i].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfies_positive() {
        // Hyphen ranges
        assert!(Semver::satisfies("1.2.3", "1.0.0 - 2.0.0"));
        assert!(Semver::satisfies("1.2.3", "1.2.3+asdf - 2.4.3+asdf"));
        assert!(Semver::satisfies("2.4.3-alpha", "1.2.3+asdf - 2.4.3+asdf"));

        // Caret with build metadata
        assert!(Semver::satisfies("1.2.3", "^1.2.3+build"));
        assert!(Semver::satisfies("1.3.0", "^1.2.3+build"));

        // Prerelease with operators
        assert!(Semver::satisfies("1.2.3-beta", "<=1.2.3"));
        assert!(Semver::satisfies("1.2.3-beta", "<1.2.3"));

        // Basic constraints
        assert!(Semver::satisfies("1.0.0", "1.0.0"));
        assert!(Semver::satisfies("1.2.3", "*"));
        assert!(Semver::satisfies("1.0.0", ">=1.0.0"));
        assert!(Semver::satisfies("1.1.0", ">1.0.0"));
        assert!(Semver::satisfies("0.2.9", "<2.0.0"));

        // Or constraints
        assert!(Semver::satisfies("1.2.4", "0.1.20 || 1.2.4"));
        assert!(Semver::satisfies("0.0.0", ">=0.2.3 || <0.0.1"));

        // Tilde
        assert!(Semver::satisfies("2.4.5", "~2.4"));
        assert!(Semver::satisfies("1.2.3", "~1"));
        assert!(Semver::satisfies("1.0.7", "~1.0"));
    }

    #[test]
    fn test_satisfies_negative() {
        assert!(!Semver::satisfies("2.2.3", "1.0.0 - 2.0.0"));
        assert!(!Semver::satisfies("1.2.3-beta", "^1.2.3"));
        assert!(!Semver::satisfies("2.0.0", "^1.2.3"));
        assert!(!Semver::satisfies("1.5.0", "~1.2"));
        assert!(!Semver::satisfies("1.0.0", ">1.0.0"));
        assert!(!Semver::satisfies("1.2.8", "1.2.7 || >=1.2.9 <2.0.0"));

        // Invalid versions or constraints never satisfy
        assert!(!Semver::satisfies("v1.2.3", "*"));
        assert!(!Semver::satisfies("1.2", "*"));
        assert!(!Semver::satisfies("1.0.0", ">= 1.0.0"));
        assert!(!Semver::satisfies("1.0.0", ""));
    }

    #[test]
    fn test_satisfied_by() {
        let versions = ["1.0", "1.2", "1.2.3", "1.2.9", "1.3.0", "2.0.0", "garbage"];

        assert_eq!(Semver::satisfied_by(&versions, "~1.2"), vec!["1.2.3", "1.2.9"]);
        assert_eq!(Semver::satisfied_by(&versions, "1.3.0 || >=2"), vec!["1.3.0", "2.0.0"]);
        assert!(Semver::satisfied_by(&versions, "M").is_empty());
    }

    #[test]
    fn test_max_min_satisfying() {
        let versions = ["1.2.3", "1.2.4", "1.2.4+build", "1.3.0-rc.1", "2.0.0"];

        assert_eq!(Semver::max_satisfying(&versions, "^1.2").as_deref(), Some("1.3.0-rc.1"));
        assert_eq!(Semver::max_satisfying(&versions, "<1.3.0-0").as_deref(), Some("1.2.4"));
        assert_eq!(Semver::min_satisfying(&versions, "^1.2").as_deref(), Some("1.2.3"));
        assert_eq!(Semver::max_satisfying(&versions, "*").as_deref(), Some("2.0.0"));
        assert_eq!(Semver::min_satisfying(&versions, ">1.2.4").as_deref(), Some("1.3.0-rc.1"));
        assert_eq!(Semver::max_satisfying(&versions, ">=3"), None);
        assert_eq!(Semver::max_satisfying(&versions, "~"), None);
    }

    #[test]
    fn test_sort() {
        let versions = [
            "1.0.0",
            "0.1.0",
            "0.1.0-beta",
            "0.1.0-alpha.1",
            "0.1.0-alpha",
            "3.2.1",
            "not-a-version",
            "2.4.0-rc.10",
            "2.4.0-rc.2",
            "2.4.0",
        ];

        assert_eq!(
            Semver::sort(&versions),
            vec![
                "0.1.0-alpha",
                "0.1.0-alpha.1",
                "0.1.0-beta",
                "0.1.0",
                "1.0.0",
                "2.4.0-rc.2",
                "2.4.0-rc.10",
                "2.4.0",
                "3.2.1",
            ]
        );
        assert_eq!(
            Semver::rsort(&versions),
            vec![
                "3.2.1",
                "2.4.0",
                "2.4.0-rc.10",
                "2.4.0-rc.2",
                "1.0.0",
                "0.1.0",
                "0.1.0-beta",
                "0.1.0-alpha.1",
                "0.1.0-alpha",
            ]
        );
    }

    #[test]
    fn test_sort_keeps_metadata_order() {
        let versions = ["1.0.0+b", "1.0.0+a", "0.9.0"];
        assert_eq!(Semver::sort(&versions), vec!["0.9.0", "1.0.0+b", "1.0.0+a"]);
        assert_eq!(Semver::rsort(&versions), vec!["1.0.0+b", "1.0.0+a", "0.9.0"]);
    }

    #[test]
    fn test_parsed_constraints() {
        let constraints = Semver::parse_constraints("^1.2.3 || ~2.4").unwrap();

        assert!(Semver::satisfies_parsed("1.9.0", &constraints));
        assert!(Semver::satisfies_parsed("2.4.9", &constraints));
        assert!(!Semver::satisfies_parsed("2.5.0", &constraints));
        assert!(!Semver::satisfies_parsed("bogus", &constraints));

        assert_eq!(Semver::parse_constraints(""), Err(ConstraintError::Empty));
    }
}
