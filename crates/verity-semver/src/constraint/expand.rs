//! Range expansion
//!
//! Translates tilde, caret, hyphen and x-range forms into primitive
//! comparisons. Upper bounds that cannot be represented are dropped.

use super::node::Comparison;
use super::Operator;
use crate::version::{parse_number, VersionError};
use crate::Version;

/// A version with missing or wildcard trailing fields, such as `1.2` or `1.x.x`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
}

impl Partial {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() > 3 {
            return Err(VersionError::WrongFieldCount(text.to_string()));
        }

        let mut fields = [None; 3];
        let mut wildcard = false;
        for (field, part) in fields.iter_mut().zip(parts) {
            if matches!(part, "x" | "X" | "*") {
                wildcard = true;
                continue;
            }
            if wildcard {
                return Err(VersionError::NotANumber(part.to_string()));
            }
            *field = Some(parse_number(part)?);
        }

        Ok(Partial {
            major: fields[0],
            minor: fields[1],
            patch: fields[2],
        })
    }

    /// Lowest version matched, missing fields filled with zero
    fn floor(&self) -> Version {
        Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }

    /// Exclusive upper bound, `None` when unbounded
    fn ceiling(&self) -> Option<Version> {
        let floor = self.floor();
        match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(_), None, _) => next_major(&floor),
            (Some(_), Some(_), None) => next_minor(&floor),
            (Some(_), Some(_), Some(_)) => next_patch(&floor),
        }
    }
}

/// Operand of a comparator: a full version or a partial one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Version(Version),
    Partial(Partial),
}

fn next_major(version: &Version) -> Option<Version> {
    if version.major() == u64::MAX {
        return None;
    }
    let mut next = version.release();
    next.increment_major();
    next.set_minor(0);
    next.set_patch(0);
    Some(next)
}

fn next_minor(version: &Version) -> Option<Version> {
    if version.minor() == u64::MAX {
        return next_major(version);
    }
    let mut next = version.release();
    next.increment_minor();
    next.set_patch(0);
    Some(next)
}

fn next_patch(version: &Version) -> Option<Version> {
    if version.patch() == u64::MAX {
        return next_minor(version);
    }
    let mut next = version.release();
    next.increment_patch();
    Some(next)
}

/// A comparison no version satisfies; nothing sorts below `0.0.0-0`
fn match_none() -> Comparison {
    Comparison::new(Operator::LessThan, Version::build(0, 0, 0, &["0"], &[]))
}

fn bounded(lower: Version, upper: Option<Version>) -> Vec<Comparison> {
    let mut comparisons = vec![Comparison::new(Operator::GreaterThanOrEqual, lower)];
    if let Some(upper) = upper {
        comparisons.push(Comparison::new(Operator::LessThan, upper));
    }
    comparisons
}

/// `v1 - v2` becomes `>=v1 <=v2`
pub fn hyphen(lower: &Operand, upper: &Operand) -> Vec<Comparison> {
    let mut comparisons = Vec::with_capacity(2);

    match lower {
        Operand::Version(v) => comparisons.push(Comparison::new(Operator::GreaterThanOrEqual, v.clone())),
        Operand::Partial(p) if p.major.is_some() => {
            comparisons.push(Comparison::new(Operator::GreaterThanOrEqual, p.floor()))
        }
        Operand::Partial(_) => {}
    }

    match upper {
        Operand::Version(v) => comparisons.push(Comparison::new(Operator::LessThanOrEqual, v.clone())),
        Operand::Partial(p) => {
            if let Some(ceiling) = p.ceiling() {
                comparisons.push(Comparison::new(Operator::LessThan, ceiling));
            }
        }
    }

    log::trace!("hyphen {:?} - {:?} => {:?}", lower, upper, comparisons);
    comparisons
}

/// `~1.2.3` allows patch-level changes: `>=1.2.3 <1.3.0`
pub fn tilde(operand: &Operand) -> Vec<Comparison> {
    let comparisons = match operand {
        Operand::Version(v) => bounded(v.clone(), next_minor(v)),
        // ~1 and ~1.2 cover the same versions as 1.x and 1.2.x
        Operand::Partial(p) => x_range(p),
    };

    log::trace!("tilde {:?} => {:?}", operand, comparisons);
    comparisons
}

/// `^1.2.3` allows changes that keep the leftmost non-zero field: `>=1.2.3 <2.0.0`
///
/// Follows npm caret rules. Older tooling built on this grammar accepted `^`
/// without bounding it at all; here `^0.2.3` means `>=0.2.3 <0.3.0`.
pub fn caret(operand: &Operand) -> Vec<Comparison> {
    let comparisons = match operand {
        Operand::Version(v) => {
            let upper = if v.major() > 0 {
                next_major(v)
            } else if v.minor() > 0 {
                next_minor(v)
            } else {
                next_patch(v)
            };
            bounded(v.clone(), upper)
        }
        Operand::Partial(p) => match (p.major, p.minor) {
            (Some(0), Some(_)) => bounded(p.floor(), next_minor(&p.floor())),
            (Some(_), Some(_)) => bounded(p.floor(), next_major(&p.floor())),
            _ => x_range(p),
        },
    };

    log::trace!("caret {:?} => {:?}", operand, comparisons);
    comparisons
}

/// `1.2.x` becomes `>=1.2.0 <1.3.0`, `1.x` becomes `>=1.0.0 <2.0.0`, `*` matches everything
pub fn x_range(partial: &Partial) -> Vec<Comparison> {
    match (partial.major, partial.minor, partial.patch) {
        (None, _, _) => Vec::new(),
        (Some(_), Some(_), Some(_)) => vec![Comparison::new(Operator::Equal, partial.floor())],
        _ => bounded(partial.floor(), partial.ceiling()),
    }
}

/// An operator applied to a full or partial version
pub fn primitive(operator: Operator, operand: &Operand) -> Vec<Comparison> {
    let partial = match operand {
        Operand::Version(v) => return vec![Comparison::new(operator, v.clone())],
        Operand::Partial(p) => p,
    };

    match operator {
        Operator::Equal => x_range(partial),
        Operator::GreaterThanOrEqual => vec![Comparison::new(Operator::GreaterThanOrEqual, partial.floor())],
        Operator::LessThan => vec![Comparison::new(Operator::LessThan, partial.floor())],
        Operator::GreaterThan => match partial.ceiling() {
            Some(ceiling) => vec![Comparison::new(Operator::GreaterThanOrEqual, ceiling)],
            None => vec![match_none()],
        },
        Operator::LessThanOrEqual => match partial.ceiling() {
            Some(ceiling) => vec![Comparison::new(Operator::LessThan, ceiling)],
            None => Vec::new(),
        },
    }
}
