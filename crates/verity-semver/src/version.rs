//! Version data model and SemVer 2.0.0 precedence

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // Allowed characters of a prerelease or metadata identifier
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[0-9A-Za-z-]+$").unwrap();
}

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("major.minor.patch pattern not found in \"{0}\"")]
    WrongFieldCount(String),
    #[error("expected unsigned integer: \"{0}\"")]
    NotANumber(String),
    #[error("leading zeroes in numeric field or identifier: \"{0}\"")]
    LeadingZero(String),
    #[error("number too large: \"{0}\"")]
    TooLarge(String),
    #[error("identifier is empty")]
    EmptyIdentifier,
    #[error("not alphanumerical: \"{0}\"")]
    InvalidIdentifier(String),
    #[error("prerelease section is empty")]
    EmptyPrerelease,
    #[error("build metadata section is empty")]
    EmptyMetadata,
}

/// A single prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// All ASCII digits, compared numerically
    Numeric(u64),
    /// Letters, digits and hyphens, compared in ASCII order
    AlphaNumeric(String),
}

impl Identifier {
    /// Parse and validate a prerelease identifier
    pub fn parse(ident: &str) -> Result<Self, VersionError> {
        validate_identifier(ident)?;

        if ident.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Identifier::Numeric(parse_number(ident)?));
        }

        Ok(Identifier::AlphaNumeric(ident.to_string()))
    }

    /// Classify an identifier without validating it
    fn classify(ident: &str) -> Self {
        match ident.parse::<u64>() {
            Ok(n) if ident.bytes().all(|b| b.is_ascii_digit()) => Identifier::Numeric(n),
            _ => Identifier::AlphaNumeric(ident.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// A semantic version.
///
/// Equality, hashing and ordering follow SemVer precedence, so build
/// metadata is ignored by all three. Use [`Version::metadata`] to tell two
/// equal versions apart.
#[derive(Debug, Clone, Default)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Vec<Identifier>,
    metadata: Vec<String>,
}

impl Version {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Assemble a version from trusted parts, skipping validation.
    pub fn build(major: u64, minor: u64, patch: u64, prerelease: &[&str], metadata: &[&str]) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: prerelease.iter().map(|p| Identifier::classify(p)).collect(),
            metadata: metadata.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Parse a version string such as `1.0.3-alpha.1+35.45`
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        if version.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut result = Version::default();

        let version = match version.split_once('+') {
            Some((rest, metadata)) => {
                if metadata.is_empty() {
                    return Err(VersionError::EmptyMetadata);
                }
                result.set_metadata(&metadata.split('.').collect::<Vec<_>>())?;
                rest
            }
            None => version,
        };

        let version = match version.split_once('-') {
            Some((rest, prerelease)) => {
                if prerelease.is_empty() {
                    return Err(VersionError::EmptyPrerelease);
                }
                result.set_prerelease(&prerelease.split('.').collect::<Vec<_>>())?;
                rest
            }
            None => version,
        };

        let fields: Vec<&str> = version.split('.').collect();
        if fields.len() != 3 {
            return Err(VersionError::WrongFieldCount(version.to_string()));
        }

        result.major = parse_number(fields[0])?;
        result.minor = parse_number(fields[1])?;
        result.patch = parse_number(fields[2])?;

        Ok(result)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn set_major(&mut self, major: u64) {
        self.major = major;
    }

    /// Increase the major version by 1, saturating at `u64::MAX`
    pub fn increment_major(&mut self) {
        self.major = self.major.saturating_add(1);
    }

    /// Decrease the major version by 1, saturating at 0
    pub fn decrement_major(&mut self) {
        self.major = self.major.saturating_sub(1);
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn set_minor(&mut self, minor: u64) {
        self.minor = minor;
    }

    pub fn increment_minor(&mut self) {
        self.minor = self.minor.saturating_add(1);
    }

    pub fn decrement_minor(&mut self) {
        self.minor = self.minor.saturating_sub(1);
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn set_patch(&mut self, patch: u64) {
        self.patch = patch;
    }

    pub fn increment_patch(&mut self) {
        self.patch = self.patch.saturating_add(1);
    }

    pub fn decrement_patch(&mut self) {
        self.patch = self.patch.saturating_sub(1);
    }

    /// Prerelease identifiers, empty for a release version
    pub fn prerelease(&self) -> &[Identifier] {
        &self.prerelease
    }

    /// Build metadata identifiers
    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Replace the prerelease identifiers. An empty slice clears them.
    pub fn set_prerelease(&mut self, identifiers: &[&str]) -> Result<(), VersionError> {
        self.prerelease = identifiers
            .iter()
            .map(|ident| Identifier::parse(ident))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Replace the build metadata. Numeric metadata may have leading zeroes.
    pub fn set_metadata(&mut self, identifiers: &[&str]) -> Result<(), VersionError> {
        let mut metadata = Vec::with_capacity(identifiers.len());
        for ident in identifiers {
            validate_identifier(ident)?;
            metadata.push(ident.to_string());
        }
        self.metadata = metadata;
        Ok(())
    }

    /// Drop prerelease and metadata, keeping `major.minor.patch`
    pub(crate) fn release(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Compare by SemVer precedence. Build metadata is never inspected.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }

    /// Check this version against a constraint string
    pub fn satisfies(&self, constraint: &str) -> Result<bool, crate::ConstraintError> {
        Ok(crate::Constraint::parse(constraint)?.matches(self))
    }
}

fn compare_prerelease(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        // A release has higher precedence than any of its prereleases
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // Slice ordering already puts a strict prefix first
        (false, false) => a.cmp(b),
    }
}

pub(crate) fn parse_number(field: &str) -> Result<u64, VersionError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::NotANumber(field.to_string()));
    }
    if has_leading_zero(field) {
        return Err(VersionError::LeadingZero(field.to_string()));
    }
    field
        .parse()
        .map_err(|_| VersionError::TooLarge(field.to_string()))
}

fn validate_identifier(ident: &str) -> Result<(), VersionError> {
    if ident.is_empty() {
        return Err(VersionError::EmptyIdentifier);
    }
    if !IDENTIFIER_RE.is_match(ident) {
        return Err(VersionError::InvalidIdentifier(ident.to_string()));
    }
    Ok(())
}

fn has_leading_zero(number: &str) -> bool {
    number.len() > 1 && number.starts_with('0')
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if !self.prerelease.is_empty() {
            f.write_str("-")?;
            for (i, ident) in self.prerelease.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                write!(f, "{}", ident)?;
            }
        }

        if !self.metadata.is_empty() {
            write!(f, "+{}", self.metadata.join("."))?;
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Version;

    impl Serialize for Version {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Version {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct VersionVisitor;

            impl<'de> Visitor<'de> for VersionVisitor {
                type Value = Version;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a SemVer version as a string")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Version::parse(v).map_err(de::Error::custom)
                }
            }

            deserializer.deserialize_str(VersionVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse() {
        let ver = v("1.0.3-alpha.1+35.45");
        assert_eq!(ver.major(), 1);
        assert_eq!(ver.minor(), 0);
        assert_eq!(ver.patch(), 3);
        assert_eq!(
            ver.prerelease(),
            &[Identifier::AlphaNumeric("alpha".to_string()), Identifier::Numeric(1)]
        );
        assert_eq!(ver.metadata(), &["35".to_string(), "45".to_string()]);
        assert_eq!(ver.to_string(), "1.0.3-alpha.1+35.45");
    }

    #[test]
    fn test_parse_hyphens_in_prerelease() {
        // The first hyphen starts the prerelease, later ones belong to it
        let ver = v("1.2.3-alpha-1.b-eta+b-uild");
        assert_eq!(ver.prerelease().len(), 2);
        assert_eq!(ver.prerelease()[0], Identifier::AlphaNumeric("alpha-1".to_string()));
        assert_eq!(ver.metadata(), &["b-uild".to_string()]);

        let ver = v("1.0.0-2.0.0");
        assert_eq!(ver.prerelease(), &[Identifier::Numeric(2), Identifier::Numeric(0), Identifier::Numeric(0)]);
    }

    #[test]
    fn test_bad_versions() {
        let bad = [
            "",
            ".",
            "1.",
            ".1",
            "a.b.c",
            "1.a.b",
            "1.1.a",
            "1.a.1",
            "a.1.1",
            "..",
            "1..",
            "1.1.",
            "1..1",
            "1.1",
            "1.1.1.1",
            "1.1.+123",
            "1.1.-beta",
            "-1.1.1",
            "1.-1.1",
            "1.1.-1",
            "01.1.1",
            "001.1.1",
            "1.01.1",
            "1.001.1",
            "1.1.01",
            "1.1.001",
            "1.1.1-01",
            "1.1.1-001",
            "1.1.1-beta.01",
            "1.1.1-beta.001",
            "0.0.0-!",
            "0.0.0+!",
            "0.0.0-.alpha",
            "0.0.0-alpha+",
            "0.0.0-alpha+test.",
            "0.0.0-",
            "0.0.0+",
            "1.0.0+a+b",
            " 1.0.0",
            "v1.0.0",
            "18446744073709551616.0.0",
            "1.0.0-18446744073709551616",
        ];

        for version in bad {
            assert!(Version::parse(version).is_err(), "{:?} should not parse", version);
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        assert_eq!(Version::parse("1.2"), Err(VersionError::WrongFieldCount("1.2".to_string())));
        assert_eq!(Version::parse("01.1.1"), Err(VersionError::LeadingZero("01".to_string())));
        assert_eq!(Version::parse("1.1.1-01"), Err(VersionError::LeadingZero("01".to_string())));
        assert_eq!(Version::parse("1.1.x"), Err(VersionError::NotANumber("x".to_string())));
        assert_eq!(Version::parse("1.0.0-"), Err(VersionError::EmptyPrerelease));
        assert_eq!(Version::parse("1.0.0+"), Err(VersionError::EmptyMetadata));
        assert_eq!(Version::parse("1.0.0-a..b"), Err(VersionError::EmptyIdentifier));
        assert_eq!(Version::parse("1.0.0-a_b"), Err(VersionError::InvalidIdentifier("a_b".to_string())));
    }

    #[test]
    fn test_identifier_boundaries() {
        assert_eq!(Identifier::parse("0"), Ok(Identifier::Numeric(0)));
        assert_eq!(Identifier::parse("00"), Err(VersionError::LeadingZero("00".to_string())));
        assert_eq!(Identifier::parse("0a"), Ok(Identifier::AlphaNumeric("0a".to_string())));
        assert_eq!(Identifier::parse("-"), Ok(Identifier::AlphaNumeric("-".to_string())));
        assert_eq!(Identifier::parse("10"), Ok(Identifier::Numeric(10)));

        // Metadata keeps leading zeroes
        assert_eq!(v("1.0.0+001").metadata(), &["001".to_string()]);
        assert!(v("1.0.0-0").prerelease()[0].is_numeric());
    }

    #[test]
    fn test_round_trip() {
        let versions = [
            "0.0.0",
            "1.2.3",
            "1.2.3-0",
            "1.2.3-alpha.1",
            "1.2.3-alpha.b-eta+123.b-uild",
            "1.2.3+001",
            "18446744073709551615.0.1-x.7.z.92",
        ];

        for text in versions {
            let ver = v(text);
            let again = v(&ver.to_string());
            assert_eq!(again.to_string(), text);
            assert_eq!(again.major(), ver.major());
            assert_eq!(again.minor(), ver.minor());
            assert_eq!(again.patch(), ver.patch());
            assert_eq!(again.prerelease(), ver.prerelease());
            assert_eq!(again.metadata(), ver.metadata());
        }
    }

    #[test]
    fn test_build_and_stringer() {
        let mut ver = Version::build(1, 2, 3, &["alpha", "1"], &["35", "45"]);
        assert_eq!(ver.to_string(), "1.2.3-alpha.1+35.45");

        ver.set_major(2);
        ver.set_minor(3);
        ver.set_patch(4);
        ver.set_prerelease(&["beta", "1"]).unwrap();
        ver.set_metadata(&["22", "43"]).unwrap();
        assert_eq!(ver.to_string(), "2.3.4-beta.1+22.43");

        assert!(ver.set_prerelease(&["alpha", "-3", "01"]).is_err());
        assert!(ver.set_metadata(&["a.b"]).is_err());

        ver.set_prerelease(&[]).unwrap();
        ver.set_metadata(&[]).unwrap();
        assert_eq!(ver.to_string(), "2.3.4");
    }

    #[test]
    fn test_increment_decrement() {
        let mut ver = Version::new(1, 2, 3);
        ver.increment_major();
        ver.increment_minor();
        ver.increment_patch();
        assert_eq!(ver.to_string(), "2.3.4");

        ver.decrement_major();
        ver.decrement_minor();
        ver.decrement_patch();
        assert_eq!(ver.to_string(), "1.2.3");

        let mut zero = Version::new(0, 0, 0);
        zero.decrement_major();
        assert_eq!(zero.major(), 0);

        let mut max = Version::new(u64::MAX, 0, 0);
        max.increment_major();
        assert_eq!(max.major(), u64::MAX);
    }

    #[test]
    fn test_compare_fields() {
        let comparisons = [
            ("1.0.0", "1.0.0", Ordering::Equal),
            ("2.0.0", "1.0.0", Ordering::Greater),
            ("0.1.0", "0.1.0", Ordering::Equal),
            ("0.2.0", "0.1.0", Ordering::Greater),
            ("0.0.2", "0.0.1", Ordering::Greater),
            ("2.2.4", "1.2.4", Ordering::Greater),
            ("1.3.3", "1.2.3", Ordering::Greater),
            ("1.2.4", "1.2.3", Ordering::Greater),
            ("1.0.0", "2.0.0", Ordering::Less),
            ("2.0.0", "2.1.0", Ordering::Less),
            ("2.1.0", "2.1.1", Ordering::Less),
            ("1.10.0", "1.9.0", Ordering::Greater),
        ];

        for (a, b, expected) in comparisons {
            assert_eq!(v(a).compare(&v(b)), expected, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];

        for pair in chain.windows(2) {
            assert_eq!(v(pair[0]).compare(&v(pair[1])), Ordering::Less, "{} < {}", pair[0], pair[1]);
            assert_eq!(v(pair[1]).compare(&v(pair[0])), Ordering::Greater, "{} > {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_compare_prerelease_kinds() {
        assert_eq!(v("1.0.0-beta.beta").compare(&v("1.0.0-beta.alpha")), Ordering::Greater);
        assert_eq!(v("1.0.0-1").compare(&v("1.0.0-a")), Ordering::Less);
        assert_eq!(v("1.0.0-0").compare(&v("1.0.0-1")), Ordering::Less);
        assert_eq!(v("1.0.0-0").compare(&v("1.0.0-0a")), Ordering::Less);
        assert_eq!(v("1.0.0-Z").compare(&v("1.0.0-a")), Ordering::Less);
        assert_eq!(v("1.0.0-a").compare(&v("1.0.0-a.0")), Ordering::Less);
        assert_eq!(v("1.0.0-99").compare(&v("1.0.0-100")), Ordering::Less);
    }

    #[test]
    fn test_metadata_is_ignored() {
        let a = v("1.0.0-rc.1+aaa");
        let b = v("1.0.0-rc.1+bbb");
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert_eq!(a, b);
        assert_ne!(a.metadata(), b.metadata());

        use std::collections::HashSet;
        let set: HashSet<Version> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_total_order() {
        let sample: Vec<Version> = [
            "0.0.1-alpha.preview+123.456",
            "1.2.3-alpha.1",
            "1.2.3-alpha.2+123.456",
            "1.2.3-alpha.b-eta",
            "1.2.3+123.b-uild",
            "1.2.3",
            "1.3.3-alpha.b-eta+123.b-uild",
            "1.4.3+123.456",
            "1.0.0-0",
            "1.0.0-0.0",
        ]
        .iter()
        .map(|s| v(s))
        .collect();

        for a in &sample {
            assert_eq!(a.compare(a), Ordering::Equal);
            for b in &sample {
                assert_eq!(a.compare(b), b.compare(a).reverse());
                for c in &sample {
                    if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
                        assert_ne!(a.compare(c), Ordering::Greater, "{} <= {} <= {}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_is_prerelease() {
        assert!(v("1.0.0-rc.1+build").is_prerelease());
        assert!(!v("1.0.0+build").is_prerelease());
    }

    #[test]
    fn test_satisfies() {
        assert_eq!(v("1.4.6").satisfies("1.2.7 || >=1.2.9 <2.0.0"), Ok(true));
        assert_eq!(v("1.2.8").satisfies("1.2.7 || >=1.2.9 <2.0.0"), Ok(false));
        assert!(v("1.0.0").satisfies(">= 1.0.0").is_err());
    }

    #[test]
    fn test_from_str() {
        let ver: Version = "3.2.1-rc.1".parse().unwrap();
        assert_eq!(ver, Version::build(3, 2, 1, &["rc", "1"], &[]));
        assert!("3.2".parse::<Version>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Container {
            name: Version,
        }

        let parsed: Container = serde_json::from_str(r#"{"name":"1.2.3"}"#).unwrap();
        assert_eq!(parsed.name.to_string(), "1.2.3");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"name":"1.2.3"}"#);

        let with_extras: Version = serde_json::from_str(r#""1.2.3-alpha.1+35.45""#).unwrap();
        assert_eq!(with_extras.metadata(), &["35".to_string(), "45".to_string()]);

        assert!(serde_json::from_str::<Version>(r#""01.2.3""#).is_err());
        assert!(serde_json::from_str::<Version>("123").is_err());
    }
}
