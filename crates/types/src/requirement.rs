//! Version requirement parsing and matching
//!
//! A dependency declaration is either a semantic-version range or, when the
//! text does not parse as one, an opaque distribution tag (for example
//! `"latest"` or `"beta"`). Tags carry no matching semantics of their own;
//! they are resolved against the registry's `dist-tags` mapping before any
//! version matching happens.

use semver::{Comparator, Op, Version, VersionReq};
use std::fmt;

/// A version constraint a candidate version must satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A parsed semantic-version range
    Range(VersionReq),
    /// Raw text that is not a valid range, resolved later by dist-tag lookup
    Tag(String),
}

impl Requirement {
    /// Parse a requirement from its textual form. Never fails: text that is
    /// not a valid range is retained verbatim as a tag.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match VersionReq::parse(text) {
            Ok(req) => Self::Range(req),
            Err(_) => Self::Tag(text.to_string()),
        }
    }

    /// Build a range matching exactly the given version
    #[must_use]
    pub fn exact(version: &Version) -> Self {
        Self::Range(VersionReq {
            comparators: vec![Comparator {
                op: Op::Exact,
                major: version.major,
                minor: Some(version.minor),
                patch: Some(version.patch),
                pre: version.pre.clone(),
            }],
        })
    }

    /// Test whether a concrete version is admitted by this requirement.
    /// Tags never match directly; they must be resolved to a concrete
    /// version first.
    #[must_use]
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Self::Range(req) => req.matches(version),
            Self::Tag(_) => false,
        }
    }

    /// The parsed range, if this requirement is one
    #[must_use]
    pub fn as_range(&self) -> Option<&VersionReq> {
        match self {
            Self::Range(req) => Some(req),
            Self::Tag(_) => None,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(req) => write!(f, "{req}"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Select the highest version among `versions` that satisfies `req`
#[must_use]
pub fn select_highest<I>(versions: I, req: &VersionReq) -> Option<Version>
where
    I: IntoIterator<Item = Version>,
{
    versions
        .into_iter()
        .filter(|v| req.matches(v))
        .max()
}
