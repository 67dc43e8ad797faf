//! Rule versions and rule keys.
//!
//! Versions are written `major.minor.patch` with minor and patch padded to
//! two digits (`0.01.00`). They are totally ordered so the checker can
//! demand a minimum version for rules used inside conditional proofs.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de;

// ── Version ─────────────────────────────────────────────────────────

/// A proof rule version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    /// The first rule version: basic rules without conditional proofs.
    pub const V0_01_00: Self = Self::new(0, 1, 0);

    /// The rule version that introduced conditional proofs.
    pub const V0_02_00: Self = Self::new(0, 2, 0);

    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Returns the patch component.
    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}.{:02}", self.major, self.minor, self.patch)
    }
}

/// Errors produced when parsing a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{version}': {reason}")]
pub struct VersionError {
    /// The rejected input.
    pub version: String,
    /// A human-readable explanation.
    pub reason: String,
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| VersionError {
            version: s.to_owned(),
            reason: reason.to_owned(),
        };
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(fail("expected three dot-separated components"));
        };
        let component = |part: &str| -> Result<u32, VersionError> {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(fail("components must be non-empty decimal numbers"));
            }
            part.parse::<u32>()
                .map_err(|_| fail("component is out of range"))
        };
        Ok(Self::new(
            component(*major)?,
            component(*minor)?,
            component(*patch)?,
        ))
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ── RuleKey ─────────────────────────────────────────────────────────

/// Identity of a declared inference rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    name: String,
    version: Version,
}

impl RuleKey {
    /// Creates a rule key.
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
