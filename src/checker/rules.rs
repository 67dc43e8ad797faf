//! Access to the inference rules a module declares.

use indexmap::IndexMap;
use serde::Deserialize;

use super::version::{RuleKey, Version};

/// Tells the checker which rules are declared and at which version.
pub trait RuleChecker {
    /// Returns the declared rule named `name`, or `None` if the rule was
    /// never declared.
    fn rule(&self, name: &str) -> Option<RuleKey>;
}

/// In-memory rule declarations in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RuleRegistry {
    rules: IndexMap<String, Version>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` at `version`, replacing an earlier declaration.
    #[must_use]
    pub fn with_rule(mut self, name: impl Into<String>, version: Version) -> Self {
        self.rules.insert(name.into(), version);
        self
    }

    /// Declares every rule name the checker knows at `version`.
    #[must_use]
    pub fn all_rules_at(version: Version) -> Self {
        [
            "ADD",
            "RENAME",
            "MP",
            "SUBST_FREE",
            "SUBST_PRED",
            "SUBST_FUN",
            "UNIVERSAL",
            "EXISTENTIAL",
            "CP",
        ]
        .into_iter()
        .fold(Self::new(), |registry, name| registry.with_rule(name, version))
    }
}

impl RuleChecker for RuleRegistry {
    fn rule(&self, name: &str) -> Option<RuleKey> {
        self.rules
            .get(name)
            .map(|version| RuleKey::new(name, *version))
    }
}
