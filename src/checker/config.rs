//! YAML configuration for building a [`ProofChecker`].
//!
//! Keys use `TitleCase` with lowercase aliases, and unknown keys are
//! rejected:
//!
//! ```yaml
//! Profile: conditional
//! SupportedVersions: ["0.01.00", "0.02.00"]
//! ConditionalMinimum: "0.02.00"
//! MaxConditionalDepth: 16
//! ```
//!
//! Everything but `Profile` is optional and overrides the profile's
//! default.

use serde::Deserialize;

use super::error::ConfigError;
use super::verifier::{DEFAULT_MAX_CONDITIONAL_DEPTH, ProofChecker};
use super::version::Version;

/// The base behaviour a configuration starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// [`ProofChecker::basic`].
    Basic,
    /// [`ProofChecker::conditional`].
    Conditional,
    /// [`ProofChecker::disabled`].
    Disabled,
}

/// Deserialized checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckerConfig {
    /// Base profile.
    #[serde(rename = "Profile", alias = "profile")]
    pub profile: Profile,

    /// Replaces the profile's supported rule versions.
    #[serde(rename = "SupportedVersions", alias = "supported_versions", default)]
    pub supported_versions: Option<Vec<Version>>,

    /// Replaces the minimum rule version inside conditional proofs.
    #[serde(rename = "ConditionalMinimum", alias = "conditional_minimum", default)]
    pub conditional_minimum: Option<Version>,

    /// Replaces the maximum conditional-proof nesting depth.
    #[serde(rename = "MaxConditionalDepth", alias = "max_conditional_depth", default)]
    pub max_conditional_depth: Option<usize>,
}

impl CheckerConfig {
    /// Parses a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deserialize`] if the YAML is malformed or
    /// does not match the configuration schema.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(input).map_err(|error| ConfigError::Deserialize(error.to_string()))
    }

    /// Builds the configured checker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if overrides are given for the
    /// disabled profile, a conditional minimum is given for the basic
    /// profile, the supported set is empty or the depth is zero. Returns
    /// [`ConfigError::InvalidVersion`] if the conditional minimum is not a
    /// supported version.
    pub fn build(&self) -> Result<ProofChecker, ConfigError> {
        let base = match self.profile {
            Profile::Disabled => return self.build_disabled(),
            Profile::Basic => ProofChecker::basic(),
            Profile::Conditional => ProofChecker::conditional(),
        };
        if self.profile == Profile::Basic && self.conditional_minimum.is_some() {
            return Err(invalid(
                "the basic profile does not accept conditional proofs",
            ));
        }
        let supported: Vec<Version> = self.supported_versions.clone().unwrap_or_else(|| {
            base.supported_versions().iter().copied().collect()
        });
        if supported.is_empty() {
            return Err(invalid("SupportedVersions must not be empty"));
        }
        let minimum = self.conditional_minimum.or_else(|| base.conditional_minimum());
        if let Some(version) = minimum.filter(|version| !supported.contains(version)) {
            return Err(ConfigError::InvalidVersion {
                version: version.to_string(),
                reason: "the conditional minimum must be a supported version".to_owned(),
            });
        }
        let depth = self
            .max_conditional_depth
            .unwrap_or(DEFAULT_MAX_CONDITIONAL_DEPTH);
        if depth == 0 {
            return Err(invalid("MaxConditionalDepth must be positive"));
        }
        Ok(ProofChecker::new(supported, minimum, depth))
    }

    fn build_disabled(&self) -> Result<ProofChecker, ConfigError> {
        let overridden = self.supported_versions.is_some()
            || self.conditional_minimum.is_some()
            || self.max_conditional_depth.is_some();
        if overridden {
            return Err(invalid("the disabled profile takes no overrides"));
        }
        Ok(ProofChecker::disabled())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::basic("Profile: basic\n", ProofChecker::basic())]
    #[case::conditional("Profile: conditional\n", ProofChecker::conditional())]
    #[case::disabled("profile: disabled\n", ProofChecker::disabled())]
    fn profiles_build_their_checkers(#[case] yaml: &str, #[case] expected: ProofChecker) {
        let config = CheckerConfig::from_yaml(yaml).expect("config should parse");
        assert_eq!(config.build(), Ok(expected));
    }

    #[test]
    fn overrides_replace_profile_defaults() {
        let yaml = r#"
Profile: conditional
SupportedVersions: ["0.02.00"]
MaxConditionalDepth: 3
"#;
        let checker = CheckerConfig::from_yaml(yaml)
            .and_then(|config| config.build())
            .expect("config should build");
        assert_eq!(
            checker.supported_versions().iter().copied().collect::<Vec<_>>(),
            vec![Version::V0_02_00]
        );
        assert_eq!(checker.conditional_minimum(), Some(Version::V0_02_00));
        assert_eq!(checker.max_conditional_depth(), 3);
    }

    #[rstest]
    #[case::empty_supported("Profile: basic\nSupportedVersions: []\n")]
    #[case::zero_depth("Profile: conditional\nMaxConditionalDepth: 0\n")]
    #[case::basic_with_minimum("Profile: basic\nConditionalMinimum: \"0.02.00\"\n")]
    #[case::disabled_with_override("Profile: disabled\nMaxConditionalDepth: 2\n")]
    fn rejects_inconsistent_configuration(#[case] yaml: &str) {
        let config = CheckerConfig::from_yaml(yaml).expect("config should parse");
        assert!(matches!(config.build(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_unsupported_conditional_minimum() {
        let yaml = "Profile: conditional\nSupportedVersions: [\"0.01.00\"]\n";
        let config = CheckerConfig::from_yaml(yaml).expect("config should parse");
        assert_eq!(
            config.build(),
            Err(ConfigError::InvalidVersion {
                version: "0.02.00".to_owned(),
                reason: "the conditional minimum must be a supported version".to_owned(),
            })
        );
    }

    #[rstest]
    #[case::unknown_key("Profile: basic\nStrict: true\n")]
    #[case::unknown_profile("Profile: relaxed\n")]
    #[case::bad_version("Profile: basic\nSupportedVersions: [\"1.2\"]\n")]
    fn rejects_malformed_yaml(#[case] yaml: &str) {
        assert!(matches!(
            CheckerConfig::from_yaml(yaml),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
