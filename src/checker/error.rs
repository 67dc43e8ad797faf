//! Error types for checker configuration.

/// Errors that can occur when loading or validating a checker
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// YAML deserialization failed (malformed YAML or schema mismatch).
    #[error("YAML deserialization failed: {0}")]
    Deserialize(String),

    /// A configured rule version cannot be used.
    #[error("invalid rule version {version}: {reason}")]
    InvalidVersion {
        /// The rejected version, as written.
        version: String,
        /// A human-readable explanation.
        reason: String,
    },

    /// A structural constraint was violated after deserialization.
    #[error("invalid checker configuration: {reason}")]
    Invalid {
        /// A human-readable explanation of the violation.
        reason: String,
    },
}
