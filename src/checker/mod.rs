//! Proof lines, inference rules and the proof checker.
//!
//! The entry point is [`ProofChecker::check_proof`]. It walks the lines of
//! a proof, validates each line against the reason given for it and
//! returns every [`ProofCheckError`] it finds. Callers plug in the
//! formulas proved elsewhere through a [`ReferenceResolver`] and the
//! declared rule versions through a [`RuleChecker`].

mod conditional;
mod config;
mod context;
mod diagnostic;
mod error;
mod inference;
mod reason;
mod resolver;
mod rules;
mod scope;
mod substitution;
mod verifier;
mod version;

pub use config::{CheckerConfig, Profile};
pub use context::ModuleContext;
pub use diagnostic::{ProofCheckError, ProofErrorCode};
pub use error::ConfigError;
pub use reason::{Hypothesis, ProofLine, Reason};
pub use resolver::{ProvedFormulaTable, ReferenceResolver};
pub use rules::{RuleChecker, RuleRegistry};
pub use verifier::{DEFAULT_MAX_CONDITIONAL_DEPTH, ProofChecker};
pub use version::{RuleKey, Version, VersionError};
