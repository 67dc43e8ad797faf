//! `proofcheck` verifies formal proofs in a Hilbert-style
//! first-order calculus.
//!
//! A proof is an ordered list of lines, each justified by a named inference
//! rule. The checker verifies every line against earlier lines and proved
//! formulas under a versioned rule set and collects every defect it finds.

/// Proof lines, reasons, resolvers and the proof checker itself.
pub mod checker;
/// Formula trees and structural operations on them.
pub mod formula;
