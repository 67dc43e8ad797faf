//! Formula trees and the structural operations the proof checker needs.
//!
//! Formulas are built from [`Element`]s. The [`utility`] functions collect
//! variables and perform capture-aware substitutions, and [`check_formula`]
//! decides well-formedness.

mod element;
pub mod utility;
mod wellformed;

pub use element::{Element, ElementList, Operator, UnknownOperator};
pub use wellformed::{WellFormedError, check_formula, check_term};
