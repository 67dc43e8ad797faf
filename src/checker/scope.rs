//! Layered resolvers for proof bodies and conditional-proof hypotheses.
//!
//! A [`ProofScope`] answers for the lines of one proof body that precede
//! the line under check and defers everything else to the resolver it
//! wraps. A [`HypothesisScope`] adds the hypothesis of a conditional proof
//! on top of its enclosing scope.

use indexmap::IndexMap;

use super::context::ModuleContext;
use super::reason::ProofLine;
use super::resolver::ReferenceResolver;
use crate::formula::Element;

/// Position of a line inside its proof body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct LineIndex(pub(crate) usize);

/// The lines of one proof body visible from `current`.
pub(crate) struct ProofScope<'a> {
    pub(crate) labels: &'a IndexMap<String, LineIndex>,
    pub(crate) lines: &'a [ProofLine],
    pub(crate) current: LineIndex,
    pub(crate) lines_context: &'a ModuleContext,
    pub(crate) outer: &'a dyn ReferenceResolver,
}

impl ProofScope<'_> {
    fn earlier_line(&self, reference: &str) -> Option<(LineIndex, &ProofLine)> {
        let index = *self.labels.get(reference)?;
        if index >= self.current {
            return None;
        }
        self.lines.get(index.0).map(|line| (index, line))
    }
}

impl ReferenceResolver for ProofScope<'_> {
    fn is_proved_formula(&self, reference: &str) -> bool {
        self.outer.is_proved_formula(reference)
    }

    fn normalized_formula(&self, formula: &Element) -> Element {
        self.outer.normalized_formula(formula)
    }

    fn normalized_reference_formula(&self, reference: &str) -> Option<Element> {
        self.outer.normalized_reference_formula(reference)
    }

    fn is_local_proof_line_reference(&self, reference: &str) -> bool {
        self.earlier_line(reference).is_some() || self.outer.is_local_proof_line_reference(reference)
    }

    fn normalized_local_proof_line_reference(&self, reference: &str) -> Option<Element> {
        self.earlier_line(reference).map_or_else(
            || self.outer.normalized_local_proof_line_reference(reference),
            |(_, line)| {
                line.formula
                    .as_ref()
                    .map(|formula| self.normalized_formula(formula))
            },
        )
    }

    fn reference_context(&self, reference: &str) -> Option<ModuleContext> {
        self.earlier_line(reference).map_or_else(
            || self.outer.reference_context(reference),
            |(index, _)| Some(self.lines_context.indexed("line", index.0)),
        )
    }
}

/// The hypothesis of a conditional proof over its enclosing scope.
///
/// Inside the conditional proof the hypothesis label counts both as a
/// proved formula and as a local proof line.
pub(crate) struct HypothesisScope<'a> {
    pub(crate) label: Option<&'a str>,
    pub(crate) formula: Element,
    pub(crate) context: ModuleContext,
    pub(crate) outer: &'a dyn ReferenceResolver,
}

impl HypothesisScope<'_> {
    fn is_hypothesis(&self, reference: &str) -> bool {
        self.label == Some(reference)
    }
}

impl ReferenceResolver for HypothesisScope<'_> {
    fn is_proved_formula(&self, reference: &str) -> bool {
        self.is_hypothesis(reference) || self.outer.is_proved_formula(reference)
    }

    fn normalized_formula(&self, formula: &Element) -> Element {
        self.outer.normalized_formula(formula)
    }

    fn normalized_reference_formula(&self, reference: &str) -> Option<Element> {
        if self.is_hypothesis(reference) {
            return Some(self.formula.clone());
        }
        self.outer.normalized_reference_formula(reference)
    }

    fn is_local_proof_line_reference(&self, reference: &str) -> bool {
        self.is_hypothesis(reference) || self.outer.is_local_proof_line_reference(reference)
    }

    fn normalized_local_proof_line_reference(&self, reference: &str) -> Option<Element> {
        if self.is_hypothesis(reference) {
            return Some(self.formula.clone());
        }
        self.outer.normalized_local_proof_line_reference(reference)
    }

    fn reference_context(&self, reference: &str) -> Option<ModuleContext> {
        if self.is_hypothesis(reference) {
            return Some(self.context.clone());
        }
        self.outer.reference_context(reference)
    }
}
