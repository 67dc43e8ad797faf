//! Reference resolution for proof checking.
//!
//! The checker never looks up labels itself. It asks a
//! [`ReferenceResolver`], which knows the formulas proved elsewhere in the
//! module, how to normalize formulas, and where cited formulas live.
//! [`ProvedFormulaTable`] is an in-memory resolver for callers that keep
//! proved formulas in a map.

use indexmap::IndexMap;

use super::context::ModuleContext;
use crate::formula::Element;
use crate::formula::utility::expand_operator_variable;

/// Resolves labels cited by proof lines.
pub trait ReferenceResolver {
    /// Returns `true` if `reference` names a proved formula.
    fn is_proved_formula(&self, reference: &str) -> bool;

    /// Returns the normalized form of `formula`.
    fn normalized_formula(&self, formula: &Element) -> Element;

    /// Returns the normalized proved formula `reference` names.
    fn normalized_reference_formula(&self, reference: &str) -> Option<Element>;

    /// Returns `true` if `reference` names a proof line visible from the
    /// current position.
    fn is_local_proof_line_reference(&self, reference: &str) -> bool;

    /// Returns the normalized formula of the proof line `reference` names.
    fn normalized_local_proof_line_reference(&self, reference: &str) -> Option<Element>;

    /// Returns the location of the formula `reference` names.
    fn reference_context(&self, reference: &str) -> Option<ModuleContext>;
}

/// A proved formula together with where it was proved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProvedFormula {
    formula: Element,
    context: ModuleContext,
}

/// An in-memory resolver over proved formulas and predicate or function
/// constant definitions.
///
/// Normalization expands every defined constant, repeatedly, until no
/// defined constant remains. Definitions must not be recursive. Bound
/// variables of a definiens are renamed apart from the arguments they
/// receive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvedFormulaTable {
    proved: IndexMap<String, ProvedFormula>,
    definitions: Vec<(Element, Element)>,
}

impl ProvedFormulaTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `formula` as proved under `label` at `context`.
    #[must_use]
    pub fn with_proved(
        mut self,
        label: impl Into<String>,
        formula: Element,
        context: ModuleContext,
    ) -> Self {
        self.proved
            .insert(label.into(), ProvedFormula { formula, context });
        self
    }

    /// Defines the constant application `template` (for example
    /// `PREDCON(subset, VAR(x), VAR(y))`) as `definiens`.
    #[must_use]
    pub fn with_definition(mut self, template: Element, definiens: Element) -> Self {
        self.definitions.push((template, definiens));
        self
    }

    fn expand_once(&self, formula: &Element) -> Element {
        self.definitions
            .iter()
            .fold(formula.clone(), |current, (template, definiens)| {
                expand_operator_variable(&current, template, definiens)
            })
    }
}

impl ReferenceResolver for ProvedFormulaTable {
    fn is_proved_formula(&self, reference: &str) -> bool {
        self.proved.contains_key(reference)
    }

    fn normalized_formula(&self, formula: &Element) -> Element {
        let mut current = formula.clone();
        // Each pass expands one layer of definitions.
        for _ in 0..=self.definitions.len() {
            let next = self.expand_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn normalized_reference_formula(&self, reference: &str) -> Option<Element> {
        self.proved
            .get(reference)
            .map(|proved| self.normalized_formula(&proved.formula))
    }

    fn is_local_proof_line_reference(&self, _reference: &str) -> bool {
        false
    }

    fn normalized_local_proof_line_reference(&self, _reference: &str) -> Option<Element> {
        None
    }

    fn reference_context(&self, reference: &str) -> Option<ModuleContext> {
        self.proved.get(reference).map(|proved| proved.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Element {
        Element::subject_variable(name)
    }

    #[test]
    fn resolves_proved_formulas_and_contexts() {
        let a = Element::predicate_variable("A", vec![]);
        let context = ModuleContext::new("logic", "axiom[1]");
        let table = ProvedFormulaTable::new().with_proved("axiom1", a.clone(), context.clone());
        assert!(table.is_proved_formula("axiom1"));
        assert!(!table.is_proved_formula("axiom2"));
        assert_eq!(table.normalized_reference_formula("axiom1"), Some(a));
        assert_eq!(table.reference_context("axiom1"), Some(context));
        assert!(!table.is_local_proof_line_reference("axiom1"));
    }

    #[test]
    fn normalization_expands_nested_definitions() {
        // subset(x, y) := ∀z (in(z, x) → in(z, y)); proper(x, y) := subset(x, y) ∧ ¬subset(y, x)
        let in_ = |a: Element, b: Element| Element::predicate_constant("in", vec![a, b]);
        let subset = |a: Element, b: Element| Element::predicate_constant("subset", vec![a, b]);
        let subset_def = Element::forall(
            var("z"),
            Element::implication(in_(var("z"), var("x")), in_(var("z"), var("y"))),
        );
        let proper = Element::predicate_constant("proper", vec![var("x"), var("y")]);
        let proper_def = Element::and(vec![
            subset(var("x"), var("y")),
            Element::not(subset(var("y"), var("x"))),
        ]);
        let table = ProvedFormulaTable::new()
            .with_definition(subset(var("x"), var("y")), subset_def)
            .with_definition(proper, proper_def);

        let formula = Element::predicate_constant("proper", vec![var("a"), var("b")]);
        let expected = Element::and(vec![
            Element::forall(
                var("z"),
                Element::implication(in_(var("z"), var("a")), in_(var("z"), var("b"))),
            ),
            Element::not(Element::forall(
                var("z"),
                Element::implication(in_(var("z"), var("b")), in_(var("z"), var("a"))),
            )),
        ]);
        assert_eq!(table.normalized_formula(&formula), expected);
    }

    #[test]
    fn expansion_does_not_capture_arguments() {
        // subset(z, y) must not collapse into ∀z (in(z, z) → in(z, y))
        let in_ = |a: Element, b: Element| Element::predicate_constant("in", vec![a, b]);
        let subset = |a: Element, b: Element| Element::predicate_constant("subset", vec![a, b]);
        let subset_def = Element::forall(
            var("z"),
            Element::implication(in_(var("z"), var("x")), in_(var("z"), var("y"))),
        );
        let captured = Element::forall(
            var("z"),
            Element::implication(in_(var("z"), var("z")), in_(var("z"), var("y"))),
        );
        let table = ProvedFormulaTable::new()
            .with_definition(subset(var("x"), var("y")), subset_def)
            .with_proved("ax", captured, ModuleContext::new("sets", "ax"));

        let expected = Element::forall(
            var("z'"),
            Element::implication(in_(var("z'"), var("z")), in_(var("z'"), var("y"))),
        );
        let normalized = table.normalized_formula(&subset(var("z"), var("y")));
        assert_eq!(normalized, expected);
        assert_ne!(Some(normalized), table.normalized_reference_formula("ax"));
    }
}
