//! Well-formedness checking for formulas.
//!
//! A formula is well formed when every operator has the expected shape,
//! formulas and terms appear only where they are allowed, no subject
//! variable occurs both free and bound, no binder rebinds a variable that
//! is already bound in its scope, and every operator variable or constant
//! name is used with a single arity.

use indexmap::IndexMap;

use super::element::{Element, ElementList, Operator};
use super::utility::{bound_subject_variables, free_subject_variables, is_subject_variable};

/// Reasons a formula is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WellFormedError {
    /// An atom appeared where a formula or term was expected.
    #[error("atom \"{atom}\" found where a {expected} was expected")]
    UnexpectedAtom {
        /// The atom name.
        atom: String,
        /// Either `formula` or `term`.
        expected: &'static str,
    },

    /// An operator appeared in the wrong kind of position.
    #[error("operator {operator} found where a {expected} was expected")]
    UnexpectedOperator {
        /// The offending operator.
        operator: Operator,
        /// Either `formula` or `term`.
        expected: &'static str,
    },

    /// An operator had the wrong number of children.
    #[error("operator {operator} expects {expected} children but has {found}")]
    WrongArity {
        /// The offending operator.
        operator: Operator,
        /// Human-readable expected child count.
        expected: &'static str,
        /// Actual child count.
        found: usize,
    },

    /// An application or subject variable lacks its name atom.
    #[error("operator {operator} needs a non-empty name atom as first child")]
    MissingName {
        /// The offending operator.
        operator: Operator,
    },

    /// A binder's first child is not a subject variable.
    #[error("operator {operator} must bind a subject variable")]
    MissingBoundVariable {
        /// The offending binder.
        operator: Operator,
    },

    /// A subject variable occurs both free and bound.
    #[error("subject variable {variable} occurs free and bound")]
    FreeAndBound {
        /// The variable name.
        variable: String,
    },

    /// A binder rebinds a variable already bound in its scope.
    #[error("subject variable {variable} is bound again inside its own scope")]
    Rebound {
        /// The variable name.
        variable: String,
    },

    /// An operator name is used with different arities.
    #[error("{operator} {name} is used with {found} arguments but was first used with {expected}")]
    InconsistentArity {
        /// The operator kind.
        operator: Operator,
        /// The operator name.
        name: String,
        /// Arity at first use.
        expected: usize,
        /// Conflicting arity.
        found: usize,
    },
}

/// Checks that `element` is a well-formed formula.
///
/// # Errors
///
/// Returns the first [`WellFormedError`] found in a depth-first walk.
pub fn check_formula(element: &Element) -> Result<(), WellFormedError> {
    let mut checker = ShapeChecker::default();
    checker.formula(element)?;
    check_free_and_bound(element)
}

/// Checks that `element` is a well-formed term.
///
/// # Errors
///
/// Returns the first [`WellFormedError`] found in a depth-first walk.
pub fn check_term(element: &Element) -> Result<(), WellFormedError> {
    let mut checker = ShapeChecker::default();
    checker.term(element)?;
    check_free_and_bound(element)
}

fn check_free_and_bound(element: &Element) -> Result<(), WellFormedError> {
    let bound = bound_subject_variables(element);
    free_subject_variables(element)
        .into_iter()
        .find(|var| bound.contains(var))
        .map_or(Ok(()), |var| {
            Err(WellFormedError::FreeAndBound {
                variable: variable_name(&var),
            })
        })
}

fn variable_name(var: &Element) -> String {
    var.as_list()
        .and_then(|list| list.get(0))
        .and_then(Element::as_atom)
        .unwrap_or_default()
        .to_owned()
}

#[derive(Default)]
struct ShapeChecker {
    bound: Vec<Element>,
    arities: IndexMap<(Operator, String), usize>,
}

impl ShapeChecker {
    fn formula(&mut self, element: &Element) -> Result<(), WellFormedError> {
        let list = match element {
            Element::Atom(atom) => {
                return Err(WellFormedError::UnexpectedAtom {
                    atom: atom.clone(),
                    expected: "formula",
                });
            }
            Element::List(list) => list,
        };
        match list.operator() {
            Operator::PredVar | Operator::PredCon => self.application(list),
            Operator::Not => {
                expect_arity(list, 1, "exactly 1")?;
                self.formulas(list.elements())
            }
            Operator::And | Operator::Or => {
                if list.len() < 2 {
                    return Err(arity_error(list, "at least 2"));
                }
                self.formulas(list.elements())
            }
            Operator::Impl | Operator::Equi => {
                expect_arity(list, 2, "exactly 2")?;
                self.formulas(list.elements())
            }
            Operator::Forall | Operator::Exists | Operator::ExistsUnique => {
                if !(2..=3).contains(&list.len()) {
                    return Err(arity_error(list, "2 or 3"));
                }
                self.binder(list)
            }
            operator @ (Operator::Var | Operator::FunVar | Operator::FunCon | Operator::Class) => {
                Err(WellFormedError::UnexpectedOperator {
                    operator,
                    expected: "formula",
                })
            }
        }
    }

    fn formulas(&mut self, elements: &[Element]) -> Result<(), WellFormedError> {
        elements.iter().try_for_each(|child| self.formula(child))
    }

    fn term(&mut self, element: &Element) -> Result<(), WellFormedError> {
        let list = match element {
            Element::Atom(atom) => {
                return Err(WellFormedError::UnexpectedAtom {
                    atom: atom.clone(),
                    expected: "term",
                });
            }
            Element::List(list) => list,
        };
        match list.operator() {
            Operator::Var => {
                if is_subject_variable(element) && !variable_name(element).is_empty() {
                    Ok(())
                } else {
                    Err(WellFormedError::MissingName {
                        operator: Operator::Var,
                    })
                }
            }
            Operator::FunVar => {
                if list.len() < 2 {
                    return Err(arity_error(list, "a name and at least 1 argument"));
                }
                self.application(list)
            }
            Operator::FunCon => self.application(list),
            Operator::Class => {
                expect_arity(list, 2, "exactly 2")?;
                self.binder(list)
            }
            operator => Err(WellFormedError::UnexpectedOperator {
                operator,
                expected: "term",
            }),
        }
    }

    fn application(&mut self, list: &ElementList) -> Result<(), WellFormedError> {
        let name = match list.name() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(WellFormedError::MissingName {
                    operator: list.operator(),
                });
            }
        };
        let found = list.arguments().len();
        let key = (list.operator(), name.to_owned());
        let expected = *self.arities.entry(key).or_insert(found);
        if expected != found {
            return Err(WellFormedError::InconsistentArity {
                operator: list.operator(),
                name: name.to_owned(),
                expected,
                found,
            });
        }
        list.arguments()
            .iter()
            .try_for_each(|argument| self.term(argument))
    }

    /// Checks `BINDER(VAR(x), [restriction,] body)`; the body of `CLASS` and
    /// of quantifiers is a formula.
    fn binder(&mut self, list: &ElementList) -> Result<(), WellFormedError> {
        let Some(var) = list.get(0).filter(|var| is_subject_variable(var)) else {
            return Err(WellFormedError::MissingBoundVariable {
                operator: list.operator(),
            });
        };
        if self.bound.contains(var) {
            return Err(WellFormedError::Rebound {
                variable: variable_name(var),
            });
        }
        self.bound.push(var.clone());
        let result = self.formulas(list.elements().get(1..).unwrap_or_default());
        self.bound.pop();
        result
    }
}

fn expect_arity(
    list: &ElementList,
    expected: usize,
    description: &'static str,
) -> Result<(), WellFormedError> {
    if list.len() == expected {
        Ok(())
    } else {
        Err(arity_error(list, description))
    }
}

fn arity_error(list: &ElementList, expected: &'static str) -> WellFormedError {
    WellFormedError::WrongArity {
        operator: list.operator(),
        expected,
        found: list.len(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn var(name: &str) -> Element {
        Element::subject_variable(name)
    }

    fn pred(name: &str, args: Vec<Element>) -> Element {
        Element::predicate_variable(name, args)
    }

    #[test]
    fn accepts_quantified_implication() {
        let f = Element::implication(
            pred("A", vec![]),
            Element::forall(var("x"), pred("P", vec![var("x")])),
        );
        assert_eq!(check_formula(&f), Ok(()));
    }

    #[test]
    fn accepts_class_terms_and_function_applications() {
        let class = Element::list(Operator::Class, vec![var("x"), pred("P", vec![var("x")])]);
        let f = Element::predicate_constant(
            "in",
            vec![Element::function_variable("f", vec![var("y")]), class],
        );
        assert_eq!(check_formula(&f), Ok(()));
        assert_eq!(check_term(&Element::function_constant("zero", vec![])), Ok(()));
    }

    #[rstest]
    #[case::atom_as_formula(Element::atom("A"))]
    #[case::term_as_formula(var("x"))]
    #[case::single_conjunct(Element::and(vec![pred("A", vec![])]))]
    #[case::ternary_implication(Element::list(
        Operator::Impl,
        vec![pred("A", vec![]), pred("B", vec![]), pred("C", vec![])],
    ))]
    #[case::quantifier_without_variable(Element::forall(pred("A", vec![]), pred("B", vec![])))]
    #[case::formula_as_argument(pred("P", vec![pred("A", vec![])]))]
    #[case::nameless_application(Element::list(Operator::PredVar, vec![]))]
    fn rejects_malformed_shapes(#[case] formula: Element) {
        assert!(check_formula(&formula).is_err(), "{formula} should be rejected");
    }

    #[test]
    fn rejects_free_and_bound_variable() {
        // P(x) ∧ ∀x Q(x)
        let f = Element::and(vec![
            pred("P", vec![var("x")]),
            Element::forall(var("x"), pred("Q", vec![var("x")])),
        ]);
        assert_eq!(
            check_formula(&f),
            Err(WellFormedError::FreeAndBound {
                variable: "x".to_owned()
            })
        );
    }

    #[test]
    fn rejects_rebinding_inside_scope() {
        let f = Element::forall(
            var("x"),
            Element::exists(var("x"), pred("P", vec![var("x")])),
        );
        assert_eq!(
            check_formula(&f),
            Err(WellFormedError::Rebound {
                variable: "x".to_owned()
            })
        );
    }

    #[test]
    fn sibling_binders_may_reuse_a_variable() {
        let f = Element::and(vec![
            Element::forall(var("x"), pred("P", vec![var("x")])),
            Element::exists(var("x"), pred("Q", vec![var("x")])),
        ]);
        assert_eq!(check_formula(&f), Ok(()));
    }

    #[test]
    fn rejects_inconsistent_arity() {
        let f = Element::implication(pred("P", vec![var("x")]), pred("P", vec![]));
        assert!(matches!(
            check_formula(&f),
            Err(WellFormedError::InconsistentArity { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn rejects_nullary_function_variable() {
        let f = pred("P", vec![Element::function_variable("f", vec![])]);
        assert!(matches!(
            check_formula(&f),
            Err(WellFormedError::WrongArity {
                operator: Operator::FunVar,
                ..
            })
        ));
    }
}
