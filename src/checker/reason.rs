//! Proof lines and the reasons that justify them.
//!
//! Formulas, references and reasons are optional in the data model: proof
//! documents come from external loaders and the checker reports missing
//! parts instead of refusing the whole proof.

use serde::Deserialize;

use crate::formula::Element;

/// One line of a formal proof.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofLine {
    /// Optional label other lines use to cite this one.
    #[serde(default)]
    pub label: Option<String>,
    /// The formula this line establishes.
    #[serde(default)]
    pub formula: Option<Element>,
    /// The inference that justifies the formula.
    #[serde(default)]
    pub reason: Option<Reason>,
}

impl ProofLine {
    /// Creates an unlabelled line.
    #[must_use]
    pub const fn new(formula: Element, reason: Reason) -> Self {
        Self {
            label: None,
            formula: Some(formula),
            reason: Some(reason),
        }
    }

    /// Returns the line with `label` attached.
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The assumption opening a conditional proof.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hypothesis {
    /// Label inner lines use to cite the hypothesis.
    #[serde(default)]
    pub label: Option<String>,
    /// The assumed formula.
    #[serde(default)]
    pub formula: Option<Element>,
}

/// Justification of a proof line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Reason {
    /// Cites an axiom, definition or previously proved proposition.
    Add {
        /// Label of the proved formula.
        #[serde(default)]
        reference: Option<String>,
    },
    /// Renames a bound subject variable.
    Rename {
        /// Label of the proof line whose formula is renamed.
        #[serde(default)]
        reference: Option<String>,
        /// The bound variable being renamed.
        #[serde(default)]
        original: Option<Element>,
        /// The new variable.
        #[serde(default)]
        replacement: Option<Element>,
        /// Zero-based index of the binder of `original` to rename.
        #[serde(default)]
        occurrence: usize,
    },
    /// From `A → B` and `A` infer `B`.
    ModusPonens {
        /// Label of the implication.
        #[serde(default)]
        reference1: Option<String>,
        /// Label of the antecedent.
        #[serde(default)]
        reference2: Option<String>,
    },
    /// Substitutes a term for a free subject variable.
    SubstFree {
        /// Label of the proof line substituted into.
        #[serde(default)]
        reference: Option<String>,
        /// The subject variable replaced.
        #[serde(default)]
        subject_variable: Option<Element>,
        /// The term put in its place.
        #[serde(default)]
        substitute_term: Option<Element>,
    },
    /// Substitutes a formula for a predicate variable.
    SubstPred {
        /// Label of the proof line substituted into.
        #[serde(default)]
        reference: Option<String>,
        /// The predicate variable with its parameter variables.
        #[serde(default)]
        predicate_variable: Option<Element>,
        /// The formula put in its place.
        #[serde(default)]
        substitute_formula: Option<Element>,
    },
    /// Substitutes a term for a function variable.
    SubstFunc {
        /// Label of the proof line substituted into.
        #[serde(default)]
        reference: Option<String>,
        /// The function variable with its parameter variables.
        #[serde(default)]
        function_variable: Option<Element>,
        /// The term put in its place.
        #[serde(default)]
        substitute_term: Option<Element>,
    },
    /// From `A → B` infer `A → ∀x B`.
    Universal {
        /// Label of the implication.
        #[serde(default)]
        reference: Option<String>,
        /// The variable quantified.
        #[serde(default)]
        subject_variable: Option<Element>,
    },
    /// From `A → B` infer `∃x A → B`.
    Existential {
        /// Label of the implication.
        #[serde(default)]
        reference: Option<String>,
        /// The variable quantified.
        #[serde(default)]
        subject_variable: Option<Element>,
    },
    /// Derives `H → C` from a nested proof of `C` under the hypothesis `H`.
    ///
    /// The conclusion is the formula of the line carrying this reason.
    ConditionalProof {
        /// The assumption.
        #[serde(default)]
        hypothesis: Hypothesis,
        /// The nested proof lines.
        #[serde(default)]
        lines: Vec<ProofLine>,
    },
}

impl Reason {
    /// Returns the name of the inference rule this reason applies.
    #[must_use]
    pub const fn rule_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "ADD",
            Self::Rename { .. } => "RENAME",
            Self::ModusPonens { .. } => "MP",
            Self::SubstFree { .. } => "SUBST_FREE",
            Self::SubstPred { .. } => "SUBST_PRED",
            Self::SubstFunc { .. } => "SUBST_FUN",
            Self::Universal { .. } => "UNIVERSAL",
            Self::Existential { .. } => "EXISTENTIAL",
            Self::ConditionalProof { .. } => "CP",
        }
    }

    /// `Add` citing `reference`.
    #[must_use]
    pub fn add(reference: impl Into<String>) -> Self {
        Self::Add {
            reference: Some(reference.into()),
        }
    }

    /// `ModusPonens` citing the implication and its antecedent.
    #[must_use]
    pub fn modus_ponens(reference1: impl Into<String>, reference2: impl Into<String>) -> Self {
        Self::ModusPonens {
            reference1: Some(reference1.into()),
            reference2: Some(reference2.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_labelled_modus_ponens_line() {
        let yaml = r#"
label: "3"
formula: {PREDVAR: [B]}
reason:
  modus_ponens:
    reference1: "1"
    reference2: "2"
"#;
        let line: ProofLine = serde_saphyr::from_str(yaml).expect("line should parse");
        assert_eq!(
            line,
            ProofLine::new(
                Element::predicate_variable("B", vec![]),
                Reason::modus_ponens("1", "2")
            )
            .labelled("3")
        );
    }

    #[test]
    fn missing_parts_deserialize_as_absent() {
        let line: ProofLine = serde_saphyr::from_str("label: x\n").expect("line should parse");
        assert_eq!(line.formula, None);
        assert_eq!(line.reason, None);
    }

    #[test]
    fn deserializes_conditional_proof() {
        let yaml = r#"
conditional_proof:
  hypothesis:
    label: h
    formula: {PREDVAR: [H]}
  lines:
    - formula: {PREDVAR: [H]}
      reason: {add: {reference: h}}
"#;
        let reason: Reason = serde_saphyr::from_str(yaml).expect("reason should parse");
        let Reason::ConditionalProof { hypothesis, lines } = reason else {
            panic!("expected a conditional proof");
        };
        assert_eq!(hypothesis.label.as_deref(), Some("h"));
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines.first().and_then(|l| l.reason.as_ref()),
            Some(&Reason::add("h"))
        );
    }

    #[test]
    fn rejects_unknown_reason() {
        let result: Result<Reason, _> = serde_saphyr::from_str("induction: {reference: a}\n");
        assert!(result.is_err());
    }

    #[test]
    fn rule_names_are_stable() {
        assert_eq!(Reason::add("a").rule_name(), "ADD");
        assert_eq!(Reason::modus_ponens("a", "b").rule_name(), "MP");
        assert_eq!(
            Reason::ConditionalProof {
                hypothesis: Hypothesis::default(),
                lines: Vec::new()
            }
            .rule_name(),
            "CP"
        );
    }
}
