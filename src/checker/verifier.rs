//! The proof checker entry point and its line-by-line verifier.
//!
//! [`ProofChecker`] holds the immutable configuration: which rule versions
//! are supported, from which version on conditional proofs are allowed and
//! how deeply they may nest. Every call to [`ProofChecker::check_proof`]
//! creates a fresh `Verifier` that walks the lines, dispatches on each
//! reason and collects errors. Validators for the individual reasons live
//! in the sibling `inference`, `substitution` and `conditional` modules.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use super::context::ModuleContext;
use super::diagnostic::{ProofCheckError, ProofErrorCode};
use super::reason::{ProofLine, Reason};
use super::resolver::ReferenceResolver;
use super::rules::RuleChecker;
use super::scope::{LineIndex, ProofScope};
use super::version::Version;
use crate::formula::utility::{conjunction, first_difference, is_subject_variable};
use crate::formula::{Element, check_formula};

/// Default bound on conditional-proof nesting.
pub const DEFAULT_MAX_CONDITIONAL_DEPTH: usize = 64;

/// Name of the conditional-proof rule. It always requires the
/// conditional minimum version.
const CONDITIONAL_PROOF_RULE: &str = "CP";

// ── ProofChecker ────────────────────────────────────────────────────

/// Verifies formal proofs under a fixed set of supported rule versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofChecker {
    formal_proofs: bool,
    supported: IndexSet<Version>,
    conditional_minimum: Option<Version>,
    max_conditional_depth: usize,
}

impl ProofChecker {
    /// Creates a checker accepting `supported` rule versions.
    ///
    /// Conditional proofs are accepted only when `conditional_minimum` is
    /// set; inside them every rule needs at least that version.
    #[must_use]
    pub fn new(
        supported: impl IntoIterator<Item = Version>,
        conditional_minimum: Option<Version>,
        max_conditional_depth: usize,
    ) -> Self {
        Self {
            formal_proofs: true,
            supported: supported.into_iter().collect(),
            conditional_minimum,
            max_conditional_depth,
        }
    }

    /// Rules at `0.01.00`, no conditional proofs.
    #[must_use]
    pub fn basic() -> Self {
        Self::new([Version::V0_01_00], None, DEFAULT_MAX_CONDITIONAL_DEPTH)
    }

    /// Rules at `0.01.00` and `0.02.00`; conditional proofs need `0.02.00`.
    #[must_use]
    pub fn conditional() -> Self {
        Self::new(
            [Version::V0_01_00, Version::V0_02_00],
            Some(Version::V0_02_00),
            DEFAULT_MAX_CONDITIONAL_DEPTH,
        )
    }

    /// A checker that rejects every formal proof.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            formal_proofs: false,
            supported: IndexSet::new(),
            conditional_minimum: None,
            max_conditional_depth: 0,
        }
    }

    /// Selects the checker matching a module's declared rule version.
    #[must_use]
    pub fn for_rule_version(version: Version) -> Self {
        match version {
            Version::V0_01_00 => Self::basic(),
            Version::V0_02_00 => Self::conditional(),
            _ => Self::disabled(),
        }
    }

    /// Returns `false` if every proof is rejected.
    #[must_use]
    pub const fn supports_formal_proofs(&self) -> bool {
        self.formal_proofs
    }

    /// Returns the accepted rule versions.
    #[must_use]
    pub const fn supported_versions(&self) -> &IndexSet<Version> {
        &self.supported
    }

    /// Returns the minimum rule version inside conditional proofs, or
    /// `None` if conditional proofs are not accepted.
    #[must_use]
    pub const fn conditional_minimum(&self) -> Option<Version> {
        self.conditional_minimum
    }

    /// Returns the maximum conditional-proof nesting depth.
    #[must_use]
    pub const fn max_conditional_depth(&self) -> usize {
        self.max_conditional_depth
    }

    /// Checks that `lines` prove `proposition`.
    ///
    /// Every defect is collected; an empty result means the proof is
    /// correct. Line locations are `context` extended by `line[i]`, and
    /// `resolver` answers for proved formulas outside the proof.
    #[must_use]
    pub fn check_proof(
        &self,
        proposition: &Element,
        lines: &[ProofLine],
        rules: &dyn RuleChecker,
        context: &ModuleContext,
        resolver: &dyn ReferenceResolver,
    ) -> Vec<ProofCheckError> {
        debug!("checking proof at {context} ({} lines)", lines.len());
        if !self.formal_proofs {
            return vec![ProofCheckError::new(
                ProofErrorCode::NoFormalProofsSupported,
                context.clone(),
            )];
        }
        let mut verifier = Verifier {
            checker: self,
            rules,
            errors: Vec::new(),
        };
        verifier.check_lines(lines, context, &[], resolver, 0);
        verifier.check_last_line(proposition, lines, context);
        debug!(
            "finished proof at {context}: {} error(s)",
            verifier.errors.len()
        );
        verifier.errors
    }

    fn supported_list(&self) -> String {
        self.supported
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ── Verifier ────────────────────────────────────────────────────────

/// An active hypothesis and where it was assumed.
#[derive(Debug, Clone)]
pub(super) struct Condition {
    pub(super) formula: Element,
    pub(super) context: ModuleContext,
}

/// Everything a validator needs to know about the line under check.
pub(super) struct LineSite<'a> {
    pub(super) formula: &'a Element,
    pub(super) formula_context: ModuleContext,
    pub(super) reason_context: ModuleContext,
    pub(super) rule: &'static str,
    pub(super) conditions: &'a [Condition],
    pub(super) scope: &'a dyn ReferenceResolver,
    pub(super) depth: usize,
}

impl LineSite<'_> {
    /// The line's formula in normalized form.
    pub(super) fn normalized_formula(&self) -> Element {
        self.scope.normalized_formula(self.formula)
    }

    /// Location of the formula `reference` names, if it resolves.
    pub(super) fn cited(&self, reference: Option<&str>) -> Option<ModuleContext> {
        reference.and_then(|label| self.scope.reference_context(label))
    }
}

/// Per-call state of one proof check.
pub(super) struct Verifier<'a> {
    pub(super) checker: &'a ProofChecker,
    pub(super) rules: &'a dyn RuleChecker,
    pub(super) errors: Vec<ProofCheckError>,
}

impl Verifier<'_> {
    /// Checks one proof body. Lines are located at `lines_context.line[i]`.
    pub(super) fn check_lines(
        &mut self,
        lines: &[ProofLine],
        lines_context: &ModuleContext,
        conditions: &[Condition],
        outer: &dyn ReferenceResolver,
        depth: usize,
    ) {
        let mut labels: IndexMap<String, LineIndex> = IndexMap::new();
        for (index, line) in lines.iter().enumerate() {
            let line_context = lines_context.indexed("line", index);
            let Some(formula) = &line.formula else {
                self.report(ProofCheckError::new(
                    ProofErrorCode::ProofLineMustNotBeNull,
                    line_context.field("formula"),
                ));
                continue;
            };
            let Some(reason) = &line.reason else {
                self.report(ProofCheckError::new(
                    ProofErrorCode::ReasonMustNotBeNull,
                    line_context.field("reason"),
                ));
                continue;
            };
            if let Some(label) = &line.label {
                self.check_label(label, &line_context, &labels, lines_context, outer);
                labels.insert(label.clone(), LineIndex(index));
            }
            let formula_context = line_context.field("formula");
            if !self.conditions_agree(conditions, formula, &formula_context) {
                continue;
            }
            let scope = ProofScope {
                labels: &labels,
                lines,
                current: LineIndex(index),
                lines_context,
                outer,
            };
            let site = LineSite {
                formula,
                formula_context,
                reason_context: line_context.field("reason"),
                rule: reason.rule_name(),
                conditions,
                scope: &scope,
                depth,
            };
            let passed = self.check_reason(reason, &site);
            trace!("{line_context} by {}: {}", site.rule, if passed { "ok" } else { "failed" });
        }
    }

    fn check_label(
        &mut self,
        label: &str,
        line_context: &ModuleContext,
        labels: &IndexMap<String, LineIndex>,
        lines_context: &ModuleContext,
        outer: &dyn ReferenceResolver,
    ) {
        let earlier = match labels.get(label) {
            Some(index) => Some(lines_context.indexed("line", index.0)),
            None if outer.is_local_proof_line_reference(label) => outer.reference_context(label),
            None => return,
        };
        self.report(
            ProofCheckError::new(
                ProofErrorCode::LocalLabelAlreadyExists,
                line_context.field("label"),
            )
            .with_detail(label)
            .with_reference(earlier),
        );
    }

    /// Inside conditional proofs `(c1 ∧ … ∧ cn) → formula` must be well
    /// formed.
    fn conditions_agree(
        &mut self,
        conditions: &[Condition],
        formula: &Element,
        formula_context: &ModuleContext,
    ) -> bool {
        let premises: Vec<Element> = conditions
            .iter()
            .map(|condition| condition.formula.clone())
            .collect();
        let Some(premise) = conjunction(&premises) else {
            return true;
        };
        if let Err(error) = check_formula(&Element::implication(premise, formula.clone())) {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::ConditionsAndFormulaDontAgree,
                    formula_context.clone(),
                )
                .with_detail(error),
            );
        }
        true
    }

    fn check_reason(&mut self, reason: &Reason, site: &LineSite<'_>) -> bool {
        match reason {
            Reason::Add { reference } => self.check_add(site, reference.as_deref()),
            Reason::Rename {
                reference,
                original,
                replacement,
                occurrence,
            } => self.check_rename(
                site,
                reference.as_deref(),
                original.as_ref(),
                replacement.as_ref(),
                *occurrence,
            ),
            Reason::ModusPonens {
                reference1,
                reference2,
            } => self.check_modus_ponens(site, reference1.as_deref(), reference2.as_deref()),
            Reason::SubstFree {
                reference,
                subject_variable,
                substitute_term,
            } => self.check_subst_free(
                site,
                reference.as_deref(),
                subject_variable.as_ref(),
                substitute_term.as_ref(),
            ),
            Reason::SubstPred {
                reference,
                predicate_variable,
                substitute_formula,
            } => self.check_subst_operator(
                site,
                reference.as_deref(),
                predicate_variable.as_ref(),
                substitute_formula.as_ref(),
                OperatorVariable::Predicate,
            ),
            Reason::SubstFunc {
                reference,
                function_variable,
                substitute_term,
            } => self.check_subst_operator(
                site,
                reference.as_deref(),
                function_variable.as_ref(),
                substitute_term.as_ref(),
                OperatorVariable::Function,
            ),
            Reason::Universal {
                reference,
                subject_variable,
            } => self.check_generalization(
                site,
                reference.as_deref(),
                subject_variable.as_ref(),
                Quantifier::Universal,
            ),
            Reason::Existential {
                reference,
                subject_variable,
            } => self.check_generalization(
                site,
                reference.as_deref(),
                subject_variable.as_ref(),
                Quantifier::Existential,
            ),
            Reason::ConditionalProof { hypothesis, lines } => {
                if self.checker.conditional_minimum.is_none() {
                    return self.fail(
                        ProofCheckError::new(
                            ProofErrorCode::ThisIsNoAllowedBasicReason,
                            site.reason_context.clone(),
                        )
                        .with_detail(site.rule),
                    );
                }
                self.check_conditional_proof(site, hypothesis, lines)
            }
        }
    }

    fn check_last_line(
        &mut self,
        proposition: &Element,
        lines: &[ProofLine],
        context: &ModuleContext,
    ) {
        let Some((index, last)) = lines.iter().enumerate().next_back() else {
            self.report(ProofCheckError::new(
                ProofErrorCode::LastProofLineMustBeIdenticalToProposition,
                context.clone(),
            ));
            return;
        };
        // A missing formula has already been reported for the line itself.
        let Some(formula) = &last.formula else {
            return;
        };
        if let Some(path) = first_difference(proposition, formula) {
            self.report(
                ProofCheckError::new(
                    ProofErrorCode::LastProofLineMustBeIdenticalToProposition,
                    context
                        .indexed("line", index)
                        .field("formula")
                        .formula_path(&path),
                )
                .with_detail(format!("expected {proposition}")),
            );
        }
    }

    // ── Shared validator steps ──────────────────────────────────────

    pub(super) fn report(&mut self, error: ProofCheckError) {
        trace!("{}", error.render());
        self.errors.push(error);
    }

    /// Records `error` and returns `false`.
    pub(super) fn fail(&mut self, error: ProofCheckError) -> bool {
        self.report(error);
        false
    }

    /// Resolves `reference` to the normalized formula of an earlier line.
    pub(super) fn local_formula(
        &mut self,
        reference: Option<&str>,
        context: ModuleContext,
        scope: &dyn ReferenceResolver,
    ) -> Option<Element> {
        let Some(label) = reference else {
            self.report(ProofCheckError::new(
                ProofErrorCode::ReferenceToProvedFormulaIsMissing,
                context,
            ));
            return None;
        };
        let formula = scope.normalized_local_proof_line_reference(label);
        if formula.is_none() {
            self.report(
                ProofCheckError::new(ProofErrorCode::SuchALocalLabelDoesntExist, context)
                    .with_detail(label),
            );
        }
        formula
    }

    /// Returns `variable` if it is a subject variable.
    pub(super) fn subject_variable<'e>(
        &mut self,
        variable: Option<&'e Element>,
        context: ModuleContext,
    ) -> Option<&'e Element> {
        match variable {
            Some(var) if is_subject_variable(var) => Some(var),
            Some(other) => {
                self.report(
                    ProofCheckError::new(ProofErrorCode::SubjectVariableIsMissing, context)
                        .with_detail(other),
                );
                None
            }
            None => {
                self.report(ProofCheckError::new(
                    ProofErrorCode::SubjectVariableIsMissing,
                    context,
                ));
                None
            }
        }
    }

    /// Compares normalized formulas and pins a mismatch to the first
    /// differing node of `actual`.
    pub(super) fn compare(
        &mut self,
        code: ProofErrorCode,
        expected: &Element,
        actual: &Element,
        context: &ModuleContext,
        cited: Option<ModuleContext>,
    ) -> bool {
        let Some(path) = first_difference(expected, actual) else {
            return true;
        };
        self.fail(
            ProofCheckError::new(code, context.formula_path(&path))
                .with_detail(format!("expected {expected}"))
                .with_reference(cited),
        )
    }

    /// Fails if `occurs` holds for an active condition with its
    /// definitions expanded.
    pub(super) fn conditions_untouched(
        &mut self,
        site: &LineSite<'_>,
        subject: &Element,
        context: &ModuleContext,
        occurs: impl Fn(&Element) -> bool,
    ) -> bool {
        let Some(condition) = site
            .conditions
            .iter()
            .find(|condition| occurs(&site.scope.normalized_formula(&condition.formula)))
        else {
            return true;
        };
        self.fail(
            ProofCheckError::new(
                ProofErrorCode::SubstitutionOperatorFoundInPrecondition,
                context.clone(),
            )
            .with_detail(format!("{subject} occurs in {}", condition.formula))
            .with_reference(Some(condition.context.clone())),
        )
    }

    /// Checks the declared version of the line's rule.
    pub(super) fn check_rule(&mut self, site: &LineSite<'_>) -> bool {
        let Some(rule) = self.rules.rule(site.rule) else {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::ProofMethodWasNotDefinedYet,
                    site.reason_context.clone(),
                )
                .with_detail(site.rule),
            );
        };
        if !self.checker.supported.contains(&rule.version()) {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::ProofMethodIsNotSupported,
                    site.reason_context.clone(),
                )
                .with_detail(format!(
                    "{rule}, supported: {}",
                    self.checker.supported_list()
                )),
            );
        }
        let conditional = !site.conditions.is_empty() || site.rule == CONDITIONAL_PROOF_RULE;
        let needed = self
            .checker
            .conditional_minimum
            .filter(|minimum| conditional && rule.version() < *minimum);
        if let Some(minimum) = needed {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::HigherProofRuleVersionNeeded,
                    site.reason_context.clone(),
                )
                .with_detail(format!("{rule}, needed: {minimum}")),
            );
        }
        true
    }
}

/// Which kind of operator variable a substitution replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum OperatorVariable {
    Predicate,
    Function,
}

/// Which generalization rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Quantifier {
    Universal,
    Existential,
}

#[cfg(test)]
#[path = "verifier_tests.rs"]
mod tests;
