//! Validator for conditional proofs.
//!
//! A conditional proof assumes its hypothesis, proves the inner lines in a
//! nested scope and concludes `hypothesis → last inner line`. The inner
//! scope sees the hypothesis under its label, every earlier line of the
//! enclosing scopes, and the proved formulas of the module.

use log::trace;

use super::diagnostic::{ProofCheckError, ProofErrorCode};
use super::reason::{Hypothesis, ProofLine};
use super::scope::HypothesisScope;
use super::verifier::{Condition, LineSite, Verifier};
use crate::formula::Element;
use crate::formula::utility::is_implication;

impl Verifier<'_> {
    pub(super) fn check_conditional_proof(
        &mut self,
        site: &LineSite<'_>,
        hypothesis: &Hypothesis,
        lines: &[ProofLine],
    ) -> bool {
        let hypothesis_context = site.reason_context.field("hypothesis");
        let Some(assumption) = &hypothesis.formula else {
            return self.fail(ProofCheckError::new(
                ProofErrorCode::ProofLineMustNotBeNull,
                hypothesis_context.field("formula"),
            ));
        };
        if lines.is_empty() {
            return self.fail(ProofCheckError::new(
                ProofErrorCode::MissingProofLineForConditionalProof,
                site.reason_context.field("lines"),
            ));
        }
        if site.depth >= self.checker.max_conditional_depth() {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::ConditionalProofNestingTooDeep,
                    site.reason_context.clone(),
                )
                .with_detail(format!(
                    "at most {} levels",
                    self.checker.max_conditional_depth()
                )),
            );
        }
        if let Some(label) = hypothesis
            .label
            .as_deref()
            .filter(|label| site.scope.is_local_proof_line_reference(label))
        {
            self.report(
                ProofCheckError::new(
                    ProofErrorCode::LocalLabelAlreadyExists,
                    hypothesis_context.field("label"),
                )
                .with_detail(label)
                .with_reference(site.scope.reference_context(label)),
            );
        }

        let normalized_assumption = site.scope.normalized_formula(assumption);
        let scope = HypothesisScope {
            label: hypothesis.label.as_deref(),
            formula: normalized_assumption.clone(),
            context: hypothesis_context.clone(),
            outer: site.scope,
        };
        let mut conditions = site.conditions.to_vec();
        conditions.push(Condition {
            formula: assumption.clone(),
            context: hypothesis_context.field("formula"),
        });
        let inner_depth = site.depth + 1;
        trace!("entering conditional proof at {} (depth {inner_depth})", site.reason_context);
        let before = self.errors.len();
        self.check_lines(lines, &site.reason_context, &conditions, &scope, inner_depth);
        let inner_passed = self.errors.len() == before;
        trace!(
            "leaving conditional proof at {}: {} inner error(s)",
            site.reason_context,
            self.errors.len() - before
        );

        // A last line without formula has been reported inside.
        let Some(last) = lines.last().and_then(|line| line.formula.as_ref()) else {
            return false;
        };
        let conclusion = site.normalized_formula();
        if !is_implication(&conclusion) {
            return self.fail(
                ProofCheckError::new(ProofErrorCode::ImplicationExpected, site.formula_context.clone())
                    .with_detail(&conclusion),
            );
        }
        let expected = Element::implication(normalized_assumption, site.scope.normalized_formula(last));
        if !self.compare(
            ProofErrorCode::ExpectedFormulaDiffers2,
            &expected,
            &conclusion,
            &site.formula_context,
            None,
        ) {
            return false;
        }
        self.check_rule(site) && inner_passed
    }
}
