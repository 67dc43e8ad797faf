//! Validators for addition, renaming, modus ponens and generalization.

use super::diagnostic::{ProofCheckError, ProofErrorCode};
use super::verifier::{LineSite, Quantifier, Verifier};
use crate::formula::Element;
use crate::formula::utility::{
    bound_subject_variables, free_subject_variables, implication_parts,
    replace_subject_variable_quantifier, subject_variable_quantifier,
};

impl Verifier<'_> {
    /// The line must be a proved formula, up to normalization.
    pub(super) fn check_add(&mut self, site: &LineSite<'_>, reference: Option<&str>) -> bool {
        let reference_context = site.reason_context.field("reference");
        let Some(label) = reference else {
            return self.fail(ProofCheckError::new(
                ProofErrorCode::ReferenceToProvedFormulaIsMissing,
                reference_context,
            ));
        };
        let proved = site
            .scope
            .is_proved_formula(label)
            .then(|| site.scope.normalized_reference_formula(label))
            .flatten();
        let Some(expected) = proved else {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::ThisIsNoReferenceToAProvedFormula,
                    reference_context,
                )
                .with_detail(label),
            );
        };
        self.compare(
            ProofErrorCode::ExpectedFormulaDiffers,
            &expected,
            &site.normalized_formula(),
            &site.formula_context,
            site.cited(reference),
        ) && self.check_rule(site)
    }

    /// The line must be the cited line with one binder renamed.
    pub(super) fn check_rename(
        &mut self,
        site: &LineSite<'_>,
        reference: Option<&str>,
        original: Option<&Element>,
        replacement: Option<&Element>,
        occurrence: usize,
    ) -> bool {
        let Some(source) =
            self.local_formula(reference, site.reason_context.field("reference"), site.scope)
        else {
            return false;
        };
        let Some(from) = self.subject_variable(original, site.reason_context.field("original"))
        else {
            return false;
        };
        let Some(to) =
            self.subject_variable(replacement, site.reason_context.field("replacement"))
        else {
            return false;
        };
        let occupied = subject_variable_quantifier(from, &source, occurrence).filter(|binder| {
            from != to
                && (free_subject_variables(binder).contains(to)
                    || bound_subject_variables(binder).contains(to))
        });
        if let Some(binder) = occupied {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::FreeSubjectVariablesShouldNotGetBound,
                    site.reason_context.field("replacement"),
                )
                .with_detail(format!("{to} already occurs in {binder}"))
                .with_reference(site.cited(reference)),
            );
        }
        let expected = replace_subject_variable_quantifier(from, to, &source, occurrence);
        self.compare(
            ProofErrorCode::ExpectedFormulaDiffers,
            &expected,
            &site.normalized_formula(),
            &site.formula_context,
            site.cited(reference),
        ) && self.check_rule(site)
    }

    /// From `A → B` and `A` the line must be `B`.
    pub(super) fn check_modus_ponens(
        &mut self,
        site: &LineSite<'_>,
        reference1: Option<&str>,
        reference2: Option<&str>,
    ) -> bool {
        let first_context = site.reason_context.field("reference1");
        let second_context = site.reason_context.field("reference2");
        let Some(implication) = self.local_formula(reference1, first_context.clone(), site.scope)
        else {
            return false;
        };
        let Some(premise) = self.local_formula(reference2, second_context.clone(), site.scope)
        else {
            return false;
        };
        let cited = site.cited(reference1);
        let Some((antecedent, consequent)) = implication_parts(&implication) else {
            return self.fail(
                ProofCheckError::new(ProofErrorCode::ImplicationExpected, first_context)
                    .with_detail(&implication)
                    .with_reference(cited),
            );
        };
        if &premise != antecedent {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::MustBeHypothesisOfFirstReference,
                    second_context,
                )
                .with_detail(format!("expected {antecedent}"))
                .with_reference(cited),
            );
        }
        self.compare(
            ProofErrorCode::CurrentMustBeConclusion,
            consequent,
            &site.normalized_formula(),
            &site.formula_context,
            cited,
        ) && self.check_rule(site)
    }

    /// From `A → B` the line must be `A → ∀x B` or `∃x A → B`.
    pub(super) fn check_generalization(
        &mut self,
        site: &LineSite<'_>,
        reference: Option<&str>,
        variable: Option<&Element>,
        quantifier: Quantifier,
    ) -> bool {
        let reference_context = site.reason_context.field("reference");
        let Some(source) = self.local_formula(reference, reference_context.clone(), site.scope)
        else {
            return false;
        };
        let cited = site.cited(reference);
        let Some((antecedent, consequent)) = implication_parts(&source) else {
            return self.fail(
                ProofCheckError::new(ProofErrorCode::ImplicationExpected, reference_context)
                    .with_detail(&source)
                    .with_reference(cited),
            );
        };
        let variable_context = site.reason_context.field("subject_variable");
        let Some(var) = self.subject_variable(variable, variable_context.clone()) else {
            return false;
        };
        let untouched = match quantifier {
            Quantifier::Universal => antecedent,
            Quantifier::Existential => consequent,
        };
        if free_subject_variables(untouched).contains(var) {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::SubjectVariableOccursFree,
                    variable_context,
                )
                .with_detail(format!("{var} is free in {untouched}"))
                .with_reference(cited),
            );
        }
        let expected = match quantifier {
            Quantifier::Universal => Element::implication(
                antecedent.clone(),
                Element::forall(var.clone(), consequent.clone()),
            ),
            Quantifier::Existential => Element::implication(
                Element::exists(var.clone(), antecedent.clone()),
                consequent.clone(),
            ),
        };
        self.compare(
            ProofErrorCode::ExpectedFormulaDiffers,
            &expected,
            &site.normalized_formula(),
            &site.formula_context,
            cited,
        ) && self.conditions_untouched(site, var, &variable_context, |condition| {
            free_subject_variables(condition).contains(var)
        }) && self.check_rule(site)
    }
}
