//! Validators for the three substitution rules.
//!
//! Substitutions must not change the meaning of the cited formula by
//! capture: free variables of the substitute must stay free, and no
//! occurrence of the replaced operator variable may sit where a variable
//! bound in the substitute would capture one of its arguments. Inside a
//! conditional proof the replaced variable must not occur in an active
//! hypothesis.

use indexmap::IndexSet;

use super::context::ModuleContext;
use super::diagnostic::{ProofCheckError, ProofErrorCode};
use super::verifier::{LineSite, OperatorVariable, Verifier};
use crate::formula::utility::{
    bound_subject_variables, contains_operator_variable, free_subject_variables,
    is_subject_variable, operator_variable_meets_variables, replace_free_subject_variable,
    replace_operator_variable,
};
use crate::formula::{Element, ElementList, Operator};

impl OperatorVariable {
    const fn operator(self) -> Operator {
        match self {
            Self::Predicate => Operator::PredVar,
            Self::Function => Operator::FunVar,
        }
    }

    const fn variable_field(self) -> &'static str {
        match self {
            Self::Predicate => "predicate_variable",
            Self::Function => "function_variable",
        }
    }

    const fn replacement_field(self) -> &'static str {
        match self {
            Self::Predicate => "substitute_formula",
            Self::Function => "substitute_term",
        }
    }

    const fn expected_code(self) -> ProofErrorCode {
        match self {
            Self::Predicate => ProofErrorCode::PredicateVariableExpected,
            Self::Function => ProofErrorCode::FunctionVariableExpected,
        }
    }

    fn accepts(self, candidate: &Element) -> bool {
        candidate
            .as_list()
            .is_some_and(|list| list.operator() == self.operator() && list.name().is_some())
    }
}

impl Verifier<'_> {
    /// The line must be the cited line with a term substituted for the free
    /// occurrences of a subject variable.
    pub(super) fn check_subst_free(
        &mut self,
        site: &LineSite<'_>,
        reference: Option<&str>,
        variable: Option<&Element>,
        term: Option<&Element>,
    ) -> bool {
        let Some(source) =
            self.local_formula(reference, site.reason_context.field("reference"), site.scope)
        else {
            return false;
        };
        let variable_context = site.reason_context.field("subject_variable");
        let Some(var) = self.subject_variable(variable, variable_context.clone()) else {
            return false;
        };
        let term_context = site.reason_context.field("substitute_term");
        let Some(substitute) = term else {
            return self.fail(ProofCheckError::new(
                ProofErrorCode::SubstitutionFormulaIsMissing,
                term_context,
            ));
        };
        let normalized_term = site.scope.normalized_formula(substitute);
        let bound = bound_subject_variables(&source);
        if let Some(captured) = free_subject_variables(&normalized_term)
            .into_iter()
            .find(|free| bound.contains(free))
        {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::FreeSubjectVariablesShouldNotGetBound,
                    term_context,
                )
                .with_detail(captured)
                .with_reference(site.cited(reference)),
            );
        }
        let expected = replace_free_subject_variable(&source, var, &normalized_term);
        self.compare(
            ProofErrorCode::ExpectedFormulaDiffers,
            &expected,
            &site.normalized_formula(),
            &site.formula_context,
            site.cited(reference),
        ) && self.conditions_untouched(site, var, &variable_context, |condition| {
            free_subject_variables(condition).contains(var)
        }) && self.check_rule(site)
    }

    /// The line must be the cited line with a formula (or term) substituted
    /// for every application of a predicate (or function) variable.
    pub(super) fn check_subst_operator(
        &mut self,
        site: &LineSite<'_>,
        reference: Option<&str>,
        variable: Option<&Element>,
        replacement: Option<&Element>,
        kind: OperatorVariable,
    ) -> bool {
        let Some(source) =
            self.local_formula(reference, site.reason_context.field("reference"), site.scope)
        else {
            return false;
        };
        let variable_context = site.reason_context.field(kind.variable_field());
        let Some(template) = variable.filter(|candidate| kind.accepts(candidate)) else {
            let found = variable.map_or_else(|| "nothing".to_owned(), ToString::to_string);
            return self.fail(
                ProofCheckError::new(kind.expected_code(), variable_context)
                    .with_detail(format!("found {found}")),
            );
        };
        let replacement_context = site.reason_context.field(kind.replacement_field());
        let Some(substitute) = replacement else {
            return self.fail(ProofCheckError::new(
                ProofErrorCode::SubstitutionFormulaIsMissing,
                replacement_context,
            ));
        };
        let normalized_substitute = site.scope.normalized_formula(substitute);
        let expected = replace_operator_variable(&source, template, &normalized_substitute);
        let cited = site.cited(reference);
        if !self.compare(
            ProofErrorCode::ExpectedFormulaDiffers,
            &expected,
            &site.normalized_formula(),
            &site.formula_context,
            cited.clone(),
        ) {
            return false;
        }
        let parameters = template
            .as_list()
            .map_or(&[] as &[Element], ElementList::arguments);
        if !self.check_parameters(parameters, &variable_context) {
            return false;
        }

        let parameter_set: IndexSet<&Element> = parameters.iter().collect();
        let bound_in_source = bound_subject_variables(&source);
        if let Some(captured) = free_subject_variables(&normalized_substitute)
            .into_iter()
            .find(|free| !parameter_set.contains(free) && bound_in_source.contains(free))
        {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::FreeSubjectVariablesShouldNotGetBound,
                    replacement_context,
                )
                .with_detail(captured)
                .with_reference(cited),
            );
        }
        let bound_in_substitute = bound_subject_variables(&normalized_substitute);
        if operator_variable_meets_variables(&source, template, &bound_in_substitute) {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::SubstitutionLocationContainsBoundSubjectVariable,
                    replacement_context,
                )
                .with_detail(template)
                .with_reference(cited),
            );
        }
        self.conditions_untouched(site, template, &variable_context, |condition| {
            contains_operator_variable(condition, template)
        }) && self.check_rule(site)
    }

    /// The parameters of an operator variable must be pairwise distinct
    /// subject variables.
    fn check_parameters(&mut self, parameters: &[Element], context: &ModuleContext) -> bool {
        let distinct: IndexSet<&Element> = parameters.iter().collect();
        if distinct.len() != parameters.len() {
            return self.fail(
                ProofCheckError::new(
                    ProofErrorCode::OnlyFreeSubjectVariablesAllowed,
                    context.clone(),
                )
                .with_detail("parameters repeat"),
            );
        }
        let Some((index, parameter)) = parameters
            .iter()
            .enumerate()
            .find(|(_, parameter)| !is_subject_variable(parameter))
        else {
            return true;
        };
        // Element 0 of an application is its name.
        self.fail(
            ProofCheckError::new(
                ProofErrorCode::OnlyFreeSubjectVariablesAllowed,
                context.indexed("element", index + 1),
            )
            .with_detail(parameter),
        )
    }
}
