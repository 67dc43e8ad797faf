//! Structured diagnostics collected while checking a proof.
//!
//! Every defect found by the checker becomes a [`ProofCheckError`] carrying a
//! stable [`ProofErrorCode`], a message, the primary location and, when the
//! defect concerns a cited formula, the location of that formula.

use std::fmt;

use super::context::ModuleContext;

/// Stable classification codes for proof checking failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofErrorCode {
    /// A proof line or hypothesis has no formula.
    ProofLineMustNotBeNull,
    /// A proof line has no reason.
    ReasonMustNotBeNull,
    /// A label is defined twice in visible scopes.
    LocalLabelAlreadyExists,
    /// A line is not well formed together with the active conditions.
    ConditionsAndFormulaDontAgree,
    /// The reason kind is not allowed by the active checker profile.
    ThisIsNoAllowedBasicReason,
    /// A reason lacks its reference.
    ReferenceToProvedFormulaIsMissing,
    /// A reference does not resolve to a proved formula.
    ThisIsNoReferenceToAProvedFormula,
    /// The line differs from the formula the rule produces.
    ExpectedFormulaDiffers,
    /// The rule was never declared.
    ProofMethodWasNotDefinedYet,
    /// The declared rule version is outside the supported set.
    ProofMethodIsNotSupported,
    /// The declared rule version is too low for conditional proofs.
    HigherProofRuleVersionNeeded,
    /// A reference does not resolve to an earlier proof line.
    SuchALocalLabelDoesntExist,
    /// A formula must be a two-argument implication.
    ImplicationExpected,
    /// Modus ponens: the second reference is not the antecedent.
    MustBeHypothesisOfFirstReference,
    /// Modus ponens: the line is not the consequent.
    CurrentMustBeConclusion,
    /// A substitution lacks its replacement.
    SubstitutionFormulaIsMissing,
    /// An operator variable's arguments are not distinct subject variables.
    OnlyFreeSubjectVariablesAllowed,
    /// A free variable of the replacement would get bound.
    FreeSubjectVariablesShouldNotGetBound,
    /// A substitution site is in scope of a variable bound in the replacement.
    SubstitutionLocationContainsBoundSubjectVariable,
    /// The substituted variable occurs in an active condition.
    SubstitutionOperatorFoundInPrecondition,
    /// A subject variable was expected.
    SubjectVariableIsMissing,
    /// The generalized variable occurs free where it must not.
    SubjectVariableOccursFree,
    /// A predicate variable was expected.
    PredicateVariableExpected,
    /// A function variable was expected.
    FunctionVariableExpected,
    /// A conditional proof has no inner lines.
    MissingProofLineForConditionalProof,
    /// Conditional proofs are nested deeper than configured.
    ConditionalProofNestingTooDeep,
    /// The conclusion of a conditional proof has the wrong form.
    ExpectedFormulaDiffers2,
    /// The last line is not the proposition being proved.
    LastProofLineMustBeIdenticalToProposition,
    /// The active profile does not accept formal proofs at all.
    NoFormalProofsSupported,
}

impl ProofErrorCode {
    /// Returns the stable numeric code.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::ProofLineMustNotBeNull => 37_010,
            Self::ReasonMustNotBeNull => 37_020,
            Self::LocalLabelAlreadyExists => 37_030,
            Self::ConditionsAndFormulaDontAgree => 37_040,
            Self::ThisIsNoAllowedBasicReason => 37_050,
            Self::ReferenceToProvedFormulaIsMissing => 37_060,
            Self::ThisIsNoReferenceToAProvedFormula => 37_070,
            Self::ExpectedFormulaDiffers => 37_080,
            Self::ProofMethodWasNotDefinedYet => 37_090,
            Self::ProofMethodIsNotSupported => 37_100,
            Self::HigherProofRuleVersionNeeded => 37_110,
            Self::SuchALocalLabelDoesntExist => 37_120,
            Self::ImplicationExpected => 37_130,
            Self::MustBeHypothesisOfFirstReference => 37_140,
            Self::CurrentMustBeConclusion => 37_150,
            Self::SubstitutionFormulaIsMissing => 37_160,
            Self::OnlyFreeSubjectVariablesAllowed => 37_170,
            Self::FreeSubjectVariablesShouldNotGetBound => 37_180,
            Self::SubstitutionLocationContainsBoundSubjectVariable => 37_190,
            Self::SubstitutionOperatorFoundInPrecondition => 37_200,
            Self::SubjectVariableIsMissing => 37_210,
            Self::SubjectVariableOccursFree => 37_215,
            Self::PredicateVariableExpected => 37_220,
            Self::FunctionVariableExpected => 37_225,
            Self::MissingProofLineForConditionalProof => 37_230,
            Self::ConditionalProofNestingTooDeep => 37_235,
            Self::ExpectedFormulaDiffers2 => 37_240,
            Self::LastProofLineMustBeIdenticalToProposition => 37_250,
            Self::NoFormalProofsSupported => 37_260,
        }
    }

    /// Returns the stable, machine-readable code string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProofLineMustNotBeNull => "proof.line_must_not_be_null",
            Self::ReasonMustNotBeNull => "proof.reason_must_not_be_null",
            Self::LocalLabelAlreadyExists => "proof.local_label_already_exists",
            Self::ConditionsAndFormulaDontAgree => "proof.conditions_and_formula_dont_agree",
            Self::ThisIsNoAllowedBasicReason => "proof.reason_not_allowed",
            Self::ReferenceToProvedFormulaIsMissing => "proof.reference_missing",
            Self::ThisIsNoReferenceToAProvedFormula => "proof.no_reference_to_proved_formula",
            Self::ExpectedFormulaDiffers => "proof.expected_formula_differs",
            Self::ProofMethodWasNotDefinedYet => "proof.rule_not_defined",
            Self::ProofMethodIsNotSupported => "proof.rule_not_supported",
            Self::HigherProofRuleVersionNeeded => "proof.higher_rule_version_needed",
            Self::SuchALocalLabelDoesntExist => "proof.local_label_missing",
            Self::ImplicationExpected => "proof.implication_expected",
            Self::MustBeHypothesisOfFirstReference => "proof.must_be_hypothesis_of_first_reference",
            Self::CurrentMustBeConclusion => "proof.current_must_be_conclusion",
            Self::SubstitutionFormulaIsMissing => "proof.substitution_formula_missing",
            Self::OnlyFreeSubjectVariablesAllowed => "proof.only_free_subject_variables_allowed",
            Self::FreeSubjectVariablesShouldNotGetBound => "proof.free_variables_get_bound",
            Self::SubstitutionLocationContainsBoundSubjectVariable => {
                "proof.substitution_location_binds_variable"
            }
            Self::SubstitutionOperatorFoundInPrecondition => "proof.substituted_in_condition",
            Self::SubjectVariableIsMissing => "proof.subject_variable_missing",
            Self::SubjectVariableOccursFree => "proof.subject_variable_occurs_free",
            Self::PredicateVariableExpected => "proof.predicate_variable_expected",
            Self::FunctionVariableExpected => "proof.function_variable_expected",
            Self::MissingProofLineForConditionalProof => "proof.conditional_proof_without_lines",
            Self::ConditionalProofNestingTooDeep => "proof.conditional_proof_too_deep",
            Self::ExpectedFormulaDiffers2 => "proof.conditional_conclusion_differs",
            Self::LastProofLineMustBeIdenticalToProposition => "proof.last_line_differs",
            Self::NoFormalProofsSupported => "proof.no_formal_proofs_supported",
        }
    }

    /// Returns the fixed description that opens every message of this kind.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ProofLineMustNotBeNull => "proof line formula must be present",
            Self::ReasonMustNotBeNull => "proof line reason must be present",
            Self::LocalLabelAlreadyExists => "local label already exists",
            Self::ConditionsAndFormulaDontAgree => {
                "formula does not agree with the active conditions"
            }
            Self::ThisIsNoAllowedBasicReason => "reason is not allowed by this proof checker",
            Self::ReferenceToProvedFormulaIsMissing => "reference to proved formula is missing",
            Self::ThisIsNoReferenceToAProvedFormula => "this is no reference to a proved formula",
            Self::ExpectedFormulaDiffers => "expected formula differs",
            Self::ProofMethodWasNotDefinedYet => "proof method was not defined yet",
            Self::ProofMethodIsNotSupported => "proof method is not supported",
            Self::HigherProofRuleVersionNeeded => "higher proof rule version needed",
            Self::SuchALocalLabelDoesntExist => "such a local label does not exist",
            Self::ImplicationExpected => "implication expected",
            Self::MustBeHypothesisOfFirstReference => {
                "must be the hypothesis of the first reference"
            }
            Self::CurrentMustBeConclusion => {
                "current formula must be the conclusion of the first reference"
            }
            Self::SubstitutionFormulaIsMissing => "substitution formula is missing",
            Self::OnlyFreeSubjectVariablesAllowed => {
                "only pairwise distinct subject variables are allowed as arguments"
            }
            Self::FreeSubjectVariablesShouldNotGetBound => {
                "free subject variables of the substitute would get bound"
            }
            Self::SubstitutionLocationContainsBoundSubjectVariable => {
                "substitution location is in scope of a variable bound in the substitute"
            }
            Self::SubstitutionOperatorFoundInPrecondition => {
                "substituted variable occurs in an active condition"
            }
            Self::SubjectVariableIsMissing => "subject variable expected",
            Self::SubjectVariableOccursFree => "subject variable must not occur free",
            Self::PredicateVariableExpected => "predicate variable expected",
            Self::FunctionVariableExpected => "function variable expected",
            Self::MissingProofLineForConditionalProof => {
                "conditional proof needs at least one proof line"
            }
            Self::ConditionalProofNestingTooDeep => "conditional proofs are nested too deeply",
            Self::ExpectedFormulaDiffers2 => {
                "conclusion must be the hypothesis implying the last proof line"
            }
            Self::LastProofLineMustBeIdenticalToProposition => {
                "last proof line must be identical to the proposition"
            }
            Self::NoFormalProofsSupported => "formal proofs are not supported",
        }
    }
}

impl fmt::Display for ProofErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.number())
    }
}

/// A single defect found while checking a proof.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProofCheckError {
    /// Stable code for programmatic handling.
    pub code: ProofErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the offending node.
    pub context: ModuleContext,
    /// Location of the cited formula, when the defect concerns one.
    pub reference_context: Option<ModuleContext>,
}

impl ProofCheckError {
    /// Creates an error whose message is the code's description.
    #[must_use]
    pub fn new(code: ProofErrorCode, context: ModuleContext) -> Self {
        Self {
            code,
            message: code.description().to_owned(),
            context,
            reference_context: None,
        }
    }

    /// Appends detail to the description.
    #[must_use]
    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.message = format!("{}: {detail}", self.code.description());
        self
    }

    /// Attaches the location of the cited formula.
    #[must_use]
    pub fn with_reference(mut self, reference_context: Option<ModuleContext>) -> Self {
        self.reference_context = reference_context;
        self
    }

    /// Renders the error into a deterministic single-line format suitable
    /// for snapshot tests.
    #[must_use]
    pub fn render(&self) -> String {
        let primary = format!("{} | {} | {}", self.code.as_str(), self.context, self.message);
        self.reference_context
            .as_ref()
            .map_or_else(|| primary.clone(), |reference| format!("{primary} | ref {reference}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let codes = [
            ProofErrorCode::ProofLineMustNotBeNull,
            ProofErrorCode::ReasonMustNotBeNull,
            ProofErrorCode::LocalLabelAlreadyExists,
            ProofErrorCode::ConditionsAndFormulaDontAgree,
            ProofErrorCode::ThisIsNoAllowedBasicReason,
            ProofErrorCode::ReferenceToProvedFormulaIsMissing,
            ProofErrorCode::ThisIsNoReferenceToAProvedFormula,
            ProofErrorCode::ExpectedFormulaDiffers,
            ProofErrorCode::ProofMethodWasNotDefinedYet,
            ProofErrorCode::ProofMethodIsNotSupported,
            ProofErrorCode::HigherProofRuleVersionNeeded,
            ProofErrorCode::SuchALocalLabelDoesntExist,
            ProofErrorCode::ImplicationExpected,
            ProofErrorCode::MustBeHypothesisOfFirstReference,
            ProofErrorCode::CurrentMustBeConclusion,
            ProofErrorCode::SubstitutionFormulaIsMissing,
            ProofErrorCode::OnlyFreeSubjectVariablesAllowed,
            ProofErrorCode::FreeSubjectVariablesShouldNotGetBound,
            ProofErrorCode::SubstitutionLocationContainsBoundSubjectVariable,
            ProofErrorCode::SubstitutionOperatorFoundInPrecondition,
            ProofErrorCode::SubjectVariableIsMissing,
            ProofErrorCode::SubjectVariableOccursFree,
            ProofErrorCode::PredicateVariableExpected,
            ProofErrorCode::FunctionVariableExpected,
            ProofErrorCode::MissingProofLineForConditionalProof,
            ProofErrorCode::ConditionalProofNestingTooDeep,
            ProofErrorCode::ExpectedFormulaDiffers2,
            ProofErrorCode::LastProofLineMustBeIdenticalToProposition,
            ProofErrorCode::NoFormalProofsSupported,
        ];
        let numbers: std::collections::HashSet<u32> = codes.iter().map(|c| c.number()).collect();
        let names: std::collections::HashSet<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(numbers.len(), codes.len());
        assert_eq!(names.len(), codes.len());
    }

    #[test]
    fn renders_primary_and_reference_locations() {
        let error = ProofCheckError::new(
            ProofErrorCode::CurrentMustBeConclusion,
            ModuleContext::new("m", "proof.line[2].formula"),
        )
        .with_reference(Some(ModuleContext::new("m", "proof.line[0]")));
        assert_eq!(
            error.render(),
            "proof.current_must_be_conclusion | m:proof.line[2].formula | \
             current formula must be the conclusion of the first reference | ref m:proof.line[0]"
        );
    }

    #[test]
    fn detail_follows_description() {
        let error = ProofCheckError::new(
            ProofErrorCode::ProofMethodWasNotDefinedYet,
            ModuleContext::new("m", "proof.line[0].reason"),
        )
        .with_detail("MP");
        assert_eq!(error.message, "proof method was not defined yet: MP");
        assert_eq!(
            error.to_string(),
            "proof.rule_not_defined (37090): proof method was not defined yet: MP"
        );
    }
}
