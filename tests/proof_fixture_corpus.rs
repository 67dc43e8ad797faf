//! Checks every proof fixture against its expected outcome.

mod common;

use common::{load_fixture, load_proof};
use proofcheck::checker::{ProofErrorCode, ProofLine};
use rstest::rstest;

#[rstest]
#[case::modus_ponens("valid_modus_ponens.yaml")]
#[case::generalization("valid_generalization.yaml")]
#[case::predicate_substitution("valid_predicate_substitution.yaml")]
#[case::conditional_proof("valid_conditional_proof.yaml")]
#[case::definition("valid_definition.yaml")]
fn valid_fixtures_check_cleanly(#[case] fixture: &str) {
    let errors = load_proof(fixture).check();
    assert!(errors.is_empty(), "{fixture}: {errors:?}");
}

#[rstest]
#[case::premise(
    "invalid_modus_ponens_premise.yaml",
    vec![ProofErrorCode::MustBeHypothesisOfFirstReference]
)]
#[case::conclusion(
    "invalid_conditional_conclusion.yaml",
    vec![ProofErrorCode::ExpectedFormulaDiffers2]
)]
#[case::capture(
    "invalid_substitution_capture.yaml",
    vec![ProofErrorCode::FreeSubjectVariablesShouldNotGetBound]
)]
#[case::rule_version(
    "invalid_conditional_rule_version.yaml",
    vec![ProofErrorCode::HigherProofRuleVersionNeeded]
)]
#[case::unsupported(
    "invalid_unsupported_rule_version.yaml",
    vec![ProofErrorCode::NoFormalProofsSupported]
)]
#[case::many_defects(
    "invalid_many_defects.yaml",
    vec![
        ProofErrorCode::ProofLineMustNotBeNull,
        ProofErrorCode::ThisIsNoReferenceToAProvedFormula,
        ProofErrorCode::LocalLabelAlreadyExists,
        ProofErrorCode::ImplicationExpected,
        ProofErrorCode::LastProofLineMustBeIdenticalToProposition,
    ]
)]
fn invalid_fixtures_report_expected_codes(
    #[case] fixture: &str,
    #[case] expected: Vec<ProofErrorCode>,
) {
    let codes: Vec<ProofErrorCode> = load_proof(fixture)
        .check()
        .iter()
        .map(|error| error.code)
        .collect();
    assert_eq!(codes, expected);
}

#[rstest]
#[case::unknown_reason("- formula: {PREDVAR: [A]}\n  reason: {induction: {reference: a}}\n")]
#[case::unknown_operator("- formula: {PREDICATE: [A]}\n  reason: {add: {reference: a}}\n")]
#[case::unknown_line_key("- formula: {PREDVAR: [A]}\n  because: axiom\n")]
#[case::bare_sequence("- formula: [A, B]\n  reason: {add: {reference: a}}\n")]
fn malformed_lines_are_rejected(#[case] yaml: &str) {
    let result: Result<Vec<ProofLine>, _> = serde_saphyr::from_str(yaml);
    assert!(result.is_err(), "{yaml} should be rejected");
}

#[test]
fn fixtures_are_readable() {
    assert!(load_fixture("valid_modus_ponens.yaml").contains("modus_ponens"));
}
