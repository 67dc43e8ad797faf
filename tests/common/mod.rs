//! Shared test helpers for integration tests.
//!
//! A proof fixture is a YAML document naming the module, the rule version
//! that selects the checker profile, the proposition, the declared rules,
//! the formulas proved elsewhere, optional constant definitions and the
//! proof lines.

use indexmap::IndexMap;
use proofcheck::checker::{
    ModuleContext, ProofCheckError, ProofChecker, ProofLine, ProvedFormulaTable, RuleRegistry,
    Version,
};
use proofcheck::formula::Element;
use serde::Deserialize;

/// A constant application and the formula it abbreviates.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionFixture {
    /// The defined application, e.g. `PREDCON(subset, VAR(x), VAR(y))`.
    #[serde(rename = "Template")]
    pub template: Element,
    /// The defining formula.
    #[serde(rename = "Definiens")]
    pub definiens: Element,
}

/// One proof together with everything needed to check it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofFixture {
    /// Module identity used in error locations.
    #[serde(rename = "Module")]
    pub module: String,
    /// Declared rule version of the module.
    #[serde(rename = "RuleVersion")]
    pub rule_version: Version,
    /// The formula being proved.
    #[serde(rename = "Proposition")]
    pub proposition: Element,
    /// Declared rules and their versions.
    #[serde(rename = "Rules", default)]
    pub rules: RuleRegistry,
    /// Formulas proved elsewhere in the module, by label.
    #[serde(rename = "Proved", default)]
    pub proved: IndexMap<String, Element>,
    /// Constant definitions used for normalization.
    #[serde(rename = "Definitions", default)]
    pub definitions: Vec<DefinitionFixture>,
    /// The proof lines.
    #[serde(rename = "Lines", default)]
    pub lines: Vec<ProofLine>,
}

impl ProofFixture {
    /// Builds the resolver over the fixture's proved formulas and
    /// definitions.
    pub fn resolver(&self) -> ProvedFormulaTable {
        let proved = self
            .proved
            .iter()
            .fold(ProvedFormulaTable::new(), |table, (label, formula)| {
                table.with_proved(
                    label.clone(),
                    formula.clone(),
                    ModuleContext::new(self.module.clone(), format!("proved[{label}]")),
                )
            });
        self.definitions.iter().fold(proved, |table, definition| {
            table.with_definition(definition.template.clone(), definition.definiens.clone())
        })
    }

    /// Checks the proof with the checker its rule version selects.
    pub fn check(&self) -> Vec<ProofCheckError> {
        ProofChecker::for_rule_version(self.rule_version).check_proof(
            &self.proposition,
            &self.lines,
            &self.rules,
            &ModuleContext::new(self.module.clone(), "proof"),
            &self.resolver(),
        )
    }
}

/// Loads a fixture file from the `tests/fixtures/` directory.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// Loads and parses a proof fixture.
///
/// # Panics
///
/// Panics if the file cannot be read or does not match the fixture schema.
pub fn load_proof(name: &str) -> ProofFixture {
    serde_saphyr::from_str(&load_fixture(name))
        .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
}

