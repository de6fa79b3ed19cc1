//! Public assembly surface.
//!
//! [`Assembler`] owns a statement sequence and compiles it into a [`Model`]
//! on demand. Every build call recomputes the model from the original
//! statements with a fresh build context: policy scope never leaks from one
//! call into the next, and a rebuild with no policy argument reverts to the
//! default strategy.

use crate::engine::assembler;
use crate::engine::policy::{BuildError, PolicyConfig};
use crate::model::Model;
use crate::statement::Statement;

/// Initial species amount every monomer starts with, overridable through
/// [`Assembler::add_default_initial_conditions`] and
/// [`Assembler::set_context`].
pub const DEFAULT_INITIAL_AMOUNT: f64 = 100.0;

/// External provider of expression-level amounts, keyed by monomer name and
/// context key. Lookup misses are not errors; the affected parameter simply
/// keeps its previous value.
pub trait AmountProvider {
    fn amount(&self, monomer: &str, context: &str) -> Option<f64>;
}

/// Compiles statement sequences into rule-based reaction-network models.
pub struct Assembler {
    statements: Vec<Statement>,
    model: Option<Model>,
    default_initial_amount: f64,
}

impl Assembler {
    pub fn new(statements: Vec<Statement>) -> Self {
        Assembler { statements, model: None, default_initial_amount: DEFAULT_INITIAL_AMOUNT }
    }

    /// Append further statements; takes effect on the next build.
    pub fn add_statements(&mut self, statements: Vec<Statement>) {
        self.statements.extend(statements);
    }

    /// The statements this assembler compiles.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The default initial amount used for monomer parameters.
    pub fn default_initial_amount(&self) -> f64 {
        self.default_initial_amount
    }

    /// The most recently built model, if any.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Build the model under the system default policy.
    pub fn make_model(&mut self) -> Result<&Model, BuildError> {
        self.make_model_with(&PolicyConfig::Default)
    }

    /// Build the model under the given policy configuration.
    ///
    /// On error no model is retained: a failed build leaves the assembler
    /// without a partially-populated result.
    pub fn make_model_with(&mut self, policies: &PolicyConfig) -> Result<&Model, BuildError> {
        self.model = None;
        let model = assembler::build(&self.statements, policies, self.default_initial_amount)?;
        Ok(self.model.insert(model))
    }

    /// Reset every monomer's initial-amount parameter to `value` and make it
    /// the default for subsequent builds.
    pub fn add_default_initial_conditions(&mut self, value: f64) {
        self.default_initial_amount = value;
        if let Some(model) = &mut self.model {
            for idx in 0..model.monomers.len() {
                let name = format!("{}_0", model.monomers[idx].name);
                if let Some(param) = model.parameter_mut(&name) {
                    param.value = value;
                }
            }
        }
    }

    /// Overwrite initial-amount parameters from an external expression-level
    /// provider for the given context key. Monomers the provider does not
    /// know, or an unknown context, keep their prior values; no error is
    /// raised.
    pub fn set_context(&mut self, context: &str, amounts: &dyn AmountProvider) {
        let Some(model) = &mut self.model else { return };
        for idx in 0..model.monomers.len() {
            let monomer = model.monomers[idx].name.clone();
            if let Some(value) = amounts.amount(&monomer, context) {
                if let Some(param) = model.parameter_mut(&format!("{monomer}_0")) {
                    param.value = value;
                }
            }
        }
    }
}

/// Compile `statements` under the default policy.
pub fn assemble(statements: Vec<Statement>) -> Result<Model, BuildError> {
    assemble_with(statements, &PolicyConfig::Default)
}

/// Compile `statements` under the given policy configuration.
pub fn assemble_with(statements: Vec<Statement>, policies: &PolicyConfig) -> Result<Model, BuildError> {
    assembler::build(&statements, policies, DEFAULT_INITIAL_AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Agent;
    use std::collections::HashMap;

    struct FakeExpressionTable(HashMap<(String, String), f64>);

    impl FakeExpressionTable {
        fn new(entries: &[(&str, &str, f64)]) -> Self {
            FakeExpressionTable(
                entries
                    .iter()
                    .map(|(m, c, v)| ((m.to_string(), c.to_string()), *v))
                    .collect(),
            )
        }
    }

    impl AmountProvider for FakeExpressionTable {
        fn amount(&self, monomer: &str, context: &str) -> Option<f64> {
            self.0.get(&(monomer.to_string(), context.to_string())).copied()
        }
    }

    fn phos_statements() -> Vec<Statement> {
        vec![Statement::phosphorylation(Some(Agent::new("MAP2K1")), Agent::new("MAPK3"), None, None)]
    }

    #[test]
    fn initial_amounts_default_then_context() {
        let provider = FakeExpressionTable::new(&[
            ("MAP2K1", "A375_SKIN", 13000.0),
            ("MAPK3", "A375_SKIN", 18000.0),
        ]);
        let mut pa = Assembler::new(phos_statements());
        pa.make_model().unwrap();
        let model = pa.model().unwrap();
        assert_eq!(model.parameter("MAP2K1_0").unwrap().value, pa.default_initial_amount());
        assert_eq!(model.parameter("MAPK3_0").unwrap().value, pa.default_initial_amount());

        pa.set_context("A375_SKIN", &provider);
        let model = pa.model().unwrap();
        assert!(model.parameter("MAP2K1_0").unwrap().value > 10000.0);
        assert!(model.parameter("MAPK3_0").unwrap().value > 10000.0);
    }

    #[test]
    fn context_misses_keep_prior_values() {
        let provider = FakeExpressionTable::new(&[("MAP2K1", "A375_SKIN", 13000.0)]);
        let mut pa = Assembler::new(vec![Statement::phosphorylation(
            Some(Agent::new("MAP2K1")),
            Agent::new("XYZ"),
            None,
            None,
        )]);
        pa.make_model().unwrap();
        pa.add_default_initial_conditions(100.0);
        {
            let model = pa.model().unwrap();
            assert_eq!(model.parameter("MAP2K1_0").unwrap().value, 100.0);
            assert_eq!(model.parameter("XYZ_0").unwrap().value, 100.0);
        }
        pa.set_context("A375_SKIN", &provider);
        let model = pa.model().unwrap();
        assert!(model.parameter("MAP2K1_0").unwrap().value > 10000.0);
        assert_eq!(model.parameter("XYZ_0").unwrap().value, 100.0);
    }

    #[test]
    fn unknown_context_is_a_silent_noop() {
        let provider = FakeExpressionTable::new(&[("MAP2K1", "A375_SKIN", 13000.0)]);
        let mut pa = Assembler::new(phos_statements());
        pa.make_model().unwrap();
        pa.set_context("XYZ", &provider);
        let model = pa.model().unwrap();
        assert_eq!(model.parameter("MAP2K1_0").unwrap().value, DEFAULT_INITIAL_AMOUNT);
    }

    #[test]
    fn failed_build_retains_no_model() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("xyz".to_string(), crate::Policy::parse("two_step").unwrap());
        let mut pa = Assembler::new(phos_statements());
        assert!(pa.make_model_with(&PolicyConfig::Map(map)).is_err());
        assert!(pa.model().is_none());
    }

    #[test]
    fn model_serializes_for_exporters() {
        let model = assemble(phos_statements()).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert!(json.get("monomers").unwrap().as_array().unwrap().len() == 2);
        assert!(json.get("rules").unwrap().as_array().unwrap().len() == 1);
    }

    #[test]
    fn statements_round_trip_through_serde() {
        let stmt = Statement::phosphorylation(
            Some(Agent::new("BRAF").grounded("UP", "P15056")),
            Agent::new("MEK1"),
            Some("serine"),
            Some("222"),
        );
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(stmt, back);
    }
}
