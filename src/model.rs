//! Compiled-model representation.
//!
//! The assembler's output: typed monomers with stateful sites, rules over
//! monomer patterns, rate parameters and expressions, and annotations tying
//! the structural model back to statement provenance and external database
//! identities. This is the contract consumed by downstream exporters and
//! simulation adapters; nothing here performs simulation.

use std::collections::BTreeMap;

use serde::Serialize;

// --- Monomers ----------------------------------------------------------------

/// A structural entity with an ordered set of uniquely named sites.
///
/// Sites either carry a vocabulary of discrete states (modification,
/// mutation, activity, location sites) or none at all (pure binding sites).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monomer {
    pub name: String,
    /// Site names in first-discovery order.
    pub sites: Vec<String>,
    /// Discrete state vocabulary per site; binding sites are absent here.
    pub site_states: BTreeMap<String, Vec<String>>,
    /// Site-level annotations (modification semantics per site).
    pub site_annotations: Vec<SiteAnnotation>,
}

impl Monomer {
    pub fn states_for(&self, site: &str) -> Option<&[String]> {
        self.site_states.get(site).map(Vec::as_slice)
    }
}

// --- Patterns ----------------------------------------------------------------

/// A constraint on a single site within a pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SiteCondition {
    /// Site is in the given discrete state; bond status unconstrained.
    State(String),
    /// Binding site explicitly free.
    Unbound,
    /// Binding site engaged in the numbered bond.
    Bond(u32),
    /// Discrete state plus an engaged bond.
    StateBond(String, u32),
}

impl SiteCondition {
    pub fn state(s: &str) -> Self {
        SiteCondition::State(s.to_string())
    }
}

/// A monomer reference plus a partial assignment of site conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonomerPattern {
    pub monomer: String,
    pub site_conditions: BTreeMap<String, SiteCondition>,
}

impl MonomerPattern {
    pub fn new(monomer: &str) -> Self {
        MonomerPattern { monomer: monomer.to_string(), site_conditions: BTreeMap::new() }
    }

    pub fn with(mut self, site: &str, condition: SiteCondition) -> Self {
        self.site_conditions.insert(site.to_string(), condition);
        self
    }
}

/// One or more monomer patterns connected by bonds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexPattern {
    pub monomers: Vec<MonomerPattern>,
}

impl ComplexPattern {
    pub fn single(mp: MonomerPattern) -> Self {
        ComplexPattern { monomers: vec![mp] }
    }
}

// --- Rules, parameters, expressions -------------------------------------------

/// Rate specification for a rule: a named mass-action parameter or a named
/// expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RateLaw {
    Param(String),
    Expr(String),
}

/// A directional transformation between reactant and product patterns.
///
/// Reversible processes are expressed as explicit forward/reverse rule
/// pairs, consistently across all generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSpec {
    pub name: String,
    pub reactants: Vec<ComplexPattern>,
    pub products: Vec<ComplexPattern>,
    pub rate: RateLaw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
}

/// A named non-linear rate formula over parameters and species totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub name: String,
    pub formula: String,
}

// --- Annotations ---------------------------------------------------------------

/// A (subject, object, predicate) triple attached to a monomer or rule.
///
/// Predicates in use: `is` (monomer identity), `rule_has_subject`,
/// `rule_has_object`, `from_statement`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub subject: String,
    pub object: String,
    pub predicate: String,
}

impl Annotation {
    pub fn new(subject: &str, object: &str, predicate: &str) -> Self {
        Annotation {
            subject: subject.to_string(),
            object: object.to_string(),
            predicate: predicate.to_string(),
        }
    }
}

/// An annotation whose subject is a site (optionally a site+state pair) on
/// the owning monomer. Predicates in use: `is_modification`, `is_residue`,
/// `is_position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteAnnotation {
    pub site: String,
    pub state: Option<String>,
    pub object: String,
    pub predicate: String,
}

/// One concrete mechanistic route to an abstract activity state: the site
/// conditions an active-form assertion declared for a monomer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFormEntry {
    pub monomer: String,
    pub activity: String,
    pub is_active: bool,
    pub site_conditions: Vec<(String, String)>,
}

// --- Model ---------------------------------------------------------------------

/// Reverse-lookup index from external identity URLs to candidate monomers.
///
/// Built once after compilation so grounded queries do not scan the
/// annotation list per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundingIndex {
    pub(crate) by_identity: BTreeMap<String, Vec<String>>,
}

impl GroundingIndex {
    pub(crate) fn build(annotations: &[Annotation]) -> Self {
        let mut by_identity: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for ann in annotations {
            if ann.predicate == "is" {
                let entry = by_identity.entry(ann.object.clone()).or_default();
                if !entry.contains(&ann.subject) {
                    entry.push(ann.subject.clone());
                }
            }
        }
        GroundingIndex { by_identity }
    }

    pub(crate) fn monomers_for(&self, identity: &str) -> &[String] {
        self.by_identity.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The aggregate compiled model. Rebuilt fresh on every top-level build;
/// never mutated incrementally from a prior build's rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    pub monomers: Vec<Monomer>,
    pub rules: Vec<RuleSpec>,
    pub parameters: Vec<Parameter>,
    pub expressions: Vec<Expression>,
    pub annotations: Vec<Annotation>,
    /// Registered active-form routes, used by grounded activity queries.
    pub active_forms: Vec<ActiveFormEntry>,
    #[serde(skip)]
    pub(crate) grounding: GroundingIndex,
}

impl Model {
    pub fn monomer(&self, name: &str) -> Option<&Monomer> {
        self.monomers.iter().find(|m| m.name == name)
    }

    pub fn rule(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }

    pub fn expression(&self, name: &str) -> Option<&Expression> {
        self.expressions.iter().find(|e| e.name == name)
    }

    /// Add a parameter unless one with the same name already exists; returns
    /// the parameter name either way.
    pub(crate) fn ensure_parameter(&mut self, name: String, value: f64) -> String {
        if self.parameter(&name).is_none() {
            self.parameters.push(Parameter { name: name.clone(), value });
        }
        name
    }

    pub(crate) fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }
}
