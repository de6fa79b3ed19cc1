//! Shared machinery for the rule generator families: pattern construction
//! from agents, bond bookkeeping, and the build context generators write
//! rules, parameters, and annotations through.

use std::collections::BTreeMap;

use crate::engine::annotations;
use crate::engine::canon::canonicalize;
use crate::engine::policy::Policy;
use crate::engine::sites::{LOCATION_SITE, binding_site, location_state, mod_site_name, mutation_site};
use crate::model::{ComplexPattern, Expression, Model, MonomerPattern, RuleSpec, SiteCondition};
use crate::statement::{Agent, Statement};

// --- Bond numbering ----------------------------------------------------------

/// Sequential bond numbers, unique within one side of one rule.
#[derive(Debug, Default)]
pub(crate) struct BondTracker {
    next: u32,
}

impl BondTracker {
    pub fn new() -> Self {
        BondTracker { next: 0 }
    }

    pub fn fresh(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

// --- Pattern construction ----------------------------------------------------

/// Build the complex pattern an agent's own conditions describe: the agent's
/// monomer pattern plus one bonded partner pattern per positive bound
/// condition. `extra` site conditions are applied on top (generators use
/// this for the transformed site).
pub(crate) fn complex_pattern(
    agent: &Agent,
    bonds: &mut BondTracker,
    extra: &BTreeMap<String, SiteCondition>,
) -> ComplexPattern {
    let mut main = MonomerPattern::new(&canonicalize(&agent.name));
    let mut partners = Vec::new();
    for bc in &agent.bound_conditions {
        let site = binding_site(&bc.agent.name);
        if bc.is_bound {
            let bond = bonds.fresh();
            main.site_conditions.insert(site, SiteCondition::Bond(bond));
            partners.push(
                MonomerPattern::new(&canonicalize(&bc.agent.name))
                    .with(&binding_site(&agent.name), SiteCondition::Bond(bond)),
            );
        } else {
            main.site_conditions.insert(site, SiteCondition::Unbound);
        }
    }
    for mc in &agent.mods {
        let (unmodified, modified) = mc.kind.states();
        let state = if mc.is_modified { modified } else { unmodified };
        main.site_conditions.insert(mod_site_name(mc), SiteCondition::state(state));
    }
    for mc in &agent.mutations {
        let (site, state) = mutation_site(mc);
        main.site_conditions.insert(site, SiteCondition::State(state));
    }
    if let Some(act) = &agent.activity {
        let state = if act.is_active { "active" } else { "inactive" };
        main.site_conditions.insert(act.label.clone(), SiteCondition::state(state));
    }
    if let Some(loc) = &agent.location {
        main.site_conditions.insert(LOCATION_SITE.to_string(), SiteCondition::State(location_state(loc)));
    }
    for (site, condition) in extra {
        main.site_conditions.insert(site.clone(), condition.clone());
    }
    let mut monomers = vec![main];
    monomers.extend(partners);
    ComplexPattern { monomers }
}

/// Reactant and product patterns for binding `a` to `b` through their
/// mutual binding sites. Returns `([a, b], [a % b])`; extra conditions apply
/// to the respective agent's monomer pattern on both sides.
pub(crate) fn bind_patterns(
    a: &Agent,
    a_extra: &BTreeMap<String, SiteCondition>,
    b: &Agent,
    b_extra: &BTreeMap<String, SiteCondition>,
) -> (Vec<ComplexPattern>, Vec<ComplexPattern>) {
    let site_on_a = binding_site(&b.name);
    let site_on_b = binding_site(&a.name);

    let mut reactant_bonds = BondTracker::new();
    let mut a_free = a_extra.clone();
    a_free.insert(site_on_a.clone(), SiteCondition::Unbound);
    let mut b_free = b_extra.clone();
    b_free.insert(site_on_b.clone(), SiteCondition::Unbound);
    let reactants = vec![
        complex_pattern(a, &mut reactant_bonds, &a_free),
        complex_pattern(b, &mut reactant_bonds, &b_free),
    ];

    let mut product_bonds = BondTracker::new();
    let mut a_pat = complex_pattern(a, &mut product_bonds, a_extra);
    let b_pat = complex_pattern(b, &mut product_bonds, b_extra);
    let bond = product_bonds.fresh();
    a_pat.monomers[0].site_conditions.insert(site_on_a, SiteCondition::Bond(bond));
    let mut joined = a_pat;
    let mut b_monomers = b_pat.monomers;
    b_monomers[0].site_conditions.insert(site_on_b, SiteCondition::Bond(bond));
    joined.monomers.extend(b_monomers);
    let products = vec![joined];

    (reactants, products)
}

/// The bound `a % b` complex as a single reactant pattern, for dissociation
/// and catalysis rules.
pub(crate) fn bound_complex(
    a: &Agent,
    a_extra: &BTreeMap<String, SiteCondition>,
    b: &Agent,
    b_extra: &BTreeMap<String, SiteCondition>,
) -> Vec<ComplexPattern> {
    let (_, products) = bind_patterns(a, a_extra, b, b_extra);
    products
}

/// No extra site conditions.
pub(crate) fn no_extra() -> BTreeMap<String, SiteCondition> {
    BTreeMap::new()
}

// --- Build context -----------------------------------------------------------

/// Per-statement view of the model under construction, handed to each rule
/// generator. Parameter creation honors the statement's policy overrides and
/// deduplicates by name; rule insertion deduplicates by rule name and emits
/// provenance annotations for rules that actually land.
pub(crate) struct BuildCtx<'a> {
    pub model: &'a mut Model,
    pub policy: &'a Policy,
    pub stmt: &'a Statement,
    pub debug: bool,
}

impl BuildCtx<'_> {
    /// Create (or reuse) the parameter filling `role`, honoring a policy
    /// override of name and value. Returns the parameter name to cite in a
    /// rate law.
    pub fn param(&mut self, role: &str, default_name: String, default_value: f64) -> String {
        let (name, value) = match self.policy.override_for(role) {
            Some(p) => (p.name.clone(), p.value),
            None => (default_name, default_value),
        };
        self.model.ensure_parameter(name, value)
    }

    /// Add a rule with subject/object provenance. Returns false when a rule
    /// of the same name already exists (identical transformation), in which
    /// case the rule and its annotations are dropped.
    pub fn add_rule(&mut self, rule: RuleSpec, subject: Option<&str>, object: Option<&str>) -> bool {
        if self.model.has_rule(&rule.name) {
            if self.debug {
                eprintln!("[rules] duplicate rule name skipped: {}", rule.name);
            }
            return false;
        }
        self.model.annotations.extend(annotations::rule_provenance(
            &rule.name,
            &self.stmt.id,
            subject,
            object,
        ));
        if self.debug {
            eprintln!("[rules] + {}", rule.name);
        }
        self.model.rules.push(rule);
        true
    }

    /// Add a rule that carries statement provenance but no subject/object
    /// roles (binding legs of multi-rule strategies, complex-formation
    /// rules).
    pub fn add_plain_rule(&mut self, rule: RuleSpec) -> bool {
        self.add_rule(rule, None, None)
    }

    pub fn add_expression(&mut self, name: String, formula: String) {
        if self.model.expression(&name).is_none() {
            self.model.expressions.push(Expression { name, formula });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RateLaw;
    use crate::statement::{ModCondition, ModKind};

    #[test]
    fn complex_pattern_reflects_conditions() {
        let agent = Agent::new("BRAF")
            .bound_to(Agent::new("HRAS"), true)
            .modified(ModCondition::on(ModKind::Phosphorylation, Some("S"), Some("365")).negated());
        let mut bonds = BondTracker::new();
        let pat = complex_pattern(&agent, &mut bonds, &no_extra());
        assert_eq!(pat.monomers.len(), 2);
        let braf = &pat.monomers[0];
        assert_eq!(braf.site_conditions.get("hras"), Some(&SiteCondition::Bond(1)));
        assert_eq!(braf.site_conditions.get("S365"), Some(&SiteCondition::state("u")));
        let hras = &pat.monomers[1];
        assert_eq!(hras.site_conditions.get("braf"), Some(&SiteCondition::Bond(1)));
    }

    #[test]
    fn bind_patterns_join_through_mutual_sites() {
        let a = Agent::new("BRAF");
        let b = Agent::new("MEK1");
        let (reactants, products) = bind_patterns(&a, &no_extra(), &b, &no_extra());
        assert_eq!(reactants.len(), 2);
        assert_eq!(reactants[0].monomers[0].site_conditions.get("mek1"), Some(&SiteCondition::Unbound));
        assert_eq!(products.len(), 1);
        let joined = &products[0];
        assert_eq!(joined.monomers.len(), 2);
        assert_eq!(joined.monomers[0].site_conditions.get("mek1"), Some(&SiteCondition::Bond(1)));
        assert_eq!(joined.monomers[1].site_conditions.get("braf"), Some(&SiteCondition::Bond(1)));
    }

    #[test]
    fn build_ctx_deduplicates_rules_and_parameters() {
        let mut model = Model::default();
        let policy = Policy::default();
        let stmt = Statement::complex(vec![Agent::new("a"), Agent::new("b")]);
        let mut ctx = BuildCtx { model: &mut model, policy: &policy, stmt: &stmt, debug: false };

        let name = ctx.param("kf", "kf_ab_bind".to_string(), 1e-6);
        assert_eq!(name, "kf_ab_bind");
        ctx.param("kf", "kf_ab_bind".to_string(), 2.0);
        assert_eq!(ctx.model.parameters.len(), 1);

        let rule = RuleSpec {
            name: "a_b_bind".to_string(),
            reactants: vec![],
            products: vec![],
            rate: RateLaw::Param(name),
        };
        assert!(ctx.add_plain_rule(rule.clone()));
        assert!(!ctx.add_plain_rule(rule));
        assert_eq!(ctx.model.rules.len(), 1);
        // One from_statement annotation for the rule that landed.
        assert_eq!(ctx.model.annotations.len(), 1);
    }

    #[test]
    fn policy_overrides_rename_parameters() {
        let mut model = Model::default();
        let policy = Policy::default().with_parameter("kf", crate::engine::policy::Param::new("my_kf", 0.99));
        let stmt = Statement::complex(vec![Agent::new("a"), Agent::new("b")]);
        let mut ctx = BuildCtx { model: &mut model, policy: &policy, stmt: &stmt, debug: false };
        let name = ctx.param("kf", "kf_ab_bind".to_string(), 1e-6);
        assert_eq!(name, "my_kf");
        assert_eq!(ctx.model.parameter("my_kf").unwrap().value, 0.99);
    }
}
