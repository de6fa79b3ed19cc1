//! Rule generators for the modification statement family: single-substrate
//! add/remove modifications under the one-step, two-step, interactions-only,
//! ATP-dependent, and Michaelis–Menten strategies, plus the self- and
//! cross-modification variants.

use std::collections::BTreeMap;

use crate::engine::canon::canonicalize;
use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{agent_rule_str, binding_site, initial, mod_site_name};
use crate::model::{MonomerPattern, RateLaw, RuleSpec, SiteCondition};
use crate::rules::helpers::{
    BondTracker, BuildCtx, bind_patterns, bound_complex, complex_pattern, no_extra,
};
use crate::statement::{Agent, ModCondition, ModKind, Statement, StatementBody};

struct ModParts<'a> {
    enz: &'a Agent,
    sub: &'a Agent,
    condition: ModCondition,
    verb: String,
    is_removal: bool,
}

fn parts(stmt: &Statement) -> Option<ModParts<'_>> {
    match &stmt.body {
        StatementBody::Modification(m) => {
            let enz = m.enz.as_ref()?;
            let condition = ModCondition::on(m.kind, m.residue.as_deref(), m.position.as_deref());
            let verb = if m.is_removal {
                format!("de{}", m.kind.verb())
            } else {
                m.kind.verb().to_string()
            };
            Some(ModParts { enz, sub: &m.sub, condition, verb, is_removal: m.is_removal })
        }
        _ => None,
    }
}

/// (reactant state, product state) of the target site.
fn transition(parts: &ModParts<'_>) -> (&'static str, &'static str) {
    let (unmodified, modified) = parts.condition.kind.states();
    if parts.is_removal { (modified, unmodified) } else { (unmodified, modified) }
}

// --- Monomer contributions ---------------------------------------------------

pub(crate) fn monomers_one_step(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    vocab.add_agent(p.enz);
    vocab.add_agent(p.sub);
    vocab.add_mod_site(&p.sub.name, &p.condition);
}

pub(crate) fn monomers_two_step(stmt: &Statement, policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    monomers_one_step(stmt, policy, vocab);
    vocab.add_binding_pair(p.enz, p.sub);
}

pub(crate) fn monomers_atp_dependent(stmt: &Statement, policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    monomers_two_step(stmt, policy, vocab);
    vocab.add_binding_pair(p.enz, &Agent::new("ATP"));
}

// --- Rule generation ---------------------------------------------------------

/// One directional rule; the enzyme is unconstrained by the product.
pub(crate) fn assemble_one_step(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let site = mod_site_name(&p.condition);
    let (from, to) = transition(&p);
    let name = format!("{}_{}_{}_{site}", agent_rule_str(p.enz), p.verb, agent_rule_str(p.sub));
    let kf = ctx.param("kf", format!("kf_{}{}_{}", initial(p.enz), initial(p.sub), p.verb), 1e-6);

    let mut reactant_bonds = BondTracker::new();
    let enz_reactant = complex_pattern(p.enz, &mut reactant_bonds, &no_extra());
    let sub_reactant = complex_pattern(
        p.sub,
        &mut reactant_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state(from))]),
    );
    let mut product_bonds = BondTracker::new();
    let enz_product = complex_pattern(p.enz, &mut product_bonds, &no_extra());
    let sub_product = complex_pattern(
        p.sub,
        &mut product_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state(to))]),
    );

    let subject = p.enz.name.clone();
    let object = p.sub.name.clone();
    ctx.add_rule(
        RuleSpec {
            name,
            reactants: vec![enz_reactant, sub_reactant],
            products: vec![enz_product, sub_product],
            rate: RateLaw::Param(kf),
        },
        Some(&subject),
        Some(&object),
    );
}

/// Bind, catalyze/release, dissociate: three rules. The dissociation rule is
/// named from the bare agent names and is shared between statements about
/// the same enzyme/substrate pair.
pub(crate) fn assemble_two_step(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let site = mod_site_name(&p.condition);
    let (from, to) = transition(&p);
    let enz_str = agent_rule_str(p.enz);
    let sub_str = agent_rule_str(p.sub);
    let sub_from = BTreeMap::from([(site.clone(), SiteCondition::state(from))]);

    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(p.enz), initial(p.sub)), 1e-6);
    let (bind_reactants, bind_products) = bind_patterns(p.enz, &no_extra(), p.sub, &sub_from);
    ctx.add_plain_rule(RuleSpec {
        name: format!("{enz_str}_{}_bind_{sub_str}_{site}", p.verb),
        reactants: bind_reactants,
        products: bind_products,
        rate: RateLaw::Param(kf),
    });

    let kc = ctx.param("kc", format!("kc_{}{}_{}", initial(p.enz), initial(p.sub), p.verb), 1e2);
    let mut product_bonds = BondTracker::new();
    let enz_free = complex_pattern(
        p.enz,
        &mut product_bonds,
        &BTreeMap::from([(binding_site(&p.sub.name), SiteCondition::Unbound)]),
    );
    let sub_released = complex_pattern(
        p.sub,
        &mut product_bonds,
        &BTreeMap::from([
            (site.clone(), SiteCondition::state(to)),
            (binding_site(&p.enz.name), SiteCondition::Unbound),
        ]),
    );
    let subject = p.enz.name.clone();
    let object = p.sub.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{enz_str}_{}_{sub_str}_{site}", p.verb),
            reactants: bound_complex(p.enz, &no_extra(), p.sub, &sub_from),
            products: vec![enz_free, sub_released],
            rate: RateLaw::Param(kc),
        },
        Some(&subject),
        Some(&object),
    );

    let kr = ctx.param("kr", format!("kr_{}{}_bind", initial(p.enz), initial(p.sub)), 1e-1);
    let mut dissoc_bonds = BondTracker::new();
    let enz_out = complex_pattern(
        p.enz,
        &mut dissoc_bonds,
        &BTreeMap::from([(binding_site(&p.sub.name), SiteCondition::Unbound)]),
    );
    let sub_out = complex_pattern(
        p.sub,
        &mut dissoc_bonds,
        &BTreeMap::from([(binding_site(&p.enz.name), SiteCondition::Unbound)]),
    );
    ctx.add_plain_rule(RuleSpec {
        name: format!("{}_dissoc_{}", canonicalize(&p.enz.name), canonicalize(&p.sub.name)),
        reactants: bound_complex(p.enz, &no_extra(), p.sub, &no_extra()),
        products: vec![enz_out, sub_out],
        rate: RateLaw::Param(kr),
    });
}

/// Binding rule only; used when just the interaction, not the mechanism, is
/// asserted.
pub(crate) fn assemble_interactions_only(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let enz_str = agent_rule_str(p.enz);
    let sub_str = agent_rule_str(p.sub);
    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(p.enz), initial(p.sub)), 1e-6);
    let (reactants, products) = bind_patterns(p.enz, &no_extra(), p.sub, &no_extra());
    let subject = p.enz.name.clone();
    let object = p.sub.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{enz_str}_{}_bind_{sub_str}", p.verb),
            reactants,
            products,
            rate: RateLaw::Param(kf),
        },
        Some(&subject),
        Some(&object),
    );
}

/// Five rules: ATP binding and release, substrate binding and release, and
/// catalysis requiring the ATP-loaded enzyme. The topology is fixed by the
/// strategy, not by the statement.
pub(crate) fn assemble_atp_dependent(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let site = mod_site_name(&p.condition);
    let (from, to) = transition(&p);
    let atp = Agent::new("ATP");
    let enz_str = agent_rule_str(p.enz);
    let sub_str = agent_rule_str(p.sub);
    let enz_base = canonicalize(&p.enz.name);
    let sub_base = canonicalize(&p.sub.name);

    let kf_atp = ctx.param("kf_atp", format!("kf_{}_atp_bind", initial(p.enz)), 1e-6);
    let (atp_reactants, atp_products) = bind_patterns(p.enz, &no_extra(), &atp, &no_extra());
    ctx.add_plain_rule(RuleSpec {
        name: format!("{enz_base}_ATP_bind"),
        reactants: atp_reactants.clone(),
        products: atp_products.clone(),
        rate: RateLaw::Param(kf_atp),
    });
    let kr_atp = ctx.param("kr_atp", format!("kr_{}_atp_bind", initial(p.enz)), 1e-1);
    ctx.add_plain_rule(RuleSpec {
        name: format!("{enz_base}_ATP_dissociate"),
        reactants: atp_products,
        products: atp_reactants,
        rate: RateLaw::Param(kr_atp),
    });

    let sub_from = BTreeMap::from([(site.clone(), SiteCondition::state(from))]);
    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(p.enz), initial(p.sub)), 1e-6);
    let (bind_reactants, bind_products) = bind_patterns(p.enz, &no_extra(), p.sub, &sub_from);
    ctx.add_plain_rule(RuleSpec {
        name: format!("{enz_str}_{}_bind_{sub_str}_{site}", p.verb),
        reactants: bind_reactants,
        products: bind_products,
        rate: RateLaw::Param(kf),
    });
    let kr = ctx.param("kr", format!("kr_{}{}_bind", initial(p.enz), initial(p.sub)), 1e-1);
    let mut out_bonds = BondTracker::new();
    let enz_out = complex_pattern(
        p.enz,
        &mut out_bonds,
        &BTreeMap::from([(binding_site(&p.sub.name), SiteCondition::Unbound)]),
    );
    let sub_out = complex_pattern(
        p.sub,
        &mut out_bonds,
        &BTreeMap::from([(binding_site(&p.enz.name), SiteCondition::Unbound)]),
    );
    ctx.add_plain_rule(RuleSpec {
        name: format!("{enz_base}_dissoc_{sub_base}"),
        reactants: bound_complex(p.enz, &no_extra(), p.sub, &no_extra()),
        products: vec![enz_out, sub_out],
        rate: RateLaw::Param(kr),
    });

    // Catalysis: enzyme loaded with ATP and bound to the substrate releases
    // the modified substrate, keeping ATP bound.
    let kc = ctx.param("kc", format!("kc_{}{}_{}", initial(p.enz), initial(p.sub), p.verb), 1e2);
    let mut cat_bonds = BondTracker::new();
    let mut enz_loaded = complex_pattern(p.enz, &mut cat_bonds, &no_extra());
    let atp_bond = cat_bonds.fresh();
    let sub_bond = cat_bonds.fresh();
    enz_loaded.monomers[0].site_conditions.insert("atp".to_string(), SiteCondition::Bond(atp_bond));
    enz_loaded
        .monomers
        .push(MonomerPattern::new("ATP").with(&binding_site(&p.enz.name), SiteCondition::Bond(atp_bond)));
    enz_loaded
        .monomers[0]
        .site_conditions
        .insert(binding_site(&p.sub.name), SiteCondition::Bond(sub_bond));
    let mut sub_in = complex_pattern(
        p.sub,
        &mut cat_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state(from))]),
    );
    sub_in.monomers[0].site_conditions.insert(binding_site(&p.enz.name), SiteCondition::Bond(sub_bond));
    enz_loaded.monomers.extend(sub_in.monomers);

    let mut rel_bonds = BondTracker::new();
    let mut enz_after = complex_pattern(
        p.enz,
        &mut rel_bonds,
        &BTreeMap::from([(binding_site(&p.sub.name), SiteCondition::Unbound)]),
    );
    let atp_bond = rel_bonds.fresh();
    enz_after.monomers[0].site_conditions.insert("atp".to_string(), SiteCondition::Bond(atp_bond));
    enz_after
        .monomers
        .push(MonomerPattern::new("ATP").with(&binding_site(&p.enz.name), SiteCondition::Bond(atp_bond)));
    let sub_released = complex_pattern(
        p.sub,
        &mut rel_bonds,
        &BTreeMap::from([
            (site.clone(), SiteCondition::state(to)),
            (binding_site(&p.enz.name), SiteCondition::Unbound),
        ]),
    );
    let subject = p.enz.name.clone();
    let object = p.sub.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{enz_str}_{}_{sub_str}_{site}", p.verb),
            reactants: vec![enz_loaded],
            products: vec![enz_after, sub_released],
            rate: RateLaw::Param(kc),
        },
        Some(&subject),
        Some(&object),
    );
}

/// One-step-shaped rule whose rate is a saturating expression over the
/// enzyme and substrate totals rather than a mass-action parameter.
pub(crate) fn assemble_michaelis_menten(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let site = mod_site_name(&p.condition);
    let (from, to) = transition(&p);
    let name = format!("{}_{}_{}_{site}", agent_rule_str(p.enz), p.verb, agent_rule_str(p.sub));
    let kc = ctx.param("kc", format!("kc_{}{}_{}", initial(p.enz), initial(p.sub), p.verb), 1e2);
    let km = ctx.param("Km", format!("Km_{}{}_{}", initial(p.enz), initial(p.sub), p.verb), 1e4);
    let enz_mono = canonicalize(&p.enz.name);
    let sub_mono = canonicalize(&p.sub.name);
    let rate_name = format!("{name}_rate");
    ctx.add_expression(rate_name.clone(), format!("{kc} * {enz_mono}_tot / ({km} + {sub_mono}_tot)"));

    let mut reactant_bonds = BondTracker::new();
    let enz_reactant = complex_pattern(p.enz, &mut reactant_bonds, &no_extra());
    let sub_reactant = complex_pattern(
        p.sub,
        &mut reactant_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state(from))]),
    );
    let mut product_bonds = BondTracker::new();
    let enz_product = complex_pattern(p.enz, &mut product_bonds, &no_extra());
    let sub_product = complex_pattern(
        p.sub,
        &mut product_bonds,
        &BTreeMap::from([(site, SiteCondition::state(to))]),
    );
    let subject = p.enz.name.clone();
    let object = p.sub.name.clone();
    ctx.add_rule(
        RuleSpec {
            name,
            reactants: vec![enz_reactant, sub_reactant],
            products: vec![enz_product, sub_product],
            rate: RateLaw::Expr(rate_name),
        },
        Some(&subject),
        Some(&object),
    );
}

// --- Self- and cross-modification --------------------------------------------

fn self_mod_parts(stmt: &Statement) -> Option<(&Agent, ModCondition)> {
    match &stmt.body {
        StatementBody::Autophosphorylation { enz, residue, position }
        | StatementBody::Transphosphorylation { enz, residue, position } => {
            let enz = enz.as_ref()?;
            Some((enz, ModCondition::on(ModKind::Phosphorylation, residue.as_deref(), position.as_deref())))
        }
        _ => None,
    }
}

pub(crate) fn monomers_autophosphorylation(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some((enz, condition)) = self_mod_parts(stmt) else { return };
    vocab.add_agent(enz);
    vocab.add_mod_site(&enz.name, &condition);
}

pub(crate) fn monomers_transphosphorylation(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some((enz, condition)) = self_mod_parts(stmt) else { return };
    vocab.add_agent(enz);
    let Some(bc) = enz.bound_conditions.first() else { return };
    vocab.add_mod_site(&bc.agent.name, &condition);
}

/// The enzyme phosphorylates itself; its other conditions (typically a bound
/// partner) are carried through unchanged.
pub(crate) fn assemble_autophosphorylation(ctx: &mut BuildCtx<'_>) {
    let Some((enz, condition)) = self_mod_parts(ctx.stmt) else { return };
    let site = mod_site_name(&condition);
    let enz_str = agent_rule_str(enz);
    let kf = ctx.param("kf", format!("kf_{}_autophos", initial(enz)), 1e-6);
    let mut reactant_bonds = BondTracker::new();
    let reactant = complex_pattern(
        enz,
        &mut reactant_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state("u"))]),
    );
    let mut product_bonds = BondTracker::new();
    let product = complex_pattern(
        enz,
        &mut product_bonds,
        &BTreeMap::from([(site.clone(), SiteCondition::state("p"))]),
    );
    let actor = enz.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{enz_str}_autophosphorylation_{site}"),
            reactants: vec![reactant],
            products: vec![product],
            rate: RateLaw::Param(kf),
        },
        Some(&actor),
        Some(&actor),
    );
}

/// The enzyme phosphorylates the partner it is bound to; the complex stays
/// intact across the transformation.
pub(crate) fn assemble_transphosphorylation(ctx: &mut BuildCtx<'_>) {
    let Some((enz, condition)) = self_mod_parts(ctx.stmt) else { return };
    let Some(bc) = enz.bound_conditions.first() else { return };
    let partner = &bc.agent;
    let site = mod_site_name(&condition);
    let partner_mono = canonicalize(&partner.name);
    let enz_str = agent_rule_str(enz);
    let kf = ctx.param("kf", format!("kf_{}_transphos", initial(enz)), 1e-6);

    let side = |state: &str| {
        let mut bonds = BondTracker::new();
        let mut pat = complex_pattern(enz, &mut bonds, &no_extra());
        // Skip the enzyme's own pattern: the partner can share its name
        // (receptor dimers).
        if let Some(mp) = pat.monomers.iter_mut().skip(1).find(|m| m.monomer == partner_mono) {
            mp.site_conditions.insert(site.clone(), SiteCondition::state(state));
        }
        pat
    };
    let subject = enz.name.clone();
    let object = partner.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{enz_str}_transphosphorylation_{site}"),
            reactants: vec![side("u")],
            products: vec![side("p")],
            rate: RateLaw::Param(kf),
        },
        Some(&subject),
        Some(&object),
    );
}
