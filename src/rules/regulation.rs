//! Rule generators for qualitative regulation: activation/inhibition of an
//! activity site, and the Gef/Gap enzymatic regulators of GTP-bound state.

use std::collections::BTreeMap;

use crate::engine::canon::canonicalize;
use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{agent_rule_str, binding_site, initial};
use crate::model::{RateLaw, RuleSpec, SiteCondition};
use crate::rules::helpers::{
    BondTracker, BuildCtx, bind_patterns, bound_complex, complex_pattern, no_extra,
};
use crate::statement::{Agent, Statement, StatementBody};

/// Site name for the GTP-loading state Gef/Gap statements regulate.
const GTP_SITE: &str = "gtpbound";

struct RegParts<'a> {
    subj: &'a Agent,
    obj: &'a Agent,
    site: String,
    verb: &'static str,
    /// (reactant state, product state) of the regulated site.
    from_to: (&'static str, &'static str),
}

fn parts(stmt: &Statement) -> Option<RegParts<'_>> {
    match &stmt.body {
        StatementBody::RegulateActivity { subj, obj, activity, is_activation } => {
            let subj = subj.as_ref()?;
            let (verb, from_to) = if *is_activation {
                ("activates", ("inactive", "active"))
            } else {
                ("deactivates", ("active", "inactive"))
            };
            Some(RegParts { subj, obj, site: activity.clone(), verb, from_to })
        }
        StatementBody::Gef { gef, ras } => Some(RegParts {
            subj: gef.as_ref()?,
            obj: ras,
            site: GTP_SITE.to_string(),
            verb: "activates",
            from_to: ("inactive", "active"),
        }),
        StatementBody::Gap { gap, ras } => Some(RegParts {
            subj: gap.as_ref()?,
            obj: ras,
            site: GTP_SITE.to_string(),
            verb: "deactivates",
            from_to: ("active", "inactive"),
        }),
        _ => None,
    }
}

// --- Monomer contributions ---------------------------------------------------

pub(crate) fn monomers_one_step(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    vocab.add_agent(p.subj);
    vocab.add_agent(p.obj);
    vocab.add_site(&p.obj.name, &p.site, &["inactive", "active"]);
}

pub(crate) fn monomers_two_step(stmt: &Statement, policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    monomers_one_step(stmt, policy, vocab);
    vocab.add_binding_pair(p.subj, p.obj);
}

pub(crate) fn monomers_interactions_only(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    vocab.add_agent(p.subj);
    vocab.add_agent(p.obj);
    vocab.add_binding_pair(p.subj, p.obj);
}

// --- Rule generation ---------------------------------------------------------

fn flip_rule_name(p: &RegParts<'_>) -> String {
    format!("{}_{}_{}_{}", agent_rule_str(p.subj), p.verb, agent_rule_str(p.obj), p.site)
}

fn flip_patterns(p: &RegParts<'_>) -> (Vec<crate::model::ComplexPattern>, Vec<crate::model::ComplexPattern>) {
    let (from, to) = p.from_to;
    let mut reactant_bonds = BondTracker::new();
    let subj_reactant = complex_pattern(p.subj, &mut reactant_bonds, &no_extra());
    let obj_reactant = complex_pattern(
        p.obj,
        &mut reactant_bonds,
        &BTreeMap::from([(p.site.clone(), SiteCondition::state(from))]),
    );
    let mut product_bonds = BondTracker::new();
    let subj_product = complex_pattern(p.subj, &mut product_bonds, &no_extra());
    let obj_product = complex_pattern(
        p.obj,
        &mut product_bonds,
        &BTreeMap::from([(p.site.clone(), SiteCondition::state(to))]),
    );
    (vec![subj_reactant, obj_reactant], vec![subj_product, obj_product])
}

/// Single rule flipping the object's regulated site; the subject appears
/// unchanged on both sides.
pub(crate) fn assemble_one_step(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let kf = ctx.param("kf", format!("kf_{}{}_{}", initial(p.subj), initial(p.obj), p.verb), 1e-6);
    let (reactants, products) = flip_patterns(&p);
    let subject = p.subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec { name: flip_rule_name(&p), reactants, products, rate: RateLaw::Param(kf) },
        Some(&subject),
        Some(&object),
    );
}

/// Bind, flip/release, dissociate, mirroring the two-step modification
/// topology.
pub(crate) fn assemble_two_step(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let (from, to) = p.from_to;
    let subj_str = agent_rule_str(p.subj);
    let obj_str = agent_rule_str(p.obj);
    let obj_from = BTreeMap::from([(p.site.clone(), SiteCondition::state(from))]);

    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(p.subj), initial(p.obj)), 1e-6);
    let (bind_reactants, bind_products) = bind_patterns(p.subj, &no_extra(), p.obj, &obj_from);
    ctx.add_plain_rule(RuleSpec {
        name: format!("{subj_str}_{}_bind_{obj_str}_{}", p.verb, p.site),
        reactants: bind_reactants,
        products: bind_products,
        rate: RateLaw::Param(kf),
    });

    let kc = ctx.param("kc", format!("kc_{}{}_{}", initial(p.subj), initial(p.obj), p.verb), 1e2);
    let mut product_bonds = BondTracker::new();
    let subj_free = complex_pattern(
        p.subj,
        &mut product_bonds,
        &BTreeMap::from([(binding_site(&p.obj.name), SiteCondition::Unbound)]),
    );
    let obj_released = complex_pattern(
        p.obj,
        &mut product_bonds,
        &BTreeMap::from([
            (p.site.clone(), SiteCondition::state(to)),
            (binding_site(&p.subj.name), SiteCondition::Unbound),
        ]),
    );
    let subject = p.subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{subj_str}_{}_{obj_str}_{}", p.verb, p.site),
            reactants: bound_complex(p.subj, &no_extra(), p.obj, &obj_from),
            products: vec![subj_free, obj_released],
            rate: RateLaw::Param(kc),
        },
        Some(&subject),
        Some(&object),
    );

    let kr = ctx.param("kr", format!("kr_{}{}_bind", initial(p.subj), initial(p.obj)), 1e-1);
    let mut out_bonds = BondTracker::new();
    let subj_out = complex_pattern(
        p.subj,
        &mut out_bonds,
        &BTreeMap::from([(binding_site(&p.obj.name), SiteCondition::Unbound)]),
    );
    let obj_out = complex_pattern(
        p.obj,
        &mut out_bonds,
        &BTreeMap::from([(binding_site(&p.subj.name), SiteCondition::Unbound)]),
    );
    ctx.add_plain_rule(RuleSpec {
        name: format!("{}_dissoc_{}", canonicalize(&p.subj.name), canonicalize(&p.obj.name)),
        reactants: bound_complex(p.subj, &no_extra(), p.obj, &no_extra()),
        products: vec![subj_out, obj_out],
        rate: RateLaw::Param(kr),
    });
}

/// Binding rule only.
pub(crate) fn assemble_interactions_only(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(p.subj), initial(p.obj)), 1e-6);
    let (reactants, products) = bind_patterns(p.subj, &no_extra(), p.obj, &no_extra());
    let subject = p.subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{}_{}_bind_{}", agent_rule_str(p.subj), p.verb, agent_rule_str(p.obj)),
            reactants,
            products,
            rate: RateLaw::Param(kf),
        },
        Some(&subject),
        Some(&object),
    );
}

/// One-step-shaped rule with a saturating rate expression over the subject
/// total.
pub(crate) fn assemble_michaelis_menten(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let name = flip_rule_name(&p);
    let kc = ctx.param("kc", format!("kc_{}{}_{}", initial(p.subj), initial(p.obj), p.verb), 1e2);
    let km = ctx.param("Km", format!("Km_{}{}_{}", initial(p.subj), initial(p.obj), p.verb), 1e4);
    let subj_mono = canonicalize(&p.subj.name);
    let obj_mono = canonicalize(&p.obj.name);
    let rate_name = format!("{name}_rate");
    ctx.add_expression(rate_name.clone(), format!("{kc} * {subj_mono}_tot / ({km} + {obj_mono}_tot)"));
    let (reactants, products) = flip_patterns(&p);
    let subject = p.subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec { name, reactants, products, rate: RateLaw::Expr(rate_name) },
        Some(&subject),
        Some(&object),
    );
}
