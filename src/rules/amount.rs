//! Rule generators for amount regulation: synthesis and degradation, bare
//! or catalyzed, with an optional Hill-type rate expression.

use crate::engine::canon::canonicalize;
use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{agent_rule_str, initial};
use crate::model::{RateLaw, RuleSpec};
use crate::rules::helpers::{BondTracker, BuildCtx, bind_patterns, complex_pattern, no_extra};
use crate::statement::{Agent, Statement, StatementBody};

struct AmountParts<'a> {
    subj: Option<&'a Agent>,
    obj: &'a Agent,
    is_increase: bool,
}

fn parts(stmt: &Statement) -> Option<AmountParts<'_>> {
    match &stmt.body {
        StatementBody::RegulateAmount { subj, obj, is_increase } => {
            Some(AmountParts { subj: subj.as_ref(), obj, is_increase: *is_increase })
        }
        _ => None,
    }
}

// --- Monomer contributions ---------------------------------------------------

pub(crate) fn monomers_one_step(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    if let Some(subj) = p.subj {
        vocab.add_agent(subj);
    }
    vocab.add_agent(p.obj);
}

pub(crate) fn monomers_interactions_only(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = parts(stmt) else { return };
    vocab.add_agent(p.obj);
    if let Some(subj) = p.subj {
        vocab.add_agent(subj);
        vocab.add_binding_pair(subj, p.obj);
    }
}

// --- Rule generation ---------------------------------------------------------

/// Catalyzed or bare synthesis/degradation. A subject-less statement emits a
/// rule with no reactant (synthesis) or no product (degradation) enzyme
/// pattern.
pub(crate) fn assemble_one_step(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let obj_str = agent_rule_str(p.obj);
    let mut bonds = BondTracker::new();
    let obj_pat = complex_pattern(p.obj, &mut bonds, &no_extra());

    match (p.subj, p.is_increase) {
        (Some(subj), true) => {
            let kf = ctx.param("kf", format!("kf_{}{}_produce", initial(subj), initial(p.obj)), 1e-6);
            let mut bonds = BondTracker::new();
            let subj_pat = complex_pattern(subj, &mut bonds, &no_extra());
            let subject = subj.name.clone();
            let object = p.obj.name.clone();
            ctx.add_rule(
                RuleSpec {
                    name: format!("{}_produces_{obj_str}", agent_rule_str(subj)),
                    reactants: vec![subj_pat.clone()],
                    products: vec![subj_pat, obj_pat],
                    rate: RateLaw::Param(kf),
                },
                Some(&subject),
                Some(&object),
            );
        }
        (Some(subj), false) => {
            let kf = ctx.param("kf", format!("kf_{}{}_degrade", initial(subj), initial(p.obj)), 1e-6);
            let mut bonds = BondTracker::new();
            let subj_pat = complex_pattern(subj, &mut bonds, &no_extra());
            let subject = subj.name.clone();
            let object = p.obj.name.clone();
            ctx.add_rule(
                RuleSpec {
                    name: format!("{}_degrades_{obj_str}", agent_rule_str(subj)),
                    reactants: vec![subj_pat.clone(), obj_pat],
                    products: vec![subj_pat],
                    rate: RateLaw::Param(kf),
                },
                Some(&subject),
                Some(&object),
            );
        }
        (None, true) => {
            let kf = ctx.param("kf", format!("kf_{}_synth", initial(p.obj)), 1e-2);
            let object = p.obj.name.clone();
            ctx.add_rule(
                RuleSpec {
                    name: format!("{obj_str}_synthesized"),
                    reactants: vec![],
                    products: vec![obj_pat],
                    rate: RateLaw::Param(kf),
                },
                None,
                Some(&object),
            );
        }
        (None, false) => {
            let kf = ctx.param("kf", format!("kf_{}_degrade", initial(p.obj)), 1e-2);
            let object = p.obj.name.clone();
            ctx.add_rule(
                RuleSpec {
                    name: format!("{obj_str}_degraded"),
                    reactants: vec![obj_pat],
                    products: vec![],
                    rate: RateLaw::Param(kf),
                },
                None,
                Some(&object),
            );
        }
    }
}

/// Binding rule between subject and object; a subject-less statement emits
/// nothing.
pub(crate) fn assemble_interactions_only(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let Some(subj) = p.subj else { return };
    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(subj), initial(p.obj)), 1e-6);
    let (reactants, products) = bind_patterns(subj, &no_extra(), p.obj, &no_extra());
    let subject = subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{}_interacts_{}", agent_rule_str(subj), agent_rule_str(p.obj)),
            reactants,
            products,
            rate: RateLaw::Param(kf),
        },
        Some(&subject),
        Some(&object),
    );
}

/// Hill-type regulation: the one-step rule shape with a cooperative rate
/// expression over the subject total. Falls back to the bare one-step rule
/// when the statement has no subject to saturate on.
pub(crate) fn assemble_hill(ctx: &mut BuildCtx<'_>) {
    let Some(p) = parts(ctx.stmt) else { return };
    let Some(subj) = p.subj else {
        assemble_one_step(ctx);
        return;
    };
    let obj_str = agent_rule_str(p.obj);
    let subj_str = agent_rule_str(subj);
    let verb = if p.is_increase { "produces" } else { "degrades" };
    let name = format!("{subj_str}_{verb}_{obj_str}");
    let k = ctx.param("k", format!("k_{}{}_{verb}", initial(subj), initial(p.obj)), 1e-6);
    let ka = ctx.param("Ka", format!("Ka_{}{}_{verb}", initial(subj), initial(p.obj)), 1e4);
    let n = ctx.param("n", format!("n_{}{}_{verb}", initial(subj), initial(p.obj)), 1.0);
    let subj_mono = canonicalize(&subj.name);
    let rate_name = format!("{name}_rate");
    ctx.add_expression(
        rate_name.clone(),
        format!("{k} * {subj_mono}_tot^{n} / ({ka}^{n} + {subj_mono}_tot^{n})"),
    );

    let mut bonds = BondTracker::new();
    let subj_pat = complex_pattern(subj, &mut bonds, &no_extra());
    let obj_pat = complex_pattern(p.obj, &mut bonds, &no_extra());
    let (reactants, products) = if p.is_increase {
        (vec![subj_pat.clone()], vec![subj_pat, obj_pat])
    } else {
        (vec![subj_pat.clone(), obj_pat], vec![subj_pat])
    };
    let subject = subj.name.clone();
    let object = p.obj.name.clone();
    ctx.add_rule(
        RuleSpec { name, reactants, products, rate: RateLaw::Expr(rate_name) },
        Some(&subject),
        Some(&object),
    );
}
