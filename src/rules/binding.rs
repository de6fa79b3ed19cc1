//! Rule generators for complex-formation statements.
//!
//! The default (pairwise) strategy emits one directional bind rule and one
//! directional dissociate rule per unordered member pair, so N members yield
//! N·(N−1) rules. The multi-way strategy assembles the whole complex in a
//! single step (chain topology), always two rules. Interactions-only keeps
//! just the bind half of each pair.

use std::collections::BTreeMap;

use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{agent_rule_str, binding_site, initial};
use crate::model::{ComplexPattern, RateLaw, RuleSpec, SiteCondition};
use crate::rules::helpers::{BondTracker, BuildCtx, bind_patterns, complex_pattern, no_extra};
use crate::statement::{Agent, Statement, StatementBody};

fn members(stmt: &Statement) -> &[Agent] {
    match &stmt.body {
        StatementBody::Complex { members } => members,
        _ => &[],
    }
}

// --- Monomer contributions ---------------------------------------------------

pub(crate) fn monomers_pairwise(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let members = members(stmt);
    for m in members {
        vocab.add_agent(m);
    }
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            vocab.add_binding_pair(a, b);
        }
    }
}

pub(crate) fn monomers_multi_way(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let members = members(stmt);
    for m in members {
        vocab.add_agent(m);
    }
    for pair in members.windows(2) {
        vocab.add_binding_pair(&pair[0], &pair[1]);
    }
}

// --- Rule generation ---------------------------------------------------------

fn bind_rule_pair(ctx: &mut BuildCtx<'_>, a: &Agent, b: &Agent, with_reverse: bool) {
    let a_str = agent_rule_str(a);
    let b_str = agent_rule_str(b);
    let kf = ctx.param("kf", format!("kf_{}{}_bind", initial(a), initial(b)), 1e-6);
    let (reactants, products) = bind_patterns(a, &no_extra(), b, &no_extra());
    ctx.add_plain_rule(RuleSpec {
        name: format!("{a_str}_{b_str}_bind"),
        reactants: reactants.clone(),
        products: products.clone(),
        rate: RateLaw::Param(kf),
    });
    if with_reverse {
        let kr = ctx.param("kr", format!("kr_{}{}_bind", initial(a), initial(b)), 1e-1);
        ctx.add_plain_rule(RuleSpec {
            name: format!("{a_str}_{b_str}_dissociate"),
            reactants: products,
            products: reactants,
            rate: RateLaw::Param(kr),
        });
    }
}

/// One reversible bind (as a directional rule pair) per unordered pair.
pub(crate) fn assemble_pairwise(ctx: &mut BuildCtx<'_>) {
    let members: Vec<Agent> = members(ctx.stmt).to_vec();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            bind_rule_pair(ctx, a, b, true);
        }
    }
}

/// Binding rules only, no dissociation.
pub(crate) fn assemble_interactions_only(ctx: &mut BuildCtx<'_>) {
    let members: Vec<Agent> = members(ctx.stmt).to_vec();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            bind_rule_pair(ctx, a, b, false);
        }
    }
}

/// Bind and unbind the full N-way complex in one step each, regardless of N.
pub(crate) fn assemble_multi_way(ctx: &mut BuildCtx<'_>) {
    let members: Vec<Agent> = members(ctx.stmt).to_vec();
    let n = members.len();

    // Reactants: every member free on its chain-neighbor sites.
    let mut reactant_bonds = BondTracker::new();
    let mut reactants = Vec::with_capacity(n);
    for (i, m) in members.iter().enumerate() {
        let mut extra = BTreeMap::new();
        if i > 0 {
            extra.insert(binding_site(&members[i - 1].name), SiteCondition::Unbound);
        }
        if i + 1 < n {
            extra.insert(binding_site(&members[i + 1].name), SiteCondition::Unbound);
        }
        reactants.push(complex_pattern(m, &mut reactant_bonds, &extra));
    }

    // Product: the chain-bonded complex.
    let mut product_bonds = BondTracker::new();
    let mut pats: Vec<ComplexPattern> = members
        .iter()
        .map(|m| complex_pattern(m, &mut product_bonds, &no_extra()))
        .collect();
    for i in 0..n.saturating_sub(1) {
        let bond = product_bonds.fresh();
        pats[i]
            .monomers[0]
            .site_conditions
            .insert(binding_site(&members[i + 1].name), SiteCondition::Bond(bond));
        pats[i + 1]
            .monomers[0]
            .site_conditions
            .insert(binding_site(&members[i].name), SiteCondition::Bond(bond));
    }
    let joined = ComplexPattern { monomers: pats.into_iter().flat_map(|p| p.monomers).collect() };

    let name_stem: Vec<String> = members.iter().map(agent_rule_str).collect();
    let name_stem = name_stem.join("_");
    let initials: String = members.iter().map(initial).collect();
    let kf = ctx.param("kf", format!("kf_{initials}_bind"), 1e-6);
    let kr = ctx.param("kr", format!("kr_{initials}_bind"), 1e-1);
    ctx.add_plain_rule(RuleSpec {
        name: format!("{name_stem}_bind"),
        reactants: reactants.clone(),
        products: vec![joined.clone()],
        rate: RateLaw::Param(kf),
    });
    ctx.add_plain_rule(RuleSpec {
        name: format!("{name_stem}_dissociate"),
        reactants: vec![joined],
        products: reactants,
        rate: RateLaw::Param(kr),
    });
}
