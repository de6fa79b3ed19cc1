//! Rule generators for compartment changes and catalytic species
//! conversion.

use std::collections::BTreeMap;

use crate::engine::canon::canonicalize;
use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{LOCATION_SITE, agent_rule_str, initial, location_state};
use crate::model::{ComplexPattern, RateLaw, RuleSpec, SiteCondition};
use crate::rules::helpers::{BondTracker, BuildCtx, complex_pattern, no_extra};
use crate::statement::{Agent, Statement, StatementBody};

/// Implicit source compartment when a translocation names none.
pub(crate) const DEFAULT_COMPARTMENT: &str = "cytoplasm";

// --- Translocation -----------------------------------------------------------

struct TranslocationParts<'a> {
    agent: &'a Agent,
    source: String,
    destination: String,
}

fn translocation_parts(stmt: &Statement) -> Option<TranslocationParts<'_>> {
    match &stmt.body {
        StatementBody::Translocation { agent, from_location, to_location } => {
            let destination = location_state(to_location.as_deref()?);
            let source = location_state(from_location.as_deref().unwrap_or(DEFAULT_COMPARTMENT));
            Some(TranslocationParts { agent, source, destination })
        }
        _ => None,
    }
}

pub(crate) fn monomers_translocation(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = translocation_parts(stmt) else { return };
    vocab.add_agent(p.agent);
    vocab.add_site(&p.agent.name, LOCATION_SITE, &[p.source.as_str(), p.destination.as_str()]);
}

/// Single rule moving the agent's location site from source to destination.
pub(crate) fn assemble_translocation(ctx: &mut BuildCtx<'_>) {
    let Some(p) = translocation_parts(ctx.stmt) else { return };
    let kf = ctx.param(
        "kf",
        format!(
            "kf_{}_{}_{}_1",
            canonicalize(&p.agent.name).to_lowercase(),
            p.source,
            p.destination
        ),
        1e-2,
    );
    let mut reactant_bonds = BondTracker::new();
    let reactant = complex_pattern(
        p.agent,
        &mut reactant_bonds,
        &BTreeMap::from([(LOCATION_SITE.to_string(), SiteCondition::State(p.source.clone()))]),
    );
    let mut product_bonds = BondTracker::new();
    let product = complex_pattern(
        p.agent,
        &mut product_bonds,
        &BTreeMap::from([(LOCATION_SITE.to_string(), SiteCondition::State(p.destination.clone()))]),
    );
    let object = p.agent.name.clone();
    ctx.add_rule(
        RuleSpec {
            name: format!("{}_{}_to_{}", agent_rule_str(p.agent), p.source, p.destination),
            reactants: vec![reactant],
            products: vec![product],
            rate: RateLaw::Param(kf),
        },
        None,
        Some(&object),
    );
}

// --- Conversion --------------------------------------------------------------

struct ConversionParts<'a> {
    subj: Option<&'a Agent>,
    from_agents: &'a [Agent],
    to_agents: &'a [Agent],
}

fn conversion_parts(stmt: &Statement) -> Option<ConversionParts<'_>> {
    match &stmt.body {
        StatementBody::Conversion { subj, from_agents, to_agents } => {
            if from_agents.is_empty() || to_agents.is_empty() {
                return None;
            }
            Some(ConversionParts { subj: subj.as_ref(), from_agents, to_agents })
        }
        _ => None,
    }
}

pub(crate) fn monomers_conversion(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    let Some(p) = conversion_parts(stmt) else { return };
    if let Some(subj) = p.subj {
        vocab.add_agent(subj);
    }
    for agent in p.from_agents.iter().chain(p.to_agents) {
        vocab.add_agent(agent);
    }
}

/// Substrates-to-products rule, with the catalytic subject (when present)
/// appearing unchanged on both sides. Product patterns are fully concrete so
/// downstream network generation never sees an ambiguous species.
pub(crate) fn assemble_conversion(ctx: &mut BuildCtx<'_>) {
    let Some(p) = conversion_parts(ctx.stmt) else { return };
    let from_str: Vec<String> = p.from_agents.iter().map(agent_rule_str).collect();
    let to_str: Vec<String> = p.to_agents.iter().map(agent_rule_str).collect();
    let name = match p.subj {
        Some(subj) => format!(
            "{}_converts_{}_to_{}",
            agent_rule_str(subj),
            from_str.join("_"),
            to_str.join("_")
        ),
        None => format!("convert_{}_to_{}", from_str.join("_"), to_str.join("_")),
    };
    let initials: String = p
        .subj
        .iter()
        .copied()
        .chain(p.from_agents)
        .chain(p.to_agents)
        .map(initial)
        .collect();
    let kf = ctx.param("kf", format!("kf_{initials}_convert"), 1e-6);

    let side = |agents: &[&Agent]| -> Vec<ComplexPattern> {
        let mut bonds = BondTracker::new();
        agents.iter().map(|a| complex_pattern(a, &mut bonds, &no_extra())).collect()
    };
    let mut reactant_agents: Vec<&Agent> = p.subj.into_iter().collect();
    reactant_agents.extend(p.from_agents);
    let mut product_agents: Vec<&Agent> = p.subj.into_iter().collect();
    product_agents.extend(p.to_agents);

    let subject = p.subj.map(|s| s.name.clone());
    let object = p.to_agents[0].name.clone();
    ctx.add_rule(
        RuleSpec {
            name,
            reactants: side(&reactant_agents),
            products: side(&product_agents),
            rate: RateLaw::Param(kf),
        },
        subject.as_deref(),
        Some(&object),
    );
}
