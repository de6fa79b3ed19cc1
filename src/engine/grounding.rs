//! Grounded pattern resolution: querying the compiled model by external
//! biological identity rather than by generated name.
//!
//! Lookup goes through the identity index built after compilation and the
//! per-monomer site annotations, never by string-matching generated names.
//! A query that matches nothing returns an empty sequence, not an error.
//! Returned patterns follow site-discovery insertion order; callers must
//! treat the sequence as a set.

use std::collections::BTreeMap;

use crate::engine::annotations::{identity_url, parse_identity_url};
use crate::model::{Model, MonomerPattern, Monomer, SiteCondition};
use crate::statement::{Agent, ModCondition, ModKind, residue_code};

/// All monomer patterns over the compiled model that correspond to the
/// grounded agent's identity and conditions.
///
/// An under-specified modification (type given, residue/position omitted)
/// fans out into one pattern per concrete matching site; multiple fully
/// specified modifications produce a single pattern constraining all of
/// their sites jointly. Activity-only queries return one pattern per
/// registered active-form route.
pub fn find_patterns(model: &Model, agent: &Agent) -> Vec<MonomerPattern> {
    let mut candidates: Vec<&str> = Vec::new();
    for (ns, id) in &agent.db_refs {
        if let Some(url) = identity_url(ns, id) {
            for name in model.grounding.monomers_for(&url) {
                if !candidates.iter().any(|c| c == name) {
                    candidates.push(name);
                }
            }
        }
    }

    let mut results = Vec::new();
    for name in candidates {
        if let Some(monomer) = model.monomer(name) {
            patterns_for_monomer(model, monomer, agent, &mut results);
        }
    }
    results
}

fn site_annotation_value<'m>(monomer: &'m Monomer, site: &str, predicate: &str) -> Option<&'m str> {
    monomer
        .site_annotations
        .iter()
        .find(|a| a.predicate == predicate && a.site == site)
        .map(|a| a.object.as_str())
}

/// Candidate (site, modified-state) pairs on `monomer` satisfying one
/// modification condition of the query agent.
fn mod_candidates(monomer: &Monomer, mc: &ModCondition) -> Vec<(String, String)> {
    let mut candidates = Vec::new();
    for ann in &monomer.site_annotations {
        if ann.predicate != "is_modification" || ann.object != mc.kind.verb() {
            continue;
        }
        if let Some(residue) = &mc.residue {
            if site_annotation_value(monomer, &ann.site, "is_residue") != Some(residue_code(residue).as_str()) {
                continue;
            }
        }
        if let Some(position) = &mc.position {
            if site_annotation_value(monomer, &ann.site, "is_position") != Some(position.as_str()) {
                continue;
            }
        }
        candidates.push((ann.site.clone(), ann.state.clone().unwrap_or_default()));
    }
    candidates
}

fn activity_labels_match(route_label: &str, query_label: &str) -> bool {
    route_label == query_label
        || matches!(route_label, "activity" | "active")
        || matches!(query_label, "activity" | "active")
}

fn patterns_for_monomer(
    model: &Model,
    monomer: &Monomer,
    agent: &Agent,
    results: &mut Vec<MonomerPattern>,
) {
    // One candidate list per modification condition; a condition no site
    // satisfies eliminates the monomer entirely.
    let mut per_mod = Vec::with_capacity(agent.mods.len());
    for mc in &agent.mods {
        let candidates = mod_candidates(monomer, mc);
        if candidates.is_empty() {
            return;
        }
        per_mod.push(candidates);
    }

    // Cartesian fan-out across conditions, skipping degenerate combinations
    // that would constrain one site twice.
    let mut combos: Vec<Vec<(String, String)>> = vec![Vec::new()];
    for candidates in &per_mod {
        let mut next = Vec::new();
        for combo in &combos {
            for cand in candidates {
                if combo.iter().any(|(site, _)| site == &cand.0) {
                    continue;
                }
                let mut extended = combo.clone();
                extended.push(cand.clone());
                next.push(extended);
            }
        }
        combos = next;
    }

    // Activity routes: registered active forms first, the opaque activity
    // site as fallback, no constraint when neither exists.
    let mut routes: Vec<Vec<(String, String)>> = Vec::new();
    if let Some(act) = &agent.activity {
        for af in &model.active_forms {
            if af.monomer == monomer.name
                && af.is_active == act.is_active
                && activity_labels_match(&af.activity, &act.label)
            {
                routes.push(af.site_conditions.clone());
            }
        }
        if routes.is_empty() && monomer.sites.iter().any(|s| s == &act.label) {
            let state = if act.is_active { "active" } else { "inactive" };
            routes.push(vec![(act.label.clone(), state.to_string())]);
        }
    }
    if routes.is_empty() {
        routes.push(Vec::new());
    }

    for combo in &combos {
        for route in &routes {
            let mut pattern = MonomerPattern::new(&monomer.name);
            for (site, state) in combo.iter().chain(route) {
                pattern.site_conditions.insert(site.clone(), SiteCondition::State(state.clone()));
            }
            results.push(pattern);
        }
    }
}

// --- Reverse query: agents from patterns --------------------------------------

/// Deterministic key for a monomer pattern, usable as a map key.
pub fn pattern_key(mp: &MonomerPattern) -> String {
    let mut key = mp.monomer.clone();
    for (site, cond) in &mp.site_conditions {
        let cond = match cond {
            SiteCondition::State(s) => s.clone(),
            SiteCondition::StateBond(s, b) => format!("{s}!{b}"),
            SiteCondition::Bond(b) => format!("!{b}"),
            SiteCondition::Unbound => "unbound".to_string(),
        };
        key.push_str(&format!("|{site}={cond}"));
    }
    key
}

/// Reconstruct the grounded agent a monomer pattern describes, using the
/// monomer's identity and site annotations.
fn agent_from_pattern(model: &Model, mp: &MonomerPattern) -> Agent {
    let mut agent = Agent::new(&mp.monomer);
    for ann in &model.annotations {
        if ann.predicate == "is" && ann.subject == mp.monomer {
            if let Some((ns, id)) = parse_identity_url(&ann.object) {
                agent.db_refs.insert(ns, id);
            }
        }
    }
    let Some(monomer) = model.monomer(&mp.monomer) else {
        return agent;
    };
    for (site, cond) in &mp.site_conditions {
        let state = match cond {
            SiteCondition::State(s) | SiteCondition::StateBond(s, _) => s,
            _ => continue,
        };
        let Some(ann) = monomer
            .site_annotations
            .iter()
            .find(|a| a.predicate == "is_modification" && &a.site == site)
        else {
            continue;
        };
        let Some(kind) = ModKind::ALL.iter().copied().find(|k| k.verb() == ann.object) else {
            continue;
        };
        agent.mods.push(ModCondition {
            kind,
            residue: site_annotation_value(monomer, site, "is_residue").map(str::to_string),
            position: site_annotation_value(monomer, site, "is_position").map(str::to_string),
            is_modified: ann.state.as_deref() == Some(state),
        });
    }
    agent
}

/// Reverse-map the model's rules back to grounded agents: agents keyed by
/// the pattern that mentions them, and the patterns each rule uses.
pub fn grounded_agents(
    model: &Model,
) -> (BTreeMap<String, Agent>, BTreeMap<String, Vec<MonomerPattern>>) {
    let mut agents_by_pattern = BTreeMap::new();
    let mut patterns_by_rule: BTreeMap<String, Vec<MonomerPattern>> = BTreeMap::new();
    for rule in &model.rules {
        let entry = patterns_by_rule.entry(rule.name.clone()).or_default();
        for cp in rule.reactants.iter().chain(&rule.products) {
            for mp in &cp.monomers {
                entry.push(mp.clone());
                agents_by_pattern
                    .entry(pattern_key(mp))
                    .or_insert_with(|| agent_from_pattern(model, mp));
            }
        }
    }
    (agents_by_pattern, patterns_by_rule)
}
