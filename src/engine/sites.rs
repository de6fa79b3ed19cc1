//! Site resolution: the deterministic mapping from agent conditions to
//! (site name, state) pairs, plus the compact agent encoding used in rule
//! names.
//!
//! Every naming decision of the compiled model funnels through this module
//! so that two statements mentioning the same condition always agree on the
//! site vocabulary.

use crate::engine::canon::canonicalize;
use crate::statement::{Agent, ModCondition, MutCondition, residue_code};

/// The location site every compartment-carrying monomer uses.
pub(crate) const LOCATION_SITE: &str = "loc";

/// Wildcard state for mutations whose target residue is unknown.
pub(crate) const UNKNOWN_STATE: &str = "X";

/// Name of the binding site an agent exposes toward `partner_name`.
///
/// Binding sites are keyed by partner identity: two different bound partners
/// on one agent produce two distinct sites.
pub(crate) fn binding_site(partner_name: &str) -> String {
    canonicalize(partner_name).to_lowercase()
}

/// Site name for a modification condition: one-letter residue code plus
/// position when a residue is given, otherwise the modification-kind token
/// (plus position when given).
pub(crate) fn mod_site_name(mc: &ModCondition) -> String {
    let stem = match &mc.residue {
        Some(residue) => residue_code(residue),
        None => mc.kind.abbrev().to_string(),
    };
    format!("{stem}{}", mc.position.as_deref().unwrap_or(""))
}

/// Site name and state for a mutation condition.
///
/// Exhaustive fallback over which fields are present:
/// all three -> (`V600`, `E`); missing "to" -> (`V600`, `X`);
/// missing "from" -> (`mut600`, `E`); all missing -> (`mut`, `X`).
pub(crate) fn mutation_site(mc: &MutCondition) -> (String, String) {
    let stem = mc.residue_from.as_deref().unwrap_or("mut");
    let site = format!("{stem}{}", mc.position.as_deref().unwrap_or(""));
    let state = mc.residue_to.clone().unwrap_or_else(|| UNKNOWN_STATE.to_string());
    (site, state)
}

/// Canonical lower-cased compartment label.
pub(crate) fn location_state(location: &str) -> String {
    canonicalize(location)
}

/// Compact structural descriptor of an agent for rule names: base name, then
/// one segment per condition.
///
/// `GRB2` bound to `EGFR` -> `GRB2_EGFR`; not bound -> `GRB2_nEGFR`;
/// phosphorylated on serine -> `BRAF_phosphoS`; an active kinase ->
/// `BRAF_kin`; an inactive generic activity -> `MAP2K1_act_inact`.
pub(crate) fn agent_rule_str(agent: &Agent) -> String {
    let mut segments = vec![canonicalize(&agent.name)];
    for bc in &agent.bound_conditions {
        let partner = canonicalize(&bc.agent.name);
        if bc.is_bound {
            segments.push(partner);
        } else {
            segments.push(format!("n{partner}"));
        }
    }
    for mc in &agent.mods {
        let mut seg = mc.kind.abbrev().to_string();
        if let Some(residue) = &mc.residue {
            seg.push_str(&residue_code(residue));
        }
        if let Some(position) = &mc.position {
            seg.push_str(position);
        }
        segments.push(seg);
    }
    for mc in &agent.mutations {
        let (site, state) = mutation_site(mc);
        segments.push(format!("{site}{state}"));
    }
    if let Some(location) = &agent.location {
        segments.push(location_state(location));
    }
    if let Some(act) = &agent.activity {
        let prefix: String = act.label.chars().take(3).collect();
        if act.is_active {
            segments.push(prefix);
        } else {
            segments.push(format!("{prefix}_inact"));
        }
    }
    segments.join("_")
}

/// Single lower-case initial of an agent's canonical name, used in parameter
/// names.
pub(crate) fn initial(agent: &Agent) -> String {
    canonicalize(&agent.name).chars().take(1).collect::<String>().to_lowercase()
}
