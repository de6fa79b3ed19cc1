//! Monomer registry: the two-pass accumulator that turns agent mentions into
//! monomer definitions.
//!
//! A monomer's structure is not known until the whole statement sequence has
//! been scanned (later statements can add sites to an agent mentioned
//! earlier), so materialization is split into a discovery pass that grows a
//! per-agent site vocabulary and a construction pass that allocates each
//! monomer exactly once, before any rule references it. Site sets only grow,
//! never shrink, across the scan.
//!
//! A fresh vocabulary is constructed per build call; nothing survives from a
//! previous build, which is what guarantees that per-statement policy scope
//! cannot leak across builds.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::engine::annotations;
use crate::engine::canon::canonicalize;
use crate::engine::sites::{LOCATION_SITE, binding_site, location_state, mod_site_name, mutation_site};
use crate::model::{Model, Monomer};
use crate::statement::{Agent, ModCondition};

/// Modification semantics recorded for a site, later emitted as site
/// annotations on the materialized monomer.
#[derive(Debug, Clone)]
pub(crate) struct ModSiteInfo {
    pub kind: crate::statement::ModKind,
    pub residue: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Default)]
struct MonomerSlot {
    name: String,
    sites: Vec<String>,
    states: HashMap<String, Vec<String>>,
    mod_sites: BTreeMap<String, ModSiteInfo>,
    db_refs: BTreeMap<String, String>,
}

impl MonomerSlot {
    fn add_site(&mut self, site: &str, states: &[&str]) {
        if !self.sites.iter().any(|s| s == site) {
            self.sites.push(site.to_string());
        }
        if !states.is_empty() {
            let entry = self.states.entry(site.to_string()).or_default();
            for state in states {
                if !entry.iter().any(|s| s == state) {
                    entry.push((*state).to_string());
                }
            }
        }
    }
}

/// Accumulated per-agent site requirements across the full statement scan.
#[derive(Debug, Default)]
pub(crate) struct SiteVocabulary {
    slots: Vec<MonomerSlot>,
    by_name: HashMap<String, usize>,
}

impl SiteVocabulary {
    pub fn new() -> Self {
        SiteVocabulary::default()
    }

    fn slot_mut(&mut self, name: &str) -> &mut MonomerSlot {
        if let Some(&idx) = self.by_name.get(name) {
            return &mut self.slots[idx];
        }
        let idx = self.slots.len();
        self.slots.push(MonomerSlot { name: name.to_string(), ..MonomerSlot::default() });
        self.by_name.insert(name.to_string(), idx);
        &mut self.slots[idx]
    }

    /// Ensure a monomer exists for `agent_name`, with no site contribution.
    pub fn ensure_monomer(&mut self, agent_name: &str) -> String {
        let name = canonicalize(agent_name);
        self.slot_mut(&name);
        name
    }

    /// Add a named site (with its admissible states) to an agent's monomer.
    /// Binding sites pass an empty state list.
    pub fn add_site(&mut self, agent_name: &str, site: &str, states: &[&str]) {
        let name = canonicalize(agent_name);
        self.slot_mut(&name).add_site(site, states);
    }

    /// Add the binding-site pair between two agents.
    pub fn add_binding_pair(&mut self, a: &Agent, b: &Agent) {
        self.add_site(&a.name, &binding_site(&b.name), &[]);
        self.add_site(&b.name, &binding_site(&a.name), &[]);
    }

    /// Record a modification-bearing site on an agent's monomer, both its
    /// state vocabulary and the semantics needed for site annotations.
    pub fn add_mod_site(&mut self, agent_name: &str, mc: &ModCondition) {
        let site = mod_site_name(mc);
        let (unmodified, modified) = mc.kind.states();
        self.add_site(agent_name, &site, &[unmodified, modified]);
        let name = canonicalize(agent_name);
        let slot = self.slot_mut(&name);
        slot.mod_sites.entry(site).or_insert_with(|| ModSiteInfo {
            kind: mc.kind,
            residue: mc.residue.as_deref().map(crate::statement::residue_code),
            position: mc.position.clone(),
        });
    }

    /// Record everything an agent's own conditions imply: the monomer
    /// itself, binding sites toward (and on) bound partners, modification,
    /// mutation, activity and location sites, and grounding identifiers.
    pub fn add_agent(&mut self, agent: &Agent) {
        let name = self.ensure_monomer(&agent.name);
        {
            let slot = self.slot_mut(&name);
            for (ns, id) in &agent.db_refs {
                slot.db_refs.entry(ns.clone()).or_insert_with(|| id.clone());
            }
        }
        for bc in &agent.bound_conditions {
            self.add_binding_pair(agent, &bc.agent);
            self.add_agent(&bc.agent);
        }
        for mc in &agent.mods {
            self.add_mod_site(&agent.name, mc);
        }
        for mc in &agent.mutations {
            let (site, state) = mutation_site(mc);
            self.add_site(&agent.name, &site, &[state.as_str()]);
        }
        if let Some(act) = &agent.activity {
            self.add_site(&agent.name, &act.label, &["inactive", "active"]);
        }
        if let Some(loc) = &agent.location {
            self.add_site(&agent.name, LOCATION_SITE, &[location_state(loc).as_str()]);
        }
    }

    /// Materialize one monomer per accumulated slot, in first-seen order,
    /// pushing identity annotations into the model as each monomer lands.
    pub fn materialize_into(self, model: &mut Model) {
        for slot in self.slots {
            let mut site_states = BTreeMap::new();
            for site in &slot.sites {
                if let Some(states) = slot.states.get(site) {
                    site_states.insert(site.clone(), states.clone());
                }
            }
            let site_annotations = slot
                .mod_sites
                .iter()
                .flat_map(|(site, info)| annotations::mod_site_annotations(site, info))
                .collect();
            model
                .annotations
                .extend(annotations::identity_annotations(&slot.name, &slot.db_refs));
            model.monomers.push(Monomer {
                name: slot.name,
                sites: slot.sites,
                site_states,
                site_annotations,
            });
        }
    }
}
