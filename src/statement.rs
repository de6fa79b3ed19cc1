//! Statement-level intermediate representation.
//!
//! Statements are the input to the assembler: typed, already-structured
//! assertions about biological agents and their interactions ("BRAF
//! phosphorylates MEK1 on S222"). Agents are immutable value descriptions
//! compared structurally, never by identity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// --- Modification vocabulary -------------------------------------------------

/// Closed set of post-translational modification kinds.
///
/// Each kind carries a short site-name token and a fixed pair of state labels
/// (unmodified first). Phosphorylation uses the conventional `u`/`p` pair;
/// the presence/absence kinds use `n`/`y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModKind {
    Phosphorylation,
    Ubiquitination,
    Sumoylation,
    Acetylation,
    Glycosylation,
    Methylation,
    Farnesylation,
    Hydroxylation,
    /// Generic modification with no more specific chemistry.
    Modification,
}

impl ModKind {
    /// All modification kinds, in a stable order.
    pub const ALL: [ModKind; 9] = [
        ModKind::Phosphorylation,
        ModKind::Ubiquitination,
        ModKind::Sumoylation,
        ModKind::Acetylation,
        ModKind::Glycosylation,
        ModKind::Methylation,
        ModKind::Farnesylation,
        ModKind::Hydroxylation,
        ModKind::Modification,
    ];

    /// Site-name token used when a modification condition names no residue.
    pub fn abbrev(self) -> &'static str {
        match self {
            ModKind::Phosphorylation => "phospho",
            ModKind::Ubiquitination => "ub",
            ModKind::Sumoylation => "sumo",
            ModKind::Acetylation => "acetyl",
            ModKind::Glycosylation => "glycosyl",
            ModKind::Methylation => "methyl",
            ModKind::Farnesylation => "farnesyl",
            ModKind::Hydroxylation => "hydroxyl",
            ModKind::Modification => "mod",
        }
    }

    /// `(unmodified, modified)` state labels for sites of this kind.
    pub fn states(self) -> (&'static str, &'static str) {
        match self {
            ModKind::Phosphorylation => ("u", "p"),
            _ => ("n", "y"),
        }
    }

    /// Lower-case process name, used as the verb segment of rule names.
    pub fn verb(self) -> &'static str {
        match self {
            ModKind::Phosphorylation => "phosphorylation",
            ModKind::Ubiquitination => "ubiquitination",
            ModKind::Sumoylation => "sumoylation",
            ModKind::Acetylation => "acetylation",
            ModKind::Glycosylation => "glycosylation",
            ModKind::Methylation => "methylation",
            ModKind::Farnesylation => "farnesylation",
            ModKind::Hydroxylation => "hydroxylation",
            ModKind::Modification => "modification",
        }
    }

    /// Statement kind name for the add-modification statement of this kind.
    pub fn add_kind_name(self) -> &'static str {
        match self {
            ModKind::Phosphorylation => "Phosphorylation",
            ModKind::Ubiquitination => "Ubiquitination",
            ModKind::Sumoylation => "Sumoylation",
            ModKind::Acetylation => "Acetylation",
            ModKind::Glycosylation => "Glycosylation",
            ModKind::Methylation => "Methylation",
            ModKind::Farnesylation => "Farnesylation",
            ModKind::Hydroxylation => "Hydroxylation",
            ModKind::Modification => "Modification",
        }
    }

    /// Statement kind name for the remove-modification statement of this kind.
    pub fn remove_kind_name(self) -> &'static str {
        match self {
            ModKind::Phosphorylation => "Dephosphorylation",
            ModKind::Ubiquitination => "Deubiquitination",
            ModKind::Sumoylation => "Desumoylation",
            ModKind::Acetylation => "Deacetylation",
            ModKind::Glycosylation => "Deglycosylation",
            ModKind::Methylation => "Demethylation",
            ModKind::Farnesylation => "Defarnesylation",
            ModKind::Hydroxylation => "Dehydroxylation",
            ModKind::Modification => "Demodification",
        }
    }
}

/// Map a residue description (`"serine"`, `"ser"`, `"S"`) to its one-letter
/// code. Single-letter inputs are upper-cased as-is; unrecognized longer
/// names fall back to their upper-cased form.
pub fn residue_code(residue: &str) -> String {
    let lower = residue.to_lowercase();
    let code = match lower.as_str() {
        "alanine" | "ala" => "A",
        "arginine" | "arg" => "R",
        "asparagine" | "asn" => "N",
        "aspartate" | "aspartic acid" | "asp" => "D",
        "cysteine" | "cys" => "C",
        "glutamate" | "glutamic acid" | "glu" => "E",
        "glutamine" | "gln" => "Q",
        "glycine" | "gly" => "G",
        "histidine" | "his" => "H",
        "isoleucine" | "ile" => "I",
        "leucine" | "leu" => "L",
        "lysine" | "lys" => "K",
        "methionine" | "met" => "M",
        "phenylalanine" | "phe" => "F",
        "proline" | "pro" => "P",
        "serine" | "ser" => "S",
        "threonine" | "thr" => "T",
        "tryptophan" | "trp" => "W",
        "tyrosine" | "tyr" => "Y",
        "valine" | "val" => "V",
        _ => return residue.to_uppercase(),
    };
    code.to_string()
}

// --- Agent conditions --------------------------------------------------------

/// A binding requirement on an agent: bound (or explicitly not bound) to a
/// partner agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundCondition {
    pub agent: Agent,
    pub is_bound: bool,
}

/// A modification-state requirement on an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModCondition {
    pub kind: ModKind,
    pub residue: Option<String>,
    pub position: Option<String>,
    pub is_modified: bool,
}

impl ModCondition {
    /// Condition requiring the modification to be present, with no residue
    /// or position detail.
    pub fn new(kind: ModKind) -> Self {
        ModCondition { kind, residue: None, position: None, is_modified: true }
    }

    /// Condition requiring the modification to be present at the given
    /// residue/position (either may be absent).
    pub fn on(kind: ModKind, residue: Option<&str>, position: Option<&str>) -> Self {
        ModCondition {
            kind,
            residue: residue.map(str::to_string),
            position: position.map(str::to_string),
            is_modified: true,
        }
    }

    /// Flip the condition to require the modification to be absent.
    pub fn negated(mut self) -> Self {
        self.is_modified = false;
        self
    }
}

/// A point-mutation requirement; every field is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutCondition {
    pub position: Option<String>,
    pub residue_from: Option<String>,
    pub residue_to: Option<String>,
}

impl MutCondition {
    pub fn new(position: Option<&str>, residue_from: Option<&str>, residue_to: Option<&str>) -> Self {
        MutCondition {
            position: position.map(str::to_string),
            residue_from: residue_from.map(str::to_string),
            residue_to: residue_to.map(str::to_string),
        }
    }
}

/// An abstract activity requirement ("active kinase"). The preassembler
/// rewrites these into concrete conditions when an active-form assertion is
/// available; otherwise they compile to an opaque two-state site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCondition {
    pub label: String,
    pub is_active: bool,
}

bitflags::bitflags! {
    /// Coarse mask of which condition kinds an agent carries.
    ///
    /// Used by the preassembler and debug traces to skip agents cheaply
    /// without walking every condition list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConditionFlags: u8 {
        const BOUND    = 1 << 0;
        const MODS     = 1 << 1;
        const MUTATION = 1 << 2;
        const ACTIVITY = 1 << 3;
        const LOCATION = 1 << 4;
    }
}

// --- Agent -------------------------------------------------------------------

/// A named biological entity plus zero or more conditions.
///
/// Agents are plain values: cloning one is cheap enough for the assembler's
/// purposes, and two agents are the same exactly when all their fields match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub bound_conditions: Vec<BoundCondition>,
    pub mods: Vec<ModCondition>,
    pub mutations: Vec<MutCondition>,
    pub activity: Option<ActivityCondition>,
    pub location: Option<String>,
    /// External database identifiers, e.g. `{"HGNC": "6840"}`.
    pub db_refs: BTreeMap<String, String>,
}

impl Agent {
    pub fn new(name: &str) -> Self {
        Agent {
            name: name.to_string(),
            bound_conditions: Vec::new(),
            mods: Vec::new(),
            mutations: Vec::new(),
            activity: None,
            location: None,
            db_refs: BTreeMap::new(),
        }
    }

    pub fn bound_to(mut self, partner: Agent, is_bound: bool) -> Self {
        self.bound_conditions.push(BoundCondition { agent: partner, is_bound });
        self
    }

    pub fn modified(mut self, condition: ModCondition) -> Self {
        self.mods.push(condition);
        self
    }

    pub fn mutated(mut self, condition: MutCondition) -> Self {
        self.mutations.push(condition);
        self
    }

    pub fn with_activity(mut self, label: &str, is_active: bool) -> Self {
        self.activity = Some(ActivityCondition { label: label.to_string(), is_active });
        self
    }

    pub fn at_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn grounded(mut self, namespace: &str, id: &str) -> Self {
        self.db_refs.insert(namespace.to_string(), id.to_string());
        self
    }

    /// Which condition kinds this agent carries.
    pub fn condition_flags(&self) -> ConditionFlags {
        let mut flags = ConditionFlags::empty();
        if !self.bound_conditions.is_empty() {
            flags |= ConditionFlags::BOUND;
        }
        if !self.mods.is_empty() {
            flags |= ConditionFlags::MODS;
        }
        if !self.mutations.is_empty() {
            flags |= ConditionFlags::MUTATION;
        }
        if self.activity.is_some() {
            flags |= ConditionFlags::ACTIVITY;
        }
        if self.location.is_some() {
            flags |= ConditionFlags::LOCATION;
        }
        flags
    }

    /// Canonical structural key for this agent, covering every condition.
    ///
    /// Two agents with equal keys are interchangeable descriptions.
    pub fn matches_key(&self) -> String {
        let mut key = self.base_key();
        if let Some(act) = &self.activity {
            key.push_str(&format!("|act:{}:{}", act.label, act.is_active));
        }
        key
    }

    /// Structural key ignoring the activity condition, used by the
    /// preassembler when matching actors against active-form assertions.
    pub fn base_key(&self) -> String {
        let mut key = self.name.clone();
        for bc in &self.bound_conditions {
            key.push_str(&format!("|bound:{}:{}", bc.agent.matches_key(), bc.is_bound));
        }
        for mc in &self.mods {
            key.push_str(&format!(
                "|mod:{:?}:{}:{}:{}",
                mc.kind,
                mc.residue.as_deref().unwrap_or(""),
                mc.position.as_deref().unwrap_or(""),
                mc.is_modified
            ));
        }
        for mc in &self.mutations {
            key.push_str(&format!(
                "|mut:{}:{}:{}",
                mc.residue_from.as_deref().unwrap_or(""),
                mc.position.as_deref().unwrap_or(""),
                mc.residue_to.as_deref().unwrap_or("")
            ));
        }
        if let Some(loc) = &self.location {
            key.push_str(&format!("|loc:{loc}"));
        }
        key
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// --- Statements --------------------------------------------------------------

/// A single-substrate modification assertion: an optional enzyme adds or
/// removes a modification on a substrate, optionally at a residue/position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub kind: ModKind,
    pub is_removal: bool,
    pub enz: Option<Agent>,
    pub sub: Agent,
    pub residue: Option<String>,
    pub position: Option<String>,
}

/// The closed set of statement kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementBody {
    /// N agents form a complex.
    Complex { members: Vec<Agent> },
    Modification(Modification),
    /// An enzyme phosphorylates itself.
    Autophosphorylation { enz: Option<Agent>, residue: Option<String>, position: Option<String> },
    /// An enzyme phosphorylates its bound partner.
    Transphosphorylation { enz: Option<Agent>, residue: Option<String>, position: Option<String> },
    /// Qualitative activation (or inhibition) of an activity of the object.
    RegulateActivity { subj: Option<Agent>, obj: Agent, activity: String, is_activation: bool },
    /// Declares the concrete conditions under which an agent has an activity.
    ActiveForm { agent: Agent, activity: String, is_active: bool },
    /// Guanine-nucleotide exchange: activates a Ras-family agent.
    Gef { gef: Option<Agent>, ras: Agent },
    /// GTPase activation: deactivates a Ras-family agent.
    Gap { gap: Option<Agent>, ras: Agent },
    /// Synthesis/degradation, optionally catalyzed by a subject.
    RegulateAmount { subj: Option<Agent>, obj: Agent, is_increase: bool },
    /// Compartment change; a missing source defaults to the cytoplasm.
    Translocation { agent: Agent, from_location: Option<String>, to_location: Option<String> },
    /// Catalytic conversion of one set of species into another.
    Conversion { subj: Option<Agent>, from_agents: Vec<Agent>, to_agents: Vec<Agent> },
}

/// Coarse statement kind used for generator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Complex,
    AddModification,
    RemoveModification,
    Autophosphorylation,
    Transphosphorylation,
    RegulateActivity,
    ActiveForm,
    Gef,
    Gap,
    RegulateAmount,
    Translocation,
    Conversion,
}

static NEXT_STATEMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_statement_id() -> String {
    format!("stmt-{}", NEXT_STATEMENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// A typed assertion over one or more agents, with a stable identity token.
///
/// The `id` is used for per-statement policy overrides and provenance
/// annotations. Constructors assign a fresh process-unique id; use
/// [`Statement::with_id`] to supply a caller-stable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub id: String,
    pub body: StatementBody,
}

impl Statement {
    pub fn new(body: StatementBody) -> Self {
        Statement { id: next_statement_id(), body }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn complex(members: Vec<Agent>) -> Self {
        Statement::new(StatementBody::Complex { members })
    }

    pub fn modification(
        kind: ModKind,
        is_removal: bool,
        enz: Option<Agent>,
        sub: Agent,
        residue: Option<&str>,
        position: Option<&str>,
    ) -> Self {
        Statement::new(StatementBody::Modification(Modification {
            kind,
            is_removal,
            enz,
            sub,
            residue: residue.map(str::to_string),
            position: position.map(str::to_string),
        }))
    }

    pub fn phosphorylation(enz: Option<Agent>, sub: Agent, residue: Option<&str>, position: Option<&str>) -> Self {
        Statement::modification(ModKind::Phosphorylation, false, enz, sub, residue, position)
    }

    pub fn dephosphorylation(enz: Option<Agent>, sub: Agent, residue: Option<&str>, position: Option<&str>) -> Self {
        Statement::modification(ModKind::Phosphorylation, true, enz, sub, residue, position)
    }

    pub fn autophosphorylation(enz: Option<Agent>, residue: Option<&str>, position: Option<&str>) -> Self {
        Statement::new(StatementBody::Autophosphorylation {
            enz,
            residue: residue.map(str::to_string),
            position: position.map(str::to_string),
        })
    }

    pub fn transphosphorylation(enz: Option<Agent>, residue: Option<&str>, position: Option<&str>) -> Self {
        Statement::new(StatementBody::Transphosphorylation {
            enz,
            residue: residue.map(str::to_string),
            position: position.map(str::to_string),
        })
    }

    pub fn activation(subj: Option<Agent>, obj: Agent) -> Self {
        Statement::regulate_activity(subj, obj, "activity", true)
    }

    pub fn inhibition(subj: Option<Agent>, obj: Agent) -> Self {
        Statement::regulate_activity(subj, obj, "activity", false)
    }

    pub fn regulate_activity(subj: Option<Agent>, obj: Agent, activity: &str, is_activation: bool) -> Self {
        Statement::new(StatementBody::RegulateActivity {
            subj,
            obj,
            activity: activity.to_string(),
            is_activation,
        })
    }

    pub fn active_form(agent: Agent, activity: &str, is_active: bool) -> Self {
        Statement::new(StatementBody::ActiveForm { agent, activity: activity.to_string(), is_active })
    }

    pub fn gef(gef: Option<Agent>, ras: Agent) -> Self {
        Statement::new(StatementBody::Gef { gef, ras })
    }

    pub fn gap(gap: Option<Agent>, ras: Agent) -> Self {
        Statement::new(StatementBody::Gap { gap, ras })
    }

    pub fn increase_amount(subj: Option<Agent>, obj: Agent) -> Self {
        Statement::new(StatementBody::RegulateAmount { subj, obj, is_increase: true })
    }

    pub fn decrease_amount(subj: Option<Agent>, obj: Agent) -> Self {
        Statement::new(StatementBody::RegulateAmount { subj, obj, is_increase: false })
    }

    pub fn translocation(agent: Agent, from_location: Option<&str>, to_location: Option<&str>) -> Self {
        Statement::new(StatementBody::Translocation {
            agent,
            from_location: from_location.map(str::to_string),
            to_location: to_location.map(str::to_string),
        })
    }

    pub fn conversion(subj: Option<Agent>, from_agents: Vec<Agent>, to_agents: Vec<Agent>) -> Self {
        Statement::new(StatementBody::Conversion { subj, from_agents, to_agents })
    }

    /// Coarse kind for generator dispatch.
    pub fn kind(&self) -> StatementKind {
        match &self.body {
            StatementBody::Complex { .. } => StatementKind::Complex,
            StatementBody::Modification(m) => {
                if m.is_removal {
                    StatementKind::RemoveModification
                } else {
                    StatementKind::AddModification
                }
            }
            StatementBody::Autophosphorylation { .. } => StatementKind::Autophosphorylation,
            StatementBody::Transphosphorylation { .. } => StatementKind::Transphosphorylation,
            StatementBody::RegulateActivity { .. } => StatementKind::RegulateActivity,
            StatementBody::ActiveForm { .. } => StatementKind::ActiveForm,
            StatementBody::Gef { .. } => StatementKind::Gef,
            StatementBody::Gap { .. } => StatementKind::Gap,
            StatementBody::RegulateAmount { .. } => StatementKind::RegulateAmount,
            StatementBody::Translocation { .. } => StatementKind::Translocation,
            StatementBody::Conversion { .. } => StatementKind::Conversion,
        }
    }

    /// Precise kind name as used for policy-by-kind lookup
    /// (`"Phosphorylation"`, `"Complex"`, `"IncreaseAmount"`, ...).
    pub fn kind_name(&self) -> &'static str {
        match &self.body {
            StatementBody::Complex { .. } => "Complex",
            StatementBody::Modification(m) => {
                if m.is_removal {
                    m.kind.remove_kind_name()
                } else {
                    m.kind.add_kind_name()
                }
            }
            StatementBody::Autophosphorylation { .. } => "Autophosphorylation",
            StatementBody::Transphosphorylation { .. } => "Transphosphorylation",
            StatementBody::RegulateActivity { is_activation, .. } => {
                if *is_activation { "Activation" } else { "Inhibition" }
            }
            StatementBody::ActiveForm { .. } => "ActiveForm",
            StatementBody::Gef { .. } => "Gef",
            StatementBody::Gap { .. } => "Gap",
            StatementBody::RegulateAmount { is_increase, .. } => {
                if *is_increase { "IncreaseAmount" } else { "DecreaseAmount" }
            }
            StatementBody::Translocation { .. } => "Translocation",
            StatementBody::Conversion { .. } => "Conversion",
        }
    }

    /// True when a mandatory actor is absent: such statements contribute no
    /// monomers and no rules, silently.
    pub fn is_noop(&self) -> bool {
        match &self.body {
            StatementBody::Complex { members } => members.len() < 2,
            StatementBody::Modification(m) => m.enz.is_none(),
            StatementBody::Autophosphorylation { enz, .. } => enz.is_none(),
            StatementBody::Transphosphorylation { enz, .. } => {
                enz.as_ref().map(|e| e.bound_conditions.is_empty()).unwrap_or(true)
            }
            StatementBody::RegulateActivity { subj, .. } => subj.is_none(),
            StatementBody::ActiveForm { .. } => false,
            StatementBody::Gef { gef, .. } => gef.is_none(),
            StatementBody::Gap { gap, .. } => gap.is_none(),
            StatementBody::RegulateAmount { .. } => false,
            StatementBody::Translocation { to_location, .. } => to_location.is_none(),
            StatementBody::Conversion { from_agents, to_agents, .. } => {
                from_agents.is_empty() || to_agents.is_empty()
            }
        }
    }

    /// Top-level actor agents, in statement order.
    pub fn agents(&self) -> Vec<&Agent> {
        match &self.body {
            StatementBody::Complex { members } => members.iter().collect(),
            StatementBody::Modification(m) => m.enz.iter().chain(std::iter::once(&m.sub)).collect(),
            StatementBody::Autophosphorylation { enz, .. }
            | StatementBody::Transphosphorylation { enz, .. } => enz.iter().collect(),
            StatementBody::RegulateActivity { subj, obj, .. } => {
                subj.iter().chain(std::iter::once(obj)).collect()
            }
            StatementBody::ActiveForm { agent, .. } => vec![agent],
            StatementBody::Gef { gef, ras } => gef.iter().chain(std::iter::once(ras)).collect(),
            StatementBody::Gap { gap, ras } => gap.iter().chain(std::iter::once(ras)).collect(),
            StatementBody::RegulateAmount { subj, obj, .. } => {
                subj.iter().chain(std::iter::once(obj)).collect()
            }
            StatementBody::Translocation { agent, .. } => vec![agent],
            StatementBody::Conversion { subj, from_agents, to_agents } => {
                subj.iter().chain(from_agents.iter()).chain(to_agents.iter()).collect()
            }
        }
    }

    /// Mutable view of the same agents as [`Statement::agents`].
    pub fn agents_mut(&mut self) -> Vec<&mut Agent> {
        match &mut self.body {
            StatementBody::Complex { members } => members.iter_mut().collect(),
            StatementBody::Modification(m) => {
                m.enz.iter_mut().chain(std::iter::once(&mut m.sub)).collect()
            }
            StatementBody::Autophosphorylation { enz, .. }
            | StatementBody::Transphosphorylation { enz, .. } => enz.iter_mut().collect(),
            StatementBody::RegulateActivity { subj, obj, .. } => {
                subj.iter_mut().chain(std::iter::once(obj)).collect()
            }
            StatementBody::ActiveForm { agent, .. } => vec![agent],
            StatementBody::Gef { gef, ras } => gef.iter_mut().chain(std::iter::once(ras)).collect(),
            StatementBody::Gap { gap, ras } => gap.iter_mut().chain(std::iter::once(ras)).collect(),
            StatementBody::RegulateAmount { subj, obj, .. } => {
                subj.iter_mut().chain(std::iter::once(obj)).collect()
            }
            StatementBody::Translocation { agent, .. } => vec![agent],
            StatementBody::Conversion { subj, from_agents, to_agents } => subj
                .iter_mut()
                .chain(from_agents.iter_mut())
                .chain(to_agents.iter_mut())
                .collect(),
        }
    }
}

/// True when `name` is a recognized statement kind name for policy lookup.
pub(crate) fn is_kind_name(name: &str) -> bool {
    if matches!(
        name,
        "Complex"
            | "Autophosphorylation"
            | "Transphosphorylation"
            | "Activation"
            | "Inhibition"
            | "ActiveForm"
            | "Gef"
            | "Gap"
            | "IncreaseAmount"
            | "DecreaseAmount"
            | "Translocation"
            | "Conversion"
    ) {
        return true;
    }
    ModKind::ALL
        .iter()
        .any(|k| k.add_kind_name() == name || k.remove_kind_name() == name)
}
