//! Policy selection and configuration errors.
//!
//! A policy is a named rule-generation strategy, optionally carrying
//! parameter overrides (role -> concrete name and value). Policies can be set
//! globally, per statement kind, or per statement identity token; lookup
//! precedence is id, then kind name, then the `"other"` key, then the system
//! default (one-step). Configuration is validated before any generation so a
//! bad override never produces a partially-populated model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statement::{Statement, is_kind_name};

/// Fallback key selecting the policy for statements no other key matches.
pub const OTHER_KEY: &str = "other";

/// Fatal assembly errors. A build that fails returns no model at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A policy name that no generator recognizes.
    #[error("unknown policy name: {0}")]
    UnknownPolicyName(String),
    /// A policy-map key that matches no statement id, no statement kind
    /// name, and is not `"other"`.
    #[error("policy key matches no statement: {0}")]
    UnknownPolicyKey(String),
    /// A generator was requested for a (statement kind, policy) pair it does
    /// not support.
    #[error("policy {policy} is not applicable to {kind} statements")]
    UnsupportedPolicy { kind: &'static str, policy: &'static str },
}

/// The closed set of rule-generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    OneStep,
    TwoStep,
    InteractionsOnly,
    MultiWay,
    AtpDependent,
    MichaelisMenten,
    Hill,
}

impl PolicyKind {
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::OneStep => "one_step",
            PolicyKind::TwoStep => "two_step",
            PolicyKind::InteractionsOnly => "interactions_only",
            PolicyKind::MultiWay => "multi_way",
            PolicyKind::AtpDependent => "atp_dependent",
            PolicyKind::MichaelisMenten => "michaelis_menten",
            PolicyKind::Hill => "hill",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_step" => Ok(PolicyKind::OneStep),
            "two_step" => Ok(PolicyKind::TwoStep),
            "interactions_only" => Ok(PolicyKind::InteractionsOnly),
            "multi_way" => Ok(PolicyKind::MultiWay),
            "atp_dependent" => Ok(PolicyKind::AtpDependent),
            "michaelis_menten" => Ok(PolicyKind::MichaelisMenten),
            "hill" => Ok(PolicyKind::Hill),
            other => Err(BuildError::UnknownPolicyName(other.to_string())),
        }
    }
}

/// A concrete named/valued parameter overriding a generator default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: f64,
}

impl Param {
    pub fn new(name: &str, value: f64) -> Self {
        Param { name: name.to_string(), value }
    }
}

/// A rule-generation strategy plus optional parameter-role overrides.
///
/// Roles are the abstract slots generators fill (`kf`, `kr`, `kc`, `Km`,
/// `Ka`, `n`, `k`); an override replaces both the generated parameter name
/// and its default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub kind: PolicyKind,
    pub parameters: BTreeMap<String, Param>,
}

impl Policy {
    pub fn new(kind: PolicyKind) -> Self {
        Policy { kind, parameters: BTreeMap::new() }
    }

    /// Parse a policy by name (`"two_step"`), failing on unknown names.
    pub fn parse(name: &str) -> Result<Self, BuildError> {
        Ok(Policy::new(name.parse()?))
    }

    pub fn with_parameter(mut self, role: &str, param: Param) -> Self {
        self.parameters.insert(role.to_string(), param);
        self
    }

    pub(crate) fn override_for(&self, role: &str) -> Option<&Param> {
        self.parameters.get(role)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Policy({})", self.kind.name())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::new(PolicyKind::OneStep)
    }
}

/// Three-level policy configuration for a build call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PolicyConfig {
    /// Every statement uses the system default (one-step).
    #[default]
    Default,
    /// Every statement uses the given policy.
    Global(Policy),
    /// Per-key policies; keys are statement ids, statement kind names, or
    /// `"other"`.
    Map(BTreeMap<String, Policy>),
}

impl PolicyConfig {
    /// Global policy from a bare policy name.
    pub fn global(name: &str) -> Result<Self, BuildError> {
        Ok(PolicyConfig::Global(Policy::parse(name)?))
    }

    /// Select the policy for `stmt` per the precedence order.
    pub(crate) fn resolve(&self, stmt: &Statement) -> Policy {
        match self {
            PolicyConfig::Default => Policy::default(),
            PolicyConfig::Global(policy) => policy.clone(),
            PolicyConfig::Map(map) => map
                .get(&stmt.id)
                .or_else(|| map.get(stmt.kind_name()))
                .or_else(|| map.get(OTHER_KEY))
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Reject configurations referencing unknown statements up front.
    pub(crate) fn validate(&self, statements: &[Statement]) -> Result<(), BuildError> {
        if let PolicyConfig::Map(map) = self {
            for key in map.keys() {
                let matches_statement = statements.iter().any(|s| &s.id == key);
                if !matches_statement && !is_kind_name(key) && key != OTHER_KEY {
                    return Err(BuildError::UnknownPolicyKey(key.clone()));
                }
            }
        }
        Ok(())
    }
}
