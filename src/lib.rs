extern crate self as mekanet;

#[macro_use]
mod macros;
mod api;
mod engine;
mod model;
mod rules;
mod statement;

pub use api::{AmountProvider, Assembler, DEFAULT_INITIAL_AMOUNT, assemble, assemble_with};
pub use engine::canon::canonicalize;
pub use engine::grounding::{find_patterns, grounded_agents, pattern_key};
pub use engine::policy::{BuildError, Param, Policy, PolicyConfig, PolicyKind};
pub use model::{
    ActiveFormEntry, Annotation, ComplexPattern, Expression, Model, Monomer, MonomerPattern,
    Parameter, RateLaw, RuleSpec, SiteAnnotation, SiteCondition,
};
pub use statement::{
    ActivityCondition, Agent, BoundCondition, ConditionFlags, ModCondition, ModKind, Modification,
    MutCondition, Statement, StatementBody, StatementKind, residue_code,
};
