//! Rule generator families, one module per statement family.
//!
//! Every generator is a pure function over (statement, policy, model under
//! construction): a monomer-contribution pass consulted by the registry
//! before materialization, and an assembly pass producing rules, parameters,
//! and annotations. The static table wiring (statement kind, policy) to the
//! right pair lives in `crate::engine::dispatch`.

pub(crate) mod amount;
pub(crate) mod binding;
pub(crate) mod helpers;
pub(crate) mod modification;
pub(crate) mod regulation;
pub(crate) mod transport;

#[cfg(test)]
mod tests;

use crate::engine::policy::Policy;
use crate::engine::registry::SiteVocabulary;
use crate::rules::helpers::BuildCtx;
use crate::statement::{Statement, StatementBody};

/// Active-form assertions shape monomers (their agent's conditions become
/// sites) but never emit rules.
pub(crate) fn monomers_active_form(stmt: &Statement, _policy: &Policy, vocab: &mut SiteVocabulary) {
    if let StatementBody::ActiveForm { agent, .. } = &stmt.body {
        vocab.add_agent(agent);
    }
}

pub(crate) fn assemble_nothing(_ctx: &mut BuildCtx<'_>) {}
