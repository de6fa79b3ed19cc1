//! Static dispatch from (statement kind, policy) to a generator pair.
//!
//! The statement kinds form a closed enumeration, so the table below is an
//! exhaustive match the compiler checks: adding a statement kind or a policy
//! without deciding every combination fails the build rather than a runtime
//! lookup. Combinations with no generator are a build-time invariant
//! violation surfaced as [`BuildError::UnsupportedPolicy`].

use crate::engine::policy::{BuildError, Policy, PolicyKind};
use crate::engine::registry::SiteVocabulary;
use crate::rules;
use crate::rules::helpers::BuildCtx;
use crate::statement::{Statement, StatementKind};

pub(crate) type MonomersFn = fn(&Statement, &Policy, &mut SiteVocabulary);
pub(crate) type AssembleFn = fn(&mut BuildCtx<'_>);

/// One generator: a monomer-contribution pass and a rule-assembly pass.
#[derive(Clone, Copy)]
pub(crate) struct Generator {
    pub monomers: MonomersFn,
    pub assemble: AssembleFn,
}

const fn generator(monomers: MonomersFn, assemble: AssembleFn) -> Generator {
    Generator { monomers, assemble }
}

/// Resolve the generator for a (kind, policy) combination.
pub(crate) fn lookup(kind: StatementKind, policy: PolicyKind) -> Result<Generator, BuildError> {
    use PolicyKind::*;
    use StatementKind::*;

    let unsupported = |kind: &'static str, policy: PolicyKind| {
        Err(BuildError::UnsupportedPolicy { kind, policy: policy.name() })
    };

    match kind {
        Complex => match policy {
            // Binding has no separate catalytic step: one-step and two-step
            // share the pairwise strategy.
            OneStep | TwoStep => {
                Ok(generator(rules::binding::monomers_pairwise, rules::binding::assemble_pairwise))
            }
            InteractionsOnly => Ok(generator(
                rules::binding::monomers_pairwise,
                rules::binding::assemble_interactions_only,
            )),
            MultiWay => {
                Ok(generator(rules::binding::monomers_multi_way, rules::binding::assemble_multi_way))
            }
            AtpDependent | MichaelisMenten | Hill => unsupported("Complex", policy),
        },
        AddModification => match policy {
            OneStep => Ok(generator(
                rules::modification::monomers_one_step,
                rules::modification::assemble_one_step,
            )),
            TwoStep => Ok(generator(
                rules::modification::monomers_two_step,
                rules::modification::assemble_two_step,
            )),
            InteractionsOnly => Ok(generator(
                rules::modification::monomers_two_step,
                rules::modification::assemble_interactions_only,
            )),
            AtpDependent => Ok(generator(
                rules::modification::monomers_atp_dependent,
                rules::modification::assemble_atp_dependent,
            )),
            MichaelisMenten => Ok(generator(
                rules::modification::monomers_one_step,
                rules::modification::assemble_michaelis_menten,
            )),
            MultiWay | Hill => unsupported("AddModification", policy),
        },
        RemoveModification => match policy {
            OneStep => Ok(generator(
                rules::modification::monomers_one_step,
                rules::modification::assemble_one_step,
            )),
            TwoStep => Ok(generator(
                rules::modification::monomers_two_step,
                rules::modification::assemble_two_step,
            )),
            InteractionsOnly => Ok(generator(
                rules::modification::monomers_two_step,
                rules::modification::assemble_interactions_only,
            )),
            MichaelisMenten => Ok(generator(
                rules::modification::monomers_one_step,
                rules::modification::assemble_michaelis_menten,
            )),
            // ATP consumption only makes sense for the add direction.
            AtpDependent | MultiWay | Hill => unsupported("RemoveModification", policy),
        },
        Autophosphorylation => match policy {
            OneStep => Ok(generator(
                rules::modification::monomers_autophosphorylation,
                rules::modification::assemble_autophosphorylation,
            )),
            _ => unsupported("Autophosphorylation", policy),
        },
        Transphosphorylation => match policy {
            OneStep => Ok(generator(
                rules::modification::monomers_transphosphorylation,
                rules::modification::assemble_transphosphorylation,
            )),
            _ => unsupported("Transphosphorylation", policy),
        },
        RegulateActivity => match policy {
            OneStep => {
                Ok(generator(rules::regulation::monomers_one_step, rules::regulation::assemble_one_step))
            }
            TwoStep => {
                Ok(generator(rules::regulation::monomers_two_step, rules::regulation::assemble_two_step))
            }
            InteractionsOnly => Ok(generator(
                rules::regulation::monomers_interactions_only,
                rules::regulation::assemble_interactions_only,
            )),
            MichaelisMenten => Ok(generator(
                rules::regulation::monomers_one_step,
                rules::regulation::assemble_michaelis_menten,
            )),
            MultiWay | AtpDependent | Hill => unsupported("RegulateActivity", policy),
        },
        ActiveForm => {
            // Active forms shape monomers under every policy and never emit
            // rules; a policy mismatch here must not abort a global build.
            Ok(generator(rules::monomers_active_form, rules::assemble_nothing))
        }
        Gef => match policy {
            OneStep => {
                Ok(generator(rules::regulation::monomers_one_step, rules::regulation::assemble_one_step))
            }
            InteractionsOnly => Ok(generator(
                rules::regulation::monomers_interactions_only,
                rules::regulation::assemble_interactions_only,
            )),
            _ => unsupported("Gef", policy),
        },
        Gap => match policy {
            OneStep => {
                Ok(generator(rules::regulation::monomers_one_step, rules::regulation::assemble_one_step))
            }
            InteractionsOnly => Ok(generator(
                rules::regulation::monomers_interactions_only,
                rules::regulation::assemble_interactions_only,
            )),
            _ => unsupported("Gap", policy),
        },
        RegulateAmount => match policy {
            OneStep => Ok(generator(rules::amount::monomers_one_step, rules::amount::assemble_one_step)),
            InteractionsOnly => Ok(generator(
                rules::amount::monomers_interactions_only,
                rules::amount::assemble_interactions_only,
            )),
            Hill => Ok(generator(rules::amount::monomers_one_step, rules::amount::assemble_hill)),
            TwoStep | MultiWay | AtpDependent | MichaelisMenten => {
                unsupported("RegulateAmount", policy)
            }
        },
        Translocation => match policy {
            OneStep => Ok(generator(
                rules::transport::monomers_translocation,
                rules::transport::assemble_translocation,
            )),
            _ => unsupported("Translocation", policy),
        },
        Conversion => match policy {
            OneStep => Ok(generator(
                rules::transport::monomers_conversion,
                rules::transport::assemble_conversion,
            )),
            _ => unsupported("Conversion", policy),
        },
    }
}
