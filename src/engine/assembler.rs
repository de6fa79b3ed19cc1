//! The build loop: one sequential pass per top-level build call.
//!
//! ```text
//! statements ── replace_activities ──► normalized statements
//!                                          │
//!                    policy validation ────┤ (fatal on unknown keys)
//!                                          ▼
//!                    registry pass 1: per-(kind, policy) monomer discovery
//!                                          │
//!                                          ▼
//!                    registry pass 2: materialize monomers + identity
//!                                     annotations (before any rule)
//!                                          │
//!                                          ▼
//!                    per-statement rule generation, in input order,
//!                    interleaved with provenance annotation emission
//!                                          │
//!                                          ▼
//!                    initial-amount parameters, active-form index,
//!                    grounding index ──► Model
//! ```
//!
//! Every invocation constructs a fresh build context; nothing is carried
//! over from a previous build, so per-statement policy scope cannot leak
//! across calls. A fatal error aborts the whole build and returns no model.
//!
//! Setting `MEKANET_DEBUG_ASSEMBLY=1` prints per-pass trace information.

use crate::engine::dispatch;
use crate::engine::policy::{BuildError, Policy, PolicyConfig};
use crate::engine::preassemble::replace_activities;
use crate::engine::registry::SiteVocabulary;
use crate::engine::sites::{LOCATION_SITE, location_state, mod_site_name, mutation_site};
use crate::model::{ActiveFormEntry, GroundingIndex, Model};
use crate::rules::helpers::BuildCtx;
use crate::statement::{Statement, StatementBody};

/// Compile a statement sequence into a fresh [`Model`].
pub(crate) fn build(
    statements: &[Statement],
    config: &PolicyConfig,
    default_initial_amount: f64,
) -> Result<Model, BuildError> {
    let debug = std::env::var_os("MEKANET_DEBUG_ASSEMBLY").is_some();

    let normalized = replace_activities(statements);
    if debug {
        eprintln!("[assemble] {} statements ({} after preassembly)", statements.len(), normalized.len());
    }
    config.validate(&normalized)?;
    let policies: Vec<Policy> = normalized.iter().map(|s| config.resolve(s)).collect();

    // Pass 1: accumulate the site vocabulary each agent needs, including
    // policy-specific implicit actors and binding sites.
    let mut vocab = SiteVocabulary::new();
    for (stmt, policy) in normalized.iter().zip(&policies) {
        if stmt.is_noop() {
            continue;
        }
        let generator = dispatch::lookup(stmt.kind(), policy.kind)?;
        (generator.monomers)(stmt, policy, &mut vocab);
    }

    // Pass 2: materialize every monomer before any rule references one.
    let mut model = Model::default();
    vocab.materialize_into(&mut model);
    if debug {
        eprintln!("[registry] {} monomers materialized", model.monomers.len());
    }

    // Rule generation, in input order.
    for (stmt, policy) in normalized.iter().zip(&policies) {
        if stmt.is_noop() {
            continue;
        }
        let generator = dispatch::lookup(stmt.kind(), policy.kind)?;
        let mut ctx = BuildCtx { model: &mut model, policy, stmt, debug };
        (generator.assemble)(&mut ctx);
    }
    if debug {
        eprintln!(
            "[rules] {} rules, {} parameters, {} expressions",
            model.rules.len(),
            model.parameters.len(),
            model.expressions.len()
        );
    }

    // Register active-form routes for grounded activity queries.
    for stmt in &normalized {
        if let StatementBody::ActiveForm { agent, activity, is_active } = &stmt.body {
            let mut site_conditions = Vec::new();
            for mc in &agent.mods {
                let (unmodified, modified) = mc.kind.states();
                let state = if mc.is_modified { modified } else { unmodified };
                site_conditions.push((mod_site_name(mc), state.to_string()));
            }
            for mc in &agent.mutations {
                let (site, state) = mutation_site(mc);
                site_conditions.push((site, state));
            }
            if let Some(loc) = &agent.location {
                site_conditions.push((LOCATION_SITE.to_string(), location_state(loc)));
            }
            model.active_forms.push(ActiveFormEntry {
                monomer: crate::engine::canon::canonicalize(&agent.name),
                activity: activity.clone(),
                is_active: *is_active,
                site_conditions,
            });
        }
    }

    // Every monomer starts at the default initial amount; context setting
    // can overwrite these afterwards.
    for idx in 0..model.monomers.len() {
        let name = format!("{}_0", model.monomers[idx].name);
        model.ensure_parameter(name, default_initial_amount);
    }

    model.grounding = GroundingIndex::build(&model.annotations);
    Ok(model)
}
