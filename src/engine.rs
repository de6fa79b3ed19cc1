//! Statement-to-model compilation engine.
//!
//! This module is the internal entry point for the assembler. The engine is
//! split into focused submodules under `src/engine/` while keeping paths
//! stable (for example `crate::engine::assembler::build`).
//!
//! ## How the parts work together
//!
//! Compiling a statement sequence is a pipeline:
//!
//! ```text
//! statements ──┐
//!              │  replace_activities        (preassemble.rs)
//!              └──────────────┬────────────
//!                             │
//! policy config ── validate ──┼─ resolve per-statement policies (policy.rs)
//!                             │
//!                             ▼
//!              registry two-pass scan       (registry.rs, sites.rs, canon.rs)
//!                - discover site vocabulary per agent
//!                - materialize monomers once, before any rule
//!                             │
//!                             ▼
//!              per-statement generators     (dispatch.rs -> crate::rules)
//!                - rules, parameters, expressions
//!                - provenance annotations   (annotations.rs)
//!                             │
//!                             ▼
//!              grounding index + queries    (grounding.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `canon.rs`: free text -> structural identifiers, pure and deterministic.
//! - `preassemble.rs`: rewrites activity conditions into concrete conditions
//!   declared by active-form assertions; idempotent.
//! - `sites.rs`: condition -> (site, state) naming, and the compact agent
//!   encoding used in rule names.
//! - `registry.rs`: two-pass monomer accumulation; fresh per build call.
//! - `policy.rs`: policy lookup precedence and configuration errors.
//! - `dispatch.rs`: exhaustive static table from (statement kind, policy) to
//!   generator functions.
//! - `annotations.rs`: identity, site, and provenance annotation emission.
//! - `assembler.rs`: the sequential build loop tying the passes together.
//! - `grounding.rs`: reverse lookup from external identities to patterns.
//!
//! ## Adding new statement kinds / policies
//!
//! - Add the variant in `crate::statement`, the generator functions under
//!   `src/rules/**`, and decide every (kind, policy) combination in
//!   `dispatch.rs`; the match is exhaustive, so the compiler walks you
//!   through the rest.
//!
//! ## Debugging
//!
//! Set `MEKANET_DEBUG_ASSEMBLY=1` to print preassembly, registry, and rule
//! generation traces.

#[path = "engine/annotations.rs"]
pub(crate) mod annotations;
#[path = "engine/assembler.rs"]
pub(crate) mod assembler;
#[path = "engine/canon.rs"]
pub(crate) mod canon;
#[path = "engine/dispatch.rs"]
pub(crate) mod dispatch;
#[path = "engine/grounding.rs"]
pub(crate) mod grounding;
#[path = "engine/policy.rs"]
pub(crate) mod policy;
#[path = "engine/preassemble.rs"]
pub(crate) mod preassemble;
#[path = "engine/registry.rs"]
pub(crate) mod registry;
#[path = "engine/sites.rs"]
pub(crate) mod sites;
