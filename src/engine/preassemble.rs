//! Statement preassembly: rewriting abstract activity conditions into the
//! concrete conditions that active-form assertions declare for them.
//!
//! An actor like "active MEK" says nothing structural. If the statement set
//! also asserts "MEK phosphorylated on S218 is active", the activity
//! condition is replaced by that phosphorylation condition before any rule
//! is generated. When several active forms match, the statement is expanded
//! into one copy per form, so every concrete route gets its own rules. When
//! none match, the activity condition stays and later compiles to an opaque
//! two-state site.
//!
//! The pass is idempotent: rewritten actors carry no activity condition, so
//! a second application finds nothing to do.

use crate::statement::{ActivityCondition, Agent, ConditionFlags, Statement, StatementBody};

/// Generic activity labels that match any declared activity kind.
const GENERIC_ACTIVITIES: [&str; 2] = ["activity", "active"];

struct ActiveFormRef<'a> {
    agent: &'a Agent,
    activity: &'a str,
    is_active: bool,
}

impl ActiveFormRef<'_> {
    fn matches(&self, actor: &Agent, condition: &ActivityCondition) -> bool {
        if self.agent.name != actor.name || self.is_active != condition.is_active {
            return false;
        }
        self.activity == condition.label
            || GENERIC_ACTIVITIES.contains(&condition.label.as_str())
            || GENERIC_ACTIVITIES.contains(&self.activity)
    }
}

/// Normalize a statement sequence by replacing activity conditions with the
/// concrete conditions active-form assertions declare. Fixed-point safe.
pub(crate) fn replace_activities(statements: &[Statement]) -> Vec<Statement> {
    let forms: Vec<ActiveFormRef<'_>> = statements
        .iter()
        .filter_map(|s| match &s.body {
            StatementBody::ActiveForm { agent, activity, is_active } => {
                Some(ActiveFormRef { agent, activity, is_active: *is_active })
            }
            _ => None,
        })
        .collect();

    let debug = std::env::var_os("MEKANET_DEBUG_ASSEMBLY").is_some();
    let mut normalized = Vec::with_capacity(statements.len());
    for stmt in statements {
        if matches!(stmt.body, StatementBody::ActiveForm { .. }) {
            normalized.push(stmt.clone());
            continue;
        }
        let expanded = expand_statement(stmt, &forms);
        if debug && (expanded.len() != 1 || expanded[0] != *stmt) {
            eprintln!("[preassemble] statement {} expanded into {} variant(s)", stmt.id, expanded.len());
        }
        normalized.extend(expanded);
    }
    normalized
}

/// Rewrite every activity-carrying actor of `stmt`, producing one statement
/// per combination of matching active forms.
fn expand_statement(stmt: &Statement, forms: &[ActiveFormRef<'_>]) -> Vec<Statement> {
    let agent_count = stmt.agents().len();
    let mut variants = vec![stmt.clone()];

    for idx in 0..agent_count {
        let mut next = Vec::new();
        for variant in &variants {
            let actor = variant.agents()[idx];
            // Cheap gate before touching the condition lists.
            if !actor.condition_flags().contains(ConditionFlags::ACTIVITY) {
                next.push(variant.clone());
                continue;
            }
            let Some(condition) = actor.activity.clone() else {
                next.push(variant.clone());
                continue;
            };
            let matching: Vec<&ActiveFormRef<'_>> =
                forms.iter().filter(|f| f.matches(actor, &condition)).collect();
            if matching.is_empty() {
                next.push(variant.clone());
                continue;
            }
            for form in matching {
                let rewritten = merge_form(actor, form.agent);
                let mut copy = variant.clone();
                if let Some(slot) = copy.agents_mut().into_iter().nth(idx) {
                    *slot = rewritten;
                }
                next.push(copy);
            }
        }
        variants = next;
    }
    variants
}

/// Replace `actor`'s activity condition with the concrete conditions of a
/// matching active form, keeping every other condition already present.
fn merge_form(actor: &Agent, form: &Agent) -> Agent {
    let mut merged = actor.clone();
    merged.activity = None;
    merged.mods.extend(form.mods.iter().cloned());
    merged.bound_conditions.extend(form.bound_conditions.iter().cloned());
    merged.mutations.extend(form.mutations.iter().cloned());
    if form.location.is_some() {
        merged.location = form.location.clone();
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{ModCondition, ModKind};

    #[test]
    fn location_form_replaces_activity() {
        let st1 = Statement::active_form(Agent::new("a").at_location("nucleus"), "activity", true);
        let st2 = Statement::phosphorylation(
            Some(Agent::new("a").with_activity("activity", true)),
            Agent::new("b"),
            None,
            None,
        );
        let normalized = replace_activities(&[st1, st2]);
        assert_eq!(normalized.len(), 2);
        match &normalized[1].body {
            StatementBody::Modification(m) => {
                let enz = m.enz.as_ref().unwrap();
                assert_eq!(enz.location.as_deref(), Some("nucleus"));
                assert!(enz.activity.is_none());
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn no_matching_form_leaves_activity_in_place() {
        let st = Statement::activation(Some(Agent::new("a").with_activity("activity", true)), Agent::new("b"));
        let st2 = Statement::activation(Some(Agent::new("c")), Agent::new("a"));
        let normalized = replace_activities(&[st.clone(), st2]);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0], st);
    }

    #[test]
    fn conditions_on_actor_are_preserved() {
        let pp = Agent::new("PPP2CA");
        let erk = Agent::new("ERK");
        let mek_form = Agent::new("MEK").modified(ModCondition::new(ModKind::Phosphorylation));
        let mek_actor = Agent::new("MEK").with_activity("activity", true).bound_to(pp, false);
        let st1 = Statement::phosphorylation(Some(mek_actor), erk, None, None);
        let st2 = Statement::active_form(mek_form, "activity", true);
        let normalized = replace_activities(&[st1, st2]);
        assert_eq!(normalized.len(), 2);
        match &normalized[0].body {
            StatementBody::Modification(m) => {
                let enz = m.enz.as_ref().unwrap();
                assert!(!enz.mods.is_empty());
                assert!(!enz.bound_conditions.is_empty());
                assert!(enz.activity.is_none());
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn multiple_forms_expand_the_statement() {
        let form1 = Statement::active_form(
            Agent::new("MEK").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("218"))),
            "activity",
            true,
        );
        let form2 = Statement::active_form(
            Agent::new("MEK").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("222"))),
            "activity",
            true,
        );
        let phos = Statement::phosphorylation(
            Some(Agent::new("MEK").with_activity("activity", true)),
            Agent::new("ERK"),
            Some("threonine"),
            Some("185"),
        );
        let normalized = replace_activities(&[form1, form2, phos]);
        // 2 active forms + 2 expanded copies of the phosphorylation.
        assert_eq!(normalized.len(), 4);
    }

    #[test]
    fn idempotent_on_normalized_sequences() {
        let st1 = Statement::active_form(Agent::new("a").at_location("nucleus"), "activity", true);
        let st2 = Statement::phosphorylation(
            Some(Agent::new("a").with_activity("activity", true)),
            Agent::new("b"),
            None,
            None,
        );
        let once = replace_activities(&[st1, st2]);
        let twice = replace_activities(&once);
        assert_eq!(once, twice);
    }
}
