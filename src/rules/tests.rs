use std::collections::{BTreeMap, HashSet};

use crate::model::{GroundingIndex, Monomer, RateLaw, SiteAnnotation, SiteCondition};
use crate::{
    Agent, Annotation, Assembler, ModCondition, ModKind, Model, MutCondition, Param, Policy,
    PolicyConfig, Statement, assemble, assemble_with, find_patterns, grounded_agents,
};

fn policy(name: &str) -> PolicyConfig {
    PolicyConfig::global(name).unwrap()
}

fn policy_map(entries: &[(&str, &str)]) -> PolicyConfig {
    let mut map = BTreeMap::new();
    for (key, name) in entries {
        map.insert(key.to_string(), Policy::parse(name).unwrap());
    }
    PolicyConfig::Map(map)
}

// --- Complex assembly --------------------------------------------------------

#[test]
fn complex_two_members() {
    let stmt = Statement::complex(vec![Agent::new("BRAF"), Agent::new("MEK1")]);
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn complex_three_members_is_quadratic() {
    let stmt = Statement::complex(vec![Agent::new("BRAF"), Agent::new("MEK1"), Agent::new("ERK1")]);
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 6);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn complex_member_bound_condition_adds_monomer() {
    let member1 = Agent::new("BRAF").bound_to(Agent::new("HRAS"), true);
    let stmt = Statement::complex(vec![member1, Agent::new("MEK1")]);
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn complex_two_step_matches_pairwise() {
    let stmt = Statement::complex(vec![Agent::new("BRAF"), Agent::new("MEK1")]);
    let model = assemble_with(vec![stmt], &policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn complex_multi_way_is_constant() {
    let stmt = Statement::complex(vec![Agent::new("BRAF"), Agent::new("MEK1"), Agent::new("ERK1")]);
    let model = assemble_with(vec![stmt], &policy("multi_way")).unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomers.len(), 3);
}

// --- Modification assembly ---------------------------------------------------

#[test]
fn active_form_alone_emits_no_rules() {
    let agent = Agent::new("BRAF").mutated(MutCondition::new(Some("600"), Some("V"), Some("E")));
    let stmt = Statement::active_form(agent, "activity", true);
    let model = assemble_with(vec![stmt], &policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 0);
    assert_eq!(model.monomers.len(), 1);
}

#[test]
fn missing_enzyme_is_a_silent_noop() {
    let stmt = Statement::phosphorylation(None, Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 0);
    assert_eq!(model.monomers.len(), 0);

    let stmt = Statement::dephosphorylation(None, Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 0);
    assert_eq!(model.monomers.len(), 0);
}

#[test]
fn phosphorylation_one_step() {
    let stmt = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn phosphorylation_with_bound_enzyme() {
    let enz = Agent::new("BRAF").bound_to(Agent::new("HRAS"), true);
    let stmt = Statement::phosphorylation(Some(enz), Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn phosphorylation_with_bound_both_sides() {
    let enz = Agent::new("BRAF").bound_to(Agent::new("HRAS"), true);
    let sub = Agent::new("MEK1").bound_to(Agent::new("ERK1"), true);
    let model =
        assemble(vec![Statement::phosphorylation(Some(enz), sub, Some("serine"), Some("222"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 4);

    let enz = Agent::new("BRAF").bound_to(Agent::new("HRAS"), true);
    let sub = Agent::new("MEK1").bound_to(Agent::new("ERK1"), false);
    let model =
        assemble(vec![Statement::phosphorylation(Some(enz), sub, Some("serine"), Some("222"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 4);
}

#[test]
fn autophosphorylation_variants() {
    let model = assemble(vec![Statement::autophosphorylation(
        Some(Agent::new("MEK1")),
        Some("serine"),
        Some("222"),
    )])
    .unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 1);

    let enz = Agent::new("MEK1").bound_to(Agent::new("RAF1"), true);
    let model = assemble(vec![Statement::autophosphorylation(Some(enz), Some("serine"), Some("222"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);

    let enz = Agent::new("EGFR").bound_to(Agent::new("EGFR"), true);
    let model = assemble(vec![Statement::autophosphorylation(Some(enz), Some("tyrosine"), None)]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 1);
}

#[test]
fn transphosphorylation_modifies_bound_partner() {
    let enz = Agent::new("EGFR").bound_to(Agent::new("EGFR"), true);
    let model = assemble(vec![Statement::transphosphorylation(Some(enz), Some("tyrosine"), None)]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 1);
    let rule = &model.rules[0];
    let partner = &rule.reactants[0].monomers[1];
    assert_eq!(partner.site_conditions.get("Y"), Some(&SiteCondition::state("u")));
}

#[test]
fn dephosphorylation_one_step() {
    let stmt = Statement::dephosphorylation(Some(Agent::new("PP2A")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);

    let sub = Agent::new("MEK1").bound_to(Agent::new("RAF1"), true);
    let stmt = Statement::dephosphorylation(Some(Agent::new("PP2A")), sub, Some("serine"), Some("222"));
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn modification_kinds_under_each_policy() {
    for kind in ModKind::ALL {
        for is_removal in [false, true] {
            let make = || {
                vec![Statement::modification(
                    kind,
                    is_removal,
                    Some(Agent::new("KRAS")),
                    Agent::new("BRAF"),
                    None,
                    None,
                )]
            };
            let model = assemble_with(make(), &policy("interactions_only")).unwrap();
            assert_eq!(model.rules.len(), 1);
            assert_eq!(model.monomers.len(), 2);

            let model = assemble_with(make(), &policy("one_step")).unwrap();
            assert_eq!(model.rules.len(), 1);
            assert_eq!(model.monomers.len(), 2);

            let model = assemble_with(make(), &policy("two_step")).unwrap();
            assert_eq!(model.rules.len(), 3);
            assert_eq!(model.monomers.len(), 2);
        }
    }
}

#[test]
fn phosphorylation_two_step() {
    let stmt = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let model = assemble_with(vec![stmt], &policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 3);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn two_step_mixed_with_complex() {
    let st1 = Statement::complex(vec![Agent::new("BRAF"), Agent::new("RAF1")]);
    let st2 = Statement::phosphorylation(Some(Agent::new("MAP2K1")), Agent::new("MAPK3"), None, None);
    let model = assemble_with(vec![st1, st2], &policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 5);
    assert_eq!(model.monomers.len(), 4);
}

#[test]
fn atp_dependent_expands_to_five_rules() {
    let stmt = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK"), Some("S"), Some("222"));
    let model = assemble_with(vec![stmt], &policy("atp_dependent")).unwrap();
    assert_eq!(model.rules.len(), 5);
    assert!(model.monomer("ATP").is_some());
}

// --- Active forms and the preassembler ---------------------------------------

#[test]
fn shared_active_form_without_activity_condition() {
    let mek = Agent::new("MEK");
    let erk = Agent::new("ERK");
    let form = Agent::new("MEK")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("218")))
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("222")));
    let statements = vec![
        Statement::active_form(form, "activity", true),
        Statement::phosphorylation(Some(mek.clone()), erk.clone(), Some("threonine"), Some("185")),
        Statement::phosphorylation(Some(mek), erk, Some("tyrosine"), Some("187")),
    ];
    let mut pa = Assembler::new(statements);
    let model = pa.make_model().unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomers.len(), 2);
    let model = pa.make_model_with(&policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 5);
}

#[test]
fn active_forms_expand_activity_bearing_actors() {
    let mek_active = Agent::new("MEK").with_activity("activity", true);
    let erk = Agent::new("ERK");
    let statements = vec![
        Statement::active_form(
            Agent::new("MEK").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("218"))),
            "activity",
            true,
        ),
        Statement::active_form(
            Agent::new("MEK").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("222"))),
            "activity",
            true,
        ),
        Statement::phosphorylation(Some(mek_active.clone()), erk.clone(), Some("threonine"), Some("185")),
        Statement::phosphorylation(Some(mek_active), erk, Some("tyrosine"), Some("187")),
    ];
    let mut pa = Assembler::new(statements);
    let model = pa.make_model().unwrap();
    assert_eq!(model.rules.len(), 4);
    assert_eq!(model.monomers.len(), 2);
    let model = pa.make_model_with(&policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 9);
}

#[test]
fn negated_active_form_constrains_reactant() {
    let form = Agent::new("BRAF")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("123")).negated());
    let st1 = Statement::active_form(form, "activity", true);
    let braf = Agent::new("BRAF").with_activity("active", true);
    let st2 = Statement::phosphorylation(Some(braf), Agent::new("MAP2K2"), None, None);
    let model = assemble_with(vec![st1, st2], &policy("one_step")).unwrap();
    assert_eq!(model.rules.len(), 1);
    let enz = &model.rules[0].reactants[0].monomers[0];
    assert_eq!(enz.monomer, "BRAF");
    assert_eq!(enz.site_conditions, sites! { "S123" => SiteCondition::state("u") });
}

// --- Agent condition encoding in patterns ------------------------------------

#[test]
fn positive_agent_modification() {
    let enz = Agent::new("BRAF").modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("123")));
    let model = assemble_with(
        vec![Statement::phosphorylation(Some(enz), Agent::new("MAP2K2"), None, None)],
        &policy("one_step"),
    )
    .unwrap();
    assert_eq!(model.rules.len(), 1);
    let braf = &model.rules[0].reactants[0].monomers[0];
    assert_eq!(braf.monomer, "BRAF");
    assert_eq!(braf.site_conditions, sites! { "S123" => SiteCondition::state("p") });
}

#[test]
fn negative_agent_modification() {
    let enz = Agent::new("BRAF")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("serine"), Some("123")).negated());
    let model = assemble_with(
        vec![Statement::phosphorylation(Some(enz), Agent::new("MAP2K2"), None, None)],
        &policy("one_step"),
    )
    .unwrap();
    let braf = &model.rules[0].reactants[0].monomers[0];
    assert_eq!(braf.site_conditions, sites! { "S123" => SiteCondition::state("u") });
}

#[test]
fn mutation_site_conditions() {
    let cases = [
        (MutCondition::new(Some("600"), Some("V"), Some("E")), "V600", "E"),
        (MutCondition::new(Some("600"), Some("V"), None), "V600", "X"),
        (MutCondition::new(Some("600"), None, Some("E")), "mut600", "E"),
        (MutCondition::new(None, Some("V"), Some("E")), "V", "E"),
        (MutCondition::new(None, None, None), "mut", "X"),
    ];
    for (mutation, site, state) in cases {
        let enz = Agent::new("BRAF").mutated(mutation);
        let model =
            assemble(vec![Statement::phosphorylation(Some(enz), Agent::new("MEK"), None, None)]).unwrap();
        assert_eq!(model.rules.len(), 1);
        let braf = &model.rules[0].reactants[0].monomers[0];
        assert_eq!(braf.monomer, "BRAF");
        assert_eq!(braf.site_conditions, sites! { site => SiteCondition::state(state) });
    }
}

#[test]
fn agent_location_condition() {
    let enz = Agent::new("BRAF").at_location("cytoplasm");
    let model = assemble(vec![Statement::phosphorylation(Some(enz), Agent::new("MEK"), None, None)]).unwrap();
    assert_eq!(model.rules.len(), 1);
    let braf = &model.rules[0].reactants[0].monomers[0];
    assert_eq!(braf.site_conditions, sites! { "loc" => SiteCondition::state("cytoplasm") });
}

// --- Translocation and conversion --------------------------------------------

#[test]
fn translocation_explicit_source() {
    let model = assemble(vec![Statement::translocation(
        Agent::new("FOXO3A"),
        Some("nucleus"),
        Some("cytoplasm"),
    )])
    .unwrap();
    assert_eq!(model.rules.len(), 1);
    let rule = &model.rules[0];
    assert_eq!(
        rule.reactants[0].monomers[0].site_conditions,
        sites! { "loc" => SiteCondition::state("nucleus") }
    );
    assert_eq!(
        rule.products[0].monomers[0].site_conditions,
        sites! { "loc" => SiteCondition::state("cytoplasm") }
    );
    assert_eq!(rule.rate, RateLaw::Param("kf_foxo3a_nucleus_cytoplasm_1".to_string()));
    assert!(model.parameter("kf_foxo3a_nucleus_cytoplasm_1").is_some());
}

#[test]
fn translocation_default_source_is_cytoplasm() {
    let model =
        assemble(vec![Statement::translocation(Agent::new("FOXO3A"), None, Some("nucleus"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    let rule = &model.rules[0];
    assert_eq!(
        rule.reactants[0].monomers[0].site_conditions,
        sites! { "loc" => SiteCondition::state("cytoplasm") }
    );
    assert_eq!(
        rule.products[0].monomers[0].site_conditions,
        sites! { "loc" => SiteCondition::state("nucleus") }
    );
    assert_eq!(rule.rate, RateLaw::Param("kf_foxo3a_cytoplasm_nucleus_1".to_string()));
}

#[test]
fn translocation_canonicalizes_compartments() {
    let model = assemble(vec![Statement::translocation(
        Agent::new("KSR1"),
        Some("cytoplasm"),
        Some("cell surface"),
    )])
    .unwrap();
    assert_eq!(model.rules.len(), 1);
    let rule = &model.rules[0];
    assert_eq!(
        rule.products[0].monomers[0].site_conditions,
        sites! { "loc" => SiteCondition::state("cell_surface") }
    );
    assert_eq!(rule.rate, RateLaw::Param("kf_ksr1_cytoplasm_cell_surface_1".to_string()));
}

#[test]
fn conversion_without_subject() {
    let stmt = Statement::conversion(None, vec![Agent::new("PIP2")], vec![Agent::new("PIP3")]);
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.parameters.len(), 3);
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn conversion_with_subject() {
    let stmt =
        Statement::conversion(Some(Agent::new("PIK3CA")), vec![Agent::new("PIP2")], vec![Agent::new("PIP3")]);
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.parameters.len(), 4);
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 3);
    // Catalyst appears unchanged on both sides.
    let rule = &model.rules[0];
    assert_eq!(rule.reactants.len(), 2);
    assert_eq!(rule.products.len(), 2);
}

// --- Regulation --------------------------------------------------------------

#[test]
fn activation_with_bound_subject() {
    let subj = Agent::new("GRB2").bound_to(Agent::new("EGFR"), true);
    let model = assemble(vec![Statement::activation(Some(subj), Agent::new("SOS1"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn activation_and_inhibition_policies() {
    for name in ["interactions_only", "one_step"] {
        let model = assemble_with(
            vec![Statement::activation(Some(Agent::new("KRAS")), Agent::new("BRAF"))],
            &policy(name),
        )
        .unwrap();
        assert_eq!(model.rules.len(), 1);
        assert_eq!(model.monomers.len(), 2);

        let model = assemble_with(
            vec![Statement::inhibition(Some(Agent::new("Vemurafenib")), Agent::new("BRAF"))],
            &policy(name),
        )
        .unwrap();
        assert_eq!(model.rules.len(), 1);
        assert_eq!(model.monomers.len(), 2);
    }
}

#[test]
fn activation_with_named_activities_builds_under_all_policies() {
    for name in ["interactions_only", "one_step", "two_step"] {
        let c8 = Agent::new("CASP8").with_activity("catalytic", true);
        let stmt = Statement::regulate_activity(Some(c8), Agent::new("CASP3"), "catalytic", true);
        assemble_with(vec![stmt], &policy(name)).unwrap();

        let p53 = Agent::new("TP53").with_activity("transcription", true);
        let stmt = Statement::activation(Some(p53), Agent::new("BAX"));
        assemble_with(vec![stmt], &policy(name)).unwrap();
    }
}

#[test]
fn gef_and_gap() {
    let model = assemble(vec![Statement::gef(Some(Agent::new("SOS1")), Agent::new("HRAS"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);
    assert_eq!(model.rules[0].name, "SOS1_activates_HRAS_gtpbound");

    let model = assemble(vec![Statement::gap(Some(Agent::new("NF1")), Agent::new("HRAS"))]).unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);
    assert_eq!(model.rules[0].name, "NF1_deactivates_HRAS_gtpbound");
}

#[test]
fn activation_subject_without_declared_activity() {
    let model = assemble(vec![Statement::activation(Some(Agent::new("a")), Agent::new("b"))]).unwrap();
    assert!(model.monomer("a").unwrap().sites.is_empty());
    let rule = &model.rules[0];
    assert!(rule.reactants[0].monomers[0].site_conditions.is_empty());
    assert!(rule.products[0].monomers[0].site_conditions.is_empty());
}

#[test]
fn activation_subject_with_explicit_active_form() {
    let subj = Agent::new("a").with_activity("activity", true);
    let st = Statement::activation(Some(subj), Agent::new("b"));
    let st2 = Statement::active_form(
        Agent::new("a").modified(ModCondition::new(ModKind::Phosphorylation)),
        "activity",
        true,
    );
    let model = assemble(vec![st, st2]).unwrap();
    assert_eq!(model.monomer("a").unwrap().sites, ["phospho"]);
    let rule = &model.rules[0];
    assert_eq!(
        rule.reactants[0].monomers[0].site_conditions,
        sites! { "phospho" => SiteCondition::state("p") }
    );
    assert_eq!(
        rule.products[0].monomers[0].site_conditions,
        sites! { "phospho" => SiteCondition::state("p") }
    );
}

#[test]
fn activation_subject_with_implicit_activity_only() {
    let subj = Agent::new("a").with_activity("activity", true);
    let st = Statement::activation(Some(subj), Agent::new("b"));
    let st2 = Statement::activation(Some(Agent::new("c")), Agent::new("a"));
    let model = assemble(vec![st, st2]).unwrap();
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.monomer("a").unwrap().sites, ["activity"]);
    let rule = &model.rules[0];
    assert_eq!(
        rule.reactants[0].monomers[0].site_conditions,
        sites! { "activity" => SiteCondition::state("active") }
    );
    assert_eq!(
        rule.products[0].monomers[0].site_conditions,
        sites! { "activity" => SiteCondition::state("active") }
    );
}

#[test]
fn explicit_active_form_wins_over_opaque_site() {
    let subj = Agent::new("a").with_activity("activity", true);
    let st = Statement::activation(Some(subj), Agent::new("b"));
    let st2 = Statement::activation(Some(Agent::new("c")), Agent::new("a"));
    let st3 = Statement::active_form(
        Agent::new("a").modified(ModCondition::new(ModKind::Phosphorylation)),
        "activity",
        true,
    );
    let model = assemble(vec![st, st2, st3]).unwrap();
    let a = model.monomer("a").unwrap();
    let sites: HashSet<&str> = a.sites.iter().map(String::as_str).collect();
    assert_eq!(sites, HashSet::from(["activity", "phospho"]));
    let rule = &model.rules[0];
    assert_eq!(
        rule.reactants[0].monomers[0].site_conditions,
        sites! { "phospho" => SiteCondition::state("p") }
    );
}

// --- Amount regulation -------------------------------------------------------

#[test]
fn amount_regulation_one_step() {
    for increase in [true, false] {
        let make = |subj| {
            if increase {
                Statement::increase_amount(subj, Agent::new("BRAF"))
            } else {
                Statement::decrease_amount(subj, Agent::new("BRAF"))
            }
        };
        let model =
            assemble_with(vec![make(Some(Agent::new("KRAS"))), make(None)], &policy("one_step")).unwrap();
        assert_eq!(model.rules.len(), 2);
        assert_eq!(model.monomers.len(), 2);
    }
}

#[test]
fn amount_regulation_interactions_only_skips_subjectless() {
    for increase in [true, false] {
        let make = |subj| {
            if increase {
                Statement::increase_amount(subj, Agent::new("BRAF"))
            } else {
                Statement::decrease_amount(subj, Agent::new("BRAF"))
            }
        };
        let model = assemble_with(
            vec![make(Some(Agent::new("KRAS"))), make(None)],
            &policy("interactions_only"),
        )
        .unwrap();
        assert_eq!(model.rules.len(), 1);
        assert_eq!(model.monomers.len(), 2);
    }
}

// --- Rate-law policies -------------------------------------------------------

#[test]
fn michaelis_menten_modification_parameters() {
    let stmt = Statement::phosphorylation(Some(Agent::new("MEK")), Agent::new("ERK"), None, None);
    let model = assemble_with(vec![stmt], &policy("michaelis_menten")).unwrap();
    assert_eq!(model.parameters.len(), 4);
    assert_eq!(model.expressions.len(), 1);
    assert!(matches!(model.rules[0].rate, RateLaw::Expr(_)));

    let stmt = Statement::modification(
        ModKind::Ubiquitination,
        true,
        Some(Agent::new("MEK")),
        Agent::new("ERK"),
        None,
        None,
    );
    let model = assemble_with(vec![stmt], &policy("michaelis_menten")).unwrap();
    assert_eq!(model.parameters.len(), 4);
}

#[test]
fn michaelis_menten_regulation_parameters() {
    let stmt = Statement::activation(Some(Agent::new("MEK")), Agent::new("ERK"));
    let stmt2 = Statement::inhibition(Some(Agent::new("DUSP")), Agent::new("ERK"));
    let model = assemble_with(vec![stmt, stmt2], &policy("michaelis_menten")).unwrap();
    assert_eq!(model.parameters.len(), 7);
}

#[test]
fn hill_amount_regulation_parameters() {
    let stmt = Statement::increase_amount(Some(Agent::new("TP53")), Agent::new("MDM2"));
    let model = assemble_with(vec![stmt], &policy("hill")).unwrap();
    assert_eq!(model.parameters.len(), 5);
    assert_eq!(model.expressions.len(), 1);
}

// --- Policy configuration ----------------------------------------------------

#[test]
fn statement_kind_policies() {
    let st1 = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let st2 = Statement::dephosphorylation(Some(Agent::new("PP2A")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let config = policy_map(&[("Phosphorylation", "two_step"), ("Dephosphorylation", "interactions_only")]);
    let model = assemble_with(vec![st1, st2], &config).unwrap();
    assert_eq!(model.rules.len(), 4);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn other_key_covers_unlisted_kinds() {
    let st1 = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let st2 = Statement::dephosphorylation(Some(Agent::new("PP2A")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let config = policy_map(&[("Phosphorylation", "two_step"), ("other", "interactions_only")]);
    let model = assemble_with(vec![st1, st2], &config).unwrap();
    assert_eq!(model.rules.len(), 4);
    assert_eq!(model.monomers.len(), 3);
}

#[test]
fn rebuild_without_policy_reverts_to_default() {
    let stmt = Statement::phosphorylation(Some(Agent::new("BRAF")), Agent::new("MEK1"), Some("serine"), Some("222"));
    let mut pa = Assembler::new(vec![stmt]);
    let model = pa.make_model_with(&policy("two_step")).unwrap();
    assert_eq!(model.rules.len(), 3);
    // This call must revert to the default policy, with no leakage from the
    // previous build.
    let model = pa.make_model().unwrap();
    assert_eq!(model.rules.len(), 1);
    assert_eq!(model.monomers.len(), 2);
}

#[test]
fn per_statement_policy_object() {
    let stmt = Statement::phosphorylation(Some(Agent::new("a")), Agent::new("b"), None, None);
    let pol = Policy::parse("two_step").unwrap();
    assert_eq!(pol.to_string(), "Policy(two_step)");
    let mut map = BTreeMap::new();
    map.insert(stmt.id.clone(), pol);
    let model = assemble_with(vec![stmt], &PolicyConfig::Map(map)).unwrap();
    assert_eq!(model.rules.len(), 3);
}

#[test]
fn policy_parameter_overrides() {
    let pol = Policy::parse("two_step")
        .unwrap()
        .with_parameter("kf", Param::new("a", 1.0))
        .with_parameter("kr", Param::new("b", 2.0))
        .with_parameter("kc", Param::new("c", 3.0));
    let stmt = Statement::modification(
        ModKind::Ubiquitination,
        true,
        Some(Agent::new("a")),
        Agent::new("b"),
        None,
        None,
    );
    let mut map = BTreeMap::new();
    map.insert(stmt.id.clone(), pol);
    let model = assemble_with(vec![stmt], &PolicyConfig::Map(map)).unwrap();
    assert_eq!(model.parameter("c").unwrap().value, 3.0);
}

#[test]
fn unmatched_policy_key_is_fatal() {
    let stmt = Statement::phosphorylation(Some(Agent::new("a")), Agent::new("b"), None, None);
    let mut map = BTreeMap::new();
    map.insert("xyz".to_string(), Policy::parse("two_step").unwrap());
    let err = assemble_with(vec![stmt], &PolicyConfig::Map(map)).unwrap_err();
    assert_eq!(err, crate::BuildError::UnknownPolicyKey("xyz".to_string()));
}

#[test]
fn one_step_parameter_override() {
    let stmt = Statement::phosphorylation(Some(Agent::new("a")), Agent::new("b"), None, None);
    let pol = Policy::parse("one_step").unwrap().with_parameter("kf", Param::new("my_kf_param", 0.99));
    let mut map = BTreeMap::new();
    map.insert(stmt.id.clone(), pol);
    let model = assemble_with(vec![stmt], &PolicyConfig::Map(map)).unwrap();
    assert_eq!(model.parameter("my_kf_param").unwrap().value, 0.99);
}

#[test]
fn multiple_policy_objects() {
    let pol1 = Policy::parse("michaelis_menten")
        .unwrap()
        .with_parameter("Km", Param::new("my_Km", 1.0))
        .with_parameter("kc", Param::new("my_kc", 1e-1));
    let pol2 = Policy::parse("one_step").unwrap().with_parameter("kf", Param::new("d", 10.0));
    let stmt1 = Statement::inhibition(Some(Agent::new("a")), Agent::new("b"));
    let stmt2 = Statement::translocation(Agent::new("a"), Some("cytoplasm"), Some("nucleus"));
    let mut map = BTreeMap::new();
    map.insert(stmt1.id.clone(), pol1);
    map.insert(stmt2.id.clone(), pol2);
    let model = assemble_with(vec![stmt1, stmt2], &PolicyConfig::Map(map)).unwrap();
    assert_eq!(model.parameter("d").unwrap().value, 10.0);
    assert_eq!(model.parameter("my_Km").unwrap().value, 1.0);
    assert!(model.expression("a_deactivates_b_activity_rate").is_some());
}

// --- Rule names --------------------------------------------------------------

#[test]
fn activity_conditions_encode_into_rule_names() {
    let stmt = Statement::phosphorylation(
        Some(Agent::new("BRAF").with_activity("kinase", true)),
        Agent::new("MAP2K1").with_activity("activity", false),
        None,
        None,
    );
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.rules[0].name, "BRAF_kin_phosphorylation_MAP2K1_act_inact_phospho");
}

#[test]
fn canonicalized_monomer_names() {
    let stmt = Statement::phosphorylation(Some(Agent::new("14-3-3")), Agent::new("BRAF kinase"), None, None);
    let model = assemble(vec![stmt]).unwrap();
    let names: Vec<&str> = model.monomers.iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"BRAF_kinase"));
    assert!(names.contains(&"p14_3_3"));
}

// --- Annotations -------------------------------------------------------------

#[test]
fn grounded_modification_annotation_count() {
    let stmt = Statement::phosphorylation(
        Some(Agent::new("BRAF").grounded("UP", "P15056")),
        Agent::new("MAP2K2").grounded("HGNC", "6842"),
        None,
        None,
    );
    let model = assemble(vec![stmt]).unwrap();
    assert_eq!(model.annotations.len(), 5);
}

#[test]
fn amount_regulation_annotation_count() {
    let st1 = Statement::increase_amount(
        Some(Agent::new("BRAF").grounded("UP", "P15056")),
        Agent::new("MAP2K2").grounded("HGNC", "6842"),
    );
    let st2 = Statement::decrease_amount(
        Some(Agent::new("BRAF").grounded("UP", "P15056")),
        Agent::new("MAP2K2").grounded("HGNC", "6842"),
    );
    let model = assemble(vec![st1, st2]).unwrap();
    assert_eq!(model.annotations.len(), 8);
}

#[test]
fn rule_provenance_round_trip() {
    let a = Agent::new("A").grounded("HGNC", "1234");
    let b = Agent::new("B").grounded("HGNC", "5678");

    let check = |stmt: Statement, config: &PolicyConfig| {
        let model = assemble_with(vec![stmt], config).unwrap();
        let subj: Vec<&str> = model
            .annotations
            .iter()
            .filter(|ann| ann.predicate == "rule_has_subject")
            .map(|ann| ann.object.as_str())
            .collect();
        let obj: Vec<&str> = model
            .annotations
            .iter()
            .filter(|ann| ann.predicate == "rule_has_object")
            .map(|ann| ann.object.as_str())
            .collect();
        assert_eq!(subj, ["A"]);
        assert_eq!(obj, ["B"]);
    };

    for kind in ModKind::ALL {
        for is_removal in [false, true] {
            for config in ["one_step", "two_step"] {
                let stmt =
                    Statement::modification(kind, is_removal, Some(a.clone()), b.clone(), None, None);
                check(stmt, &policy(config));
            }
        }
    }
    check(
        Statement::phosphorylation(Some(a.clone()), b.clone(), None, None),
        &policy("atp_dependent"),
    );
    check(Statement::activation(Some(a), b), &policy("one_step"));
}

// --- Grounded pattern queries ------------------------------------------------

#[test]
fn grounding_survives_every_policy() {
    let a = Agent::new("MEK1").grounded("HGNC", "6840");
    let b = Agent::new("ERK2").grounded("HGNC", "6871");
    let query = Agent::new("Foo").grounded("HGNC", "6871").modified(ModCondition::new(ModKind::Phosphorylation));
    for name in ["one_step", "interactions_only", "two_step", "atp_dependent"] {
        let stmt = Statement::phosphorylation(Some(a.clone()), b.clone(), Some("T"), Some("185"));
        let model = assemble_with(vec![stmt], &policy(name)).unwrap();
        let mps = find_patterns(&model, &query);
        assert_eq!(mps.len(), 1, "policy {name}");
        assert_eq!(mps[0].monomer, "ERK2");
        assert_eq!(mps[0].site_conditions, sites! { "T185" => SiteCondition::state("p") });
    }
}

#[test]
fn underspecified_modification_fans_out() {
    let a = Agent::new("MEK1")
        .grounded("HGNC", "6840")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("S"), Some("218")))
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("S"), Some("222")));
    let b = Agent::new("ERK2").grounded("HGNC", "6871");
    let stmt = Statement::phosphorylation(Some(a.clone()), b, Some("T"), Some("185"));
    let model = assemble_with(vec![stmt], &policy("one_step")).unwrap();

    let fuzzy = Agent::new("Foo").grounded("HGNC", "6840").modified(ModCondition::new(ModKind::Phosphorylation));
    let mps = find_patterns(&model, &fuzzy);
    assert_eq!(mps.len(), 2);
    assert!(mps.iter().all(|mp| mp.monomer == "MEK1"));
    let conditions: Vec<_> = mps.iter().map(|mp| mp.site_conditions.clone()).collect();
    assert!(conditions.contains(&sites! { "S218" => SiteCondition::state("p") }));
    assert!(conditions.contains(&sites! { "S222" => SiteCondition::state("p") }));

    // Fully specified modifications constrain one joint pattern.
    let mps = find_patterns(&model, &a);
    assert_eq!(mps.len(), 1);
    assert_eq!(mps[0].monomer, "MEK1");
    assert_eq!(
        mps[0].site_conditions,
        sites! { "S218" => SiteCondition::state("p"), "S222" => SiteCondition::state("p") }
    );
}

#[test]
fn multiple_underspecified_modifications_fan_out_jointly() {
    let mek = Agent::new("MEK1").grounded("HGNC", "6840");
    let erk = Agent::new("ERK2").grounded("HGNC", "6871");
    let cbl = Agent::new("CBL").grounded("HGNC", "1541");
    let query = Agent::new("ERK2")
        .grounded("HGNC", "6871")
        .modified(ModCondition::new(ModKind::Phosphorylation))
        .modified(ModCondition::new(ModKind::Ubiquitination));
    let statements = vec![
        Statement::phosphorylation(Some(mek.clone()), erk.clone(), Some("T"), Some("185")),
        Statement::phosphorylation(Some(mek), erk.clone(), Some("Y"), Some("187")),
        Statement::modification(ModKind::Ubiquitination, false, Some(cbl.clone()), erk.clone(), Some("K"), Some("40")),
        Statement::modification(ModKind::Ubiquitination, false, Some(cbl), erk, Some("K"), Some("50")),
    ];
    let model = assemble_with(statements, &policy("one_step")).unwrap();
    let mps = find_patterns(&model, &query);
    assert_eq!(mps.len(), 4);
    assert!(mps.iter().all(|mp| mp.monomer == "ERK2"));
}

#[test]
fn unmatched_identity_returns_empty() {
    let a = Agent::new("A").grounded("HGNC", "6840");
    let b = Agent::new("B").grounded("HGNC", "5678");
    let model = assemble(vec![Statement::phosphorylation(Some(a), b, Some("S"), Some("100"))]).unwrap();
    let foo = Agent::new("Foo").grounded("HGNC", "foo");
    assert!(find_patterns(&model, &foo).is_empty());
}

#[test]
fn activity_query_uses_registered_active_forms() {
    let a = Agent::new("A").grounded("HGNC", "1234");
    let b = Agent::new("B").grounded("HGNC", "5678");
    let b_phos = Agent::new("B")
        .grounded("HGNC", "5678")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("S"), Some("100")));
    let b_act = Agent::new("B").grounded("HGNC", "5678").with_activity("activity", true);
    let statements = vec![
        Statement::phosphorylation(Some(a), b, Some("S"), Some("100")),
        Statement::active_form(b_phos, "activity", true),
    ];
    let model = assemble_with(statements, &policy("one_step")).unwrap();
    let mps = find_patterns(&model, &b_act);
    assert_eq!(mps.len(), 1);
    assert_eq!(mps[0].site_conditions, sites! { "S100" => SiteCondition::state("p") });
}

#[test]
fn hand_built_model_identity_lookup() {
    let mut model = Model::default();
    model.monomers.push(Monomer {
        name: "A_monomer".to_string(),
        sites: vec![],
        site_states: BTreeMap::new(),
        site_annotations: vec![],
    });
    model.monomers.push(Monomer {
        name: "B_monomer".to_string(),
        sites: vec![],
        site_states: BTreeMap::new(),
        site_annotations: vec![],
    });
    model.annotations.push(Annotation::new("A_monomer", "https://identifiers.org/hgnc:6840", "is"));
    model.annotations.push(Annotation::new("B_monomer", "https://identifiers.org/hgnc:6871", "is"));
    model.grounding = GroundingIndex::build(&model.annotations);

    let foo = Agent::new("Foo").grounded("HGNC", "foo");
    assert!(find_patterns(&model, &foo).is_empty());
    let a = Agent::new("A").grounded("HGNC", "6840");
    let mps = find_patterns(&model, &a);
    assert_eq!(mps.len(), 1);
    assert_eq!(mps[0].monomer, "A_monomer");
    let b = Agent::new("B").grounded("HGNC", "6871");
    let mps = find_patterns(&model, &b);
    assert_eq!(mps.len(), 1);
    assert_eq!(mps[0].monomer, "B_monomer");
}

#[test]
fn hand_built_model_site_annotation_fan_out() {
    let site_ann = |site: &str, state: Option<&str>, object: &str, predicate: &str| SiteAnnotation {
        site: site.to_string(),
        state: state.map(str::to_string),
        object: object.to_string(),
        predicate: predicate.to_string(),
    };
    let mut model = Model::default();
    model.monomers.push(Monomer {
        name: "A_monomer".to_string(),
        sites: vec!["phospho".to_string(), "T185".to_string(), "Y187".to_string()],
        site_states: BTreeMap::from([
            ("phospho".to_string(), vec!["u".to_string(), "p".to_string()]),
            ("T185".to_string(), vec!["u".to_string(), "p".to_string()]),
            ("Y187".to_string(), vec!["u".to_string(), "p".to_string()]),
        ]),
        site_annotations: vec![
            site_ann("phospho", Some("p"), "phosphorylation", "is_modification"),
            site_ann("T185", Some("p"), "phosphorylation", "is_modification"),
            site_ann("Y187", Some("p"), "phosphorylation", "is_modification"),
            site_ann("T185", None, "T", "is_residue"),
            site_ann("T185", None, "185", "is_position"),
            site_ann("Y187", None, "Y", "is_residue"),
            site_ann("Y187", None, "187", "is_position"),
        ],
    });
    model.annotations.push(Annotation::new("A_monomer", "https://identifiers.org/hgnc:6840", "is"));
    model.grounding = GroundingIndex::build(&model.annotations);

    let fuzzy = Agent::new("A").grounded("HGNC", "6840").modified(ModCondition::new(ModKind::Phosphorylation));
    assert_eq!(find_patterns(&model, &fuzzy).len(), 3);

    let exact = Agent::new("A")
        .grounded("HGNC", "6840")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("Y"), Some("187")));
    let mps = find_patterns(&model, &exact);
    assert_eq!(mps.len(), 1);
    assert_eq!(mps[0].monomer, "A_monomer");
    assert_eq!(mps[0].site_conditions, sites! { "Y187" => SiteCondition::state("p") });
}

#[test]
fn grounded_agents_reverse_query() {
    let mek = Agent::new("MEK1").grounded("HGNC", "6840");
    let erk = Agent::new("ERK2").grounded("HGNC", "6871");
    let erk_phos = Agent::new("ERK2")
        .grounded("HGNC", "6871")
        .modified(ModCondition::new(ModKind::Phosphorylation));
    let erk_phos_y187 = Agent::new("ERK2")
        .grounded("HGNC", "6871")
        .modified(ModCondition::on(ModKind::Phosphorylation, Some("Y"), Some("187")));
    let statements = vec![
        Statement::phosphorylation(Some(mek.clone()), erk.clone(), None, None),
        Statement::phosphorylation(Some(mek.clone()), erk, Some("Y"), Some("187")),
    ];
    let model = assemble(statements).unwrap();
    let (agents_by_pattern, patterns_by_rule) = grounded_agents(&model);
    assert_eq!(patterns_by_rule.len(), model.rules.len());

    let model_keys: HashSet<String> =
        agents_by_pattern.values().map(|agent| agent.matches_key()).collect();
    let expected = [mek.matches_key(), erk_phos.matches_key(), erk_phos_y187.matches_key()];
    assert!(expected.iter().all(|key| model_keys.contains(key)));
}
