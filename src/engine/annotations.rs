//! Annotation emission: provenance and grounding metadata attached to
//! monomers, sites, and rules as they are generated.
//!
//! Identity annotations use identifiers.org URLs so that grounded queries
//! can match on a single stable string regardless of source namespace.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::engine::registry::ModSiteInfo;
use crate::model::{Annotation, SiteAnnotation};

/// Known database namespaces and their identifiers.org prefixes.
static NAMESPACES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("UP", "uniprot"),
        ("HGNC", "hgnc"),
        ("FPLX", "fplx"),
        ("CHEBI", "chebi"),
        ("GO", "go"),
        ("MESH", "mesh"),
        ("IP", "interpro"),
        ("PF", "pfam"),
    ])
});

/// identifiers.org URL for a (namespace, id) pair, `None` for namespaces we
/// do not know how to address.
pub(crate) fn identity_url(namespace: &str, id: &str) -> Option<String> {
    NAMESPACES.get(namespace).map(|prefix| format!("https://identifiers.org/{prefix}:{id}"))
}

/// Recover the (namespace, id) pair encoded in an identifiers.org URL.
pub(crate) fn parse_identity_url(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("https://identifiers.org/")?;
    let (prefix, id) = rest.split_once(':')?;
    NAMESPACES
        .iter()
        .find(|(_, p)| **p == prefix)
        .map(|(ns, _)| ((*ns).to_string(), id.to_string()))
}

/// One `is` annotation per database reference of a grounded monomer.
pub(crate) fn identity_annotations(
    monomer: &str,
    db_refs: &BTreeMap<String, String>,
) -> Vec<Annotation> {
    db_refs
        .iter()
        .filter_map(|(ns, id)| identity_url(ns, id))
        .map(|url| Annotation::new(monomer, &url, "is"))
        .collect()
}

/// The three companion annotations of a modification-derived site: which
/// modification the modified state encodes, and the residue/position the
/// site name carries.
pub(crate) fn mod_site_annotations(site: &str, info: &ModSiteInfo) -> Vec<SiteAnnotation> {
    let (_, modified) = info.kind.states();
    let mut anns = vec![SiteAnnotation {
        site: site.to_string(),
        state: Some(modified.to_string()),
        object: info.kind.verb().to_string(),
        predicate: "is_modification".to_string(),
    }];
    if let Some(residue) = &info.residue {
        anns.push(SiteAnnotation {
            site: site.to_string(),
            state: None,
            object: residue.clone(),
            predicate: "is_residue".to_string(),
        });
    }
    if let Some(position) = &info.position {
        anns.push(SiteAnnotation {
            site: site.to_string(),
            state: None,
            object: position.clone(),
            predicate: "is_position".to_string(),
        });
    }
    anns
}

/// Provenance triples for a freshly added rule: the originating statement,
/// and the subject/object agent identities when the statement has them.
pub(crate) fn rule_provenance(
    rule: &str,
    statement_id: &str,
    subject: Option<&str>,
    object: Option<&str>,
) -> Vec<Annotation> {
    let mut anns = Vec::with_capacity(3);
    if let Some(subject) = subject {
        anns.push(Annotation::new(rule, subject, "rule_has_subject"));
    }
    if let Some(object) = object {
        anns.push(Annotation::new(rule, object, "rule_has_object"));
    }
    anns.push(Annotation::new(rule, statement_id, "from_statement"));
    anns
}
