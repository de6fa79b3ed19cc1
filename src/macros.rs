#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `BTreeMap<String, SiteCondition>` site-condition map in place.
///
/// ```ignore
/// let conds = sites! { "S222" => SiteCondition::state("p") };
/// ```
#[macro_export]
macro_rules! sites {
    ( $( $site:expr => $cond:expr ),* $(,)? ) => {{
        let mut map: std::collections::BTreeMap<String, $crate::SiteCondition> =
            std::collections::BTreeMap::new();
        $( map.insert($site.to_string(), $cond); )*
        map
    }};
}
