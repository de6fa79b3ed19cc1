//! Name canonicalization.
//!
//! Free-text biological identifiers ("14-3-3", "BRAF kinase", "cell
//! surface") must become stable structural identifiers usable as monomer and
//! site names. The mapping is pure and deterministic; identical input always
//! yields identical output.

/// Canonicalize `text` into a structural identifier.
///
/// Applied in order:
///
/// 1. Characters outside the basic printable (ASCII) range are dropped
///    entirely, so a decorative prefix disappears rather than becoming an
///    underscore.
/// 2. Every remaining character outside `[A-Za-z0-9_]` becomes exactly one
///    underscore. One underscore per character, not per run: `".*/- ^&#@$"`
///    maps to ten underscores.
/// 3. A leading digit gets a `p` prefix so the result never starts with a
///    digit.
pub fn canonicalize(text: &str) -> String {
    let ascii: String = text.chars().filter(char::is_ascii).collect();
    let replaced = regex!(r"[^A-Za-z0-9_]").replace_all(&ascii, "_");
    match replaced.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("p{replaced}"),
        _ => replaced.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_becomes_one_underscore_per_character() {
        assert_eq!(canonicalize(".*/- ^&#@$"), "__________");
    }

    #[test]
    fn leading_digit_gets_prefix() {
        assert_eq!(canonicalize("14-3-3"), "p14_3_3");
    }

    #[test]
    fn non_ascii_is_dropped_not_substituted() {
        assert_eq!(canonicalize("\u{1F4A9}bar"), "bar");
        assert_eq!(canonicalize("\u{03B2}-catenin"), "_catenin");
    }

    #[test]
    fn whitespace_becomes_underscore() {
        assert_eq!(canonicalize("BRAF kinase"), "BRAF_kinase");
        assert_eq!(canonicalize("cell surface"), "cell_surface");
    }

    #[test]
    fn idempotent_on_canonical_names() {
        for name in ["BRAF", "p14_3_3", "cell_surface", "__________"] {
            assert_eq!(canonicalize(name), name);
        }
    }
}
