use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a free-text name to its comparison form.
///
/// Lower-cases, strips diacritic marks (so "Inglês" and "ingles" compare
/// equal), then trims surrounding whitespace. Both stored keys and queries
/// go through this before any comparison.
pub fn normalize_name(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.trim().to_string()
}

/// Returns true if two names are equal after normalization.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
