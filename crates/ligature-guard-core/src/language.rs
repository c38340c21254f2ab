//! Language identifiers.
//!
//! Hosts report language ids in many spellings (`"JavaScript"`,
//! `"ECMAScript 6"`, `"Shell Script"`). Configuration keys and lookups both go
//! through [`normalize_language_id`] so they agree.

/// Normalizes a host language id: lowercase, spaces become `_`, and every
/// `ecma…script…` variant becomes `javascript`.
pub fn normalize_language_id(id: &str) -> String {
    let id = id.trim().to_lowercase().replace(' ', "_");
    if is_ecmascript(&id) {
        "javascript".to_string()
    } else {
        id
    }
}

/// Returns `true` for markup languages, where `<`, `/` and `>` act as
/// punctuation rather than operators.
pub fn is_markup_language(id: &str) -> bool {
    matches!(
        normalize_language_id(id).as_str(),
        "xml" | "html" | "xhtml" | "svg" | "jsp" | "jspx"
    )
}

fn is_ecmascript(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("ecma") else {
        return false;
    };
    // `ecma` + at most one separator character + `script`
    rest.starts_with("script")
        || rest
            .char_indices()
            .nth(1)
            .is_some_and(|(index, _)| rest[index..].starts_with("script"))
}
