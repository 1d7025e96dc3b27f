//! Small predicates and formatting helpers used by the edit forms.

use crate::models::Document;

/// Whether a value counts as empty.
///
/// True for null, an empty sequence, an empty or whitespace-only string,
/// and a mapping without keys. Numbers and booleans are never empty.
pub fn is_empty(value: &Document) -> bool {
    match value {
        Document::Null => true,
        Document::Array(items) => items.is_empty(),
        Document::String(s) => s.trim().is_empty(),
        Document::Object(map) => map.is_empty(),
        Document::Bool(_) | Document::Number(_) => false,
    }
}

/// Uppercases the first character, leaving the rest unchanged.
///
/// ```rust
/// use manage_document::helpers::capitalize;
///
/// assert_eq!(capitalize("saml20_sp"), "Saml20_sp");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether an OIDC scope name is acceptable: blank, or free of spaces.
pub fn valid_scope(scope: &str) -> bool {
    scope.trim().is_empty() || !scope.contains(' ')
}
