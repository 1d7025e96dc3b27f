//! # Change Extraction
//!
//! Captures what an edit is about to overwrite. Given the document
//! last fetched from the server (`original`) and the edited state of a form
//! (`candidate`), the extractor answers: which of the original values does
//! the edit touch?
//!
//! ## Rules
//!
//! The walk is driven by the candidate's keys:
//!
//! | Original value at key | Result |
//! |-----------------------|--------|
//! | absent | key omitted |
//! | mapping | new mapping, recursing into sub-keys the candidate sets |
//! | sequence | whole original sequence |
//! | primitive or null | original value |
//!
//! A sub-key of a nested mapping only qualifies when the candidate carries a
//! value for it that [`is_considered_present`] accepts. Consequently a null
//! candidate subtree yields an empty mapping:
//!
//! ```text
//! original:  {"arp": {"enabled": true, "attributes": {...}}}
//! candidate: {"arp": null}
//! result:    {"arp": {}}
//! ```
//!
//! Sequences are never diffed element-wise. Entity lists and attribute release
//! rules are captured wholesale.
//!
//! ## Guarantees
//!
//! - Every key of the result is a key of the candidate, at every depth.
//! - No key whose original value is absent ever appears in the result.
//!
//! ## Example
//!
//! ```rust
//! use manage_document::diff::diff;
//! use serde_json::json;
//!
//! let original = json!({"a": "b", "c": {"d": "val", "ign": "x"}, "ign": [1, 2, 3]});
//! let candidate = json!({"a": "x", "c": {"d": "changed"}, "extra": [1]});
//!
//! let result = diff(original.as_object().unwrap(), candidate.as_object().unwrap());
//! assert_eq!(serde_json::Value::Object(result), json!({"a": "b", "c": {"d": "val"}}));
//! ```

use crate::models::{Document, Mapping};

/// Extracts the original values addressed by `candidate`.
///
/// # Arguments
///
/// * `original` - The document as last fetched from the registry
/// * `candidate` - The edited (possibly partial) document
///
/// # Returns
///
/// A mapping shaped like the overlap of both inputs, holding values taken
/// from `original`. Top-level keys follow the candidate's order; nested keys
/// follow the original's order.
pub fn diff(original: &Mapping, candidate: &Mapping) -> Mapping {
    let mut result = Mapping::new();
    for (key, candidate_value) in candidate {
        extract(original, &mut result, key, Some(candidate_value));
    }
    result
}

/// Runs [`diff`] on arbitrary documents.
///
/// Returns an empty mapping when either root is not a mapping.
pub fn diff_documents(original: &Document, candidate: &Document) -> Mapping {
    match (original, candidate) {
        (Document::Object(original), Document::Object(candidate)) => diff(original, candidate),
        _ => Mapping::new(),
    }
}

/// Whether a candidate value counts as set for nested sub-key selection.
///
/// Null, `false`, zero and the empty string count as not set. This mirrors the
/// loose truthiness used by the edit forms and must stay exactly this narrow.
pub fn is_considered_present(value: &Document) -> bool {
    match value {
        Document::Null => false,
        Document::Bool(b) => *b,
        Document::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Document::String(s) => !s.is_empty(),
        Document::Array(_) | Document::Object(_) => true,
    }
}

/// Copies the original value at `key` into `acc`, restricted by `candidate`.
fn extract(source: &Mapping, acc: &mut Mapping, key: &str, candidate: Option<&Document>) {
    match source.get(key) {
        None => {}
        Some(Document::Object(nested)) => {
            let candidate_nested = candidate.and_then(Document::as_object);
            let mut sub = Mapping::new();
            for sub_key in nested.keys() {
                let sub_candidate = candidate_nested.and_then(|c| c.get(sub_key));
                if sub_candidate.is_some_and(is_considered_present) {
                    extract(nested, &mut sub, sub_key, sub_candidate);
                }
            }
            acc.insert(key.to_owned(), Document::Object(sub));
        }
        Some(value) => {
            acc.insert(key.to_owned(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff_json(original: Document, candidate: Document) -> Document {
        Document::Object(diff_documents(&original, &candidate))
    }

    #[test]
    fn test_diff_restricts_to_candidate_shape() {
        let result = diff_json(
            json!({"a": "b", "c": {"d": "val", "ign": "x"}, "ign": [1, 2, 3]}),
            json!({"a": "x", "c": {"d": "changed"}, "extra": [1]}),
        );
        assert_eq!(result, json!({"a": "b", "c": {"d": "val"}}));
    }

    #[test]
    fn test_diff_sequence_is_atomic() {
        let original = json!({
            "entityid": "https://idp.example.org",
            "allowedEntities": [
                {"name": "https://sp1.example.org"},
                {"name": "http://mock-sp"}
            ],
            "metaDataFields": {"name:en": "Mock IdP"}
        });
        let candidate = json!({
            "allowedEntities": [
                {"name": "https://sp1.example.org"},
                {"name": "https://profile.example.org/metadata"},
                {"name": "http://mock-sp"}
            ]
        });

        let result = diff_json(original.clone(), candidate);
        assert_eq!(result, json!({"allowedEntities": original["allowedEntities"]}));
    }

    #[test]
    fn test_diff_null_candidate_subtree() {
        let result = diff_json(
            json!({
                "metaDataFields": {"name:en": "OIDC SP", "accessTokenValidity": 9999},
                "arp": {
                    "enabled": true,
                    "attributes": {
                        "urn:mace:dir:attribute-def:cn": [
                            {"value": "*", "source": "idp", "motivation": ""}
                        ]
                    }
                }
            }),
            json!({"metaDataFields": {"accessTokenValidity": 86400}, "arp": null}),
        );

        assert_eq!(
            result,
            json!({"metaDataFields": {"accessTokenValidity": 9999}, "arp": {}})
        );
    }

    #[test]
    fn test_diff_falsy_sub_values_are_skipped() {
        let result = diff_json(
            json!({"m": {"a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6}}),
            json!({"m": {"a": 0, "b": "", "c": false, "d": null, "e": "0", "f": []}}),
        );
        assert_eq!(result, json!({"m": {"e": 5, "f": 6}}));
    }

    #[test]
    fn test_diff_top_level_keeps_falsy_candidates() {
        // Only nested sub-keys are filtered by truthiness.
        let result = diff_json(json!({"a": 1, "b": "x"}), json!({"a": 0, "b": null}));
        assert_eq!(result, json!({"a": 1, "b": "x"}));
    }

    #[test]
    fn test_diff_nested_recursion_follows_candidate() {
        let result = diff_json(
            json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}),
            json!({"a": {"b": {"c": 10}}}),
        );
        assert_eq!(result, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_diff_scalar_candidate_for_mapping_original() {
        let result = diff_json(json!({"a": {"b": 1}}), json!({"a": "text"}));
        assert_eq!(result, json!({"a": {}}));
    }

    #[test]
    fn test_diff_null_original_copied() {
        let result = diff_json(json!({"a": null}), json!({"a": {"b": 1}}));
        assert_eq!(result, json!({"a": null}));
    }

    #[test]
    fn test_diff_non_mapping_roots() {
        assert!(diff_documents(&json!([1]), &json!({"a": 1})).is_empty());
        assert!(diff_documents(&json!({"a": 1}), &json!("a")).is_empty());
    }

    #[test]
    fn test_is_considered_present() {
        assert!(!is_considered_present(&json!(null)));
        assert!(!is_considered_present(&json!(false)));
        assert!(!is_considered_present(&json!(0)));
        assert!(!is_considered_present(&json!(0.0)));
        assert!(!is_considered_present(&json!("")));

        assert!(is_considered_present(&json!(true)));
        assert!(is_considered_present(&json!(-1)));
        assert!(is_considered_present(&json!(" ")));
        assert!(is_considered_present(&json!([])));
        assert!(is_considered_present(&json!({})));
    }
}
