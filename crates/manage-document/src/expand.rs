//! # Key-Path Expansion
//!
//! Edit forms flatten nested metadata into dotted field names such as
//! `metaDataFields.name:en` or `arp.attributes.urn:mace:dir:attribute-def:cn`.
//! Before the edited values can be compared with the stored document they have
//! to be turned back into a nested document.
//!
//! ## Escaping
//!
//! Some metadata keys contain literal dots (for example
//! `coin:signature_method.rsa`). Forms encode such a dot as `@`; every `@` in a
//! path segment becomes `.` after the path is split.
//!
//! | Flat key | Nested path |
//! |----------|-------------|
//! | `a.b.c` | `a` → `b` → `c` |
//! | `g@h.i` | `g.h` → `i` |
//! | `x` | `x` |
//!
//! ## Collisions
//!
//! No conflict detection is done. When one key is a prefix of another
//! (`a` and `a.b`), whichever entry comes later wins: a scalar at `a` is
//! replaced by a mapping when `a.b` follows, and a later `a` overwrites the
//! mapping built for `a.b`.
//!
//! ## Example
//!
//! ```rust
//! use manage_document::expand::expand;
//! use serde_json::json;
//!
//! let flat = json!({"a.b.c": "val", "g@h.i": 1, "x": "y"});
//! let nested = expand(flat.as_object().unwrap());
//!
//! assert_eq!(
//!     serde_json::Value::Object(nested),
//!     json!({"a": {"b": {"c": "val"}}, "g.h": {"i": 1}, "x": "y"})
//! );
//! ```

use crate::models::{Document, Mapping};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Stand-in for a literal dot inside a segment.
pub const ESCAPED_DOT: char = '@';

/// Expands a flat mapping with dotted keys into a nested mapping.
///
/// Entries are processed in the input's insertion order and accumulate into
/// one result, so keys from different entries can share nested
/// sub-documents.
///
/// # Arguments
///
/// * `flat` - Mapping whose keys are dot-delimited paths
///
/// # Returns
///
/// A new nested mapping. Values are cloned as-is; only keys are interpreted.
pub fn expand(flat: &Mapping) -> Mapping {
    let mut result = Mapping::new();
    for (path, value) in flat {
        insert_path(&mut result, path, value.clone());
    }
    result
}

/// Expands a flat document, treating a non-mapping root as empty input.
pub fn expand_document(flat: &Document) -> Mapping {
    match flat {
        Document::Object(map) => expand(map),
        _ => Mapping::new(),
    }
}

/// Splits a flat key into unescaped path segments.
///
/// ```rust
/// use manage_document::expand::split_path;
///
/// assert_eq!(split_path("coin:signature_method@rsa.enabled"),
///            vec!["coin:signature_method.rsa", "enabled"]);
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    path.split(PATH_SEPARATOR)
        .map(|segment| segment.replace(ESCAPED_DOT, "."))
        .collect()
}

/// Assigns `value` at the nested location named by `path`.
fn insert_path(root: &mut Mapping, path: &str, value: Document) {
    insert_segments(root, &split_path(path), value);
}

/// Walks `segments`, creating intermediate mappings, and stores `value`
/// under the last one.
///
/// A non-mapping value on the way is replaced by an empty mapping.
fn insert_segments(node: &mut Mapping, segments: &[String], value: Document) {
    match segments {
        [] => {}
        [last] => {
            node.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let slot = node
                .entry(head.clone())
                .or_insert_with(|| Document::Object(Mapping::new()));
            if !slot.is_object() {
                *slot = Document::Object(Mapping::new());
            }
            if let Document::Object(child) = slot {
                insert_segments(child, rest, value);
            }
        }
    }
}
