//! # Canonical Forms
//!
//! Two documents fetched at different times can be semantically equal while
//! differing in key order, list order or number spelling. The console needs
//! to tell such documents apart from real edits ("has this list changed?"),
//! so this module provides:
//!
//! - [`canonicalize`]: a deterministic JSON rendering with sorted keys,
//!   normalized numbers and minimal escaping
//! - [`fingerprint`]: a SHA-256 digest of the canonical form of a sorted copy
//! - [`documents_equivalent`]: equality after sorting
//! - [`display_string`]: the string representation used by the sorter to
//!   compare primitives
//!
//! ## Canonical Rendering
//!
//! 1. **Object keys**: sorted by UTF-16 code units
//! 2. **Numbers**: integral floats are written without a fraction (`1.0` → `1`)
//! 3. **Strings**: only `"`, `\` and control characters are escaped
//! 4. **Whitespace**: none
//! 5. **Arrays**: elements in their current order
//!
//! Arrays keep their order here; callers wanting order-insensitive comparison
//! go through [`documents_equivalent`] or [`fingerprint`], which sort first.
//!
//! ## Example
//!
//! ```rust
//! use manage_document::canonicalize::{canonicalize, documents_equivalent};
//! use serde_json::json;
//!
//! assert_eq!(canonicalize(&json!({"b": 1.0, "a": [2, 1]})), r#"{"a":[2,1],"b":1}"#);
//!
//! assert!(documents_equivalent(
//!     &json!({"l": [{"name": "b"}, {"name": "a"}]}),
//!     &json!({"l": [{"name": "a"}, {"name": "b"}]}),
//! ));
//! ```

use crate::models::{Document, Fingerprint, Mapping};
use crate::sort::sort_document;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// Renders a document in canonical form.
///
/// Semantically identical inputs with equal array order always produce
/// bytewise identical outputs.
pub fn canonicalize(value: &Document) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Computes the SHA-256 fingerprint of a document.
///
/// The document is cloned and sorted with [`sort_document`] before hashing,
/// so list order does not affect the result.
///
/// ```rust
/// use manage_document::canonicalize::fingerprint;
/// use serde_json::json;
///
/// let a = fingerprint(&json!({"l": ["b", "a"], "x": 1}));
/// let b = fingerprint(&json!({"x": 1.0, "l": ["a", "b"]}));
/// assert_eq!(a, b);
/// assert_ne!(a, fingerprint(&json!({"x": 2})));
/// ```
pub fn fingerprint(value: &Document) -> Fingerprint {
    let mut sorted = value.clone();
    sort_document(&mut sorted);

    let mut hasher = Sha256::new();
    hasher.update(canonicalize(&sorted).as_bytes());
    hasher.finalize().into()
}

/// Lowercase hex rendering of a fingerprint.
pub fn fingerprint_hex(fingerprint: &Fingerprint) -> String {
    fingerprint.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Whether two documents are equal once both are sorted.
///
/// Neither input is modified.
pub fn documents_equivalent(a: &Document, b: &Document) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    sort_document(&mut a);
    sort_document(&mut b);
    canonicalize(&a) == canonicalize(&b)
}

/// String representation of a document, as shown to users.
///
/// | Value | Representation |
/// |-------|----------------|
/// | `null` | `null` |
/// | boolean | `true` / `false` |
/// | number | canonical number |
/// | string | the string itself |
/// | sequence | elements joined by `,`, nulls rendered empty |
/// | mapping | `[object Object]` |
pub fn display_string(value: &Document) -> String {
    match value {
        Document::Null => "null".to_string(),
        Document::Bool(b) => b.to_string(),
        Document::Number(n) => canonical_number(n),
        Document::String(s) => s.clone(),
        Document::Array(items) => items
            .iter()
            .map(|item| match item {
                Document::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Document::Object(_) => "[object Object]".to_string(),
    }
}

fn write_canonical(value: &Document, out: &mut String) {
    match value {
        Document::Null => out.push_str("null"),
        Document::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Document::Number(n) => out.push_str(&canonical_number(n)),
        Document::String(s) => write_string(s, out),
        Document::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Document::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Mapping, out: &mut String) {
    let mut entries: Vec<(&String, &Document)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_utf16(a, b));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}

/// Shortest rendering of a number; integral floats drop their fraction.
pub(crate) fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}
