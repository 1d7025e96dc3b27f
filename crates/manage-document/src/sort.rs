//! # Deterministic Sorting
//!
//! Lists in entity metadata (allowed entities, stepup entities, redirect
//! URLs, scopes) come back from the registry in storage order. The console
//! sorts every list before rendering it or comparing two versions of a
//! document, so that reordering alone never shows up as a change.
//!
//! ## Ordering
//!
//! Within one sequence:
//!
//! 1. Mappings with a non-null `name` field compare by that name
//! 2. Any other non-null elements compare by [`display_string`]
//! 3. Null elements are equal to everything and keep their positions
//!
//! Both comparisons use [`CollationKey`], a multi-level approximation of a
//! locale-aware collation:
//!
//! | Level | Compares |
//! |-------|----------|
//! | Primary | base characters with accents removed and case folded; punctuation and symbols before digits before letters |
//! | Secondary | accents (`e` < `é`) |
//! | Tertiary | case (lowercase before uppercase) |
//! | Last | code points |
//!
//! Each element gets exactly one key, computed from the element alone. A
//! named mapping is therefore keyed by its name even when the element it
//! meets is a plain string or an unnamed mapping (`[{"name": "z"}, "m"]`
//! sorts as `["m", {"name": "z"}]`). Keying per element keeps the ordering
//! total, so sorting is idempotent and never depends on which pairs the sort
//! happens to compare.
//!
//! The sort is stable. Sequences nested directly inside sequences are left
//! as they are, and so are mappings inside sequences; mappings reached
//! through mappings are recursed into at any depth.
//!
//! ## Example
//!
//! ```rust
//! use manage_document::sort::sort_in_place;
//! use serde_json::json;
//!
//! let mut doc = json!({"a": "a", "l1": [{"name": "x"}, {"name": "a"}], "l2": [null, "", null]});
//! sort_in_place(doc.as_object_mut().unwrap());
//!
//! assert_eq!(doc, json!({"a": "a", "l1": [{"name": "a"}, {"name": "x"}], "l2": [null, "", null]}));
//! ```

use crate::canonicalize::display_string;
use crate::models::{Document, Mapping};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Field that takes priority when ordering mappings.
pub const NAME_FIELD: &str = "name";

/// Sorts every sequence reachable through mappings of `doc`, in place.
pub fn sort_in_place(doc: &mut Mapping) {
    for value in doc.values_mut() {
        match value {
            Document::Array(items) => sort_sequence(items),
            Document::Object(nested) => sort_in_place(nested),
            Document::Null | Document::Bool(_) | Document::Number(_) | Document::String(_) => {}
        }
    }
}

/// Runs [`sort_in_place`] when the root is a mapping; otherwise does nothing.
pub fn sort_document(doc: &mut Document) {
    if let Document::Object(map) = doc {
        sort_in_place(map);
    }
}

/// Sorts one sequence. Null elements stay in their slots.
pub fn sort_sequence(items: &mut [Document]) {
    let slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_null())
        .map(|(i, _)| i)
        .collect();

    let mut keyed: Vec<(CollationKey, Document)> = slots
        .iter()
        .map(|&i| (sort_key(&items[i]), std::mem::take(&mut items[i])))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (slot, (_, item)) in slots.into_iter().zip(keyed) {
        items[slot] = item;
    }
}

/// Compares two strings the way [`sort_in_place`] does.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

fn sort_key(item: &Document) -> CollationKey {
    match item {
        Document::Object(map) => match map.get(NAME_FIELD) {
            Some(name) if !name.is_null() => CollationKey::new(&display_string(name)),
            _ => CollationKey::new(&display_string(item)),
        },
        other => CollationKey::new(&display_string(other)),
    }
}

/// Sort key approximating locale-aware string collation.
///
/// Fields compare in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    /// Base characters, case folded, with their character class.
    primary: Vec<(CharClass, char)>,
    /// Case-folded canonical decomposition, accents included.
    secondary: String,
    /// Per-character uppercase flags; lowercase sorts first.
    case: Vec<bool>,
    /// Original text.
    raw: String,
}

/// Primary ordering of character groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Punctuation,
    Digit,
    Letter,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_alphabetic() {
            CharClass::Letter
        } else if c.is_numeric() {
            CharClass::Digit
        } else {
            CharClass::Punctuation
        }
    }
}

impl CollationKey {
    /// Builds the key for `text`.
    pub fn new(text: &str) -> Self {
        let secondary: String = text.to_lowercase().nfd().collect();
        let primary = secondary
            .chars()
            .filter(|&c| !is_combining_mark(c))
            .map(|c| (CharClass::of(c), c))
            .collect();

        Self {
            primary,
            secondary,
            case: text.chars().map(char::is_uppercase).collect(),
            raw: text.to_owned(),
        }
    }
}
