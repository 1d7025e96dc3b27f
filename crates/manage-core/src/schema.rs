//! # Schema Pruning
//!
//! Moving an entity between collections (for example a relying party that
//! turns out to be a resource server) leaves fields the target schema does
//! not know. [`retain_schema_fields`] strips them.
//!
//! Kept are:
//!
//! - top-level keys listed under the schema's `properties`
//! - `metaDataFields` keys listed under
//!   `properties.metaDataFields.properties`, or fully matching one of the
//!   regexes under `properties.metaDataFields.patternProperties`

use crate::entity::METADATA_FIELDS_KEY;
use crate::error::ManageError;
use crate::Result;
use manage_document::{Document, Mapping};
use regex::Regex;
use tracing::{debug, info};

/// Which `metaDataFields` keys a schema accepts.
#[derive(Debug, Clone)]
pub struct FieldRules {
    properties: Mapping,
    patterns: Vec<Regex>,
}

impl FieldRules {
    /// Reads the `metaDataFields` rules from an entity-type schema.
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::InvalidPattern`] when a `patternProperties` key
    /// does not compile.
    pub fn from_schema(schema: &Document) -> Result<Self> {
        let fields = schema.pointer("/properties/metaDataFields");
        let properties = fields
            .and_then(|f| f.get("properties"))
            .and_then(Document::as_object)
            .cloned()
            .unwrap_or_default();
        let patterns = fields
            .and_then(|f| f.get("patternProperties"))
            .and_then(Document::as_object)
            .map(|p| p.keys().map(|key| anchored(key)).collect::<Result<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            properties,
            patterns,
        })
    }

    /// Whether `key` is a known field.
    pub fn accepts(&self, key: &str) -> bool {
        self.properties.contains_key(key) || self.patterns.iter().any(|p| p.is_match(key))
    }
}

/// Compiles a pattern so that it must match the whole key.
fn anchored(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})$", pattern))?)
}

/// Removes everything from `data` that `schema` does not declare.
///
/// # Returns
///
/// The removed paths, with metadata fields as `metaDataFields.<key>`.
///
/// # Errors
///
/// Returns [`ManageError::MalformedEntity`] when the schema has no
/// `properties` mapping, and [`ManageError::InvalidPattern`] for bad
/// pattern keys.
pub fn retain_schema_fields(data: &mut Mapping, schema: &Document) -> Result<Vec<String>> {
    let properties = schema
        .get("properties")
        .and_then(Document::as_object)
        .ok_or_else(|| ManageError::MalformedEntity("schema has no properties".to_string()))?;
    let rules = FieldRules::from_schema(schema)?;

    let mut removed = Vec::new();
    data.retain(|key, _| {
        let keep = properties.contains_key(key);
        if !keep {
            removed.push(key.clone());
        }
        keep
    });

    if let Some(Document::Object(fields)) = data.get_mut(METADATA_FIELDS_KEY) {
        fields.retain(|key, _| {
            let keep = rules.accepts(key);
            if !keep {
                removed.push(format!("{}.{}", METADATA_FIELDS_KEY, key));
            }
            keep
        });
    }

    for path in &removed {
        debug!("Removed field unknown to schema: {}", path);
    }
    info!("Schema pruning removed {} fields", removed.len());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rs_schema() -> Document {
        json!({
            "properties": {
                "entityid": {"type": "string"},
                "state": {"type": "string"},
                "metaDataFields": {
                    "properties": {
                        "secret": {"type": "string"},
                        "isResourceServer": {"type": "boolean"}
                    },
                    "patternProperties": {
                        "^name:(en|nl)$": {"type": "string"},
                        "contacts:([0-3]{1}):emailAddress": {"type": "string"}
                    }
                }
            }
        })
    }

    #[test]
    fn test_retain_schema_fields() {
        let mut data = json!({
            "entityid": "https://rs.example.org",
            "state": "prodaccepted",
            "allowedEntities": [{"name": "https://idp.example.org"}],
            "metaDataFields": {
                "secret": "s3cr3t",
                "name:en": "RS",
                "name:de": "RS",
                "contacts:0:emailAddress": "help@example.org",
                "contacts:0:emailAddress:extra": "x",
                "redirectUrls": ["https://rs.example.org/cb"]
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        let removed = retain_schema_fields(&mut data, &rs_schema()).unwrap();

        assert_eq!(
            removed,
            vec![
                "allowedEntities",
                "metaDataFields.name:de",
                "metaDataFields.contacts:0:emailAddress:extra",
                "metaDataFields.redirectUrls",
            ]
        );
        assert_eq!(
            data["metaDataFields"],
            json!({
                "secret": "s3cr3t",
                "name:en": "RS",
                "contacts:0:emailAddress": "help@example.org"
            })
        );
        assert!(!data.contains_key("allowedEntities"));
    }

    #[test]
    fn test_schema_without_properties() {
        let mut data = Mapping::new();
        let err = retain_schema_fields(&mut data, &json!({"type": "object"})).unwrap_err();
        assert!(matches!(err, ManageError::MalformedEntity(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let schema = json!({
            "properties": {"metaDataFields": {"patternProperties": {"name:(en": {}}}}
        });
        let err = FieldRules::from_schema(&schema).unwrap_err();
        assert!(matches!(err, ManageError::InvalidPattern(_)));
    }

    #[test]
    fn test_field_rules_accept() {
        let rules = FieldRules::from_schema(&rs_schema()).unwrap();
        assert!(rules.accepts("secret"));
        assert!(rules.accepts("name:nl"));
        assert!(rules.accepts("contacts:3:emailAddress"));
        assert!(!rules.accepts("contacts:4:emailAddress"));
        assert!(!rules.accepts("certData"));
    }
}
