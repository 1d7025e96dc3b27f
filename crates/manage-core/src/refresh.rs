//! # Metadata Auto-Refresh Planning
//!
//! SAML entities can opt into having selected metadata fields refreshed from
//! their published metadata URL. The scheduled job that does this fetches and
//! imports the remote metadata (outside this crate); this module decides,
//! for one entity and one import result, what should change.
//!
//! ## Decision Steps
//!
//! | Step | Skip when |
//! |------|-----------|
//! | Collection | the entity type takes no part in auto-refresh |
//! | Enabled | `autoRefresh.enabled` is not `true` |
//! | Source | `metadataurl` is missing or null |
//! | Allowed fields | none are configured (see [`allowed_fields`]) |
//! | Import | the import result carries `errors` |
//!
//! A [`RefreshPlan`] lists the imported values of allowed fields (updates)
//! and the allowed fields missing from the import (removals). Every allowed
//! field ends up in exactly one of the two lists.

use crate::config::RefreshConfig;
use crate::entity::{
    EntityType, AUTO_REFRESH_KEY, ENTITYID_KEY, METADATA_FIELDS_KEY, METADATA_URL_KEY,
    REVISION_NOTE_KEY,
};
use crate::error::ManageError;
use crate::Result;
use manage_document::canonicalize::display_string;
use manage_document::{Document, Mapping};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Key of the error list in an import result.
pub const IMPORT_ERRORS_KEY: &str = "errors";

/// Why an entity was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The collection does not take part in auto-refresh.
    UnsupportedType(EntityType),
    /// Auto-refresh is switched off for the entity.
    Disabled,
    /// The entity has no metadata URL.
    NoMetadataUrl,
    /// No fields are allowed to be refreshed.
    NoAllowedFields,
    /// Importing the remote metadata failed.
    ImportFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedType(t) => write!(f, "{} does not support auto refresh", t),
            SkipReason::Disabled => f.write_str("Auto refresh is disabled"),
            SkipReason::NoMetadataUrl => f.write_str("No metadata URL found"),
            SkipReason::NoAllowedFields => {
                f.write_str("No fields configured for auto refresh and allow all is disabled")
            }
            SkipReason::ImportFailed(errors) => {
                write!(f, "Failed to parse metadata from url: {}", errors)
            }
        }
    }
}

/// Field changes to apply to one entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RefreshPlan {
    /// Imported values for allowed fields.
    pub updates: Mapping,

    /// Allowed fields absent from the import.
    pub removals: Vec<String>,
}

impl RefreshPlan {
    /// Applies the plan to an entity document.
    ///
    /// Sets the revision note, writes updates into `metaDataFields` (created
    /// when missing) and removes the removals from it.
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::MalformedEntity`] when `metaDataFields` exists
    /// but is not a mapping.
    pub fn apply(&self, entity: &mut Mapping, config: &RefreshConfig) -> Result<()> {
        entity.insert(
            REVISION_NOTE_KEY.to_string(),
            Document::String(config.revision_note.clone()),
        );

        let fields = entity
            .entry(METADATA_FIELDS_KEY)
            .or_insert_with(|| Document::Object(Mapping::new()))
            .as_object_mut()
            .ok_or_else(|| {
                ManageError::MalformedEntity(format!("{} is not a mapping", METADATA_FIELDS_KEY))
            })?;

        for (key, value) in &self.updates {
            fields.insert(key.clone(), value.clone());
        }
        for key in &self.removals {
            fields.remove(key);
        }
        Ok(())
    }
}

/// Result of evaluating one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Nothing to do.
    Skipped(SkipReason),
    /// Changes to apply.
    Planned(RefreshPlan),
}

/// Whether `autoRefresh.enabled` is `true`.
pub fn is_refresh_enabled(entity: &Mapping) -> bool {
    auto_refresh_flag(entity, "enabled")
}

/// Whether `autoRefresh.allowAll` is `true`.
pub fn is_allow_all(entity: &Mapping) -> bool {
    auto_refresh_flag(entity, "allowAll")
}

fn auto_refresh_flag(entity: &Mapping, flag: &str) -> bool {
    entity
        .get(AUTO_REFRESH_KEY)
        .and_then(|settings| settings.get(flag))
        .and_then(Document::as_bool)
        .unwrap_or(false)
}

/// Fields the refresh may touch.
///
/// With `allowAll`, every field the entity-type schema declares under
/// `properties.autoRefresh.properties.fields.properties`. Otherwise the
/// entries of `autoRefresh.fields` set to `true`.
pub fn allowed_fields(entity: &Mapping, schema: Option<&Document>) -> Vec<String> {
    if is_allow_all(entity) {
        return schema
            .and_then(|s| s.pointer("/properties/autoRefresh/properties/fields/properties"))
            .and_then(Document::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
    }

    entity
        .get(AUTO_REFRESH_KEY)
        .and_then(|settings| settings.get("fields"))
        .and_then(Document::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter(|(_, enabled)| enabled.as_bool() == Some(true))
                .map(|(key, _)| key.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Imported values of allowed fields.
pub fn updated_fields(imported_fields: &Mapping, allowed: &[String]) -> Mapping {
    imported_fields
        .iter()
        .filter(|(key, _)| allowed.contains(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Allowed fields the import does not contain.
pub fn removed_fields(imported_fields: &Mapping, allowed: &[String]) -> Vec<String> {
    allowed
        .iter()
        .filter(|key| !imported_fields.contains_key(key.as_str()))
        .cloned()
        .collect()
}

/// Decides what the auto-refresh should do for one entity.
///
/// # Arguments
///
/// * `entity_type` - Collection of the entity
/// * `entity` - The stored entity document
/// * `imported` - Result of importing the entity's metadata URL
/// * `schema` - Schema of the collection, needed for `allowAll`
///
/// # Errors
///
/// Returns [`ManageError::MalformedEntity`] when a successful import has no
/// `metaDataFields` mapping.
pub fn plan_refresh(
    entity_type: EntityType,
    entity: &Mapping,
    imported: &Mapping,
    schema: Option<&Document>,
) -> Result<RefreshOutcome> {
    let entity_id = entity
        .get(ENTITYID_KEY)
        .map(display_string)
        .unwrap_or_default();

    let skip = |reason: SkipReason| -> Result<RefreshOutcome> {
        info!("{} - skipping for {}: {}", reason, entity_type, entity_id);
        Ok(RefreshOutcome::Skipped(reason))
    };

    if !entity_type.supports_auto_refresh() {
        return skip(SkipReason::UnsupportedType(entity_type));
    }
    if !is_refresh_enabled(entity) {
        return skip(SkipReason::Disabled);
    }
    if entity.get(METADATA_URL_KEY).map_or(true, Document::is_null) {
        return skip(SkipReason::NoMetadataUrl);
    }

    info!("Running auto refresh for {}: {}", entity_type, entity_id);

    let allowed = allowed_fields(entity, schema);
    if allowed.is_empty() {
        return skip(SkipReason::NoAllowedFields);
    }
    debug!("Allowed auto refresh fields for {}: {:?}", entity_id, allowed);

    if let Some(errors) = imported.get(IMPORT_ERRORS_KEY) {
        return skip(SkipReason::ImportFailed(display_string(errors)));
    }

    let imported_fields = imported
        .get(METADATA_FIELDS_KEY)
        .and_then(Document::as_object)
        .ok_or_else(|| {
            ManageError::MalformedEntity(format!(
                "imported metadata for {} has no {}",
                entity_id, METADATA_FIELDS_KEY
            ))
        })?;

    let plan = RefreshPlan {
        updates: updated_fields(imported_fields, &allowed),
        removals: removed_fields(imported_fields, &allowed),
    };

    info!(
        "Planned auto refresh for {}: {} updates, {} removals",
        entity_id,
        plan.updates.len(),
        plan.removals.len()
    );
    Ok(RefreshOutcome::Planned(plan))
}
