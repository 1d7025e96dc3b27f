//! # Change Requests
//!
//! Edits made in the console are not written to an entity directly. They are
//! submitted to the registry API as change requests, which an administrator
//! accepts or rejects later.
//!
//! ## Construction
//!
//! ```text
//!   flat form values ──expand──▶ candidate ──────────────────────▶ pathUpdates
//!                                    │
//!                                    └──diff against entity──▶ current values
//! ```
//!
//! `pathUpdates` carries the requested values. The entity's values for the
//! same fields (see [`manage_document::diff`]) are kept alongside as
//! [`MetaDataChangeRequest::current_values`] so the console can show a
//! before/after view; they are not sent. With
//! [`ChangeRequestConfig::reject_unchanged`] set, an edit whose current
//! values are equivalent to the candidate is refused: the form carries
//! nothing the entity does not already hold.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "id": "4a6c...",
//!   "metaDataId": "b3f1...",
//!   "type": "saml20_sp",
//!   "pathUpdates": {"metaDataFields": {"name:en": "Renamed SP"}},
//!   "auditData": {"user": "jdoe", "notes": "rename"}
//! }
//! ```

use crate::config::ChangeRequestConfig;
use crate::entity::EntityType;
use crate::error::ManageError;
use crate::Result;
use manage_document::{diff, documents_equivalent, expand, Document, Mapping};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Who made an edit and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditData {
    /// User submitting the change.
    pub user: String,

    /// Free-form note.
    #[serde(rename = "notes", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AuditData {
    /// Audit data without a note.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            note: None,
        }
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A pending edit of one registry entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataChangeRequest {
    /// Identifier of this change request (UUID v4).
    pub id: String,

    /// Identifier of the entity being changed.
    pub meta_data_id: String,

    /// Collection of the entity.
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Requested values of the fields touched by the edit.
    pub path_updates: Mapping,

    /// The entity's values for the same fields when the request was built.
    #[serde(skip)]
    pub current_values: Mapping,

    /// Audit information.
    pub audit_data: AuditData,
}

/// The entity a change request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTarget {
    /// Identifier of the entity.
    pub meta_data_id: String,

    /// Collection of the entity.
    pub entity_type: EntityType,
}

impl ChangeTarget {
    /// Creates a target.
    pub fn new(meta_data_id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            meta_data_id: meta_data_id.into(),
            entity_type,
        }
    }
}

/// Builds [`MetaDataChangeRequest`]s from form submissions.
#[derive(Debug, Clone, Default)]
pub struct ChangeRequestBuilder {
    config: ChangeRequestConfig,
}

impl ChangeRequestBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: ChangeRequestConfig) -> Self {
        Self { config }
    }

    /// Builds a change request from flat form values.
    ///
    /// # Arguments
    ///
    /// * `entity` - The entity document as last fetched from the registry
    /// * `form` - Flat form values keyed by dotted paths
    /// * `target` - The entity's identifier and collection
    /// * `audit` - Who submits the change; the configured default note is
    ///   used when `audit.note` is `None`
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::NoChanges`] when `reject_unchanged` is set and
    /// the form leaves the entity as it is.
    pub fn build(
        &self,
        entity: &Mapping,
        form: &Mapping,
        target: ChangeTarget,
        audit: AuditData,
    ) -> Result<MetaDataChangeRequest> {
        let candidate = expand(form);
        debug!(
            "Expanded {} form fields into {} top-level keys",
            form.len(),
            candidate.len()
        );
        self.build_nested(entity, candidate, target, audit)
    }

    /// Builds a change request from an already nested candidate document.
    ///
    /// # Errors
    ///
    /// Same as [`ChangeRequestBuilder::build`].
    pub fn build_nested(
        &self,
        entity: &Mapping,
        candidate: Mapping,
        target: ChangeTarget,
        mut audit: AuditData,
    ) -> Result<MetaDataChangeRequest> {
        let current_values = diff(entity, &candidate);
        let path_updates = candidate;

        if self.config.reject_unchanged
            && documents_equivalent(
                &Document::Object(current_values.clone()),
                &Document::Object(path_updates.clone()),
            )
        {
            warn!(
                "No data is changed for {} {}",
                target.entity_type, target.meta_data_id
            );
            return Err(ManageError::NoChanges {
                meta_data_id: target.meta_data_id,
            });
        }

        if audit.note.is_none() {
            audit.note = self.config.default_note.clone();
        }

        let request = MetaDataChangeRequest {
            id: Uuid::new_v4().to_string(),
            meta_data_id: target.meta_data_id,
            entity_type: target.entity_type,
            path_updates,
            current_values,
            audit_data: audit,
        };

        info!(
            "Built change request {} for {} {} touching {} fields",
            request.id,
            request.entity_type,
            request.meta_data_id,
            request.path_updates.len()
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Document) -> Mapping {
        value.as_object().cloned().unwrap()
    }

    fn entity() -> Mapping {
        mapping(json!({
            "entityid": "https://sp.example.org",
            "metaDataFields": {"name:en": "Example SP", "accessTokenValidity": 3600},
            "allowedEntities": [{"name": "https://idp.example.org"}]
        }))
    }

    fn target() -> ChangeTarget {
        ChangeTarget::new("b3f1", EntityType::Rp)
    }

    #[test]
    fn test_build_from_form() {
        let builder = ChangeRequestBuilder::default();
        let form = mapping(json!({"metaDataFields.accessTokenValidity": 86400}));

        let request = builder
            .build(&entity(), &form, target(), AuditData::new("jdoe"))
            .unwrap();

        assert_eq!(request.meta_data_id, "b3f1");
        assert_eq!(request.entity_type, EntityType::Rp);
        assert_eq!(
            Document::Object(request.path_updates),
            json!({"metaDataFields": {"accessTokenValidity": 86400}})
        );
        assert_eq!(
            Document::Object(request.current_values),
            json!({"metaDataFields": {"accessTokenValidity": 3600}})
        );
        assert!(Uuid::parse_str(&request.id).is_ok());
    }

    #[test]
    fn test_requested_values_are_sent() {
        let entity = mapping(json!({
            "state": "testaccepted",
            "allowedEntities": [{"name": "https://idp.example.org"}],
            "arp": {"enabled": true, "attributes": {}}
        }));
        let candidate = mapping(json!({
            "state": "prodaccepted",
            "allowedEntities": [
                {"name": "https://idp.example.org"},
                {"name": "https://idp2.example.org"}
            ],
            "arp": null
        }));

        let request = ChangeRequestBuilder::default()
            .build_nested(&entity, candidate.clone(), target(), AuditData::new("jdoe"))
            .unwrap();

        assert_eq!(request.path_updates, candidate);
        assert_eq!(
            Document::Object(request.current_values),
            json!({
                "state": "testaccepted",
                "allowedEntities": [{"name": "https://idp.example.org"}],
                "arp": {}
            })
        );
    }

    #[test]
    fn test_unchanged_edit_rejected() {
        let builder = ChangeRequestBuilder::default();
        let form = mapping(json!({"metaDataFields.name:en": "Example SP"}));

        let err = builder
            .build(&entity(), &form, target(), AuditData::new("jdoe"))
            .unwrap_err();
        assert!(matches!(err, ManageError::NoChanges { ref meta_data_id } if meta_data_id == "b3f1"));
    }

    #[test]
    fn test_reordered_list_is_unchanged() {
        let entity = mapping(json!({"allowedEntities": [{"name": "a"}, {"name": "b"}]}));
        let candidate = mapping(json!({"allowedEntities": [{"name": "b"}, {"name": "a"}]}));

        let result = ChangeRequestBuilder::default().build_nested(
            &entity,
            candidate,
            target(),
            AuditData::new("jdoe"),
        );
        assert!(matches!(result, Err(ManageError::NoChanges { .. })));
    }

    #[test]
    fn test_unchanged_allowed_when_configured() {
        let builder = ChangeRequestBuilder::new(ChangeRequestConfig {
            reject_unchanged: false,
            default_note: None,
        });
        let form = mapping(json!({"metaDataFields.name:en": "Example SP"}));

        let request = builder
            .build(&entity(), &form, target(), AuditData::new("jdoe"))
            .unwrap();
        assert_eq!(
            Document::Object(request.path_updates),
            json!({"metaDataFields": {"name:en": "Example SP"}})
        );
    }

    #[test]
    fn test_default_note_applied() {
        let builder = ChangeRequestBuilder::new(ChangeRequestConfig {
            reject_unchanged: true,
            default_note: Some("Edited in console".to_string()),
        });
        let form = mapping(json!({"metaDataFields.name:en": "Renamed"}));

        let request = builder
            .build(&entity(), &form, target(), AuditData::new("jdoe"))
            .unwrap();
        assert_eq!(request.audit_data.note.as_deref(), Some("Edited in console"));

        let request = builder
            .build(
                &entity(),
                &form,
                target(),
                AuditData::new("jdoe").with_note("rename"),
            )
            .unwrap();
        assert_eq!(request.audit_data.note.as_deref(), Some("rename"));
    }

    #[test]
    fn test_wire_format() {
        let request = MetaDataChangeRequest {
            id: "cr-1".to_string(),
            meta_data_id: "b3f1".to_string(),
            entity_type: EntityType::Sp,
            path_updates: mapping(json!({"state": "prodaccepted"})),
            current_values: mapping(json!({"state": "testaccepted"})),
            audit_data: AuditData::new("jdoe"),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "id": "cr-1",
                "metaDataId": "b3f1",
                "type": "saml20_sp",
                "pathUpdates": {"state": "prodaccepted"},
                "auditData": {"user": "jdoe"}
            })
        );
    }
}
