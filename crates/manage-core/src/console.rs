//! The console facade.
//!
//! [`Console`] bundles the configuration with the operations the edit screens
//! and the refresh job need, so callers do not thread config sections
//! through by hand.

use crate::{
    change_request::{AuditData, ChangeRequestBuilder, ChangeTarget, MetaDataChangeRequest},
    config::ManageConfig,
    entity::EntityType,
    refresh::{plan_refresh, RefreshOutcome},
    schema::retain_schema_fields,
    Result,
};
use manage_document::{Document, Mapping};
use std::path::Path;
use tracing::info;

/// Entry point for console operations.
///
/// # Example
///
/// ```rust
/// use manage_core::{AuditData, ChangeTarget, Console, EntityType, ManageConfig};
/// use serde_json::json;
///
/// let console = Console::new(ManageConfig::default()).unwrap();
///
/// let entity = json!({"metaDataFields": {"name:en": "Old"}});
/// let form = json!({"metaDataFields.name:en": "New"});
///
/// let request = console
///     .change_request(
///         entity.as_object().unwrap(),
///         form.as_object().unwrap(),
///         ChangeTarget::new("b3f1", EntityType::Sp),
///         AuditData::new("jdoe"),
///     )
///     .unwrap();
/// assert_eq!(request.path_updates["metaDataFields"], json!({"name:en": "New"}));
/// assert_eq!(request.current_values["metaDataFields"], json!({"name:en": "Old"}));
/// ```
#[derive(Debug, Clone)]
pub struct Console {
    /// Configuration.
    config: ManageConfig,

    /// Change request construction.
    builder: ChangeRequestBuilder,
}

impl Console {
    /// Creates a console with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ManageError::Config`] when the configuration is invalid.
    pub fn new(config: ManageConfig) -> Result<Self> {
        config.validate()?;
        let builder = ChangeRequestBuilder::new(config.change_request.clone());

        info!(
            "Console initialized (reject_unchanged: {})",
            config.change_request.reject_unchanged
        );

        Ok(Self { config, builder })
    }

    /// Creates a console from a TOML configuration file.
    ///
    /// # Errors
    ///
    /// See [`ManageConfig::load`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(ManageConfig::load(path)?)
    }

    /// The active configuration.
    pub fn config(&self) -> &ManageConfig {
        &self.config
    }

    /// Builds a change request from flat form values.
    ///
    /// # Errors
    ///
    /// See [`ChangeRequestBuilder::build`].
    pub fn change_request(
        &self,
        entity: &Mapping,
        form: &Mapping,
        target: ChangeTarget,
        audit: AuditData,
    ) -> Result<MetaDataChangeRequest> {
        self.builder.build(entity, form, target, audit)
    }

    /// Plans the auto-refresh of one entity and applies the plan to it.
    ///
    /// The entity is left untouched when the outcome is
    /// [`RefreshOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// See [`plan_refresh`] and [`crate::RefreshPlan::apply`].
    pub fn refresh(
        &self,
        entity_type: EntityType,
        entity: &mut Mapping,
        imported: &Mapping,
        schema: Option<&Document>,
    ) -> Result<RefreshOutcome> {
        let outcome = plan_refresh(entity_type, entity, imported, schema)?;
        if let RefreshOutcome::Planned(plan) = &outcome {
            plan.apply(entity, &self.config.refresh)?;
            info!("Entity refreshed by {}", self.config.refresh.update_user);
        }
        Ok(outcome)
    }

    /// Strips fields the schema does not declare.
    ///
    /// # Errors
    ///
    /// See [`retain_schema_fields`].
    pub fn prune(&self, data: &mut Mapping, schema: &Document) -> Result<Vec<String>> {
        retain_schema_fields(data, schema)
    }
}
