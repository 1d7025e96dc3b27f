//! Unit tests for manage-core.

use crate::{
    AuditData, ChangeTarget, Console, EntityType, ManageConfig, ManageError, RefreshOutcome,
};
use manage_document::Mapping;
use serde_json::json;

fn mapping(value: serde_json::Value) -> Mapping {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_crate_structure() {
    // Smoke test - verifies the re-exports line up
    use crate::{ChangeRequestBuilder, RefreshPlan, SkipReason};

    let _builder = ChangeRequestBuilder::default();
    let _plan = RefreshPlan::default();
    let _reason = SkipReason::Disabled;
    let _config = ManageConfig::default();
}

#[test]
fn test_console_rejects_invalid_config() {
    let mut config = ManageConfig::default();
    config.refresh.update_user = String::new();
    assert!(matches!(Console::new(config), Err(ManageError::Config(_))));
}

#[test]
fn test_console_refresh_applies_plan() {
    let console = Console::new(ManageConfig::default()).unwrap();
    let mut entity = mapping(json!({
        "entityid": "https://sp.example.org",
        "metadataurl": "https://sp.example.org/metadata",
        "autoRefresh": {"enabled": true, "fields": {"certData": true}},
        "metaDataFields": {"certData": "OLD", "name:en": "SP"}
    }));
    let imported = mapping(json!({"metaDataFields": {"certData": "NEW"}}));

    let outcome = console
        .refresh(EntityType::Sp, &mut entity, &imported, None)
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::Planned(_)));
    assert_eq!(entity["metaDataFields"], json!({"certData": "NEW", "name:en": "SP"}));
    assert_eq!(entity["revisionnote"], "Metadata updated by auto refresh");
}

#[test]
fn test_console_refresh_skip_leaves_entity() {
    let console = Console::new(ManageConfig::default()).unwrap();
    let original = mapping(json!({
        "entityid": "https://sp.example.org",
        "autoRefresh": {"enabled": false},
        "metaDataFields": {"certData": "OLD"}
    }));
    let mut entity = original.clone();

    let outcome = console
        .refresh(EntityType::Sp, &mut entity, &Mapping::new(), None)
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::Skipped(_)));
    assert_eq!(entity, original);
}

#[test]
fn test_console_change_request_and_prune() {
    let console = Console::new(ManageConfig::default()).unwrap();
    let entity = mapping(json!({
        "entityid": "https://rp.example.org",
        "metaDataFields": {"scopes": ["openid"], "name:en": "RP"}
    }));
    let form = mapping(json!({"metaDataFields.scopes": ["openid", "groups"]}));

    let request = console
        .change_request(
            &entity,
            &form,
            ChangeTarget::new("rp-1", EntityType::Rp),
            AuditData::new("jdoe"),
        )
        .unwrap();
    assert_eq!(
        serde_json::Value::Object(request.path_updates),
        json!({"metaDataFields": {"scopes": ["openid", "groups"]}})
    );
    assert_eq!(
        serde_json::Value::Object(request.current_values),
        json!({"metaDataFields": {"scopes": ["openid"]}})
    );

    let mut data = entity.clone();
    let schema = json!({"properties": {"entityid": {}, "metaDataFields": {
        "properties": {"scopes": {}}
    }}});
    let removed = console.prune(&mut data, &schema).unwrap();
    assert_eq!(removed, vec!["metaDataFields.name:en"]);
}
