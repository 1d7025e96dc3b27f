//! Registry entity types and well-known document keys.

use crate::error::ManageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of the entity identifier in an entity document.
pub const ENTITYID_KEY: &str = "entityid";

/// Key of the metadata URL used by auto-refresh.
pub const METADATA_URL_KEY: &str = "metadataurl";

/// Key of the flat metadata field mapping.
pub const METADATA_FIELDS_KEY: &str = "metaDataFields";

/// Key of the auto-refresh settings.
pub const AUTO_REFRESH_KEY: &str = "autoRefresh";

/// Key of the revision note written with an update.
pub const REVISION_NOTE_KEY: &str = "revisionnote";

/// A registry collection.
///
/// The string form is the collection name used by the registry API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// SAML service provider.
    #[serde(rename = "saml20_sp")]
    Sp,
    /// SAML identity provider.
    #[serde(rename = "saml20_idp")]
    Idp,
    /// OIDC relying party.
    #[serde(rename = "oidc10_rp")]
    Rp,
    /// OAuth resource server.
    #[serde(rename = "oauth20_rs")]
    Rs,
    /// Provisioning endpoint.
    #[serde(rename = "provisioning")]
    Prov,
    /// Single tenant template.
    #[serde(rename = "single_tenant_template")]
    Stt,
}

impl EntityType {
    /// All collections, in registry order.
    pub const ALL: [EntityType; 6] = [
        EntityType::Sp,
        EntityType::Idp,
        EntityType::Rp,
        EntityType::Rs,
        EntityType::Prov,
        EntityType::Stt,
    ];

    /// Collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Sp => "saml20_sp",
            EntityType::Idp => "saml20_idp",
            EntityType::Rp => "oidc10_rp",
            EntityType::Rs => "oauth20_rs",
            EntityType::Prov => "provisioning",
            EntityType::Stt => "single_tenant_template",
        }
    }

    /// Whether entities of this type take part in the metadata auto-refresh.
    pub fn supports_auto_refresh(&self) -> bool {
        matches!(self, EntityType::Sp | EntityType::Idp)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ManageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ManageError::UnknownEntityType(s.to_string()))
    }
}
