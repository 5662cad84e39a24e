//! Patient identifier write payloads.

use omrs_types::IdentifierValue;
use omrs_uuid::ResourceUuid;
use serde::Serialize;

/// Body of a patient identifier create/update request.
///
/// Absent optional fields are omitted from the JSON body so an update only touches the
/// identifier value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierPayload {
    pub identifier: IdentifierValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<ResourceUuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResourceUuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,
}

impl IdentifierPayload {
    /// Payload for adding an identifier. New identifiers are always marked preferred.
    pub fn for_create(
        identifier: IdentifierValue,
        identifier_type: ResourceUuid,
        location: ResourceUuid,
    ) -> Self {
        Self {
            identifier,
            identifier_type: Some(identifier_type),
            location: Some(location),
            preferred: Some(true),
        }
    }

    /// Payload for changing the value of an existing identifier.
    pub fn for_update(identifier: IdentifierValue) -> Self {
        Self {
            identifier,
            identifier_type: None,
            location: None,
            preferred: None,
        }
    }
}
