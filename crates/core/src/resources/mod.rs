//! REST resources the core reads from and writes to.
//!
//! The coordinator and the sub-location lookup only see these traits. [`RestClient`] implements
//! all of them over HTTP; tests swap in in-memory fakes.

mod http;

pub use http::RestClient;

use crate::identifier::IdentifierPayload;
use crate::sub_location::SubLocation;
use crate::ClientResult;
use async_trait::async_trait;
use omrs_uuid::ResourceUuid;
use serde::Deserialize;

/// A patient resource as returned by the backend. Opaque to the core apart from being an
/// object.
pub type PatientRecord = serde_json::Map<String, serde_json::Value>;

/// An encounter resource. Opaque to the core.
pub type EncounterRecord = serde_json::Value;

/// List wrapper returned by collection endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResult<T> {
    pub results: Vec<T>,
}

#[async_trait]
pub trait PatientResource: Send + Sync {
    async fn get_patient(&self, uuid: &ResourceUuid) -> ClientResult<PatientRecord>;
}

#[async_trait]
pub trait EncounterResource: Send + Sync {
    async fn get_encounters_by_patient(
        &self,
        patient: &ResourceUuid,
    ) -> ClientResult<Vec<EncounterRecord>>;
}

#[async_trait]
pub trait IdentifierResource: Send + Sync {
    /// Creates (`identifier_uuid` is `None`) or updates a patient identifier.
    async fn save_identifier(
        &self,
        patient: &ResourceUuid,
        identifier_uuid: Option<&ResourceUuid>,
        payload: &IdentifierPayload,
    ) -> ClientResult<()>;
}

#[async_trait]
pub trait SubLocationSource: Send + Sync {
    /// Direct lookup of a single entry by name.
    async fn lookup(&self, name: &str) -> ClientResult<SubLocation>;

    /// Every entry the list endpoint returns in one page.
    async fn list(&self) -> ClientResult<Vec<SubLocation>>;
}
