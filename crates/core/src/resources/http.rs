//! HTTP implementation of the REST resources.

use super::{
    EncounterRecord, EncounterResource, IdentifierResource, ListResult, PatientRecord,
    PatientResource, SubLocationSource,
};
use crate::config::{ClientConfig, Credentials};
use crate::constants::{
    ENCOUNTER_PATH, ERROR_BODY_EXCERPT_CHARS, FULL_REPRESENTATION, IDENTIFIER_SUBRESOURCE,
    PATIENT_PATH, SUB_LOCATION_NAME_PARAM, SUB_LOCATION_PATH,
};
use crate::identifier::IdentifierPayload;
use crate::sub_location::SubLocation;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use omrs_uuid::ResourceUuid;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// REST client for an OpenMRS backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct RestClient {
    http: Client,
    rest_base: String,
    credentials: Option<Credentials>,
}

impl RestClient {
    pub fn new(cfg: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(ClientError::HttpClientBuild)?;

        Ok(Self {
            http,
            rest_base: cfg.rest_base().to_string(),
            credentials: cfg.credentials().cloned(),
        })
    }

    /// Absolute URL of `path` under the REST base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.rest_base, path.trim_start_matches('/'))
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(creds.username(), Some(creds.password())),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let request = self
            .authorise(self.http.get(&url))
            .header("Accept", "application/json")
            .query(query);
        let response = send(&url, request).await?;

        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let request = self
            .authorise(self.http.post(&url))
            .header("Accept", "application/json")
            .json(body);
        send(&url, request).await?;
        Ok(())
    }
}

/// Sends `request` and turns any non-2xx response into [`ClientError::Status`].
async fn send(url: &str, request: RequestBuilder) -> ClientResult<Response> {
    let response = request.send().await.map_err(|source| ClientError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            url: url.to_string(),
            status,
            body: body.chars().take(ERROR_BODY_EXCERPT_CHARS).collect(),
        });
    }

    Ok(response)
}

pub(crate) fn patient_path(uuid: &ResourceUuid) -> String {
    format!("{}/{}", PATIENT_PATH, uuid)
}

pub(crate) fn identifier_path(patient: &ResourceUuid, identifier: Option<&ResourceUuid>) -> String {
    match identifier {
        Some(identifier) => format!(
            "{}/{}/{}/{}",
            PATIENT_PATH, patient, IDENTIFIER_SUBRESOURCE, identifier
        ),
        None => format!("{}/{}/{}", PATIENT_PATH, patient, IDENTIFIER_SUBRESOURCE),
    }
}

#[async_trait]
impl PatientResource for RestClient {
    async fn get_patient(&self, uuid: &ResourceUuid) -> ClientResult<PatientRecord> {
        self.get(&patient_path(uuid), &[("v", FULL_REPRESENTATION)])
            .await
    }
}

#[async_trait]
impl EncounterResource for RestClient {
    async fn get_encounters_by_patient(
        &self,
        patient: &ResourceUuid,
    ) -> ClientResult<Vec<EncounterRecord>> {
        let patient = patient.to_string();
        let list: ListResult<EncounterRecord> = self
            .get(
                ENCOUNTER_PATH,
                &[("patient", patient.as_str()), ("v", FULL_REPRESENTATION)],
            )
            .await?;
        Ok(list.results)
    }
}

#[async_trait]
impl IdentifierResource for RestClient {
    async fn save_identifier(
        &self,
        patient: &ResourceUuid,
        identifier_uuid: Option<&ResourceUuid>,
        payload: &IdentifierPayload,
    ) -> ClientResult<()> {
        self.post(&identifier_path(patient, identifier_uuid), payload)
            .await
    }
}

#[async_trait]
impl SubLocationSource for RestClient {
    async fn lookup(&self, name: &str) -> ClientResult<SubLocation> {
        self.get(SUB_LOCATION_PATH, &[(SUB_LOCATION_NAME_PARAM, name)])
            .await
    }

    async fn list(&self) -> ClientResult<Vec<SubLocation>> {
        let list: ListResult<SubLocation> = self.get(SUB_LOCATION_PATH, &[]).await?;
        Ok(list.results)
    }
}
