//! In-memory fakes of the REST resources for unit tests.

use crate::identifier::IdentifierPayload;
use crate::resources::{
    EncounterRecord, EncounterResource, IdentifierResource, PatientRecord, PatientResource,
    SubLocationSource,
};
use crate::sub_location::SubLocation;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use omrs_uuid::ResourceUuid;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

fn not_found(what: &str) -> ClientError {
    ClientError::Status {
        url: format!("fake://{}", what),
        status: reqwest::StatusCode::NOT_FOUND,
        body: String::new(),
    }
}

/// Holds a patient read open until the test releases it.
#[derive(Default)]
pub(crate) struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    patients: Mutex<HashMap<ResourceUuid, PatientRecord>>,
    encounters: Mutex<HashMap<ResourceUuid, Vec<EncounterRecord>>>,
    gates: Mutex<HashMap<ResourceUuid, Arc<Gate>>>,
    pub patient_calls: AtomicUsize,
    pub encounter_calls: AtomicUsize,
    pub fail_encounters: AtomicBool,
    pub fail_writes: AtomicBool,
    pub writes: Mutex<Vec<(ResourceUuid, Option<ResourceUuid>, IdentifierPayload)>>,
}

impl FakeBackend {
    /// Registers a patient with `encounter_count` encounters and returns its uuid.
    pub fn add_patient(&self, name: &str, encounter_count: usize) -> ResourceUuid {
        let uuid = ResourceUuid::new();
        let record = json!({ "uuid": uuid.to_string(), "display": name });
        let serde_json::Value::Object(record) = record else {
            unreachable!()
        };
        let encounters = (0..encounter_count)
            .map(|i| json!({ "uuid": format!("enc-{}", i), "patient": uuid.to_string() }))
            .collect();

        self.patients.lock().unwrap().insert(uuid, record);
        self.encounters.lock().unwrap().insert(uuid, encounters);
        uuid
    }

    pub fn hold(&self, uuid: ResourceUuid) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.lock().unwrap().insert(uuid, gate.clone());
        gate
    }

    pub fn fetch_count(&self) -> usize {
        self.patient_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PatientResource for FakeBackend {
    async fn get_patient(&self, uuid: &ResourceUuid) -> ClientResult<PatientRecord> {
        self.patient_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(uuid).cloned();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.patients
            .lock()
            .unwrap()
            .get(uuid)
            .cloned()
            .ok_or_else(|| not_found("patient"))
    }
}

#[async_trait]
impl EncounterResource for FakeBackend {
    async fn get_encounters_by_patient(
        &self,
        patient: &ResourceUuid,
    ) -> ClientResult<Vec<EncounterRecord>> {
        self.encounter_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_encounters.load(Ordering::SeqCst) {
            return Err(not_found("encounter"));
        }
        Ok(self
            .encounters
            .lock()
            .unwrap()
            .get(patient)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl IdentifierResource for FakeBackend {
    async fn save_identifier(
        &self,
        patient: &ResourceUuid,
        identifier_uuid: Option<&ResourceUuid>,
        payload: &IdentifierPayload,
    ) -> ClientResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                url: "fake://identifier".into(),
                status: reqwest::StatusCode::BAD_REQUEST,
                body: "duplicate identifier".into(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((*patient, identifier_uuid.copied(), payload.clone()));
        Ok(())
    }
}

/// Sub-location source whose direct lookup either returns a fixed entry or fails.
pub(crate) struct FakeSubLocations {
    pub direct: Option<SubLocation>,
    pub all: Vec<SubLocation>,
    pub fail_list: bool,
    pub lookup_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeSubLocations {
    pub fn new(direct: Option<SubLocation>, names: &[&str]) -> Self {
        Self {
            direct,
            all: names.iter().map(|n| sub_location(n)).collect(),
            fail_list: false,
            lookup_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }
}

pub(crate) fn sub_location(name: &str) -> SubLocation {
    SubLocation {
        name: name.to_string(),
        uuid: Some(format!("uuid-{}", name.to_lowercase().replace(' ', "-"))),
        user_generated_id: None,
    }
}

#[async_trait]
impl SubLocationSource for FakeSubLocations {
    async fn lookup(&self, _name: &str) -> ClientResult<SubLocation> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.direct.clone().ok_or_else(|| not_found("sub-location"))
    }

    async fn list(&self) -> ClientResult<Vec<SubLocation>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(not_found("sub-location list"));
        }
        Ok(self.all.clone())
    }
}
