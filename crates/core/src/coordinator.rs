//! Patient state coordination.
//!
//! [`PatientCoordinator`] owns the "currently loaded patient": the merged demographics and
//! encounters record, its uuid and a busy flag. The three are published together as one
//! [`PatientState`] snapshot through a `tokio::sync::watch` channel. Publishing means the
//! snapshot is replaced atomically and every receiver is woken; nobody ever observes a patient
//! without its uuid or a cleared busy flag without the matching result.
//!
//! ## Overlapping loads
//!
//! Every fetch cycle and every [`PatientCoordinator::reset`] takes a new generation number.
//! A fetch publishes its result only while its generation is still the latest, so a slow
//! response for a patient the user has already navigated away from is discarded instead of
//! overwriting the newer state.
//!
//! ## Failures
//!
//! Read failures are logged and leave the state empty with `busy == false`. They are not
//! returned to the caller. Identifier writes notify on success and log on failure.

use crate::constants::{
    IDENTIFIER_SAVED_DESCRIPTION, IDENTIFIER_SAVED_TITLE, IDENTIFIER_UPDATED_DESCRIPTION,
    IDENTIFIER_UPDATED_TITLE,
};
use crate::identifier::IdentifierPayload;
use crate::notify::{Notification, Notifier};
use crate::resources::{
    EncounterRecord, EncounterResource, IdentifierResource, PatientRecord, PatientResource,
    RestClient,
};
use omrs_types::IdentifierValue;
use omrs_uuid::ResourceUuid;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A patient's demographics with its encounters attached.
///
/// Replaced wholesale on every load, never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedPatient {
    uuid: ResourceUuid,
    demographics: PatientRecord,
    encounters: Vec<EncounterRecord>,
}

impl LoadedPatient {
    fn new(
        uuid: ResourceUuid,
        mut demographics: PatientRecord,
        encounters: Vec<EncounterRecord>,
    ) -> Self {
        // The attached list always wins over whatever the patient representation carried.
        demographics.remove("encounters");
        Self {
            uuid,
            demographics,
            encounters,
        }
    }

    pub fn uuid(&self) -> &ResourceUuid {
        &self.uuid
    }

    pub fn demographics(&self) -> &PatientRecord {
        &self.demographics
    }

    pub fn encounters(&self) -> &[EncounterRecord] {
        &self.encounters
    }

    /// The demographic record with the encounter list attached under `encounters`.
    pub fn merged_record(&self) -> serde_json::Value {
        let mut record = self.demographics.clone();
        record.insert(
            "encounters".to_string(),
            serde_json::Value::Array(self.encounters.clone()),
        );
        serde_json::Value::Object(record)
    }
}

/// Snapshot of the coordinator's published state.
#[derive(Clone, Debug, Default)]
pub struct PatientState {
    patient: Option<Arc<LoadedPatient>>,
    patient_uuid: Option<ResourceUuid>,
    busy: bool,
    generation: u64,
}

impl PatientState {
    pub fn patient(&self) -> Option<&Arc<LoadedPatient>> {
        self.patient.as_ref()
    }

    pub fn patient_uuid(&self) -> Option<&ResourceUuid> {
        self.patient_uuid.as_ref()
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Generation of the fetch or reset that produced this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when nothing is loaded and nothing is loading.
    pub fn is_initial(&self) -> bool {
        self.patient.is_none() && self.patient_uuid.is_none() && !self.busy
    }
}

struct Inner {
    patients: Arc<dyn PatientResource>,
    encounters: Arc<dyn EncounterResource>,
    identifiers: Arc<dyn IdentifierResource>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<PatientState>,
}

impl Inner {
    async fn complete_fetch(&self, uuid: ResourceUuid, generation: u64) {
        let (demographics, encounters) = tokio::join!(
            self.patients.get_patient(&uuid),
            self.encounters.get_encounters_by_patient(&uuid),
        );

        let loaded = match (demographics, encounters) {
            (Ok(demographics), Ok(encounters)) => {
                Some(Arc::new(LoadedPatient::new(uuid, demographics, encounters)))
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(patient = %uuid, error = %err, "failed to load patient");
                None
            }
        };

        self.publish(uuid, generation, loaded);
    }

    /// Ends the fetch cycle `generation`, unless a newer fetch or a reset superseded it.
    fn publish(&self, uuid: ResourceUuid, generation: u64, loaded: Option<Arc<LoadedPatient>>) {
        let published = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.patient_uuid = loaded.as_ref().map(|_| uuid);
            state.patient = loaded;
            state.busy = false;
            true
        });
        if !published {
            tracing::debug!(patient = %uuid, generation, "discarding stale patient fetch");
        }
    }
}

/// Owner of the currently loaded patient. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PatientCoordinator {
    inner: Arc<Inner>,
}

impl PatientCoordinator {
    pub fn new(
        patients: Arc<dyn PatientResource>,
        encounters: Arc<dyn EncounterResource>,
        identifiers: Arc<dyn IdentifierResource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(PatientState::default());
        Self {
            inner: Arc::new(Inner {
                patients,
                encounters,
                identifiers,
                notifier,
                state,
            }),
        }
    }

    /// Coordinator reading and writing through a single REST client.
    pub fn from_rest(client: RestClient, notifier: Arc<dyn Notifier>) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client, notifier)
    }

    /// Current snapshot.
    pub fn state(&self) -> PatientState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every published snapshot from now on, including after `reset`.
    pub fn subscribe(&self) -> watch::Receiver<PatientState> {
        self.inner.state.subscribe()
    }

    /// Loads `uuid` unless it is already the loaded patient.
    ///
    /// Returns the snapshot current when the call finishes.
    pub async fn load_patient(&self, uuid: ResourceUuid) -> PatientState {
        let already_loaded = self
            .inner
            .state
            .borrow()
            .patient
            .as_ref()
            .is_some_and(|patient| patient.uuid == uuid);

        if already_loaded {
            tracing::debug!(patient = %uuid, "patient already loaded, skipping fetch");
            return self.state();
        }
        self.fetch_patient(uuid).await
    }

    /// Runs one fetch cycle for `uuid`, whether or not it is already loaded.
    ///
    /// The published state is emptied and marked busy, then demographics and encounters are
    /// read concurrently. Both must succeed for the patient to be published.
    ///
    /// The reads and the final publish run on a spawned task, so dropping the returned future
    /// (a timeout, a `select!`, an aborted caller) does not leave the busy flag set.
    pub async fn fetch_patient(&self, uuid: ResourceUuid) -> PatientState {
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.patient = None;
            state.patient_uuid = None;
            state.busy = true;
        });
        tracing::info!(patient = %uuid, generation, "fetching patient");

        let inner = self.inner.clone();
        let cycle = tokio::spawn(async move { inner.complete_fetch(uuid, generation).await });
        if let Err(err) = cycle.await {
            tracing::error!(patient = %uuid, error = %err, "patient fetch task failed");
            self.inner.publish(uuid, generation, None);
        }

        self.state()
    }

    /// Re-fetches the loaded patient. Returns `None` when no patient is loaded.
    pub async fn reload(&self) -> Option<PatientState> {
        let uuid = self.inner.state.borrow().patient.as_ref().map(|p| p.uuid)?;
        Some(self.fetch_patient(uuid).await)
    }

    /// Discards all published state and invalidates any fetch still in flight.
    pub fn reset(&self) {
        self.inner.state.send_modify(|state| {
            state.generation += 1;
            state.patient = None;
            state.patient_uuid = None;
            state.busy = false;
        });
    }

    /// Adds an identifier to `patient` in the background.
    ///
    /// Must be called from within a Tokio runtime. The returned handle may be awaited but does
    /// not need to be.
    pub fn create_identifier(
        &self,
        patient: ResourceUuid,
        location: ResourceUuid,
        identifier: IdentifierValue,
        identifier_uuid: Option<ResourceUuid>,
        identifier_type: ResourceUuid,
    ) -> JoinHandle<()> {
        let payload = IdentifierPayload::for_create(identifier, identifier_type, location);
        self.spawn_identifier_write(
            patient,
            identifier_uuid,
            payload,
            Notification::success(IDENTIFIER_SAVED_TITLE, IDENTIFIER_SAVED_DESCRIPTION),
        )
    }

    /// Changes the value of an existing identifier in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn update_identifier(
        &self,
        patient: ResourceUuid,
        identifier: IdentifierValue,
        identifier_uuid: ResourceUuid,
    ) -> JoinHandle<()> {
        let payload = IdentifierPayload::for_update(identifier);
        self.spawn_identifier_write(
            patient,
            Some(identifier_uuid),
            payload,
            Notification::success(IDENTIFIER_UPDATED_TITLE, IDENTIFIER_UPDATED_DESCRIPTION),
        )
    }

    fn spawn_identifier_write(
        &self,
        patient: ResourceUuid,
        identifier_uuid: Option<ResourceUuid>,
        payload: IdentifierPayload,
        on_success: Notification,
    ) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            match inner
                .identifiers
                .save_identifier(&patient, identifier_uuid.as_ref(), &payload)
                .await
            {
                Ok(()) => inner.notifier.notify(on_success),
                // TODO: raise an error notification once the UI has copy for write failures.
                Err(err) => {
                    tracing::error!(
                        patient = %patient,
                        error = %err,
                        "failed to save patient identifier"
                    )
                }
            }
        })
    }
}
