//! # omrs Core
//!
//! Client-side state and lookups over an OpenMRS REST backend.
//!
//! This crate contains:
//! - [`coordinator::PatientCoordinator`]: the currently loaded patient (demographics merged with
//!   encounters) and a busy flag, published as one observable snapshot
//! - [`sub_location::SubLocationLookup`]: address-hierarchy lookup and search
//! - Patient identifier writes with user-facing [`notify`] notifications
//! - REST [`resources`] traits and their `reqwest` implementation
//! - Startup [`config`], including the appointments front-end flags
//!
//! **No presentation concerns**: rendering notifications or state belongs to the caller.

pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod identifier;
pub mod notify;
pub mod resources;
pub mod sub_location;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AppointmentsConfig, ClientConfig, Credentials};
pub use coordinator::{LoadedPatient, PatientCoordinator, PatientState};
pub use error::{ClientError, ClientResult};
pub use identifier::IdentifierPayload;
pub use notify::{ChannelNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use resources::RestClient;
pub use sub_location::{SubLocation, SubLocationLookup};

pub use omrs_types::{IdentifierValue, NonEmptyText};
pub use omrs_uuid::ResourceUuid;
