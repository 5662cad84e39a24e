//! Constants used throughout the omrs core crate.
//!
//! REST paths, representation names and notification texts live here so the resource layer
//! and the tests agree on them.

/// REST base used when `OMRS_REST_BASE` is not set.
pub const DEFAULT_REST_BASE: &str = "http://localhost:8080/openmrs/ws/rest/v1/";

/// Request timeout used when `OMRS_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the patient resource, relative to the REST base.
pub const PATIENT_PATH: &str = "patient";

/// Path of the encounter resource, relative to the REST base.
pub const ENCOUNTER_PATH: &str = "encounter";

/// Sub-resource of a patient holding its identifiers.
pub const IDENTIFIER_SUBRESOURCE: &str = "identifier";

/// Address hierarchy endpoint serving sub-location entries.
pub const SUB_LOCATION_PATH: &str = "module/addresshierarchy/ajax/getChildAddressHierarchyEntries.form";

/// Query parameter carrying the entry name for a direct sub-location lookup.
pub const SUB_LOCATION_NAME_PARAM: &str = "searchString";

/// Representation requested for patient and encounter reads.
pub const FULL_REPRESENTATION: &str = "full";

/// Maximum number of response body characters kept in a status error.
pub const ERROR_BODY_EXCERPT_CHARS: usize = 200;

pub const IDENTIFIER_SAVED_TITLE: &str = "Patient identifier saved";
pub const IDENTIFIER_SAVED_DESCRIPTION: &str = "Patient identifier has been added";
pub const IDENTIFIER_UPDATED_TITLE: &str = "Patient identifier updated";
pub const IDENTIFIER_UPDATED_DESCRIPTION: &str = "Patient identifier has been updated";
