//! Resource identifiers for the OpenMRS REST API.
//!
//! OpenMRS addresses patients, encounters and identifiers by UUID in URL paths. To keep URL
//! building and "is this the same patient?" comparisons consistent, omrs uses a *canonical*
//! representation: **36 lowercase characters, hyphenated** (the `uuid` crate's hyphenated form).
//!
//! ## Canonical UUID form
//! - Length: 36
//! - Characters: `0-9`, `a-f` and `-` at positions 8, 13, 18 and 23
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Unlike storage identifiers, resource UUIDs are typed by humans and pasted from browsers, so
//! uppercase input is normalised rather than rejected. Anything that is not a UUID at all is
//! rejected with [`UuidError::InvalidInput`].

mod service;

pub use service::{ResourceUuid, Uuid};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
