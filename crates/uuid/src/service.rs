//! Implementation of the canonical resource UUID wrapper.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical OpenMRS resource UUID (36 lowercase characters, hyphenated).
///
/// Once constructed, the contained UUID is valid and formats the same way every time, so two
/// `ResourceUuid`s compare equal exactly when they address the same resource.
///
/// # Construction
/// - [`ResourceUuid::new`] generates a fresh v4 UUID (mostly useful in tests).
/// - [`ResourceUuid::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the lowercase hyphenated form, which is what the REST API expects in paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceUuid(Uuid);

impl Default for ResourceUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceUuid {
    /// Generates a new random resource UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a resource UUID.
    ///
    /// Accepts the hyphenated form in any letter case. Simple (unhyphenated), braced and URN
    /// forms are rejected because the backend never produces them.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not a hyphenated UUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let trimmed = input.trim();
        if !Self::is_hyphenated_shape(trimmed) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 36 characters in hyphenated form, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("'{}': {}", input, e)))
    }

    /// Returns the UUID as a `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is already in canonical form.
    ///
    /// Purely syntactic: 36 bytes, lowercase hex, hyphens in the four fixed positions.
    pub fn is_canonical(input: &str) -> bool {
        Self::is_hyphenated_shape(input)
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f' | b'-'))
    }

    fn is_hyphenated_shape(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => b.is_ascii_hexdigit(),
            })
    }
}

impl fmt::Display for ResourceUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceUuid::parse(s)
    }
}

impl From<Uuid> for ResourceUuid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ResourceUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_parse_canonical() {
        let uuid = ResourceUuid::parse(SAMPLE).unwrap();
        assert_eq!(uuid.to_string(), SAMPLE);
        assert!(ResourceUuid::is_canonical(&uuid.to_string()));
    }

    #[test]
    fn test_parse_normalises_uppercase() {
        let uuid = ResourceUuid::parse("550E8400-E29B-41D4-A716-446655440000").unwrap();
        assert_eq!(uuid.to_string(), SAMPLE);
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let uuid = ResourceUuid::parse(" 550e8400-e29b-41d4-a716-446655440000\n").unwrap();
        assert_eq!(uuid.to_string(), SAMPLE);
    }

    #[test]
    fn test_parse_rejects_simple_form() {
        let result = ResourceUuid::parse("550e8400e29b41d4a716446655440000");
        assert!(matches!(result, Err(UuidError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(ResourceUuid::parse("550e8400-e29b-41d4-a716-44665544000g").is_err());
        assert!(ResourceUuid::parse("not-a-uuid").is_err());
        assert!(ResourceUuid::parse("").is_err());
    }

    #[test]
    fn test_is_canonical_requires_lowercase() {
        assert!(ResourceUuid::is_canonical(SAMPLE));
        assert!(!ResourceUuid::is_canonical(
            "550E8400-E29B-41D4-A716-446655440000"
        ));
        assert!(!ResourceUuid::is_canonical("550e8400e29b41d4a716446655440000"));
    }

    #[test]
    fn test_from_str_and_equality() {
        let a: ResourceUuid = SAMPLE.parse().unwrap();
        let b = ResourceUuid::parse(&SAMPLE.to_uppercase()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, ResourceUuid::new());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let uuid = ResourceUuid::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&uuid).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));

        let back: ResourceUuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uuid);

        assert!(serde_json::from_str::<ResourceUuid>("\"nope\"").is_err());
    }
}
