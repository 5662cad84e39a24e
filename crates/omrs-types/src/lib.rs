//! Validated text types shared across the omrs crates.
//!
//! Values arriving from the CLI or from configuration are checked once at the boundary and then
//! carried as these types, so the REST layer never has to re-check them.

use serde::{Deserialize, Serialize};

/// Longest identifier value the OpenMRS `patient_identifier.identifier` column accepts.
pub const MAX_IDENTIFIER_CHARS: usize = 50;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("text cannot be empty")]
    Empty,
    #[error("text is {actual} characters long, at most {max} are allowed")]
    TooLong { max: usize, actual: usize },
}

/// Trimmed text with at least one character.
///
/// Used where a blank value is never meaningful: login names, identifier values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        // Avoid reallocating when there is nothing to trim.
        if value.trim().len() == value.len() && !value.is_empty() {
            return Ok(Self(value));
        }
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The value of a patient identifier, e.g. a medical record number.
///
/// Non-empty after trimming and no longer than [`MAX_IDENTIFIER_CHARS`], so a value the backend
/// would truncate or reject never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentifierValue(NonEmptyText);

impl IdentifierValue {
    /// # Errors
    ///
    /// `TextError::Empty` for blank input, `TextError::TooLong` past [`MAX_IDENTIFIER_CHARS`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        NonEmptyText::new(input).and_then(Self::from_text)
    }

    fn from_text(text: NonEmptyText) -> Result<Self, TextError> {
        let actual = text.char_count();
        if actual > MAX_IDENTIFIER_CHARS {
            return Err(TextError::TooLong {
                max: MAX_IDENTIFIER_CHARS,
                actual,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for IdentifierValue {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NonEmptyText::try_from(value).and_then(Self::from_text)
    }
}

impl From<IdentifierValue> for String {
    fn from(value: IdentifierValue) -> Self {
        value.0.into()
    }
}

impl std::fmt::Display for IdentifierValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for IdentifierValue {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
