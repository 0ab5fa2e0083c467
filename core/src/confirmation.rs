//! Guest-facing confirmation numbers.
//!
//! Numbers are random, 10 characters long, drawn from an alphabet without look-alike characters
//! (`0`/`O`, `1`/`I`). Uniqueness is enforced by the store, not by the generator.

use crate::error::ValidationError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters used in confirmation numbers
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a confirmation number
pub const LENGTH: usize = 10;

/// A validated confirmation number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfirmationNumber(String);

impl ConfirmationNumber {
    /// Parses a confirmation number, accepting lowercase input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGuestInfo`] if the value has the wrong length or contains
    /// characters outside [`ALPHABET`].
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_ascii_uppercase();
        let valid = normalized.len() == LENGTH && normalized.bytes().all(|b| ALPHABET.contains(&b));
        if !valid {
            return Err(ValidationError::InvalidGuestInfo(format!(
                "'{value}' is not a valid confirmation number"
            )));
        }
        Ok(Self(normalized))
    }

    /// String form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConfirmationNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConfirmationNumber> for String {
    fn from(value: ConfirmationNumber) -> Self {
        value.0
    }
}

impl fmt::Display for ConfirmationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate confirmation numbers.
pub trait ConfirmationNumberGenerator: Send + Sync {
    /// Produces the next candidate. Candidates may collide; callers check and retry.
    fn generate(&self) -> ConfirmationNumber;
}

/// Generator backed by the thread-local CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomConfirmationGenerator;

impl ConfirmationNumberGenerator for RandomConfirmationGenerator {
    fn generate(&self) -> ConfirmationNumber {
        let mut rng = rand::thread_rng();
        let value: String = (0..LENGTH)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        ConfirmationNumber(value)
    }
}
