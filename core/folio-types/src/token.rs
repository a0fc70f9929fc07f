//! The opaque public share identifier.
//!
//! A share token appears in public URLs (`/shared/{token}`) and is the only
//! input an anonymous visitor controls. Format validation is deliberately
//! cheap and runs before any backend call: a malformed candidate
//! short-circuits to not-found with zero backend interaction, so probing
//! the token space costs the prober a network round trip and us nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Minimum accepted token length.
pub const MIN_TOKEN_LEN: usize = 8;

/// Errors produced when parsing a candidate share token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Shorter than [`MIN_TOKEN_LEN`] characters (includes empty input).
    #[error("share token too short ({0} chars, minimum {MIN_TOKEN_LEN})")]
    TooShort(usize),

    /// Contains a character outside `[A-Za-z0-9-]`.
    #[error("share token contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An opaque, format-validated share token.
///
/// Valid tokens are at least [`MIN_TOKEN_LEN`] characters drawn exclusively
/// from `[A-Za-z0-9-]`. Freshly generated tokens are UUID v4 strings, which
/// always satisfy the format. The alphabet is URL- and markup-safe, so a
/// parsed token never needs further escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareToken(String);

impl ShareToken {
    /// Mints a fresh random token (UUID v4, 36 chars).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns true iff `candidate` is a well-formed share token.
    #[must_use]
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() >= MIN_TOKEN_LEN
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// Parses a candidate token, rejecting malformed input.
    pub fn parse(candidate: &str) -> Result<Self, TokenError> {
        if candidate.len() < MIN_TOKEN_LEN {
            return Err(TokenError::TooShort(candidate.len()));
        }
        if let Some(bad) = candidate
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(TokenError::InvalidCharacter(bad));
        }
        Ok(Self(candidate.to_string()))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShareToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
