//! Canonical surrogate identifiers.

use crate::{IdsError, IdsResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Opaque public identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is in canonical form. A surrogate carries no
/// information about the internal record it stands for.
///
/// # Construction
/// - [`SurrogateId::new`] mints a fresh surrogate (directory side only).
/// - [`SurrogateId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the canonical 32-character lowercase hex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurrogateId(Uuid);

impl Default for SurrogateId {
    fn default() -> Self {
        Self::new()
    }
}

impl SurrogateId {
    /// Mints a new random surrogate (RFC 4122 version 4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a surrogate that must already be in canonical form.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised, so one surrogate has
    /// exactly one spelling on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`IdsError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> IdsResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdsError::InvalidInput(format!(
                "surrogate must be 32 lowercase hex characters without hyphens, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdsError::InvalidInput(format!("invalid surrogate '{input}': {e}")))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical surrogate form.
    ///
    /// Purely syntactic: exactly 32 bytes of `0-9` / `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SurrogateId {
    type Err = IdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurrogateId::parse(s)
    }
}
