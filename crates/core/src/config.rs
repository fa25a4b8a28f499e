//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_IDENTITY_SYSTEM, IDENTITY_ALIASES, IDENTITY_KEYS};
use crate::{ResourceError, ResourceResult};
use std::fmt;
use std::str::FromStr;

/// What outbound translation does with a reference the directory returned no surrogate for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnresolvedReferences {
    /// Leave the internal id in place and log how many were left.
    #[default]
    Retain,
    /// Fail the whole batch before any resource is touched.
    Reject,
}

impl fmt::Display for UnresolvedReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => f.write_str("retain"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for UnresolvedReferences {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "reject" => Ok(Self::Reject),
            other => Err(ResourceError::InvalidInput(format!(
                "unresolved reference policy must be 'retain' or 'reject', got '{other}'"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    identity_system: String,
    identity_keys: Vec<String>,
    aliases: Vec<(String, String)>,
    unresolved_references: UnresolvedReferences,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] if `identity_system` is blank, or if an alias
    /// or its canonical key is not one of `identity_keys`.
    pub fn new(
        identity_system: String,
        identity_keys: Vec<String>,
        aliases: Vec<(String, String)>,
        unresolved_references: UnresolvedReferences,
    ) -> ResourceResult<Self> {
        if identity_system.trim().is_empty() {
            return Err(ResourceError::InvalidInput(
                "identity_system cannot be empty".into(),
            ));
        }

        for (alias, canonical) in &aliases {
            if !identity_keys.contains(alias) {
                return Err(ResourceError::InvalidInput(format!(
                    "alias '{alias}' is not an identity key"
                )));
            }
            if !identity_keys.contains(canonical) {
                return Err(ResourceError::InvalidInput(format!(
                    "alias '{alias}' names '{canonical}', which is not an identity key"
                )));
            }
        }

        Ok(Self {
            identity_system,
            identity_keys,
            aliases,
            unresolved_references,
        })
    }

    /// Default keys and aliases with the given system and policy.
    pub fn with_system(
        identity_system: String,
        unresolved_references: UnresolvedReferences,
    ) -> ResourceResult<Self> {
        let (identity_keys, aliases) = default_keys_and_aliases();
        Self::new(identity_system, identity_keys, aliases, unresolved_references)
    }

    pub fn identity_system(&self) -> &str {
        &self.identity_system
    }

    pub fn identity_keys(&self) -> &[String] {
        &self.identity_keys
    }

    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    pub fn unresolved_references(&self) -> UnresolvedReferences {
        self.unresolved_references
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let (identity_keys, aliases) = default_keys_and_aliases();
        Self {
            identity_system: DEFAULT_IDENTITY_SYSTEM.to_string(),
            identity_keys,
            aliases,
            unresolved_references: UnresolvedReferences::default(),
        }
    }
}

fn default_keys_and_aliases() -> (Vec<String>, Vec<(String, String)>) {
    let identity_keys = IDENTITY_KEYS.iter().map(|k| k.to_string()).collect();
    let aliases = IDENTITY_ALIASES
        .iter()
        .map(|(a, c)| (a.to_string(), c.to_string()))
        .collect();
    (identity_keys, aliases)
}

/// Parse the identity system from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_IDENTITY_SYSTEM`].
pub fn identity_system_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_IDENTITY_SYSTEM.to_string())
}

/// Parse the unresolved reference policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`UnresolvedReferences::Retain`].
pub fn unresolved_references_from_env_value(
    value: Option<String>,
) -> ResourceResult<UnresolvedReferences> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| v.parse::<UnresolvedReferences>())
        .transpose()?;

    Ok(parsed.unwrap_or_default())
}
