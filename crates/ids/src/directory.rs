//! Directory contract: identities, registrations, and the client trait.

use crate::IdsResult;

/// The internal name of a record: directory namespace, resource type, internal identifier.
///
/// `resource` is in directory form (`DIAGNOSTIC_REPORT`, not `DiagnosticReport`).
/// Equality covers all three fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceIdentity {
    pub system: String,
    pub resource: String,
    pub identifier: String,
}

impl ResourceIdentity {
    pub fn new(
        system: impl Into<String>,
        resource: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }
}

/// One surrogate and every identity the directory considers an alias of it.
///
/// The directory decides the grouping. Registrations are never edited after they are
/// returned.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registration {
    pub uuid: String,
    #[cfg_attr(feature = "serde", serde(rename = "resourceIdentities"))]
    pub resource_identities: Vec<ResourceIdentity>,
}

impl Registration {
    pub fn new(uuid: impl Into<String>, resource_identities: Vec<ResourceIdentity>) -> Self {
        Self {
            uuid: uuid.into(),
            resource_identities,
        }
    }
}

/// Client for the external identity directory.
///
/// Calls are synchronous. Retries and timeouts, if any, belong to the implementation.
pub trait IdentityService: Send + Sync {
    /// Registers a batch of identities and returns their registrations.
    ///
    /// Identities the directory has never seen get a freshly minted surrogate; known identities
    /// get the surrogate they had before.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IdsError::RegistrationFailed`] when the directory is unavailable.
    fn register(&self, identities: &[ResourceIdentity]) -> IdsResult<Vec<Registration>>;

    /// Resolves a surrogate back to the identities registered under it.
    ///
    /// # Errors
    ///
    /// - [`crate::IdsError::LookupFailed`] when the directory is unavailable.
    /// - [`crate::IdsError::UnknownIdentity`] when the surrogate was never registered.
    fn lookup(&self, public_id: &str) -> IdsResult<Vec<ResourceIdentity>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equality_covers_all_fields() {
        let a = ResourceIdentity::new("CDW", "PATIENT", "1011537977V693883");
        assert_eq!(a, ResourceIdentity::new("CDW", "PATIENT", "1011537977V693883"));
        assert_ne!(a, ResourceIdentity::new("MVI", "PATIENT", "1011537977V693883"));
        assert_ne!(a, ResourceIdentity::new("CDW", "ORGANIZATION", "1011537977V693883"));
        assert_ne!(a, ResourceIdentity::new("CDW", "PATIENT", "1011537978V693883"));
    }

    #[test]
    fn registration_serialises_with_directory_field_names() {
        let registration = Registration::new(
            "0a1b2c3d4e5f60718293a4b5c6d7e8f9",
            vec![ResourceIdentity::new("CDW", "PROCEDURE", "1000000719261")],
        );
        let json = serde_json::to_string(&registration).expect("serialise");
        assert!(json.contains("\"resourceIdentities\""));
        assert!(json.contains("\"uuid\":\"0a1b2c3d4e5f60718293a4b5c6d7e8f9\""));
    }
}
