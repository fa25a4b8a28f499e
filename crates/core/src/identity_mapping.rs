//! Lookup table from internal identifiers to surrogates.
//!
//! Built from one batch of registrations and discarded with it. The directory may re-group
//! identities between calls, so a mapping is never reused across requests.

use fhir::{DatamartReference, ResourceNameTranslation};
use pgd_ids::Registration;
use std::collections::HashMap;

/// `(directory resource name, internal id) -> surrogate`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityMapping {
    ids: HashMap<String, HashMap<String, String>>,
}

impl IdentityMapping {
    /// Flattens every alias of every registration into the table.
    ///
    /// If two registrations claim the same `(resource, identifier)`, the later one wins.
    pub fn new(registrations: &[Registration]) -> Self {
        let mut ids: HashMap<String, HashMap<String, String>> = HashMap::new();
        for registration in registrations {
            for identity in &registration.resource_identities {
                ids.entry(identity.resource.clone())
                    .or_default()
                    .insert(identity.identifier.clone(), registration.uuid.clone());
            }
        }
        Self { ids }
    }

    /// Surrogate for a resource in directory form (`DIAGNOSTIC_REPORT`) and internal id.
    pub fn public_id_of(&self, resource: &str, identifier: &str) -> Option<&str> {
        self.ids
            .get(resource)
            .and_then(|by_id| by_id.get(identifier))
            .map(String::as_str)
    }

    /// Surrogate for a reference. `None` if the reference lacks a type or id, or its type is
    /// not a FHIR resource type name.
    pub fn public_id_of_reference(&self, reference: &DatamartReference) -> Option<&str> {
        let (resource_type, identifier) = reference.type_and_reference()?;
        let resource = ResourceNameTranslation::fhir_to_identity_service(resource_type).ok()?;
        self.public_id_of(&resource, identifier)
    }

    /// Number of `(resource, identifier)` keys.
    pub fn len(&self) -> usize {
        self.ids.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgd_ids::ResourceIdentity;

    fn registration(uuid: &str, resource: &str, identifier: &str) -> Registration {
        Registration::new(uuid, vec![ResourceIdentity::new("CDW", resource, identifier)])
    }

    #[test]
    fn flattens_aliases() {
        let mapping = IdentityMapping::new(&[Registration::new(
            "p",
            vec![
                ResourceIdentity::new("CDW", "PATIENT", "123V456"),
                ResourceIdentity::new("MVI", "PATIENT", "ICN-123"),
            ],
        )]);
        assert_eq!(mapping.public_id_of("PATIENT", "123V456"), Some("p"));
        assert_eq!(mapping.public_id_of("PATIENT", "ICN-123"), Some("p"));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn later_registration_wins() {
        let mapping = IdentityMapping::new(&[
            registration("first", "PATIENT", "1"),
            registration("second", "PATIENT", "1"),
        ]);
        assert_eq!(mapping.public_id_of("PATIENT", "1"), Some("second"));
    }

    #[test]
    fn misses_are_none() {
        let mapping = IdentityMapping::new(&[registration("o", "ORGANIZATION", "org1")]);
        assert_eq!(mapping.public_id_of("ORGANIZATION", "org2"), None);
        assert_eq!(mapping.public_id_of("LOCATION", "org1"), None);
        assert_eq!(mapping.public_id_of("", ""), None);
        assert!(IdentityMapping::new(&[]).is_empty());
    }

    #[test]
    fn reference_lookup_translates_type_name() {
        let mapping = IdentityMapping::new(&[registration("d", "DIAGNOSTIC_REPORT", "800:L")]);
        assert_eq!(
            mapping.public_id_of_reference(&DatamartReference::of("DiagnosticReport", "800:L")),
            Some("d")
        );
    }

    #[test]
    fn incomplete_or_malformed_references_are_none() {
        let mapping = IdentityMapping::new(&[registration("o", "ORGANIZATION", "org1")]);
        let no_type = DatamartReference {
            reference: Some("org1".into()),
            ..DatamartReference::default()
        };
        let no_id = DatamartReference {
            resource_type: Some("Organization".into()),
            ..DatamartReference::default()
        };
        assert_eq!(mapping.public_id_of_reference(&no_type), None);
        assert_eq!(mapping.public_id_of_reference(&no_id), None);
        assert_eq!(
            mapping.public_id_of_reference(&DatamartReference::of("organization", "org1")),
            None
        );
    }
}
