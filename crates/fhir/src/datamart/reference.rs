//! References between datamart resources.

use crate::ResourceNameTranslation;
use pgd_ids::ResourceIdentity;
use serde::{Deserialize, Serialize};

/// A pointer from one resource to another, as stored in the datamart.
///
/// `resource_type` is in FHIR form (`Organization`). `reference` holds the internal id until
/// the identity layer overwrites it with the surrogate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatamartReference {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl DatamartReference {
    pub fn of(resource_type: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            resource_type: Some(resource_type.into()),
            reference: Some(reference.into()),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Both the type and the reference are present and not blank.
    pub fn has_type_and_reference(&self) -> bool {
        self.type_and_reference().is_some()
    }

    /// The `(type, reference)` pair when both are present and not blank.
    pub fn type_and_reference(&self) -> Option<(&str, &str)> {
        let resource_type = self
            .resource_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())?;
        let reference = self.reference.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((resource_type, reference))
    }

    /// Directory identity for this reference, or `None` if it is blank or its type is not a
    /// FHIR resource type name.
    pub fn as_resource_identity(&self, system: &str) -> Option<ResourceIdentity> {
        let (resource_type, reference) = self.type_and_reference()?;
        let resource = ResourceNameTranslation::fhir_to_identity_service(resource_type).ok()?;
        Some(ResourceIdentity::new(system, resource, reference))
    }
}
