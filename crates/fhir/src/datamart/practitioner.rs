use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartPractitioner {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<PractitionerName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub practitioner_role: Vec<PractitionerRole>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Where and for whom a practitioner works.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<DatamartReference>,
}

fn object_type() -> String {
    DatamartPractitioner::OBJECT_TYPE.to_string()
}

impl Default for DatamartPractitioner {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            npi: None,
            active: None,
            name: None,
            practitioner_role: Vec::new(),
        }
    }
}

datamart_kind!(DatamartPractitioner, Practitioner, "Practitioner");

/// Every role's managing organization, then every role's locations.
#[derive(Clone, Copy, Debug, Default)]
pub struct PractitionerReferences;

impl ReferenceExtractor<DatamartPractitioner> for PractitionerReferences {
    fn references<'r>(&self, resource: &'r DatamartPractitioner) -> Vec<&'r DatamartReference> {
        let roles = &resource.practitioner_role;
        roles
            .iter()
            .filter_map(|role| role.managing_organization.as_ref())
            .chain(roles.iter().flat_map(|role| role.location.iter()))
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartPractitioner,
    ) -> Vec<&'r mut DatamartReference> {
        // Split each role into its two disjoint borrows, then emit in the read order.
        let (organizations, locations): (Vec<_>, Vec<_>) = resource
            .practitioner_role
            .iter_mut()
            .map(|role| (role.managing_organization.as_mut(), &mut role.location))
            .unzip();
        organizations
            .into_iter()
            .flatten()
            .chain(locations.into_iter().flat_map(|l| l.iter_mut()))
            .collect()
    }
}
