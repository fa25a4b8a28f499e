use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartOrganization {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<DatamartReference>,
}

fn object_type() -> String {
    DatamartOrganization::OBJECT_TYPE.to_string()
}

impl Default for DatamartOrganization {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            active: None,
            name: None,
            part_of: None,
        }
    }
}

datamart_kind!(DatamartOrganization, Organization, "Organization");

/// The parent organization, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrganizationReferences;

impl ReferenceExtractor<DatamartOrganization> for OrganizationReferences {
    fn references<'r>(&self, resource: &'r DatamartOrganization) -> Vec<&'r DatamartReference> {
        resource.part_of.iter().collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartOrganization,
    ) -> Vec<&'r mut DatamartReference> {
        resource.part_of.iter_mut().collect()
    }
}
