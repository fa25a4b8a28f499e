use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartLocation {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<DatamartReference>,
}

fn object_type() -> String {
    DatamartLocation::OBJECT_TYPE.to_string()
}

impl Default for DatamartLocation {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            name: None,
            status: None,
            managing_organization: None,
        }
    }
}

datamart_kind!(DatamartLocation, Location, "Location");

#[derive(Clone, Copy, Debug, Default)]
pub struct LocationReferences;

impl ReferenceExtractor<DatamartLocation> for LocationReferences {
    fn references<'r>(&self, resource: &'r DatamartLocation) -> Vec<&'r DatamartReference> {
        resource.managing_organization.iter().collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartLocation,
    ) -> Vec<&'r mut DatamartReference> {
        resource.managing_organization.iter_mut().collect()
    }
}
