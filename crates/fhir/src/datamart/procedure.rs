use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartProcedure {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DatamartReference>,
}

fn object_type() -> String {
    DatamartProcedure::OBJECT_TYPE.to_string()
}

impl Default for DatamartProcedure {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            status: None,
            performed_date_time: None,
            location: None,
        }
    }
}

datamart_kind!(DatamartProcedure, Procedure, "Procedure");

/// Patient, then location.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcedureReferences;

impl ReferenceExtractor<DatamartProcedure> for ProcedureReferences {
    fn references<'r>(&self, resource: &'r DatamartProcedure) -> Vec<&'r DatamartReference> {
        std::iter::once(&resource.patient)
            .chain(resource.location.as_ref())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartProcedure,
    ) -> Vec<&'r mut DatamartReference> {
        std::iter::once(&mut resource.patient)
            .chain(resource.location.as_mut())
            .collect()
    }
}
