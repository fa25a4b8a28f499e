use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prescription. Served to clients as a FHIR `MedicationRequest`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartMedicationOrder {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    pub medication: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriber: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_written: Option<DateTime<Utc>>,
}

fn object_type() -> String {
    DatamartMedicationOrder::OBJECT_TYPE.to_string()
}

impl Default for DatamartMedicationOrder {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            medication: DatamartReference::default(),
            prescriber: None,
            status: None,
            date_written: None,
        }
    }
}

datamart_kind!(DatamartMedicationOrder, MedicationOrder, "MedicationOrder");

/// Medication, patient, then prescriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct MedicationOrderReferences;

impl ReferenceExtractor<DatamartMedicationOrder> for MedicationOrderReferences {
    fn references<'r>(&self, resource: &'r DatamartMedicationOrder) -> Vec<&'r DatamartReference> {
        [&resource.medication, &resource.patient]
            .into_iter()
            .chain(resource.prescriber.as_ref())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartMedicationOrder,
    ) -> Vec<&'r mut DatamartReference> {
        [&mut resource.medication, &mut resource.patient]
            .into_iter()
            .chain(resource.prescriber.as_mut())
            .collect()
    }
}
