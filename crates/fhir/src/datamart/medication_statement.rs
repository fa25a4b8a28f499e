use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartMedicationStatement {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    pub medication: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_asserted: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn object_type() -> String {
    DatamartMedicationStatement::OBJECT_TYPE.to_string()
}

impl Default for DatamartMedicationStatement {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            medication: DatamartReference::default(),
            status: None,
            date_asserted: None,
            note: None,
        }
    }
}

datamart_kind!(DatamartMedicationStatement, MedicationStatement, "MedicationStatement");

/// Medication, then patient.
#[derive(Clone, Copy, Debug, Default)]
pub struct MedicationStatementReferences;

impl ReferenceExtractor<DatamartMedicationStatement> for MedicationStatementReferences {
    fn references<'r>(
        &self,
        resource: &'r DatamartMedicationStatement,
    ) -> Vec<&'r DatamartReference> {
        vec![&resource.medication, &resource.patient]
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartMedicationStatement,
    ) -> Vec<&'r mut DatamartReference> {
        vec![&mut resource.medication, &mut resource.patient]
    }
}
