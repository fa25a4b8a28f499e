use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartCondition {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asserter: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_date_time: Option<DateTime<Utc>>,
}

fn object_type() -> String {
    DatamartCondition::OBJECT_TYPE.to_string()
}

impl Default for DatamartCondition {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            asserter: None,
            category: None,
            clinical_status: None,
            onset_date_time: None,
        }
    }
}

datamart_kind!(DatamartCondition, Condition, "Condition");

/// Patient, then asserter.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConditionReferences;

impl ReferenceExtractor<DatamartCondition> for ConditionReferences {
    fn references<'r>(&self, resource: &'r DatamartCondition) -> Vec<&'r DatamartReference> {
        std::iter::once(&resource.patient)
            .chain(resource.asserter.as_ref())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartCondition,
    ) -> Vec<&'r mut DatamartReference> {
        std::iter::once(&mut resource.patient)
            .chain(resource.asserter.as_mut())
            .collect()
    }
}
