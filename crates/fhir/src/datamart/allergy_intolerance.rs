use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartAllergyIntolerance {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorder: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

/// Free-text note, optionally attributed to a practitioner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<DatamartReference>,
}

fn object_type() -> String {
    DatamartAllergyIntolerance::OBJECT_TYPE.to_string()
}

impl Default for DatamartAllergyIntolerance {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            recorded: None,
            recorder: None,
            clinical_status: None,
            notes: Vec::new(),
        }
    }
}

datamart_kind!(
    DatamartAllergyIntolerance,
    AllergyIntolerance,
    "AllergyIntolerance"
);

/// Recorder, patient, then each note's practitioner.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllergyIntoleranceReferences;

impl ReferenceExtractor<DatamartAllergyIntolerance> for AllergyIntoleranceReferences {
    fn references<'r>(
        &self,
        resource: &'r DatamartAllergyIntolerance,
    ) -> Vec<&'r DatamartReference> {
        resource
            .recorder
            .iter()
            .chain(std::iter::once(&resource.patient))
            .chain(resource.notes.iter().filter_map(|n| n.practitioner.as_ref()))
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartAllergyIntolerance,
    ) -> Vec<&'r mut DatamartReference> {
        resource
            .recorder
            .iter_mut()
            .chain(std::iter::once(&mut resource.patient))
            .chain(
                resource
                    .notes
                    .iter_mut()
                    .filter_map(|n| n.practitioner.as_mut()),
            )
            .collect()
    }
}
