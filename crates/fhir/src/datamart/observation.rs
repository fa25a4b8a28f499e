use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartObservation {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<DatamartReference>,
}

fn object_type() -> String {
    DatamartObservation::OBJECT_TYPE.to_string()
}

impl Default for DatamartObservation {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            status: None,
            category: None,
            subject: None,
            encounter: None,
            effective_date_time: None,
            performer: Vec::new(),
        }
    }
}

datamart_kind!(DatamartObservation, Observation, "Observation");

/// Subject, then performers. Encounters are not served and stay out of the walk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObservationReferences;

impl ReferenceExtractor<DatamartObservation> for ObservationReferences {
    fn references<'r>(&self, resource: &'r DatamartObservation) -> Vec<&'r DatamartReference> {
        resource
            .subject
            .iter()
            .chain(resource.performer.iter())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartObservation,
    ) -> Vec<&'r mut DatamartReference> {
        resource
            .subject
            .iter_mut()
            .chain(resource.performer.iter_mut())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encounter_is_not_extracted() {
        let observation = DatamartObservation {
            cdw_id: "800001973863:A".into(),
            subject: Some(DatamartReference::of("Patient", "1002003004V666666")),
            encounter: Some(DatamartReference::of("Encounter", "5678")),
            performer: vec![
                DatamartReference::of("Practitioner", "1111"),
                DatamartReference::of("Organization", "2222"),
            ],
            ..DatamartObservation::default()
        };
        let refs = ObservationReferences.references(&observation);
        let types: Vec<_> = refs
            .iter()
            .filter_map(|r| r.resource_type.as_deref())
            .collect();
        assert_eq!(types, vec!["Patient", "Practitioner", "Organization"]);
    }
}
