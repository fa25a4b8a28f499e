use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartImmunization {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DatamartReference>,
}

fn object_type() -> String {
    DatamartImmunization::OBJECT_TYPE.to_string()
}

impl Default for DatamartImmunization {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            status: None,
            date: None,
            vaccine_code: None,
            performer: None,
            requester: None,
            location: None,
        }
    }
}

datamart_kind!(DatamartImmunization, Immunization, "Immunization");

/// Patient, performer, requester, then location.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmunizationReferences;

impl ReferenceExtractor<DatamartImmunization> for ImmunizationReferences {
    fn references<'r>(&self, resource: &'r DatamartImmunization) -> Vec<&'r DatamartReference> {
        std::iter::once(&resource.patient)
            .chain(resource.performer.as_ref())
            .chain(resource.requester.as_ref())
            .chain(resource.location.as_ref())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartImmunization,
    ) -> Vec<&'r mut DatamartReference> {
        std::iter::once(&mut resource.patient)
            .chain(resource.performer.as_mut())
            .chain(resource.requester.as_mut())
            .chain(resource.location.as_mut())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_parties_follow_patient_in_order() {
        let immunization = DatamartImmunization {
            cdw_id: "cdw-imm".into(),
            patient: DatamartReference::of("Patient", "p1"),
            requester: Some(DatamartReference::of("Practitioner", "pr2")),
            location: Some(DatamartReference::of("Location", "loc1")),
            ..DatamartImmunization::default()
        };
        let ids: Vec<_> = ImmunizationReferences
            .references(&immunization)
            .into_iter()
            .filter_map(|r| r.reference.as_deref())
            .collect();
        assert_eq!(ids, vec!["p1", "pr2", "loc1"]);
    }
}
