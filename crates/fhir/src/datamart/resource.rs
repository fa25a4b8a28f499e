use super::{
    DatamartAllergyIntolerance, DatamartCondition, DatamartDiagnosticReport, DatamartImmunization,
    DatamartKind, DatamartLocation, DatamartMedication, DatamartMedicationOrder,
    DatamartMedicationStatement, DatamartObservation, DatamartOrganization, DatamartPractitioner,
    DatamartProcedure, DatamartReference, HasReplaceableId,
};
use crate::{FhirError, FhirResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Any datamart payload this API serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DatamartResource {
    AllergyIntolerance(DatamartAllergyIntolerance),
    Condition(DatamartCondition),
    DiagnosticReport(DatamartDiagnosticReport),
    Immunization(DatamartImmunization),
    Location(DatamartLocation),
    Medication(DatamartMedication),
    MedicationOrder(DatamartMedicationOrder),
    MedicationStatement(DatamartMedicationStatement),
    Observation(DatamartObservation),
    Organization(DatamartOrganization),
    Practitioner(DatamartPractitioner),
    Procedure(DatamartProcedure),
}

#[derive(Deserialize)]
struct Header {
    #[serde(rename = "objectType")]
    object_type: String,
}

impl DatamartResource {
    /// Object type tags of every variant, sorted.
    pub const OBJECT_TYPES: [&'static str; 12] = [
        DatamartAllergyIntolerance::OBJECT_TYPE,
        DatamartCondition::OBJECT_TYPE,
        DatamartDiagnosticReport::OBJECT_TYPE,
        DatamartImmunization::OBJECT_TYPE,
        DatamartLocation::OBJECT_TYPE,
        DatamartMedication::OBJECT_TYPE,
        DatamartMedicationOrder::OBJECT_TYPE,
        DatamartMedicationStatement::OBJECT_TYPE,
        DatamartObservation::OBJECT_TYPE,
        DatamartOrganization::OBJECT_TYPE,
        DatamartPractitioner::OBJECT_TYPE,
        DatamartProcedure::OBJECT_TYPE,
    ];

    /// Parse a datamart JSON payload, dispatching on its `objectType`.
    ///
    /// This uses `serde_path_to_error` to name the failing field (e.g. `patient.reference`)
    /// when the payload does not match the model.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the payload is not JSON or has no `objectType`,
    /// - `objectType` is not a served kind,
    /// - any field has an unexpected type or a required field is missing.
    pub fn parse(payload: &str) -> FhirResult<Self> {
        let header: Header = serde_json::from_str(payload)?;
        match header.object_type.as_str() {
            "AllergyIntolerance" => parse_kind(payload).map(Self::AllergyIntolerance),
            "Condition" => parse_kind(payload).map(Self::Condition),
            "DiagnosticReport" => parse_kind(payload).map(Self::DiagnosticReport),
            "Immunization" => parse_kind(payload).map(Self::Immunization),
            "Location" => parse_kind(payload).map(Self::Location),
            "Medication" => parse_kind(payload).map(Self::Medication),
            "MedicationOrder" => parse_kind(payload).map(Self::MedicationOrder),
            "MedicationStatement" => parse_kind(payload).map(Self::MedicationStatement),
            "Observation" => parse_kind(payload).map(Self::Observation),
            "Organization" => parse_kind(payload).map(Self::Organization),
            "Practitioner" => parse_kind(payload).map(Self::Practitioner),
            "Procedure" => parse_kind(payload).map(Self::Procedure),
            other => Err(FhirError::InvalidInput(format!(
                "unsupported datamart objectType '{other}'"
            ))),
        }
    }

    /// Render this resource as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidJson`] if serialisation fails.
    pub fn to_json(&self) -> FhirResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The reference to the patient this record belongs to, if the kind has one.
    pub fn patient(&self) -> Option<&DatamartReference> {
        match self {
            Self::AllergyIntolerance(r) => Some(&r.patient),
            Self::Condition(r) => Some(&r.patient),
            Self::DiagnosticReport(r) => Some(&r.patient),
            Self::Immunization(r) => Some(&r.patient),
            Self::MedicationOrder(r) => Some(&r.patient),
            Self::MedicationStatement(r) => Some(&r.patient),
            Self::Observation(r) => r.subject.as_ref(),
            Self::Procedure(r) => Some(&r.patient),
            Self::Location(_)
            | Self::Medication(_)
            | Self::Organization(_)
            | Self::Practitioner(_) => None,
        }
    }

    fn inner(&self) -> &dyn HasReplaceableId {
        match self {
            Self::AllergyIntolerance(r) => r,
            Self::Condition(r) => r,
            Self::DiagnosticReport(r) => r,
            Self::Immunization(r) => r,
            Self::Location(r) => r,
            Self::Medication(r) => r,
            Self::MedicationOrder(r) => r,
            Self::MedicationStatement(r) => r,
            Self::Observation(r) => r,
            Self::Organization(r) => r,
            Self::Practitioner(r) => r,
            Self::Procedure(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn HasReplaceableId {
        match self {
            Self::AllergyIntolerance(r) => r,
            Self::Condition(r) => r,
            Self::DiagnosticReport(r) => r,
            Self::Immunization(r) => r,
            Self::Location(r) => r,
            Self::Medication(r) => r,
            Self::MedicationOrder(r) => r,
            Self::MedicationStatement(r) => r,
            Self::Observation(r) => r,
            Self::Organization(r) => r,
            Self::Practitioner(r) => r,
            Self::Procedure(r) => r,
        }
    }
}

impl HasReplaceableId for DatamartResource {
    fn object_type(&self) -> &str {
        self.inner().object_type()
    }

    fn cdw_id(&self) -> &str {
        self.inner().cdw_id()
    }

    fn set_cdw_id(&mut self, id: String) {
        self.inner_mut().set_cdw_id(id);
    }
}

fn parse_kind<T: DeserializeOwned + DatamartKind>(payload: &str) -> FhirResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(payload);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        FhirError::Translation(format!(
            "{} schema mismatch at {path}: {source}",
            T::OBJECT_TYPE
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROCEDURE: &str = r#"{
        "objectType": "Procedure",
        "objectVersion": 1,
        "cdwId": "1000000719261",
        "patient": {"type": "Patient", "reference": "1004476237V111282", "display": "VETERAN,GRAY PRO"},
        "status": "completed",
        "performedDateTime": "2008-01-02T06:00:00Z",
        "location": {"type": "Location", "reference": "237281", "display": "ZZPSYCHIATRY"}
    }"#;

    #[test]
    fn parses_by_object_type() {
        let resource = DatamartResource::parse(PROCEDURE).expect("parse procedure");
        assert_eq!(resource.object_type(), "Procedure");
        assert_eq!(resource.cdw_id(), "1000000719261");
        match &resource {
            DatamartResource::Procedure(p) => {
                assert_eq!(p.location.as_ref().and_then(|l| l.reference.as_deref()), Some("237281"));
            }
            other => panic!("expected Procedure, got {other:?}"),
        }
    }

    #[test]
    fn render_keeps_datamart_field_names() {
        let resource = DatamartResource::parse(PROCEDURE).expect("parse procedure");
        let json = resource.to_json().expect("render");
        assert_eq!(json["objectType"], "Procedure");
        assert_eq!(json["cdwId"], "1000000719261");
        assert_eq!(json["patient"]["reference"], "1004476237V111282");
    }

    #[test]
    fn set_cdw_id_reaches_the_variant() {
        let mut resource = DatamartResource::parse(PROCEDURE).expect("parse procedure");
        resource.set_cdw_id("public-procedure".into());
        assert_eq!(resource.cdw_id(), "public-procedure");
        assert_eq!(resource.as_reference(), DatamartReference::of("Procedure", "public-procedure"));
    }

    #[test]
    fn reports_path_of_schema_mismatch() {
        let payload = r#"{"objectType": "Procedure", "cdwId": "1", "patient": {"type": 7}}"#;
        match DatamartResource::parse(payload) {
            Err(FhirError::Translation(msg)) => {
                assert!(msg.contains("Procedure"), "{msg}");
                assert!(msg.contains("patient.type"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unserved_object_type() {
        let payload = r#"{"objectType": "Appointment", "cdwId": "1"}"#;
        match DatamartResource::parse(payload) {
            Err(FhirError::InvalidInput(msg)) => assert!(msg.contains("Appointment")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn rejects_payload_without_object_type() {
        assert!(matches!(
            DatamartResource::parse(r#"{"cdwId": "1"}"#),
            Err(FhirError::InvalidJson(_))
        ));
    }

    #[test]
    fn observation_patient_is_its_subject() {
        let payload = r#"{
            "objectType": "Observation",
            "cdwId": "800001973863:A",
            "subject": {"type": "Patient", "reference": "666V666"}
        }"#;
        let resource = DatamartResource::parse(payload).expect("parse observation");
        assert_eq!(
            resource.patient().and_then(|p| p.reference.as_deref()),
            Some("666V666")
        );
    }

    #[test]
    fn parses_practitioner_with_nested_roles() {
        let payload = r#"{
            "objectType": "Practitioner",
            "cdwId": "416704",
            "npi": "1234567890",
            "name": {"family": "NELSON", "given": "BOB"},
            "practitionerRole": [{
                "managingOrganization": {"type": "Organization", "reference": "561596:I"},
                "role": "PSYCHOLOGIST",
                "location": [
                    {"type": "Location", "reference": "43817:L"},
                    {"type": "Location", "reference": "43818:L"}
                ]
            }]
        }"#;
        let resource = DatamartResource::parse(payload).expect("parse practitioner");
        assert_eq!(resource.object_type(), "Practitioner");
        assert_eq!(resource.patient(), None);
        match &resource {
            DatamartResource::Practitioner(p) => {
                assert_eq!(p.practitioner_role.len(), 1);
                assert_eq!(p.practitioner_role[0].location.len(), 2);
            }
            other => panic!("expected Practitioner, got {other:?}"),
        }
        let json = resource.to_json().expect("render");
        assert_eq!(
            json["practitionerRole"][0]["managingOrganization"]["reference"],
            "561596:I"
        );
    }

    #[test]
    fn medication_order_patient_is_reported() {
        let payload = r#"{
            "objectType": "MedicationOrder",
            "cdwId": "1400181354458:O",
            "patient": {"type": "Patient", "reference": "666V666"},
            "medication": {"type": "Medication", "reference": "800008482786"}
        }"#;
        let resource = DatamartResource::parse(payload).expect("parse medication order");
        assert_eq!(
            resource.patient().and_then(|p| p.reference.as_deref()),
            Some("666V666")
        );
    }
}
