use super::{datamart_kind, DatamartKind, DatamartReference, ReferenceExtractor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartDiagnosticReport {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    pub patient: DatamartReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sta3n: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession_institution: Option<DatamartReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<DatamartReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status: Option<String>,
}

fn object_type() -> String {
    DatamartDiagnosticReport::OBJECT_TYPE.to_string()
}

impl Default for DatamartDiagnosticReport {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            patient: DatamartReference::default(),
            sta3n: None,
            effective_date_time: None,
            issued_date_time: None,
            accession_institution: None,
            results: Vec::new(),
            report_status: None,
        }
    }
}

datamart_kind!(DatamartDiagnosticReport, DiagnosticReport, "DiagnosticReport");

/// R4: patient, then results.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiagnosticReportReferences;

impl ReferenceExtractor<DatamartDiagnosticReport> for DiagnosticReportReferences {
    fn references<'r>(&self, resource: &'r DatamartDiagnosticReport) -> Vec<&'r DatamartReference> {
        std::iter::once(&resource.patient)
            .chain(resource.results.iter())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartDiagnosticReport,
    ) -> Vec<&'r mut DatamartReference> {
        std::iter::once(&mut resource.patient)
            .chain(resource.results.iter_mut())
            .collect()
    }
}

/// DSTU2: patient, accession institution, then results.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dstu2DiagnosticReportReferences;

impl ReferenceExtractor<DatamartDiagnosticReport> for Dstu2DiagnosticReportReferences {
    fn references<'r>(&self, resource: &'r DatamartDiagnosticReport) -> Vec<&'r DatamartReference> {
        std::iter::once(&resource.patient)
            .chain(resource.accession_institution.as_ref())
            .chain(resource.results.iter())
            .collect()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartDiagnosticReport,
    ) -> Vec<&'r mut DatamartReference> {
        std::iter::once(&mut resource.patient)
            .chain(resource.accession_institution.as_mut())
            .chain(resource.results.iter_mut())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DatamartDiagnosticReport {
        DatamartDiagnosticReport {
            cdw_id: "800260864479:L".into(),
            patient: DatamartReference::of("Patient", "666V666"),
            accession_institution: Some(DatamartReference::of("Organization", "697")),
            results: vec![
                DatamartReference::of("Observation", "TEST:TEST:1"),
                DatamartReference::of("Observation", "TEST:TEST:2"),
            ],
            ..DatamartDiagnosticReport::default()
        }
    }

    #[test]
    fn r4_omits_accession_institution() {
        let report = report();
        assert_eq!(DiagnosticReportReferences.references(&report).len(), 3);
        assert!(DiagnosticReportReferences
            .references(&report)
            .iter()
            .all(|r| r.resource_type.as_deref() != Some("Organization")));
    }

    #[test]
    fn dstu2_includes_accession_institution_in_second_slot() {
        let mut report = report();
        let refs = Dstu2DiagnosticReportReferences.references_mut(&mut report);
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[1].reference.as_deref(), Some("697"));
    }
}
