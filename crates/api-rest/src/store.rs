//! In-memory datamart.
//!
//! Records are held with their internal ids. Every read hands out a copy, so translating a
//! result for a client never changes what is stored.

use fhir::{DatamartResource, FhirError, FhirResult, HasReplaceableId};
use std::collections::BTreeMap;

/// Datamart records keyed by `(objectType, cdwId)`.
#[derive(Clone, Debug, Default)]
pub struct DatamartStore {
    records: BTreeMap<(String, String), DatamartResource>,
}

impl DatamartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON array of datamart payloads.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if the document is not an array or any payload fails to parse.
    pub fn from_json_array(document: &str) -> FhirResult<Self> {
        let payloads: Vec<serde_json::Value> = serde_json::from_str(document)?;
        let mut store = Self::new();
        for (index, payload) in payloads.iter().enumerate() {
            let resource = DatamartResource::parse(&payload.to_string()).map_err(|err| {
                FhirError::InvalidInput(format!("datamart record {index}: {err}"))
            })?;
            store.insert(resource);
        }
        Ok(store)
    }

    /// Stores `resource`, replacing any record with the same type and id.
    pub fn insert(&mut self, resource: DatamartResource) {
        let key = (
            resource.object_type().to_string(),
            resource.cdw_id().to_string(),
        );
        self.records.insert(key, resource);
    }

    pub fn get(&self, object_type: &str, cdw_id: &str) -> Option<DatamartResource> {
        self.records
            .get(&(object_type.to_string(), cdw_id.to_string()))
            .cloned()
    }

    /// Records of `object_type` whose patient reference points at `patient`, in id order.
    pub fn find_by_patient(&self, object_type: &str, patient: &str) -> Vec<DatamartResource> {
        self.records
            .iter()
            .filter(|((kind, _), _)| kind == object_type)
            .filter(|(_, resource)| {
                resource
                    .patient()
                    .and_then(|p| p.reference.as_deref())
                    .is_some_and(|reference| reference == patient)
            })
            .map(|(_, resource)| resource.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"[
        {"objectType": "Condition", "cdwId": "c2", "patient": {"type": "Patient", "reference": "p1"}},
        {"objectType": "Condition", "cdwId": "c1", "patient": {"type": "Patient", "reference": "p1"}},
        {"objectType": "Condition", "cdwId": "c3", "patient": {"type": "Patient", "reference": "p2"}},
        {"objectType": "Observation", "cdwId": "o1", "subject": {"type": "Patient", "reference": "p1"}},
        {"objectType": "Organization", "cdwId": "org1"}
    ]"#;

    #[test]
    fn loads_and_finds_by_patient() {
        let store = DatamartStore::from_json_array(RECORDS).expect("load");
        assert_eq!(store.len(), 5);

        let ids: Vec<String> = store
            .find_by_patient("Condition", "p1")
            .iter()
            .map(|r| r.cdw_id().to_string())
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert_eq!(store.find_by_patient("Observation", "p1").len(), 1);
        assert!(store.find_by_patient("Organization", "p1").is_empty());
    }

    #[test]
    fn get_returns_a_copy() {
        let store = DatamartStore::from_json_array(RECORDS).expect("load");
        let mut copy = store.get("Organization", "org1").expect("org1");
        copy.set_cdw_id("public".into());
        assert!(store.get("Organization", "org1").is_some());
        assert!(store.get("Organization", "public").is_none());
    }

    #[test]
    fn names_the_failing_record() {
        let document = r#"[{"objectType": "Organization", "cdwId": "ok"}, {"objectType": "Nope", "cdwId": "x"}]"#;
        match DatamartStore::from_json_array(document) {
            Err(FhirError::InvalidInput(msg)) => assert!(msg.contains("record 1"), "{msg}"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
