//! Reference extraction.
//!
//! An extractor walks one resource's nested structure and yields the references the identity
//! layer must translate. Extraction is per kind and per API version: the R4 and DSTU2
//! DiagnosticReport endpoints expose different references from the same payload.
//!
//! Both enumerations of an extractor (`references` and `references_mut`) yield the same slots
//! in the same order. The identity layer records slots by position on the first walk and
//! writes them back on the second.

use super::{DatamartKind, DatamartReference, DatamartResource, HasReplaceableId};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Finds the embedded references of a resource.
pub trait ReferenceExtractor<R: ?Sized>: Send + Sync {
    fn references<'r>(&self, resource: &'r R) -> Vec<&'r DatamartReference>;

    fn references_mut<'r>(&self, resource: &'r mut R) -> Vec<&'r mut DatamartReference>;
}

/// Extractor for resources whose only translated id is their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReferences;

impl<R: ?Sized> ReferenceExtractor<R> for NoReferences {
    fn references<'r>(&self, _resource: &'r R) -> Vec<&'r DatamartReference> {
        Vec::new()
    }

    fn references_mut<'r>(&self, _resource: &'r mut R) -> Vec<&'r mut DatamartReference> {
        Vec::new()
    }
}

/// Applies a per-kind extractor to [`DatamartResource`]; other variants yield nothing.
pub struct Lifted<T, E> {
    extractor: E,
    kind: PhantomData<fn() -> T>,
}

impl<T, E> Lifted<T, E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            kind: PhantomData,
        }
    }
}

impl<T, E> ReferenceExtractor<DatamartResource> for Lifted<T, E>
where
    T: DatamartKind + 'static,
    E: ReferenceExtractor<T>,
{
    fn references<'r>(&self, resource: &'r DatamartResource) -> Vec<&'r DatamartReference> {
        T::from_resource(resource)
            .map(|inner| self.extractor.references(inner))
            .unwrap_or_default()
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartResource,
    ) -> Vec<&'r mut DatamartReference> {
        T::from_resource_mut(resource)
            .map(|inner| self.extractor.references_mut(inner))
            .unwrap_or_default()
    }
}

/// Extractors keyed by object type tag.
///
/// The registry is itself an extractor over [`DatamartResource`]: it dispatches on the
/// resource's `objectType`. A tag with no entry yields no references.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Box<dyn ReferenceExtractor<DatamartResource>>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The extractors served by the R4 endpoints.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(super::AllergyIntoleranceReferences);
        registry.insert(super::ConditionReferences);
        registry.insert(super::DiagnosticReportReferences);
        registry.insert(super::ImmunizationReferences);
        registry.insert(super::LocationReferences);
        registry.insert::<super::DatamartMedication, _>(NoReferences);
        registry.insert(super::MedicationOrderReferences);
        registry.insert(super::MedicationStatementReferences);
        registry.insert(super::ObservationReferences);
        registry.insert(super::OrganizationReferences);
        registry.insert(super::PractitionerReferences);
        registry.insert(super::ProcedureReferences);
        registry
    }

    /// The extractors served by the DSTU2 endpoints.
    ///
    /// DSTU2 serves fewer kinds, and its DiagnosticReport also exposes the accession
    /// institution.
    pub fn dstu2() -> Self {
        let mut registry = Self::new();
        registry.insert(super::AllergyIntoleranceReferences);
        registry.insert(super::Dstu2DiagnosticReportReferences);
        registry.insert(super::LocationReferences);
        registry.insert(super::OrganizationReferences);
        registry.insert(super::PractitionerReferences);
        registry.insert(super::ProcedureReferences);
        registry
    }

    /// Registers `extractor` for `T`'s tag, replacing any previous entry.
    pub fn insert<T, E>(&mut self, extractor: E)
    where
        T: DatamartKind + 'static,
        E: ReferenceExtractor<T> + 'static,
    {
        self.extractors.insert(
            T::OBJECT_TYPE.to_string(),
            Box::new(Lifted::<T, E>::new(extractor)),
        );
    }

    pub fn get(&self, object_type: &str) -> Option<&dyn ReferenceExtractor<DatamartResource>> {
        self.extractors.get(object_type).map(|e| e.as_ref())
    }

    pub fn contains(&self, object_type: &str) -> bool {
        self.extractors.contains_key(object_type)
    }

    /// Registered tags, sorted.
    pub fn object_types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl ReferenceExtractor<DatamartResource> for ExtractorRegistry {
    fn references<'r>(&self, resource: &'r DatamartResource) -> Vec<&'r DatamartReference> {
        match self.get(resource.object_type()) {
            Some(extractor) => extractor.references(resource),
            None => {
                tracing::debug!("no reference extractor for {}", resource.object_type());
                Vec::new()
            }
        }
    }

    fn references_mut<'r>(
        &self,
        resource: &'r mut DatamartResource,
    ) -> Vec<&'r mut DatamartReference> {
        // Resolve the extractor before taking the mutable walk.
        let Some(extractor) = self.extractors.get(resource.object_type()) else {
            tracing::debug!("no reference extractor for {}", resource.object_type());
            return Vec::new();
        };
        extractor.references_mut(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamart::{
        DatamartDiagnosticReport, DatamartMedication, DatamartObservation, DatamartPractitioner,
        DatamartProcedure, PractitionerRole,
    };

    fn procedure() -> DatamartResource {
        DatamartResource::Procedure(DatamartProcedure {
            cdw_id: "1000000719261".into(),
            patient: DatamartReference::of("Patient", "1004476237V111282"),
            location: Some(DatamartReference::of("Location", "237281")),
            ..DatamartProcedure::default()
        })
    }

    #[test]
    fn standard_registry_covers_served_kinds() {
        let registry = ExtractorRegistry::standard();
        assert_eq!(registry.object_types(), DatamartResource::OBJECT_TYPES.to_vec());
    }

    #[test]
    fn registry_dispatches_on_object_type() {
        let registry = ExtractorRegistry::standard();
        let resource = procedure();
        let refs = registry.references(&resource);
        assert_eq!(
            refs,
            vec![
                &DatamartReference::of("Patient", "1004476237V111282"),
                &DatamartReference::of("Location", "237281"),
            ]
        );
    }

    #[test]
    fn unregistered_tag_yields_nothing() {
        let mut registry = ExtractorRegistry::new();
        registry.insert::<DatamartObservation, _>(NoReferences);
        let mut resource = procedure();
        assert!(registry.references(&resource).is_empty());
        assert!(registry.references_mut(&mut resource).is_empty());
    }

    #[test]
    fn lifted_extractor_ignores_other_variants() {
        let lifted = Lifted::<DatamartObservation, _>::new(crate::datamart::ObservationReferences);
        assert!(lifted.references(&procedure()).is_empty());
    }

    #[test]
    fn mutable_walk_matches_read_walk() {
        let registry = ExtractorRegistry::standard();
        let mut resource = procedure();
        let before: Vec<DatamartReference> =
            registry.references(&resource).into_iter().cloned().collect();
        let after: Vec<DatamartReference> = registry
            .references_mut(&mut resource)
            .into_iter()
            .map(|r| r.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn practitioner_roles_are_walked_through_the_registry() {
        let registry = ExtractorRegistry::standard();
        let resource = DatamartResource::Practitioner(DatamartPractitioner {
            cdw_id: "416704".into(),
            practitioner_role: vec![PractitionerRole {
                managing_organization: Some(DatamartReference::of("Organization", "561596:I")),
                location: vec![DatamartReference::of("Location", "43817:L")],
                ..PractitionerRole::default()
            }],
            ..DatamartPractitioner::default()
        });
        assert_eq!(
            registry.references(&resource),
            vec![
                &DatamartReference::of("Organization", "561596:I"),
                &DatamartReference::of("Location", "43817:L"),
            ]
        );
    }

    #[test]
    fn medication_has_only_its_own_id() {
        let registry = ExtractorRegistry::standard();
        let resource = DatamartResource::Medication(DatamartMedication {
            cdw_id: "800008482786".into(),
            ..DatamartMedication::default()
        });
        assert!(registry.contains("Medication"));
        assert!(registry.references(&resource).is_empty());
    }

    #[test]
    fn dstu2_registry_exposes_accession_institution() {
        let registry = ExtractorRegistry::dstu2();
        assert_eq!(
            registry.object_types(),
            vec![
                "AllergyIntolerance",
                "DiagnosticReport",
                "Location",
                "Organization",
                "Practitioner",
                "Procedure",
            ]
        );
        let resource = DatamartResource::DiagnosticReport(DatamartDiagnosticReport {
            cdw_id: "800260864479:L".into(),
            patient: DatamartReference::of("Patient", "666V666"),
            accession_institution: Some(DatamartReference::of("Organization", "inst1")),
            ..DatamartDiagnosticReport::default()
        });
        let r4 = ExtractorRegistry::standard().references(&resource).len();
        let dstu2 = registry.references(&resource);
        assert_eq!(dstu2.len(), r4 + 1);
        assert_eq!(dstu2[1], &DatamartReference::of("Organization", "inst1"));
    }
}
