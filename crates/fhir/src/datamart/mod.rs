//! Datamart resource models.
//!
//! Datamart payloads are the warehouse's JSON documents, one per record. Every payload names
//! its own kind (`objectType`) and internal id (`cdwId`) and embeds [`DatamartReference`]s to
//! other records. The identity layer rewrites both before anything leaves the API.

mod allergy_intolerance;
mod condition;
mod diagnostic_report;
mod extractor;
mod immunization;
mod location;
mod medication;
mod medication_order;
mod medication_statement;
mod observation;
mod organization;
mod practitioner;
mod procedure;
mod reference;
mod resource;

pub use allergy_intolerance::{AllergyIntoleranceReferences, DatamartAllergyIntolerance, Note};
pub use condition::{ConditionReferences, DatamartCondition};
pub use diagnostic_report::{
    DatamartDiagnosticReport, DiagnosticReportReferences, Dstu2DiagnosticReportReferences,
};
pub use extractor::{ExtractorRegistry, Lifted, NoReferences, ReferenceExtractor};
pub use immunization::{DatamartImmunization, ImmunizationReferences};
pub use location::{DatamartLocation, LocationReferences};
pub use medication::DatamartMedication;
pub use medication_order::{DatamartMedicationOrder, MedicationOrderReferences};
pub use medication_statement::{DatamartMedicationStatement, MedicationStatementReferences};
pub use observation::{DatamartObservation, ObservationReferences};
pub use organization::{DatamartOrganization, OrganizationReferences};
pub use practitioner::{
    DatamartPractitioner, PractitionerName, PractitionerReferences, PractitionerRole,
};
pub use procedure::{DatamartProcedure, ProcedureReferences};
pub use reference::DatamartReference;
pub use resource::DatamartResource;

/// A resource whose own id is internal and must be replaced before it is returned.
pub trait HasReplaceableId {
    /// FHIR type name of this resource (`Procedure`).
    fn object_type(&self) -> &str;

    /// Current id: internal before translation, surrogate after.
    fn cdw_id(&self) -> &str;

    fn set_cdw_id(&mut self, id: String);

    /// A reference pointing at this resource.
    fn as_reference(&self) -> DatamartReference {
        DatamartReference::of(self.object_type(), self.cdw_id())
    }
}

/// One variant of [`DatamartResource`].
pub trait DatamartKind: HasReplaceableId + Sized {
    const OBJECT_TYPE: &'static str;

    fn from_resource(resource: &DatamartResource) -> Option<&Self>;

    fn from_resource_mut(resource: &mut DatamartResource) -> Option<&mut Self>;
}

/// Generates the `HasReplaceableId` and `DatamartKind` impls shared by every datamart struct.
macro_rules! datamart_kind {
    ($ty:ident, $variant:ident, $tag:literal) => {
        impl $crate::datamart::HasReplaceableId for $ty {
            fn object_type(&self) -> &str {
                &self.object_type
            }

            fn cdw_id(&self) -> &str {
                &self.cdw_id
            }

            fn set_cdw_id(&mut self, id: String) {
                self.cdw_id = id;
            }
        }

        impl $crate::datamart::DatamartKind for $ty {
            const OBJECT_TYPE: &'static str = $tag;

            fn from_resource(resource: &$crate::datamart::DatamartResource) -> Option<&Self> {
                match resource {
                    $crate::datamart::DatamartResource::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_resource_mut(
                resource: &mut $crate::datamart::DatamartResource,
            ) -> Option<&mut Self> {
                match resource {
                    $crate::datamart::DatamartResource::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use datamart_kind;
