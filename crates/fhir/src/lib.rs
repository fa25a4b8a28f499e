//! FHIR boundary support for the patient-generated-data API.
//!
//! This crate provides the **datamart models** that the warehouse hands us and the
//! **naming/reference helpers** the identity layer needs to translate them:
//! - [`ResourceNameTranslation`] between FHIR type names and directory type names
//! - [`DatamartReference`], the rewritable slot that points one resource at another
//! - [`ReferenceExtractor`], the per-kind capability that finds those slots
//!
//! This crate focuses on:
//! - datamart payload deserialisation with field-level error paths
//! - stable enumeration of embedded references (read-only and mutable)
//!
//! It does not talk to the identity directory; that is `pgd-core`'s job.

pub mod datamart;
pub mod resource_name;

// Re-export facades
pub use resource_name::ResourceNameTranslation;

// Re-export public domain-level types
pub use datamart::{
    DatamartKind, DatamartReference, DatamartResource, ExtractorRegistry, HasReplaceableId,
    NoReferences, ReferenceExtractor,
};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
