//! Resource type names in FHIR form and in identity directory form.
//!
//! FHIR names are capitalised words run together (`DiagnosticReport`). The directory uses
//! upper snake case (`DIAGNOSTIC_REPORT`). The two forms map one-to-one over every resource
//! type this API serves.

use crate::{FhirError, FhirResult};

/// Resource name conversions.
///
/// Zero-sized namespace; all methods are associated functions.
pub struct ResourceNameTranslation;

impl ResourceNameTranslation {
    /// Convert a FHIR type name to directory form.
    ///
    /// A word boundary is an uppercase letter that follows a lowercase letter.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if `fhir_name` is empty, does not start with an
    /// uppercase letter, or contains anything other than ASCII letters and digits.
    pub fn fhir_to_identity_service(fhir_name: &str) -> FhirResult<String> {
        let starts_upper = fhir_name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase());
        if !starts_upper || !fhir_name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FhirError::InvalidInput(format!(
                "'{fhir_name}' is not a FHIR resource type name"
            )));
        }

        let mut out = String::with_capacity(fhir_name.len() + 4);
        let mut previous_lower = false;
        for c in fhir_name.chars() {
            if c.is_ascii_uppercase() && previous_lower {
                out.push('_');
            }
            previous_lower = c.is_ascii_lowercase();
            out.push(c.to_ascii_uppercase());
        }
        Ok(out)
    }

    /// Convert a directory type name back to FHIR form.
    ///
    /// Each underscore-delimited segment keeps its first character and lowercases the rest.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if `identity_name` is empty, has an empty segment,
    /// or contains anything other than ASCII uppercase letters, digits and `_`.
    pub fn identity_service_to_fhir(identity_name: &str) -> FhirResult<String> {
        let well_formed = !identity_name.is_empty()
            && identity_name
                .split('_')
                .all(|segment| {
                    segment
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_uppercase())
                        && segment
                            .chars()
                            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                });
        if !well_formed {
            return Err(FhirError::InvalidInput(format!(
                "'{identity_name}' is not an identity service resource name"
            )));
        }

        Ok(identity_name
            .split('_')
            .map(|segment| {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => std::iter::once(first)
                        .chain(chars.map(|c| c.to_ascii_lowercase()))
                        .collect::<String>(),
                    None => String::new(),
                }
            })
            .collect())
    }
}
