//! Constants used throughout the core crate.
//!
//! Search parameter names and defaults live here so the replacer, the configuration and the
//! REST layer agree on them.

/// Directory namespace stamped on every identity when none is configured.
pub const DEFAULT_IDENTITY_SYSTEM: &str = "CDW";

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Search parameter carrying a patient surrogate.
pub const PATIENT_KEY: &str = "patient";

/// Search parameter carrying a patient surrogate, as named by some kinds.
pub const PATIENT_IDENTIFIER_KEY: &str = "patient_identifier";

/// Search parameter carrying a resource surrogate.
pub const IDENTIFIER_KEY: &str = "identifier";

/// FHIR's search alias for [`IDENTIFIER_KEY`].
pub const ID_KEY: &str = "_id";

/// Search parameters whose values are surrogates.
pub const IDENTITY_KEYS: [&str; 6] = [
    PATIENT_KEY,
    PATIENT_IDENTIFIER_KEY,
    "patient_identifier:exact",
    IDENTIFIER_KEY,
    "identifier:exact",
    ID_KEY,
];

/// `(alias, canonical)` search parameter pairs.
pub const IDENTITY_ALIASES: [(&str, &str); 1] = [(ID_KEY, IDENTIFIER_KEY)];
