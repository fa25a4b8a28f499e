//! # PGD Core
//!
//! Identity translation for the patient-generated-data API.
//!
//! Internal warehouse ids never leave the API. This crate swaps them for directory surrogates
//! on the way out and back again on the way in:
//! - [`WitnessProtection`]: batched outbound rewrite of resource ids and references, inbound
//!   translation of search parameters, and single-value lookups
//! - [`IdentityMapping`]: the per-call `(resource, internal id) -> surrogate` table
//! - [`Parameters`]: ordered, multi-valued request parameters
//! - [`CoreConfig`]: identity system, identity-bearing keys, aliases and the policy for
//!   references the directory did not register
//!
//! **No API concerns**: HTTP routing, status codes and persistence belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod identity_mapping;
pub mod parameter_replacer;
pub mod parameters;
pub mod witness_protection;

#[cfg(test)]
mod test_support;

pub use config::{CoreConfig, UnresolvedReferences};
pub use error::{ResourceError, ResourceResult};
pub use identity_mapping::IdentityMapping;
pub use parameter_replacer::IdentityParameterReplacer;
pub use parameters::Parameters;
pub use witness_protection::WitnessProtection;
