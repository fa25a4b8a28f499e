//! Resource identity directory client.
//!
//! Internal (CDW) record identifiers never leave the API. Every identifier that crosses the
//! trust boundary is swapped for an opaque surrogate minted by an external identity directory.
//! This crate is the contract with that directory:
//!
//! - [`ResourceIdentity`]: the `(system, resource, identifier)` tuple naming an internal record.
//! - [`Registration`]: the directory's grouping of one or more identities under one surrogate.
//! - [`IdentityService`]: batched `register` and single-value `lookup`.
//! - [`SurrogateId`]: the canonical surrogate form handed out to clients.
//! - [`InMemoryIdentityService`]: a process-local directory for development and tests.
//!
//! ## Canonical surrogate form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! The directory is the system of record. Nothing in this crate caches a registration on
//! behalf of a caller; stability of surrogates across calls is the directory's promise.

mod directory;
mod memory;
mod surrogate;

// Re-export public types
pub use directory::{IdentityService, Registration, ResourceIdentity};
pub use memory::InMemoryIdentityService;
pub use surrogate::{SurrogateId, Uuid};

/// Error type for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum IdsError {
    /// The directory could not be reached or failed while resolving `id`.
    #[error("lookup of {id} failed: {message}")]
    LookupFailed { id: String, message: String },

    /// The surrogate is not known to the directory.
    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    /// The directory could not be reached or refused a registration batch.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for directory operations.
pub type IdsResult<T> = Result<T, IdsError>;
