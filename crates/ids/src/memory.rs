//! Process-local identity directory.
//!
//! Behaves like the remote directory as far as this API can observe: fresh surrogates for
//! unseen identities, the same surrogate for a known identity on every call, and alias groups
//! that share one surrogate. State lives for the lifetime of the value.

use crate::{IdentityService, IdsError, IdsResult, Registration, ResourceIdentity, SurrogateId};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Directory {
    by_identity: HashMap<ResourceIdentity, SurrogateId>,
    by_surrogate: HashMap<SurrogateId, Vec<ResourceIdentity>>,
}

impl Directory {
    fn surrogate_for(&mut self, identity: &ResourceIdentity) -> SurrogateId {
        if let Some(existing) = self.by_identity.get(identity) {
            return *existing;
        }
        let minted = SurrogateId::new();
        self.attach(minted, identity.clone());
        minted
    }

    fn attach(&mut self, surrogate: SurrogateId, identity: ResourceIdentity) {
        self.by_identity.insert(identity.clone(), surrogate);
        let aliases = self.by_surrogate.entry(surrogate).or_default();
        if !aliases.contains(&identity) {
            aliases.push(identity);
        }
    }
}

/// In-memory [`IdentityService`].
#[derive(Debug, Default)]
pub struct InMemoryIdentityService {
    directory: Mutex<Directory>,
}

impl InMemoryIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` as an alias of an existing surrogate.
    ///
    /// # Errors
    ///
    /// - [`IdsError::UnknownIdentity`] if `surrogate` has never been registered.
    /// - [`IdsError::InvalidInput`] if `identity` already belongs to another surrogate.
    pub fn alias(&self, surrogate: &str, identity: ResourceIdentity) -> IdsResult<()> {
        let surrogate = SurrogateId::parse(surrogate)
            .map_err(|_| IdsError::UnknownIdentity(surrogate.to_string()))?;
        let mut directory = self
            .directory
            .lock()
            .map_err(|e| IdsError::RegistrationFailed(format!("directory lock poisoned: {e}")))?;

        if !directory.by_surrogate.contains_key(&surrogate) {
            return Err(IdsError::UnknownIdentity(surrogate.to_string()));
        }
        match directory.by_identity.get(&identity) {
            Some(existing) if *existing == surrogate => Ok(()),
            Some(existing) => Err(IdsError::InvalidInput(format!(
                "{identity:?} is already registered as {existing}"
            ))),
            None => {
                directory.attach(surrogate, identity);
                Ok(())
            }
        }
    }

    /// Number of distinct surrogates handed out so far.
    pub fn len(&self) -> usize {
        self.directory
            .lock()
            .map(|d| d.by_surrogate.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityService for InMemoryIdentityService {
    fn register(&self, identities: &[ResourceIdentity]) -> IdsResult<Vec<Registration>> {
        let mut directory = self
            .directory
            .lock()
            .map_err(|e| IdsError::RegistrationFailed(format!("directory lock poisoned: {e}")))?;

        // One registration per surrogate touched, in first-seen order.
        let mut touched: Vec<SurrogateId> = Vec::new();
        for identity in identities {
            let surrogate = directory.surrogate_for(identity);
            if !touched.contains(&surrogate) {
                touched.push(surrogate);
            }
        }

        let registrations = touched
            .into_iter()
            .map(|surrogate| {
                let aliases = directory
                    .by_surrogate
                    .get(&surrogate)
                    .cloned()
                    .unwrap_or_default();
                Registration::new(surrogate.to_string(), aliases)
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "registered {} identities under {} surrogates",
            identities.len(),
            registrations.len()
        );
        Ok(registrations)
    }

    fn lookup(&self, public_id: &str) -> IdsResult<Vec<ResourceIdentity>> {
        let surrogate = SurrogateId::parse(public_id)
            .map_err(|_| IdsError::UnknownIdentity(public_id.to_string()))?;
        let directory = self.directory.lock().map_err(|e| IdsError::LookupFailed {
            id: public_id.to_string(),
            message: format!("directory lock poisoned: {e}"),
        })?;

        directory
            .by_surrogate
            .get(&surrogate)
            .cloned()
            .ok_or_else(|| IdsError::UnknownIdentity(public_id.to_string()))
    }
}
