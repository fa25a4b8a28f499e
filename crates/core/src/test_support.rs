//! Recording identity directory double shared by the core tests.

use pgd_ids::{IdentityService, IdsError, IdsResult, Registration, ResourceIdentity};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub(crate) enum Lookup {
    Found(Vec<ResourceIdentity>),
    Unknown,
    Unavailable,
}

/// Surrogate the double assigns to an identity when it has no canned registrations.
pub(crate) fn public_id_for(resource: &str, identifier: &str) -> String {
    format!("pub-{}-{identifier}", resource.to_ascii_lowercase())
}

#[derive(Default)]
pub(crate) struct FakeIdentityService {
    canned: Option<Vec<Registration>>,
    withheld: HashSet<String>,
    fail_register: bool,
    lookups: HashMap<String, Lookup>,
    register_calls: Mutex<Vec<Vec<ResourceIdentity>>>,
    lookup_calls: Mutex<Vec<String>>,
}

impl FakeIdentityService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer every `register` with exactly these registrations.
    pub(crate) fn with_registrations(mut self, registrations: Vec<Registration>) -> Self {
        self.canned = Some(registrations);
        self
    }

    /// Leave identities with this internal id out of generated registrations.
    pub(crate) fn withholding(mut self, identifier: &str) -> Self {
        self.withheld.insert(identifier.to_string());
        self
    }

    pub(crate) fn failing_register(mut self) -> Self {
        self.fail_register = true;
        self
    }

    pub(crate) fn with_lookup(mut self, public_id: &str, lookup: Lookup) -> Self {
        self.lookups.insert(public_id.to_string(), lookup);
        self
    }

    pub(crate) fn register_calls(&self) -> Vec<Vec<ResourceIdentity>> {
        self.register_calls.lock().expect("register calls").clone()
    }

    pub(crate) fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.lock().expect("lookup calls").clone()
    }
}

impl IdentityService for FakeIdentityService {
    fn register(&self, identities: &[ResourceIdentity]) -> IdsResult<Vec<Registration>> {
        self.register_calls
            .lock()
            .expect("register calls")
            .push(identities.to_vec());
        if self.fail_register {
            return Err(IdsError::RegistrationFailed("directory offline".into()));
        }
        if let Some(canned) = &self.canned {
            return Ok(canned.clone());
        }
        Ok(identities
            .iter()
            .filter(|identity| !self.withheld.contains(&identity.identifier))
            .map(|identity| {
                Registration::new(
                    public_id_for(&identity.resource, &identity.identifier),
                    vec![identity.clone()],
                )
            })
            .collect())
    }

    fn lookup(&self, public_id: &str) -> IdsResult<Vec<ResourceIdentity>> {
        self.lookup_calls
            .lock()
            .expect("lookup calls")
            .push(public_id.to_string());
        match self.lookups.get(public_id) {
            Some(Lookup::Found(identities)) => Ok(identities.clone()),
            Some(Lookup::Unavailable) => Err(IdsError::LookupFailed {
                id: public_id.to_string(),
                message: "directory offline".into(),
            }),
            Some(Lookup::Unknown) | None => Err(IdsError::UnknownIdentity(public_id.to_string())),
        }
    }
}
