//! Inbound translation of search parameters.
//!
//! Values under the configured identity keys are surrogates; they are swapped for the internal
//! ids the directory resolves them to. Everything else passes through untouched.

use crate::Parameters;
use pgd_ids::{IdentityService, IdsError, IdsResult, ResourceIdentity};
use std::collections::HashMap;

pub struct IdentityParameterReplacer<'a> {
    identity_service: &'a dyn IdentityService,
    system: &'a str,
    identity_keys: &'a [String],
    aliases: &'a [(String, String)],
}

impl<'a> IdentityParameterReplacer<'a> {
    pub fn new(
        identity_service: &'a dyn IdentityService,
        system: &'a str,
        identity_keys: &'a [String],
        aliases: &'a [(String, String)],
    ) -> Self {
        Self {
            identity_service,
            system,
            identity_keys,
            aliases,
        }
    }

    /// Rebuilds `parameters` with every surrogate replaced by its internal id.
    ///
    /// When an alias key (`_id`) is present and its canonical key (`identifier`) is not, the
    /// output also carries the canonical key with the same translated values.
    ///
    /// # Errors
    ///
    /// The first directory error is returned unchanged. A lookup with no identities is
    /// reported as [`IdsError::UnknownIdentity`].
    pub fn rebuild_with_cdw_identities(&self, parameters: &Parameters) -> IdsResult<Parameters> {
        let mut resolved: HashMap<&str, String> = HashMap::new();
        for (key, values) in parameters.iter() {
            if !self.is_identity_key(key) {
                continue;
            }
            for value in values {
                if !resolved.contains_key(value.as_str()) {
                    let cdw_id = self.lookup(value)?;
                    resolved.insert(value.as_str(), cdw_id);
                }
            }
        }

        let translate = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|v| resolved.get(v.as_str()).cloned().unwrap_or_else(|| v.clone()))
                .collect()
        };

        let mut rebuilt = Parameters::new();
        for (key, values) in parameters.iter() {
            if self.is_identity_key(key) {
                rebuilt.put(key, translate(values));
            } else {
                rebuilt.put(key, values.to_vec());
            }
        }

        for (alias, canonical) in self.aliases {
            if parameters.contains_key(canonical) {
                continue;
            }
            if let Some(values) = parameters.get(alias) {
                rebuilt.put(canonical.as_str(), translate(values));
            }
        }

        Ok(rebuilt)
    }

    fn is_identity_key(&self, key: &str) -> bool {
        self.identity_keys.iter().any(|k| k == key)
    }

    fn lookup(&self, public_id: &str) -> IdsResult<String> {
        let identities = self.identity_service.lookup(public_id)?;
        select_identity(identities, self.system)
            .map(|identity| identity.identifier)
            .ok_or_else(|| IdsError::UnknownIdentity(public_id.to_string()))
    }
}

/// The identity in `system`, else the first one.
pub(crate) fn select_identity(
    identities: Vec<ResourceIdentity>,
    system: &str,
) -> Option<ResourceIdentity> {
    let preferred = identities.iter().position(|i| i.system == system);
    let index = preferred.unwrap_or(0);
    identities.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeIdentityService, Lookup};
    use crate::CoreConfig;

    fn replace(service: &FakeIdentityService, parameters: &Parameters) -> IdsResult<Parameters> {
        let cfg = CoreConfig::default();
        IdentityParameterReplacer::new(
            service,
            cfg.identity_system(),
            cfg.identity_keys(),
            cfg.aliases(),
        )
        .rebuild_with_cdw_identities(parameters)
    }

    #[test]
    fn replaces_identity_keys_only() {
        let service = FakeIdentityService::new()
            .with_lookup("pp", Lookup::Found(vec![ResourceIdentity::new("CDW", "PATIENT", "185601V825290")]));
        let parameters: Parameters = vec![("patient", "pp"), ("_count", "15"), ("code", "pp")]
            .into_iter()
            .collect();
        let rebuilt = replace(&service, &parameters).expect("replace");
        assert_eq!(rebuilt.first("patient"), Some("185601V825290"));
        assert_eq!(rebuilt.first("_count"), Some("15"));
        assert_eq!(rebuilt.first("code"), Some("pp"));
    }

    #[test]
    fn looks_up_each_surrogate_once() {
        let service = FakeIdentityService::new()
            .with_lookup("x", Lookup::Found(vec![ResourceIdentity::new("CDW", "PATIENT", "1")]));
        let parameters: Parameters = vec![("patient", "x"), ("patient_identifier", "x"), ("patient", "x")]
            .into_iter()
            .collect();
        let rebuilt = replace(&service, &parameters).expect("replace");
        assert_eq!(service.lookup_calls(), vec!["x".to_string()]);
        assert_eq!(rebuilt.get("patient"), Some(&["1".to_string(), "1".to_string()][..]));
    }

    #[test]
    fn prefers_configured_system() {
        let service = FakeIdentityService::new().with_lookup(
            "x",
            Lookup::Found(vec![
                ResourceIdentity::new("MVI", "PATIENT", "icn"),
                ResourceIdentity::new("CDW", "PATIENT", "cdw"),
            ]),
        );
        let rebuilt = replace(&service, &Parameters::for_identity("x")).expect("replace");
        assert_eq!(rebuilt.identifier_of(), Some("cdw"));
    }

    #[test]
    fn falls_back_to_first_identity() {
        let service = FakeIdentityService::new().with_lookup(
            "x",
            Lookup::Found(vec![
                ResourceIdentity::new("MVI", "PATIENT", "icn"),
                ResourceIdentity::new("VBA", "PATIENT", "file"),
            ]),
        );
        let rebuilt = replace(&service, &Parameters::for_identity("x")).expect("replace");
        assert_eq!(rebuilt.identifier_of(), Some("icn"));
    }

    #[test]
    fn alias_adds_canonical_key() {
        let service = FakeIdentityService::new()
            .with_lookup("x", Lookup::Found(vec![ResourceIdentity::new("CDW", "PROCEDURE", "proc1")]));
        let parameters: Parameters = vec![("_id", "x")].into_iter().collect();
        let rebuilt = replace(&service, &parameters).expect("replace");
        assert_eq!(rebuilt.first("_id"), Some("proc1"));
        assert_eq!(rebuilt.first("identifier"), Some("proc1"));
    }

    #[test]
    fn alias_does_not_override_canonical_key() {
        let service = FakeIdentityService::new()
            .with_lookup("a", Lookup::Found(vec![ResourceIdentity::new("CDW", "PROCEDURE", "1")]))
            .with_lookup("b", Lookup::Found(vec![ResourceIdentity::new("CDW", "PROCEDURE", "2")]));
        let parameters: Parameters = vec![("_id", "a"), ("identifier", "b")].into_iter().collect();
        let rebuilt = replace(&service, &parameters).expect("replace");
        assert_eq!(rebuilt.first("_id"), Some("1"));
        assert_eq!(rebuilt.get("identifier"), Some(&["2".to_string()][..]));
    }

    #[test]
    fn empty_lookup_is_unknown_identity() {
        let service = FakeIdentityService::new().with_lookup("x", Lookup::Found(vec![]));
        assert!(matches!(
            replace(&service, &Parameters::for_identity("x")),
            Err(IdsError::UnknownIdentity(id)) if id == "x"
        ));
    }

    #[test]
    fn directory_errors_pass_through() {
        let service = FakeIdentityService::new().with_lookup("x", Lookup::Unavailable);
        assert!(matches!(
            replace(&service, &Parameters::for_identity("x")),
            Err(IdsError::LookupFailed { .. })
        ));
    }
}
