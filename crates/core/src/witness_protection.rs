//! Identity translation between internal ids and directory surrogates.
//!
//! Outbound, every resource leaving the API has its own id and the ids in its references
//! swapped for surrogates, using one batched directory registration per page. Inbound, the
//! surrogates a client sends in search parameters are resolved back to internal ids.
//!
//! Nothing is cached here. Each call builds its own [`IdentityMapping`] and drops it.

use crate::config::{CoreConfig, UnresolvedReferences};
use crate::parameter_replacer::IdentityParameterReplacer;
use crate::{IdentityMapping, Parameters, ResourceError, ResourceResult};
use fhir::{DatamartReference, HasReplaceableId, ReferenceExtractor};
use pgd_ids::{IdentityService, IdsError, Registration, ResourceIdentity};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A rewritable reference, addressed by resource index and position in the extractor's
/// output, with the surrogate it will receive.
struct Slot {
    resource: usize,
    position: usize,
    surrogate: String,
}

#[derive(Clone)]
pub struct WitnessProtection {
    identity_service: Arc<dyn IdentityService>,
    cfg: Arc<CoreConfig>,
}

impl WitnessProtection {
    pub fn new(identity_service: Arc<dyn IdentityService>, cfg: Arc<CoreConfig>) -> Self {
        Self {
            identity_service,
            cfg,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Registers `ids` in one directory call. An empty batch never reaches the directory.
    ///
    /// # Errors
    ///
    /// Directory failures are returned as [`ResourceError::Directory`].
    pub fn register_ids(&self, ids: &[ResourceIdentity]) -> ResourceResult<Vec<Registration>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(identities = ids.len(), "registering identities");
        self.identity_service.register(ids).map_err(|err| {
            tracing::error!(error = %err, identities = ids.len(), "identity registration failed");
            ResourceError::Directory(err)
        })
    }

    pub fn register_and_map(&self, ids: &[ResourceIdentity]) -> ResourceResult<IdentityMapping> {
        Ok(IdentityMapping::new(&self.register_ids(ids)?))
    }

    /// Registers every resource and everything it references, then replaces each resource's
    /// own id with its surrogate. References are left as they are.
    ///
    /// Under [`UnresolvedReferences::Reject`] nothing is modified unless every reference
    /// resolves.
    pub fn register<R: HasReplaceableId>(
        &self,
        resources: &mut [R],
        extractor: &dyn ReferenceExtractor<R>,
    ) -> ResourceResult<IdentityMapping> {
        let mapping = self.register_and_check(resources, extractor)?;
        replace_own_ids(resources, &mapping);
        Ok(mapping)
    }

    /// Replaces the internal ids of `resources`, and of every reference `extractor` finds in
    /// them, with directory surrogates.
    ///
    /// The directory is called once for the whole batch. No resource is touched if
    /// registration fails.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Directory`] if registration fails.
    /// - [`ResourceError::UnresolvedReferences`] if the policy is
    ///   [`UnresolvedReferences::Reject`] and a reference has no surrogate.
    pub fn register_and_update_references<R: HasReplaceableId>(
        &self,
        resources: &mut [R],
        extractor: &dyn ReferenceExtractor<R>,
    ) -> ResourceResult<()> {
        let mapping = self.register_and_check(resources, extractor)?;
        let slots = plan_rewrites(resources, extractor, &mapping);
        replace_own_ids(resources, &mapping);

        let mut slots = slots.into_iter().peekable();
        for (index, resource) in resources.iter_mut().enumerate() {
            let mut handles = extractor.references_mut(resource);
            while let Some(slot) = slots.next_if(|slot| slot.resource == index) {
                if let Some(handle) = handles.get_mut(slot.position) {
                    handle.reference = Some(slot.surrogate);
                }
            }
        }
        Ok(())
    }

    /// Swaps surrogates in identity-bearing search parameters for internal ids.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::SearchFailed`] when the directory cannot be reached.
    /// - [`ResourceError::UnknownIdentityInSearchParameter`] when a surrogate is not known.
    pub fn translate_request_parameters(
        &self,
        public_parameters: &Parameters,
    ) -> ResourceResult<Parameters> {
        let replacer = IdentityParameterReplacer::new(
            self.identity_service.as_ref(),
            self.cfg.identity_system(),
            self.cfg.identity_keys(),
            self.cfg.aliases(),
        );
        match replacer.rebuild_with_cdw_identities(public_parameters) {
            Ok(cdw_parameters) => {
                tracing::info!(
                    "public parameters {} converted to CDW parameters {}",
                    public_parameters.to_query_string(),
                    cdw_parameters.to_query_string()
                );
                Ok(cdw_parameters)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    parameters = %public_parameters.to_query_string(),
                    "failed to convert public parameters"
                );
                Err(match err {
                    IdsError::LookupFailed { .. } => {
                        ResourceError::search_failed(public_parameters, err)
                    }
                    IdsError::UnknownIdentity(_) => {
                        ResourceError::unknown_identity_in_search_parameter(public_parameters, err)
                    }
                    other => ResourceError::Directory(other),
                })
            }
        }
    }

    /// Internal id for a surrogate, resolved as an `identifier` search parameter.
    pub fn to_cdw_id(&self, public_id: &str) -> ResourceResult<String> {
        let cdw_parameters =
            self.translate_request_parameters(&Parameters::for_identity(public_id))?;
        cdw_parameters
            .identifier_of()
            .map(str::to_string)
            .ok_or_else(|| ResourceError::NotFound(format!("Resource Identity {public_id}")))
    }

    /// First identity the directory holds for a surrogate.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] if the directory answers with no identities; directory
    /// failures as [`ResourceError::Directory`].
    pub fn to_resource_identity(&self, public_id: &str) -> ResourceResult<ResourceIdentity> {
        self.identity_service
            .lookup(public_id)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ResourceError::NotFound(format!("Resource Identity {public_id} not found."))
            })
    }

    fn register_and_check<R: HasReplaceableId>(
        &self,
        resources: &[R],
        extractor: &dyn ReferenceExtractor<R>,
    ) -> ResourceResult<IdentityMapping> {
        let system = self.cfg.identity_system();
        let identities: BTreeSet<ResourceIdentity> = resources
            .iter()
            .flat_map(|resource| {
                let own = resource.as_reference().as_resource_identity(system);
                let referenced = extractor
                    .references(resource)
                    .into_iter()
                    .filter_map(move |r| r.as_resource_identity(system));
                own.into_iter().chain(referenced)
            })
            .collect();
        let identities: Vec<ResourceIdentity> = identities.into_iter().collect();
        let mapping = self.register_and_map(&identities)?;

        let unresolved = count_unresolved(resources, extractor, &mapping);
        if unresolved > 0 {
            match self.cfg.unresolved_references() {
                UnresolvedReferences::Reject => {
                    tracing::error!(unresolved, "rejecting batch with unregistered references");
                    return Err(ResourceError::UnresolvedReferences { count: unresolved });
                }
                UnresolvedReferences::Retain => {
                    tracing::warn!(unresolved, "references left with internal ids");
                }
            }
        }
        Ok(mapping)
    }
}

fn replace_own_ids<R: HasReplaceableId>(resources: &mut [R], mapping: &IdentityMapping) {
    for resource in resources.iter_mut() {
        let surrogate = mapping
            .public_id_of_reference(&resource.as_reference())
            .map(str::to_string);
        if let Some(surrogate) = surrogate {
            resource.set_cdw_id(surrogate);
        }
    }
}

fn plan_rewrites<R>(
    resources: &[R],
    extractor: &dyn ReferenceExtractor<R>,
    mapping: &IdentityMapping,
) -> Vec<Slot> {
    resources
        .iter()
        .enumerate()
        .flat_map(|(index, resource)| {
            extractor
                .references(resource)
                .into_iter()
                .enumerate()
                .filter_map(move |(position, handle)| {
                    mapping.public_id_of_reference(handle).map(|surrogate| Slot {
                        resource: index,
                        position,
                        surrogate: surrogate.to_string(),
                    })
                })
        })
        .collect()
}

fn count_unresolved<R: HasReplaceableId>(
    resources: &[R],
    extractor: &dyn ReferenceExtractor<R>,
    mapping: &IdentityMapping,
) -> usize {
    let unresolved = |handle: &DatamartReference| {
        handle.has_type_and_reference() && mapping.public_id_of_reference(handle).is_none()
    };
    resources
        .iter()
        .map(|resource| {
            let own = usize::from(unresolved(&resource.as_reference()));
            own + extractor
                .references(resource)
                .into_iter()
                .filter(|handle| unresolved(*handle))
                .count()
        })
        .sum()
}
