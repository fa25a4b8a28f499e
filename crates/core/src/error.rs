use crate::parameters::Parameters;
use pgd_ids::IdsError;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("search failed: {parameters}")]
    SearchFailed {
        parameters: String,
        source: IdsError,
    },
    #[error("unknown identity in search parameters: {parameters}")]
    UnknownIdentityInSearchParameter {
        parameters: String,
        source: IdsError,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("bad search parameter: {0}")]
    BadSearchParameter(String),
    #[error("identity directory error: {0}")]
    Directory(#[from] IdsError),
    #[error("{count} internal identifiers have no registration")]
    UnresolvedReferences { count: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ResourceError {
    pub fn search_failed(parameters: &Parameters, source: IdsError) -> Self {
        Self::SearchFailed {
            parameters: parameters.to_query_string(),
            source,
        }
    }

    pub fn unknown_identity_in_search_parameter(parameters: &Parameters, source: IdsError) -> Self {
        Self::UnknownIdentityInSearchParameter {
            parameters: parameters.to_query_string(),
            source,
        }
    }

    /// The error means "no such resource", not a failure of the service.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::UnknownResource(_)
                | Self::UnknownIdentityInSearchParameter { .. }
                | Self::Directory(IdsError::UnknownIdentity(_))
        )
    }
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
