//! # API REST
//!
//! REST API for the patient-generated-data service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Identity translation lives in `pgd-core`. Every record this API returns has been through
//! [`WitnessProtection`] on its way out, and every surrogate a client sends is resolved on its
//! way in.

#![warn(rust_2018_idioms)]

pub mod store;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use fhir::{DatamartResource, ExtractorRegistry, HasReplaceableId};
use pgd_core::constants::{IDENTIFIER_KEY, PATIENT_IDENTIFIER_KEY, PATIENT_KEY};
use pgd_core::{Parameters, ResourceError, WitnessProtection};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub use store::DatamartStore;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub witness_protection: WitnessProtection,
    pub store: Arc<DatamartStore>,
    pub extractors: Arc<ExtractorRegistry>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchRes {
    pub total: usize,
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<serde_json::Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, read_resource, search_resources),
    components(schemas(HealthRes, SearchRes))
)]
struct ApiDoc;

/// Builds the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:resource", get(search_resources))
        .route("/:resource/:public_id", get(read_resource))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "PGD REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/{resource}/{public_id}",
    params(
        ("resource" = String, Path, description = "FHIR resource type, e.g. Condition"),
        ("public_id" = String, Path, description = "Surrogate id of the record")
    ),
    responses(
        (status = 200, description = "Datamart record with surrogate ids"),
        (status = 404, description = "Unknown resource type or record"),
        (status = 500, description = "Identity directory unavailable")
    )
)]
/// Read one record by its surrogate id.
///
/// The surrogate is resolved to the internal id, the record is loaded and then translated back
/// so that neither its own id nor any reference it holds is internal.
///
/// # Errors
/// - `404 Not Found` if the resource type is not served, the surrogate is unknown, or no
///   record exists.
/// - `500 Internal Server Error` if the identity directory fails.
#[axum::debug_handler]
async fn read_resource(
    State(state): State<AppState>,
    Path((resource, public_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, (StatusCode, &'static str)> {
    if !state.extractors.contains(&resource) {
        return Err((StatusCode::NOT_FOUND, "Unknown resource"));
    }

    let cdw_id = state
        .witness_protection
        .to_cdw_id(&public_id)
        .map_err(|e| status_of(&resource, &e))?;
    let Some(record) = state.store.get(&resource, &cdw_id) else {
        return Err((StatusCode::NOT_FOUND, "Not found"));
    };

    let mut entries = translate(&state, vec![record]).map_err(|e| status_of(&resource, &e))?;
    match entries.pop() {
        Some(entry) => Ok(Json(entry)),
        None => Err((StatusCode::NOT_FOUND, "Not found")),
    }
}

#[utoipa::path(
    get,
    path = "/{resource}",
    params(
        ("resource" = String, Path, description = "FHIR resource type, e.g. Condition"),
        ("patient" = Option<String>, Query, description = "Surrogate id of the patient"),
        ("identifier" = Option<String>, Query, description = "Surrogate id of the record"),
        ("_id" = Option<String>, Query, description = "Alias of identifier")
    ),
    responses(
        (status = 200, description = "Matching records with surrogate ids", body = SearchRes),
        (status = 400, description = "No supported search parameter"),
        (status = 404, description = "Unknown resource type"),
        (status = 500, description = "Identity directory unavailable")
    )
)]
/// Search records by patient or by identifier.
///
/// An unknown surrogate in the query matches nothing: the response is an empty result, not an
/// error.
///
/// # Errors
/// - `400 Bad Request` if no configured identity parameter is given.
/// - `404 Not Found` if the resource type is not served.
/// - `500 Internal Server Error` if the identity directory fails.
#[axum::debug_handler]
async fn search_resources(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<SearchRes>, (StatusCode, &'static str)> {
    if !state.extractors.contains(&resource) {
        return Err((StatusCode::NOT_FOUND, "Unknown resource"));
    }

    let public_parameters: Parameters = query.into_iter().collect();
    let cfg = state.witness_protection.config();
    if !cfg
        .identity_keys()
        .iter()
        .any(|key| public_parameters.contains_key(key))
    {
        return Err((StatusCode::BAD_REQUEST, "Missing search parameter"));
    }

    let cdw_parameters = match state
        .witness_protection
        .translate_request_parameters(&public_parameters)
    {
        Ok(parameters) => parameters,
        Err(ResourceError::UnknownIdentityInSearchParameter { .. }) => {
            return Ok(Json(SearchRes {
                total: 0,
                entries: Vec::new(),
            }));
        }
        Err(e) => return Err(status_of(&resource, &e)),
    };

    let ids = values_under(&cdw_parameters, &[IDENTIFIER_KEY]);
    let records: Vec<DatamartResource> = if !ids.is_empty() {
        ids.iter()
            .filter_map(|id| state.store.get(&resource, id))
            .collect()
    } else {
        values_under(&cdw_parameters, &[PATIENT_KEY, PATIENT_IDENTIFIER_KEY])
            .iter()
            .flat_map(|patient| state.store.find_by_patient(&resource, patient))
            .collect()
    };

    let entries = translate(&state, records).map_err(|e| status_of(&resource, &e))?;
    Ok(Json(SearchRes {
        total: entries.len(),
        entries,
    }))
}

/// Values of every parameter named one of `names`, with or without a `:modifier`.
fn values_under<'p>(parameters: &'p Parameters, names: &[&str]) -> Vec<&'p str> {
    parameters
        .iter()
        .filter(|(key, _)| {
            let name = key.split_once(':').map_or(*key, |(name, _)| name);
            names.contains(&name)
        })
        .flat_map(|(_, values)| values.iter().map(String::as_str))
        .collect()
}

/// Rewrites ids in `records` to surrogates and renders them.
fn translate(
    state: &AppState,
    mut records: Vec<DatamartResource>,
) -> Result<Vec<serde_json::Value>, ResourceError> {
    state
        .witness_protection
        .register_and_update_references(&mut records, &*state.extractors)?;
    records
        .iter()
        .map(|record| {
            record.to_json().map_err(|e| {
                ResourceError::InvalidInput(format!("{} {}: {e}", record.object_type(), record.cdw_id()))
            })
        })
        .collect()
}

fn status_of(resource: &str, err: &ResourceError) -> (StatusCode, &'static str) {
    if err.is_not_found() {
        return (StatusCode::NOT_FOUND, "Not found");
    }
    tracing::error!("{} request error: {:?}", resource, err);
    match err {
        ResourceError::BadSearchParameter(_) => (StatusCode::BAD_REQUEST, "Bad search parameter"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}
