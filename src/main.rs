use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, DatamartStore};
use fhir::ExtractorRegistry;
use pgd_core::config::{identity_system_from_env_value, unresolved_references_from_env_value};
use pgd_core::constants::DEFAULT_REST_ADDR;
use pgd_core::{CoreConfig, WitnessProtection};
use pgd_ids::InMemoryIdentityService;

/// Main entry point for the PGD application
///
/// Resolves configuration from the environment once, then serves the REST API.
///
/// # Environment Variables
/// - `PGD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PGD_IDENTITY_SYSTEM`: directory namespace for internal ids (default: "CDW")
/// - `PGD_UNRESOLVED_REFERENCES`: `retain` or `reject` (default: `retain`)
/// - `PGD_DATAMART_FILE`: optional JSON array of datamart records to serve
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values are invalid,
/// - the datamart file cannot be read or parsed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pgd_run=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PGD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let identity_system = identity_system_from_env_value(std::env::var("PGD_IDENTITY_SYSTEM").ok());
    let unresolved_references =
        unresolved_references_from_env_value(std::env::var("PGD_UNRESOLVED_REFERENCES").ok())?;
    let cfg = Arc::new(CoreConfig::with_system(identity_system, unresolved_references)?);

    let store = match std::env::var("PGD_DATAMART_FILE") {
        Ok(path) => {
            let document = std::fs::read_to_string(&path)?;
            let store = DatamartStore::from_json_array(&document)?;
            tracing::info!("++ Loaded {} datamart records from {}", store.len(), path);
            store
        }
        Err(_) => DatamartStore::new(),
    };

    let state = AppState {
        witness_protection: WitnessProtection::new(Arc::new(InMemoryIdentityService::new()), cfg),
        store: Arc::new(store),
        extractors: Arc::new(ExtractorRegistry::standard()),
    };

    tracing::info!("++ Starting PGD REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
