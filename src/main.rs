use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use repertory_core::config::max_results_from_env_value;
use repertory_core::EngineConfig;
use repertory_store::JsonStore;

/// Default directory for the JSON reference data.
const DEFAULT_DATA_DIR: &str = "/repertory_data";

/// Main entry point for the repertory service
///
/// Starts the REST server on the configured address (default: 0.0.0.0:3000).
/// The reference data is loaded and validated once at startup; a missing or
/// inconsistent dataset aborts startup rather than serving bad answers.
///
/// # Environment Variables
/// - `REPERTORY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `REPERTORY_DATA_DIR`: Directory holding the JSON reference data
///   (default: "/repertory_data")
/// - `REPERTORY_MAX_RESULTS`: Cap on ranked remedies per analysis
///   (default: 30)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repertory_core=info".parse()?)
                .add_directive("repertory_store=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("REPERTORY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let data_dir = std::env::var("REPERTORY_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Reference data directory does not exist: {}", data_path.display());
    }

    let max_results = max_results_from_env_value(std::env::var("REPERTORY_MAX_RESULTS").ok())?;
    let cfg = Arc::new(EngineConfig::new(max_results)?);

    let store = Arc::new(JsonStore::load(data_path)?);

    tracing::info!("++ Starting repertory REST on {}", addr);

    let app = api_rest::build_router(AppState::new(cfg, store));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
