//! Engineer impact report server

use github::GitHubClient;
use processor::{ProviderConfig, Report, SnapshotProvider};
use std::sync::Arc;
use std::time::Duration;
use store::FsSnapshotStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod render;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api=debug".parse()?)
                .add_directive("processor=info".parse()?)
                .add_directive("github=info".parse()?)
                .add_directive("store=info".parse()?),
        )
        .init();

    info!("Starting engineer impact report");

    // Load configuration
    let config = common::Config::from_env();
    info!(
        "Repository {}/{}, last {} days{}",
        config.owner,
        config.repo,
        config.lookback_days,
        if config.offline_mode { " (offline)" } else { "" }
    );

    let client = GitHubClient::new(
        config.github_token.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let store = FsSnapshotStore::new(config.cache_dir.clone());
    info!("Snapshot cache in {}", store.dir().display());
    let provider = SnapshotProvider::new(client, store, ProviderConfig::from(&config));

    // Score once; requests only recombine
    let snapshot = provider.fetch(config.refresh_on_start).await?;
    let report = Report::build(&snapshot);
    if report.is_empty() {
        warn!("No merged PRs in the lookback window, serving an empty report");
    }

    let state = Arc::new(AppState::new(provider, report));

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
