// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use crate::application::block_service::BlockService;
use crate::application::settings_store::InMemorySettingsStore;
use crate::application::summary_service::SummaryViewBuilder;
use crate::infrastructure::config::{load_aside_config, plugin_settings, AsideMode};
use crate::infrastructure::i18n::StaticResources;
use crate::infrastructure::superset_client::SupersetConnector;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_aside_config()?;
    let plugin = plugin_settings(&config.env_tokens);
    tracing::debug!(dummy_settings = %plugin.dummy_settings, "plugin settings");

    // Renders degrade to a placeholder until credentials are supplied
    if config.aside.mode == AsideMode::Live {
        if let Err(e) = config.dashboard.credentials() {
            tracing::warn!(error = %e, "live dashboard mode without complete credentials");
        }
    }

    // Create adapters (infrastructure layer)
    let connector = Arc::new(SupersetConnector::new(config.dashboard.clone()));
    let resources = StaticResources::new(
        config.resources.static_root.clone(),
        &config.resources.public_url,
    );

    // Create services (application layer)
    let summary_builder = SummaryViewBuilder::new(
        connector,
        config.aside.mode,
        config.dashboard.chart_id,
        config.dashboard.datasource(),
    )
    .with_deadline(config.dashboard.timeout());
    let block_service = BlockService::new(Arc::new(InMemorySettingsStore::new()), resources);

    let state = Arc::new(AppState {
        summary_builder,
        block_service,
    });

    // Build router (presentation layer)
    let router = build_router(state, &config.resources);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(%addr, mode = ?config.aside.mode, "starting superset summary aside");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
