use std::process::ExitCode;

use compare_server::config::{API_KEY_VAR, AppConfig};
use compare_server::directions::{
    DirectionsClient, DirectionsConfig, DirectionsError, DirectionsSource, MockDirectionsClient,
};
use compare_server::fares::{FareClient, FareClientConfig};
use compare_server::staticmap::{StaticMapClient, StaticMapConfig};
use compare_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("compare_server=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let directions = match build_directions(&config) {
        Ok(directions) => directions,
        Err(e) => {
            error!(error = %e, "failed to create directions client");
            return ExitCode::FAILURE;
        }
    };

    let fares = match FareClient::new(FareClientConfig::new(config.upstream_timeout_secs)) {
        Ok(fares) => fares,
        Err(e) => {
            error!(error = %e, "failed to create fare client");
            return ExitCode::FAILURE;
        }
    };

    // Without a key the document is rendered without maps.
    let maps = config.api_key.as_ref().and_then(|key| {
        let map_config = StaticMapConfig::new(key).with_timeout(config.upstream_timeout_secs);
        StaticMapClient::new(map_config)
            .inspect_err(|e| warn!(error = %e, "static maps disabled"))
            .ok()
    });

    let addr = config.bind_addr;
    let static_dir = config.static_dir.clone();
    let state = AppState::new(directions, fares, maps, config);
    let app = create_router(state, &static_dir);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Trip comparison listening on http://{addr}");
    info!("  GET /                   - Comparison form");
    info!("  GET /health             - Health check");
    info!("  GET /compare            - Compare car and public transport");
    info!("  GET /compare/report.pdf - The comparison as PDF");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Pick the route source: saved responses, the live API, or nothing.
fn build_directions(config: &AppConfig) -> Result<DirectionsSource, DirectionsError> {
    if let Some(dir) = &config.mock_dir {
        info!(dir = %dir.display(), "serving directions from saved responses");
        return Ok(DirectionsSource::Mock(MockDirectionsClient::new(dir)?));
    }

    match &config.api_key {
        Some(key) => {
            let directions_config =
                DirectionsConfig::new(key).with_timeout(config.upstream_timeout_secs);
            Ok(DirectionsSource::Live(DirectionsClient::new(
                directions_config,
            )?))
        }
        None => {
            warn!("{API_KEY_VAR} not set; comparisons are unavailable");
            Ok(DirectionsSource::Unconfigured)
        }
    }
}
