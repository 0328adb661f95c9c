//! Binary entry point: wire configuration, client, registry, telemetry and
//! the selected transport together.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blogrelay_client::BloggerClient;
use blogrelay_server::config::{RelayConfig, ServerMode};
use blogrelay_server::{
    Dispatcher, SERVER_NAME, SERVER_VERSION, TelemetrySink, ToolRegistry, dashboard, tools,
    transport,
};
use blogrelay_types::RelayResult;

#[tokio::main]
async fn main() {
    // Configuration errors precede logging setup; report them plainly
    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{SERVER_NAME}: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    info!(
        version = SERVER_VERSION,
        mode = %config.mode,
        dashboard_port = config.dashboard.port,
        "starting {SERVER_NAME}"
    );
    if config.blogger.api_key.is_empty() {
        warn!("no upstream API key configured; content calls will be rejected upstream");
    }

    if let Err(e) = serve(config).await {
        error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn serve(config: RelayConfig) -> RelayResult<()> {
    let client = Arc::new(BloggerClient::new(config.client_config())?);

    let mut registry = ToolRegistry::new();
    tools::register_all(&mut registry, client)?;

    let telemetry = Arc::new(TelemetrySink::new(
        &config.mode.to_string(),
        registry.tool_names(),
    ));
    let dispatcher = Arc::new(Dispatcher::new(registry, telemetry.clone()));

    let dashboard = dashboard::run(config.dashboard.port, telemetry.clone());
    let transport = async {
        match config.mode {
            ServerMode::Stdio => transport::stdio::run(dispatcher, telemetry).await,
            ServerMode::Http => {
                transport::http::run(&config.http.host, config.http.port, dispatcher, telemetry)
                    .await
            }
        }
    };

    // Either loop ending with an error (a failed bind, a dead stream) is
    // fatal; the stdio loop ending cleanly on EOF shuts the process down.
    tokio::select! {
        result = transport => result,
        result = dashboard => result,
    }
}

/// Logs go to stderr so the stdio transport keeps stdout for responses.
/// `RUST_LOG` overrides the configured level when present.
fn init_tracing(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
