#![forbid(unsafe_code)]

use reit_calc_server::{build_router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env();
    init_tracing(&config);

    let app = build_router(AppState::default());
    let listener = TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind))?;
    info!(bind = %config.bind, "reit-calc server listening");

    axum::serve(listener, app).await.map_err(|e| {
        error!(error = %e, "server stopped");
        e.to_string()
    })
}
