use subway_server::config::ServerConfig;
use subway_server::service::LineService;
use subway_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Build app state
    let state = AppState::new(LineService::new());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Metro line service listening");
    info!("  POST   /stations                      - Register a station");
    info!("  POST   /lines                         - Create a line");
    info!("  GET    /lines/:id                     - Line with ordered stations");
    info!("  POST   /lines/:id/sections            - Register a section");
    info!("  DELETE /lines/:id/sections?stationId= - Remove the last station");

    axum::serve(listener, app).await?;
    Ok(())
}
