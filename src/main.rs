use interview_coach::{
    config::{get_config, init_config},
    routes::build_router,
    telemetry, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    init_config()?;
    let config = get_config();

    let app_state = AppState::from_config(config)?;
    info!(
        base_url = %config.ollama_base_url,
        model = %config.ollama_model,
        max_attempts = config.mcq_max_attempts,
        "Generation backend configured"
    );

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
