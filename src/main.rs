use anyhow::Result;
use cabinsave_core::{AppError, Config};
use cabinsave_server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    cabinsave_core::init()?;

    if let Err(e) = run().await {
        tracing::error!("cabinsave stopped: {}", e);
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    Ok(())
}

async fn run() -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated()?;
    let state = AppState::from_config(&config)?;
    let addr = config.server.bind_address()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
