use models::AppSettings;
use std::net::SocketAddr;

use crate::router::create_router;

/// Run the API server
pub async fn run_server(default_settings: AppSettings, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(default_settings);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
