use std::sync::Arc;

use ledgerd_api::app::{build_router, build_services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledgerd_observability::init();

    let services = build_services().await?;
    let app = build_router(Arc::new(services));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(%port, "ledgerd listening");
    axum::serve(listener, app).await?;
    Ok(())
}
