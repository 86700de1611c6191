use anyhow::{Context, Result};
use archi_server::{ServerConfig, create_app};
use archi_telemetry::info;
use archi_workflow::ProjectDesigner;
use std::sync::Arc;

pub async fn run_serve(designer: Arc<ProjectDesigner>, host: &str, port: u16) -> Result<()> {
    let app = create_app(ServerConfig::new(designer));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    info!(%addr, "llm-architect API listening");
    println!("LLM Architect API on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available; run until killed
        std::future::pending::<()>().await;
    }
}
