//! Gateway serve entrypoint — used by the binary and tests.

use crate::{AppState, GatewayConfig, routes};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Handle returned by serve functions — holds the bound port and a
/// shutdown trigger.
pub struct ServeHandle {
    /// The port the gateway is listening on.
    pub port: u16,
    /// Send a value to trigger graceful shutdown.
    shutdown_tx: Option<oneshot::Sender<()>>,
    /// Join handle for the server task.
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Bind the given router and start serving in a spawned task.
///
/// Returns a [`ServeHandle`] with the bound port — bind to port 0 for
/// an ephemeral one.
pub async fn serve_router(app: Router, bind: &str) -> Result<ServeHandle> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("gateway listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}

/// Build the runtime from config, bind, and start serving.
pub async fn serve_with_config(config: &GatewayConfig, bind: &str) -> Result<ServeHandle> {
    let runtime = crate::build_runtime(config)?;
    let state = AppState {
        runtime: Arc::new(runtime),
    };
    serve_router(routes::router(state), bind).await
}
