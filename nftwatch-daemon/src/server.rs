//! HTTP server -- metrics endpoint and graceful shutdown.
//!
//! # Routes
//!
//! * `GET /metrics` - one collection pass, rendered on a blocking worker
//! * `GET /` - `302 Found` redirect to `/metrics`
//!
//! # Shutdown
//!
//! The first signal stops accepting connections and drains in-flight
//! scrapes. A second signal, or the drain timeout expiring, aborts the
//! server immediately.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

use nftwatch_collector::{Collector, KernelStateProvider};
use nftwatch_core::config::METRICS_ENDPOINT;

use crate::exposition;

/// Collector shared between request handlers.
pub type SharedCollector = Arc<Collector<Box<dyn KernelStateProvider>>>;

/// Build the application router.
pub fn router(collector: SharedCollector) -> Router {
    Router::new()
        .route(METRICS_ENDPOINT, get(handle_metrics))
        .route("/", get(handle_root))
        .with_state(collector)
}

async fn handle_metrics(State(collector): State<SharedCollector>) -> Response {
    match tokio::task::spawn_blocking(move || exposition::render(&*collector)).await {
        Ok(body) => ([(header::CONTENT_TYPE, exposition::CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "collection task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_root() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, METRICS_ENDPOINT)]).into_response()
}

/// Bind the listen address.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind '{}': {}", addr, e))?;

    if let Ok(local) = listener.local_addr()
        && local.ip().is_unspecified()
    {
        tracing::warn!(
            listen_addr = %local,
            "metrics endpoint is exposed on all interfaces; restrict listen_addr in untrusted networks"
        );
    }

    Ok(listener)
}

/// Forward SIGTERM/SIGINT into a channel, one message per signal.
pub fn spawn_signal_listener() -> Result<mpsc::Receiver<&'static str>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            };
            if tx.send(name).await.is_err() {
                break;
            }
        }
    });
    Ok(rx)
}

/// Serve `app` until shut down by messages on `signals`.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut signals: mpsc::Receiver<&'static str>,
    shutdown_timeout: Duration,
) -> Result<()> {
    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = drain_rx.await;
    });
    let mut task = tokio::spawn(async move { server.await });

    tokio::select! {
        res = &mut task => return flatten(res),
        signal = signals.recv() => {
            tracing::info!(
                signal = signal.unwrap_or("channel closed"),
                "shutdown signal received, draining in-flight scrapes"
            );
        }
    }

    let _ = drain_tx.send(());

    tokio::select! {
        res = &mut task => {
            tracing::info!("server stopped");
            flatten(res)
        }
        _ = tokio::time::sleep(shutdown_timeout) => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs_f64(),
                "shutdown timeout expired, aborting in-flight scrapes"
            );
            task.abort();
            Ok(())
        }
        Some(signal) = signals.recv() => {
            tracing::warn!(signal, "second signal received, exiting immediately");
            task.abort();
            Ok(())
        }
    }
}

fn flatten(res: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(anyhow::anyhow!("server error: {}", e)),
        Err(e) => Err(anyhow::anyhow!("server task failed: {}", e)),
    }
}
