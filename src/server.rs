//! Pull endpoint for collector distribution.
//!
//! A small HTTP surface rooted at the collector directory: `GET /{name}`
//! returns the raw on-disk bytes of that collector, byte-identical to what
//! the authority materialized. No authentication, no content negotiation.
//!
//! The endpoint runs as a background task owned by a [`CollectorServer`]
//! handle, so the hosting process can observe bind failures at start and
//! shut the task down cleanly instead of firing and forgetting.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FactsError;

/// Handle to the running pull endpoint.
pub struct CollectorServer {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl CollectorServer {
    /// Bind the endpoint on `port` and start serving `dir` in a background
    /// task. Binding happens here so address-in-use and similar failures
    /// surface to the caller instead of dying inside the detached task.
    pub async fn start(dir: PathBuf, port: u16) -> Result<Self, FactsError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| FactsError::Bind { addr, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| FactsError::Bind { addr, source })?;

        let app = router(dir);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        info!(%addr, "Collector pull endpoint started");

        Ok(Self {
            addr,
            shutdown_tx,
            handle,
        })
    }

    /// Address the endpoint is actually bound on (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Gracefully stop the endpoint and wait for the task to finish.
    pub async fn shutdown(self) -> std::io::Result<()> {
        // The task may already be gone; that still counts as stopped.
        let _ = self.shutdown_tx.send(());
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) => {
                warn!(error = %join_err, "Pull endpoint task panicked");
                Ok(())
            }
        }
    }
}

/// Build the router serving raw collector bytes out of `dir`.
pub fn router(dir: PathBuf) -> Router {
    Router::new()
        .route("/:name", get(serve_collector))
        .with_state(Arc::new(dir))
}

async fn serve_collector(
    State(dir): State<Arc<PathBuf>>,
    UrlPath(name): UrlPath<String>,
) -> impl IntoResponse {
    // Collector names are flat file names; anything path-like is hostile.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return (StatusCode::BAD_REQUEST, "invalid collector name").into_response();
    }

    let path = dir.join(&name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!(collector = %name, bytes = bytes.len(), "Serving collector");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "unknown collector").into_response()
        }
        Err(e) => {
            warn!(collector = %name, error = %e, "Failed to read collector for serving");
            (StatusCode::INTERNAL_SERVER_ERROR, "read failure").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_serves_bytes_identical_to_disk() {
        let temp = TempDir::new().unwrap();
        let content = b"#!/bin/sh\necho '{\"hostname\":\"x\"}'\n";
        std::fs::write(temp.path().join("get_hostname"), content).unwrap();

        let app = router(temp.path().to_path_buf());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get_hostname")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), content);
    }

    #[tokio::test]
    async fn test_unknown_collector_is_404() {
        let temp = TempDir::new().unwrap();
        let app = router(temp.path().to_path_buf());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/get_missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_shapes_are_rejected() {
        let temp = TempDir::new().unwrap();
        let app = router(temp.path().to_path_buf());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/..%2F..%2Fetc%2Fpasswd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("c"), b"bytes").unwrap();

        let server = CollectorServer::start(temp.path().to_path_buf(), 0)
            .await
            .unwrap();
        let addr = server.local_addr();
        assert_ne!(addr.port(), 0);

        let url = format!("http://{}/c", addr);
        let fetched = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
        assert_eq!(fetched.as_ref(), b"bytes");

        server.shutdown().await.unwrap();
    }
}
