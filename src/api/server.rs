use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::pipeline::SharedSnapshot;

/// Serve the latest snapshot to the rendering collaborator. Until the first
/// cycle completes, both data routes answer 503.
pub async fn run_server(snapshot: SharedSnapshot, port: u16) {
    let app = Router::new()
        .route(
            "/positions",
            get({
                let snapshot = snapshot.clone();
                move || get_positions(snapshot.clone())
            }),
        )
        .route(
            "/network",
            get({
                let snapshot = snapshot.clone();
                move || get_network(snapshot.clone())
            }),
        )
        .route("/health", get(health_check));

    let addr = format!("0.0.0.0:{}", port);
    info!(%addr, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server exited");
    }
}

async fn get_positions(snapshot: SharedSnapshot) -> impl IntoResponse {
    let lock = snapshot.read().await;

    match &*lock {
        Some(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "generatedAt": snapshot.generated_at,
                "positions": snapshot.positions,
            })),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no snapshot yet" })),
        ),
    }
}

async fn get_network(snapshot: SharedSnapshot) -> impl IntoResponse {
    let lock = snapshot.read().await;

    match &*lock {
        Some(snapshot) => (StatusCode::OK, Json(json!(snapshot.network))),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no snapshot yet" })),
        ),
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
