//! HTTP boundary: `GET /api/resolve-stream` and `GET /health`.
//!
//! Found and not-found outcomes both answer `200`. Internal faults (a query
//! string that cannot be decoded, a resolution task that panicked) answer
//! `500` with `{ok:false,error}`.

use anyhow::{Context, Result};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use radiofind_core::{ResolutionRequest, ResolveResponse, Resolver};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Query string of `/api/resolve-stream`. Absent fields are empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolveQuery {
    /// Station homepage.
    pub homepage: String,
    /// Previously known stream URL.
    pub stream: String,
    /// Label echoed back.
    pub name: String,
}

impl From<ResolveQuery> for ResolutionRequest {
    fn from(query: ResolveQuery) -> Self {
        Self::new(query.homepage, query.stream, query.name)
    }
}

/// Build the application router around a shared resolver.
pub fn router(resolver: Arc<Resolver>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/resolve-stream",
            get(resolve_stream).options(preflight),
        )
        .route("/health", get(health))
        .layer(cors)
        .with_state(resolver)
}

/// Run one resolution on its own task so a panic becomes a fault response.
pub async fn resolve_guarded(resolver: Arc<Resolver>, request: ResolutionRequest) -> ResolveResponse {
    let task = tokio::spawn(async move { resolver.resolve(request).await });
    match task.await {
        Ok(result) => result.into(),
        Err(e) => {
            error!(error = %e, "resolution task failed");
            ResolveResponse::fault(format!("internal error: {e}"))
        },
    }
}

async fn resolve_stream(
    State(resolver): State<Arc<Resolver>>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(error = %rejection, "rejected query string");
            let fault = ResolveResponse::fault(rejection.body_text());
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(fault)).into_response();
        },
    };
    let response = resolve_guarded(resolver, query.into()).await;
    let status = if response.is_fault() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health(State(resolver): State<Arc<Resolver>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "heuristicsVersion": resolver.heuristics().version(),
    }))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(resolver: Resolver, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router(Arc::new(resolver)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
