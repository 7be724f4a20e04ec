//! HTTP listener: accepts a manifest, responds with the resolved tree

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pkgtree_errors::Error;
use pkgtree_registry::MetaCache;
use pkgtree_resolver::resolve_manifest;
use pkgtree_types::Manifest;
use serde::Serialize;

/// Structured error payload returned for failed resolutions
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub kind: &'static str,
    pub message: String,
}

/// Build the application router
pub fn router(cache: MetaCache) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/resolve", post(resolve))
        .route("/resolve/stream", post(resolve_stream))
        .with_state(cache)
}

/// Bind and serve until shutdown
pub async fn serve(listen: &str, cache: MetaCache) -> Result<(), Error> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| Error::internal(format!("failed to bind {listen}: {e}")))?;

    tracing::info!(listen, "pkgtree listening");
    axum::serve(listener, router(cache))
        .await
        .map_err(|e| Error::internal(format!("server error: {e}")))
}

async fn health() -> &'static str {
    "ok"
}

async fn resolve(State(cache): State<MetaCache>, Json(manifest): Json<Manifest>) -> Response {
    match resolve_manifest(&cache, &manifest).await {
        Ok(tree) => Json(tree.to_doc()).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn resolve_stream(
    State(cache): State<MetaCache>,
    Json(manifest): Json<Manifest>,
) -> Response {
    match resolve_manifest(&cache, &manifest).await {
        Ok(tree) => match crate::display::render_ndjson(&tree) {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/x-ndjson")],
                body,
            )
                .into_response(),
            Err(e) => error_response(&Error::internal(e.to_string())),
        },
        Err(e) => error_response(&e),
    }
}

fn error_response(error: &Error) -> Response {
    let kind = error.kind();
    let status = match kind {
        "transport_error" | "registry_error" | "invalid_url" => StatusCode::BAD_GATEWAY,
        "no_matching_version" | "missing_version_data" | "cyclic_dependency" => {
            StatusCode::CONFLICT
        }
        "version_error" => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(kind, %error, "resolution failed");
    (
        status,
        Json(ErrorPayload {
            kind,
            message: error.to_string(),
        }),
    )
        .into_response()
}
