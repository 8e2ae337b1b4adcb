use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use plainread_common::{PlainreadError, SimplifyResponse};
use plainread_scoring::Simplifier;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MISSING_TEXT: &str = "Missing \"text\" in request body";

pub fn build_router(simplifier: Simplifier) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/simplify", post(simplify))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(simplifier)
}

#[derive(Debug, Deserialize)]
struct SimplifyRequest {
    text: Option<String>,
}

async fn index() -> &'static str {
    "plainread simplifier is live"
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn simplify(
    State(simplifier): State<Simplifier>,
    body: Result<Json<SimplifyRequest>, JsonRejection>,
) -> Response {
    let text = match body {
        Ok(Json(SimplifyRequest { text: Some(text) })) if !text.trim().is_empty() => text,
        Ok(_) => return missing_text(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable simplify request");
            return missing_text();
        }
    };

    match simplifier.simplify(&text).await {
        Ok(verdict) => {
            let status = if verdict.is_accepted() {
                StatusCode::OK
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Json(SimplifyResponse::from(verdict))).into_response()
        }
        Err(PlainreadError::InvalidInput(_)) => missing_text(),
        Err(e) => {
            tracing::error!(error = %e, "Simplification failed");
            let status = if e.is_upstream() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(json!({ "status": "ERROR", "error": e.to_string() }))).into_response()
        }
    }
}

fn missing_text() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": MISSING_TEXT }))).into_response()
}
