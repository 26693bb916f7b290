//! On-demand cache revalidation endpoint.
//!
//! # Responsibilities
//! - Authorize CMS publish webhooks against the shared secret
//! - Invalidate the target path plus its declared dependents
//! - Always answer with structured JSON, whatever happens
//!
//! # Design Decisions
//! - Secret comparison is exact and case-sensitive; with no secret
//!   resolved at startup the endpoint rejects everything
//! - Invalidation is idempotent, so replayed webhooks are harmless

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::invalidation::invalidate_with_dependents;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
    pub path: Option<String>,
}

/// Success payload.
#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub path: String,
    pub now: String,
}

/// `GET /api/revalidate?secret=<token>&path=<path>`
pub async fn revalidate(
    State(state): State<AppState>,
    Query(params): Query<RevalidateQuery>,
) -> Response {
    let authorized = matches!(
        (&state.secret, &params.secret),
        (Some(expected), Some(given)) if expected == given
    );
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid secret" })),
        )
            .into_response();
    }

    let path = params.path.unwrap_or_else(|| "/".to_string());
    match invalidate_with_dependents(state.invalidator.as_ref(), &state.dependencies, &path) {
        Ok(()) => {
            tracing::info!(path = %path, "Cache revalidated");
            (
                StatusCode::OK,
                Json(RevalidateResponse {
                    revalidated: true,
                    path,
                    now: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Revalidation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error revalidating", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
