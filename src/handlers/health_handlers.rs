//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the remote contents API answers

use crate::{models::namespace::Namespace, services::gateway::GatewayError, state::AppState};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Lists the release namespace root upstream. A 404 still counts as ready:
/// the store answered, the namespace just has no files yet.
///
/// HTTP 200 when the check passes, HTTP 503 otherwise.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let root = state.resolver.resolve("", Some(Namespace::Releases.as_str()));
    let upstream_check = match state.gateway.list(&root).await {
        Ok(_) => (true, None::<String>),
        Err(GatewayError::UpstreamRejected { status, .. }) if status == StatusCode::NOT_FOUND => {
            (true, None)
        }
        Err(e) => (false, Some(e.to_string())),
    };

    let overall_ok = upstream_check.0;

    let mut checks = HashMap::new();
    checks.insert(
        "upstream",
        CheckStatus {
            ok: upstream_check.0,
            target: state.gateway.describe(),
            error: upstream_check.1,
        },
    );

    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    target: String,
    error: Option<String>,
}
