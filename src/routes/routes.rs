//! Defines routes for the virtual file repository.
//!
//! ## Structure
//! - **File endpoints**
//!   - `GET     /files[/{*path}]` — file bytes, or a JSON listing for directories
//!   - `PUT     /files[/{*path}]` — commit the request body (bearer upload secret)
//!   - `OPTIONS /files[/{*path}]` — CORS preflight
//!   - anything else, HEAD included — 405
//!
//! - **Browse endpoint**
//!   - `GET /browse?repo=&path=` — structured listing for the browse UI
//!
//! The wildcard `*path` allows nested Maven paths like `com/example/lib/1.0/lib.jar`.
//! Every response carries the CORS headers from `cors_headers`.

use crate::{
    handlers::{
        cors::cors_headers,
        file_handlers::{
            MAX_UPLOAD_BYTES, browse, get_file, get_root, method_not_allowed, preflight,
            put_file, put_root,
        },
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::map_response,
    routing::{MethodRouter, get},
};

/// Build and return the router with `AppState` as shared state.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/browse", get(browse))
        .route("/files", root_methods())
        .route("/files/", root_methods())
        .route(
            "/files/{*path}",
            get(get_file)
                .head(method_not_allowed)
                .put(put_file)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(map_response(cors_headers))
}

fn root_methods() -> MethodRouter<AppState> {
    get(get_root)
        .head(method_not_allowed)
        .put(put_root)
        .options(preflight)
        .fallback(method_not_allowed)
}
