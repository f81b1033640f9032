//! HTTP handlers for the virtual file tree.
//! Resolves the request path, delegates to `ContentGateway`, and turns the
//! result into raw file bytes or a JSON listing.

use crate::{
    errors::AppError,
    models::{content::FileContent, entry::DirectoryEntry, namespace::Namespace, path::VirtualPath},
    services::gateway::Contents,
    state::AppState,
};
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest accepted upload body. The remote API takes the payload base64
/// encoded inside a JSON envelope, which grows it by a third.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// `?repo=` selects the namespace explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct NamespaceQuery {
    pub repo: Option<String>,
}

/// Query params accepted by `GET /browse`.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub repo: Option<String>,
    pub path: Option<String>,
}

/// Body of `GET /browse`.
#[derive(Debug, Serialize)]
pub struct Listing {
    pub namespace: Namespace,
    pub path: VirtualPath,
    pub entries: Vec<DirectoryEntry>,
}

/// GET `/files` — list the root of the selected namespace.
pub async fn get_root(
    State(state): State<AppState>,
    Query(q): Query<NamespaceQuery>,
) -> Result<Response, AppError> {
    get_contents(&state, "", q).await
}

/// GET `/files/{*path}` — file bytes or a JSON directory listing.
pub async fn get_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(q): Query<NamespaceQuery>,
) -> Result<Response, AppError> {
    get_contents(&state, &path, q).await
}

async fn get_contents(state: &AppState, path: &str, q: NamespaceQuery) -> Result<Response, AppError> {
    let target = state.resolver.resolve(path, q.repo.as_deref());
    debug!("GET {} -> {}", path, target.repo_path());

    match state.gateway.fetch(&target).await? {
        Contents::Directory(entries) => Ok(Json(entries).into_response()),
        Contents::File(file) => Ok(file_response(file, state.cache_max_age)),
    }
}

/// PUT `/files` — the namespace root itself is never writable.
pub async fn put_root(
    State(state): State<AppState>,
    Query(q): Query<NamespaceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    put_contents(&state, "", q, &headers, body).await
}

/// PUT `/files/{*path}` — commit the raw request body.
///
/// Requires `Authorization: Bearer <upload secret>`.
pub async fn put_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(q): Query<NamespaceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    put_contents(&state, &path, q, &headers, body).await
}

async fn put_contents(
    state: &AppState,
    path: &str,
    q: NamespaceQuery,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let target = state.resolver.resolve(path, q.repo.as_deref());
    let receipt = state
        .gateway
        .write(&target, &body, bearer_token(headers))
        .await?;

    let mut response = Response::new(Body::from(format!("Committed {}", receipt.path)));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Some(etag) = receipt.content_handle.as_deref().and_then(quoted_etag) {
        response.headers_mut().insert(header::ETAG, etag);
    }
    Ok(response)
}

/// GET `/browse?repo=&path=` — structured listing for the browse UI.
pub async fn browse(
    State(state): State<AppState>,
    Query(q): Query<BrowseQuery>,
) -> Result<Json<Listing>, AppError> {
    let declared = q.repo.as_deref().or(Some(Namespace::Releases.as_str()));
    let target = state
        .resolver
        .resolve(q.path.as_deref().unwrap_or_default(), declared);
    let entries = state.gateway.list(&target).await?;

    Ok(Json(Listing {
        namespace: target.namespace,
        path: target.relative,
        entries,
    }))
}

/// OPTIONS — CORS preflight; the CORS headers themselves are added by the
/// response layer.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any verb other than GET, PUT or OPTIONS.
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

fn file_response(file: FileContent, cache_max_age: u32) -> Response {
    let mut response = Response::new(Body::from(file.bytes));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(file.media_type),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", cache_max_age)) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Some(etag) = file.handle.as_deref().and_then(quoted_etag) {
        headers.insert(header::ETAG, etag);
    }
    response
}

fn quoted_etag(handle: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("\"{}\"", handle)).ok()
}

/// Token from `Authorization: Bearer <token>`; any other scheme yields none.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn file_response_sets_type_cache_and_etag() {
        let response = file_response(FileContent::new("lib.jar", vec![1u8], Some("abc".into())), 60);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/java-archive");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
        assert_eq!(headers[header::ETAG], "\"abc\"");
    }
}
