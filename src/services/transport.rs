//! Wire-level access to the remote contents API.
//!
//! The gateway owns the protocol (envelopes, base64, handles); a transport
//! only moves requests and hands back status, content type and body.

use crate::models::remote::PutContents;
use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use thiserror::Error;

/// Raw reply from the remote store.
#[derive(Clone, Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// A JSON body with `application/json` content type.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".into()),
            body: Bytes::from(value.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The request never produced a response (DNS, TLS, connection reset...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

pub type TransportResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait ContentsTransport: Send + Sync {
    /// `GET contents/{path}?ref={reference}`.
    async fn get_contents(&self, path: &str, reference: &str) -> TransportResult<UpstreamResponse>;

    /// `PUT contents/{path}` with a create-or-update body.
    async fn put_contents(&self, path: &str, body: &PutContents)
    -> TransportResult<UpstreamResponse>;

    /// Fetch a raw file from a `download_url` returned by the store.
    async fn download(&self, url: &str) -> TransportResult<UpstreamResponse>;

    /// Whether this transport carries credentials able to commit.
    fn can_write(&self) -> bool {
        true
    }

    /// Human-readable target, for logs.
    fn describe(&self) -> String;
}
