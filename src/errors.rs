use crate::services::gateway::GatewayError;
use axum::{
    Json,
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// HTTP-facing error: a status plus either a local message (rendered as
/// JSON) or an upstream body passed through untouched.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    passthrough: Option<Passthrough>,
}

#[derive(Debug)]
struct Passthrough {
    body: String,
    content_type: Option<String>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            passthrough: None,
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// Forward a remote store reply verbatim.
    pub fn upstream(status: StatusCode, body: String, content_type: Option<String>) -> Self {
        Self {
            status,
            message: format!("remote store responded {}", status),
            passthrough: Some(Passthrough { body, content_type }),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Some(passthrough) = self.passthrough else {
            let body = Json(json!({
                "error": self.message,
                "status": self.status.as_u16()
            }));
            return (self.status, body).into_response();
        };

        let mut response = Response::new(Body::from(passthrough.body));
        *response.status_mut() = self.status;
        let content_type = passthrough
            .content_type
            .and_then(|v| HeaderValue::from_str(&v).ok())
            .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
        response
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UpstreamRejected {
                status,
                body,
                content_type,
            } => AppError::upstream(status, body, content_type),
            GatewayError::Unauthorized => AppError::new(StatusCode::UNAUTHORIZED, err.to_string()),
            GatewayError::UpstreamUnavailable(_) | GatewayError::MalformedUpstreamResponse(_) => {
                AppError::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            GatewayError::IsDirectory(_)
            | GatewayError::NotADirectory(_)
            | GatewayError::InvalidPath(_) => AppError::new(StatusCode::BAD_REQUEST, err.to_string()),
            GatewayError::Misconfigured(_) => AppError::internal(err.to_string()),
        }
    }
}
