//! src/services/gateway.rs
//!
//! ContentGateway — list, read and write files of the virtual repository
//! through the remote contents API. All knowledge of the remote envelope
//! (JSON items, base64 payloads, content hashes) stays in this file; callers
//! see entries, raw bytes and receipts.
//!
//! Writes follow the remote store's optimistic-concurrency protocol: look up
//! the current handle, then submit the new content with that handle. There is
//! no retry and no transaction across the two calls. If another writer lands
//! in between, the remote store rejects ours and the rejection is returned
//! unchanged.

use crate::{
    models::{
        content::FileContent,
        entry::{DirectoryEntry, EntryKind},
        remote::{PutContents, PutContentsResponse, RemoteContents, RemoteItem},
    },
    services::{
        path_resolver::ResolvedPath,
        transport::{ContentsTransport, TransportError, UpstreamResponse},
    },
};
use axum::http::StatusCode;
use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upload secret missing or invalid")]
    Unauthorized,
    #[error("remote store unreachable: {0}")]
    UpstreamUnavailable(String),
    #[error("remote store responded {status}: {body}")]
    UpstreamRejected {
        status: StatusCode,
        body: String,
        content_type: Option<String>,
    },
    #[error("unexpected remote response: {0}")]
    MalformedUpstreamResponse(String),
    #[error("`{0}` is a directory")]
    IsDirectory(String),
    #[error("`{0}` is not a directory")]
    NotADirectory(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("server misconfigured: {0}")]
    Misconfigured(&'static str),
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        GatewayError::UpstreamUnavailable(err.0)
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Explicit settings handed to the gateway at construction.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Branch all reads and writes target.
    pub reference: String,

    /// Shared secret callers must present to write. `None` refuses all writes.
    pub upload_secret: Option<String>,

    /// Commit message prefix; the repository path is appended.
    pub commit_message_prefix: String,
}

impl GatewayConfig {
    pub fn new(reference: impl Into<String>, upload_secret: Option<String>) -> Self {
        Self {
            reference: reference.into(),
            upload_secret: upload_secret.filter(|s| !s.is_empty()),
            commit_message_prefix: "Upload".into(),
        }
    }
}

/// Result of a GET that may hit either a file or a directory.
#[derive(Debug)]
pub enum Contents {
    Directory(Vec<DirectoryEntry>),
    File(FileContent),
}

/// What a successful write committed.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Repository path that was committed, e.g. `releases/com/x/x.jar`.
    pub path: String,
    pub content_handle: Option<String>,
    pub commit: Option<String>,
}

#[derive(Clone)]
pub struct ContentGateway {
    transport: Arc<dyn ContentsTransport>,
    config: GatewayConfig,
}

impl ContentGateway {
    pub fn new(transport: Arc<dyn ContentsTransport>, config: GatewayConfig) -> Self {
        Self { transport, config }
    }

    pub fn describe(&self) -> String {
        format!("{}@{}", self.transport.describe(), self.config.reference)
    }

    /// List a directory. Entries keep the remote order.
    pub async fn list(&self, target: &ResolvedPath) -> GatewayResult<Vec<DirectoryEntry>> {
        match self.get(target).await? {
            RemoteContents::Directory(items) => Ok(to_entries(target, items)),
            RemoteContents::File(_) => Err(GatewayError::NotADirectory(target.repo_path())),
        }
    }

    /// Read one file and decode its payload.
    pub async fn read(&self, target: &ResolvedPath) -> GatewayResult<FileContent> {
        match self.get(target).await? {
            RemoteContents::File(item) => self.decode_file(target, *item).await,
            RemoteContents::Directory(_) => Err(GatewayError::IsDirectory(target.repo_path())),
        }
    }

    /// Read whatever lives at `target`, file or directory.
    pub async fn fetch(&self, target: &ResolvedPath) -> GatewayResult<Contents> {
        match self.get(target).await? {
            RemoteContents::Directory(items) => Ok(Contents::Directory(to_entries(target, items))),
            RemoteContents::File(item) => {
                Ok(Contents::File(self.decode_file(target, *item).await?))
            }
        }
    }

    /// Create or replace a file.
    ///
    /// The secret is checked locally before anything is sent upstream. The
    /// current handle is looked up best-effort: when that lookup fails for a
    /// reason other than "not found" the write still goes out as a creation
    /// and the remote store decides.
    pub async fn write(
        &self,
        target: &ResolvedPath,
        bytes: &[u8],
        presented_secret: Option<&str>,
    ) -> GatewayResult<WriteReceipt> {
        if !self.secret_matches(presented_secret) {
            warn!("rejected write to {}: bad upload secret", target.repo_path());
            return Err(GatewayError::Unauthorized);
        }
        if !self.transport.can_write() {
            return Err(GatewayError::Misconfigured("no access token configured"));
        }
        if target.relative.is_root() {
            return Err(GatewayError::InvalidPath(format!(
                "cannot write to namespace root `{}`",
                target.namespace
            )));
        }

        let repo_path = target.repo_path();
        let content = general_purpose::STANDARD.encode(bytes);
        let sha = self.current_handle(target).await;

        let body = PutContents {
            message: format!("{} {}", self.config.commit_message_prefix, repo_path),
            content,
            branch: target.reference.clone(),
            sha,
        };

        let response = self.transport.put_contents(&repo_path, &body).await?;
        if !response.is_success() {
            warn!(
                "remote store rejected write to {} with {}",
                repo_path, response.status
            );
            return Err(rejected(response));
        }

        let committed: PutContentsResponse =
            serde_json::from_slice(&response.body).unwrap_or_default();
        info!("committed {} ({} bytes)", repo_path, bytes.len());

        Ok(WriteReceipt {
            path: repo_path,
            content_handle: committed.content.and_then(|c| c.sha),
            commit: committed.commit.and_then(|c| c.sha),
        })
    }

    fn secret_matches(&self, presented: Option<&str>) -> bool {
        match (self.config.upload_secret.as_deref(), presented) {
            (Some(expected), Some(presented)) => {
                constant_time_eq(expected.as_bytes(), presented.as_bytes())
            }
            _ => false,
        }
    }

    /// Handle of the committed version at `target`, if one can be found.
    async fn current_handle(&self, target: &ResolvedPath) -> Option<String> {
        let repo_path = target.repo_path();
        let response = match self
            .transport
            .get_contents(&repo_path, &target.reference)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("handle lookup for {} failed: {}; writing without one", repo_path, err);
                return None;
            }
        };

        if response.status == StatusCode::NOT_FOUND {
            debug!("{} does not exist yet; creating", repo_path);
            return None;
        }
        if !response.is_success() {
            warn!(
                "handle lookup for {} returned {}; writing without one",
                repo_path, response.status
            );
            return None;
        }

        match serde_json::from_slice::<RemoteContents>(&response.body) {
            Ok(RemoteContents::File(item)) => item.sha,
            Ok(RemoteContents::Directory(_)) => {
                warn!("{} is a directory; writing without a handle", repo_path);
                None
            }
            Err(err) => {
                warn!("handle lookup for {} unreadable: {}", repo_path, err);
                None
            }
        }
    }

    async fn get(&self, target: &ResolvedPath) -> GatewayResult<RemoteContents> {
        let repo_path = target.repo_path();
        let response = self
            .transport
            .get_contents(&repo_path, &target.reference)
            .await?;

        if !response.is_success() {
            debug!("GET {} -> {}", repo_path, response.status);
            return Err(rejected(response));
        }

        serde_json::from_slice(&response.body).map_err(|err| {
            GatewayError::MalformedUpstreamResponse(format!("{}: {}", repo_path, err))
        })
    }

    async fn decode_file(&self, target: &ResolvedPath, item: RemoteItem) -> GatewayResult<FileContent> {
        let name = if item.name.is_empty() {
            target.relative.file_name().unwrap_or_default().to_string()
        } else {
            item.name
        };

        if item.encoding.as_deref() == Some("none") {
            let Some(url) = item.download_url.as_deref() else {
                return Err(GatewayError::MalformedUpstreamResponse(format!(
                    "{}: content not embedded and no download url",
                    target.repo_path()
                )));
            };
            let response = self.transport.download(url).await?;
            if !response.is_success() {
                return Err(rejected(response));
            }
            return Ok(FileContent::new(name, response.body, item.sha));
        }

        let Some(encoded) = item.content else {
            return Err(GatewayError::MalformedUpstreamResponse(format!(
                "{}: no content in file response",
                target.repo_path()
            )));
        };
        let bytes = decode_base64(&encoded).map_err(|err| {
            GatewayError::MalformedUpstreamResponse(format!("{}: {}", target.repo_path(), err))
        })?;

        Ok(FileContent::new(name, bytes, item.sha))
    }
}

fn to_entries(target: &ResolvedPath, items: Vec<RemoteItem>) -> Vec<DirectoryEntry> {
    items
        .into_iter()
        .map(|item| DirectoryEntry {
            kind: EntryKind::from_remote(&item.kind),
            path: target.relative.join(&item.name),
            name: item.name,
        })
        .collect()
}

fn rejected(response: UpstreamResponse) -> GatewayError {
    GatewayError::UpstreamRejected {
        status: response.status,
        body: response.body_text(),
        content_type: response.content_type,
    }
}

/// Decode base64 that the remote store wraps at fixed line widths.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    general_purpose::STANDARD.decode(compact)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
