//! JSON envelopes of the remote contents API.
//!
//! Only the gateway and transports see these; handlers deal in raw bytes,
//! entries and handles.

use serde::{Deserialize, Serialize};

/// One item of a directory listing, or the single object of a file read.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RemoteItem {
    pub name: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub sha: Option<String>,

    /// `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type", default = "default_item_type")]
    pub kind: String,

    #[serde(default)]
    pub size: Option<u64>,

    /// Base64 payload, wrapped with newlines. Only present on file reads.
    #[serde(default)]
    pub content: Option<String>,

    /// `base64`, or `none` when the file is too large to embed.
    #[serde(default)]
    pub encoding: Option<String>,

    #[serde(default)]
    pub download_url: Option<String>,
}

fn default_item_type() -> String {
    "file".into()
}

/// A contents read is either a listing or a single object.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum RemoteContents {
    Directory(Vec<RemoteItem>),
    File(Box<RemoteItem>),
}

/// Body of a create-or-update request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PutContents {
    pub message: String,

    /// Base64 of the new file bytes.
    pub content: String,

    pub branch: String,

    /// Handle of the version being replaced; omitted for a creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct CommitRef {
    #[serde(default)]
    pub sha: Option<String>,
}

/// Success body of a create-or-update request. Every field is optional so a
/// sparse upstream reply still counts as a commit.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct PutContentsResponse {
    #[serde(default)]
    pub content: Option<RemoteItem>,

    #[serde(default)]
    pub commit: Option<CommitRef>,
}
