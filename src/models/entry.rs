//! Directory listing entries.

use super::path::VirtualPath;
use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Map a remote `type` field (`file`, `dir`, `symlink`, `submodule`).
    ///
    /// Only `dir` is navigable; everything else is served as a file.
    pub fn from_remote(kind: &str) -> Self {
        if kind == "dir" {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

/// One child of a listed directory.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Final path segment as reported by the remote store.
    pub name: String,

    pub kind: EntryKind,

    /// Path of the entry relative to its namespace (no `releases/` prefix).
    pub path: VirtualPath,
}
