//! Slash-separated virtual paths.

use serde::{Serialize, Serializer};
use std::fmt;

/// An ordered list of path segments beneath a namespace.
///
/// Construction drops empty, `.` and `..` segments, so a `VirtualPath` can
/// always be joined onto a repository prefix without escaping it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Normalize a raw client path such as `/com//example/./lib/`.
    /// Non-blank segments are kept byte for byte.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.trim().is_empty() && *s != "." && *s != "..")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Drop the leading segment.
    pub fn without_first(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    /// Append one child segment.
    pub fn join(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.segments.extend(Self::parse(name).segments);
        child
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl Serialize for VirtualPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
