//! Top-level partitions of the virtual file tree.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which half of the Maven-style tree a path lives in.
///
/// Regular releases and pre-release (`-SNAPSHOT`) artifacts are kept under
/// separate top-level directories of the remote repository.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Releases,
    Snapshots,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Releases, Namespace::Snapshots];

    /// Directory name of this namespace at the repository root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Releases => "releases",
            Namespace::Snapshots => "snapshots",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNamespace(pub String);

impl fmt::Display for UnknownNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown namespace `{}`", self.0)
    }
}

impl std::error::Error for UnknownNamespace {}

impl Namespace {
    /// Exact, case-sensitive match of a path segment against the
    /// directory names in the remote repository.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Namespace::ALL.into_iter().find(|ns| ns.as_str() == segment)
    }
}

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNamespace(s.to_string()))
    }
}
