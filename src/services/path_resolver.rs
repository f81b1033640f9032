//! Maps client paths onto the remote repository layout.
//!
//! `releases/...` and `snapshots/...` live side by side at the repository
//! root. Clients may name the namespace (query parameter or leading path
//! segment) or leave it to be inferred from the `-SNAPSHOT` qualifier.

use crate::models::{namespace::Namespace, path::VirtualPath};

/// Qualifier that routes an artifact into [`Namespace::Snapshots`].
pub const SNAPSHOT_MARKER: &str = "-SNAPSHOT";

/// A client path pinned to a namespace and a remote reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    pub namespace: Namespace,
    pub relative: VirtualPath,
    pub reference: String,
}

impl ResolvedPath {
    /// Path inside the remote repository, e.g. `releases/com/example`.
    pub fn repo_path(&self) -> String {
        if self.relative.is_root() {
            self.namespace.as_str().to_string()
        } else {
            format!("{}/{}", self.namespace, self.relative)
        }
    }
}

#[derive(Clone, Debug)]
pub struct PathResolver {
    reference: String,
}

impl PathResolver {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Resolve a raw path and optional declared namespace. Never fails.
    pub fn resolve(&self, raw_path: &str, declared: Option<&str>) -> ResolvedPath {
        let (namespace, relative) = resolve(raw_path, declared);
        ResolvedPath {
            namespace,
            relative,
            reference: self.reference.clone(),
        }
    }
}

/// Pure namespace selection.
///
/// A recognised `declared` namespace wins; an unrecognised one degrades to
/// releases with the path taken literally. Without a declaration, a leading
/// namespace segment is consumed, otherwise the snapshot marker decides.
/// Declarations are case-insensitive; path segments are not.
pub fn resolve(raw_path: &str, declared: Option<&str>) -> (Namespace, VirtualPath) {
    let path = VirtualPath::parse(raw_path);
    let leading = path.first().and_then(Namespace::from_segment);

    match declared.map(str::trim).filter(|d| !d.is_empty()) {
        Some(declared) => match declared.parse::<Namespace>() {
            Ok(namespace) if leading == Some(namespace) => (namespace, path.without_first()),
            Ok(namespace) => (namespace, path),
            Err(_) => (Namespace::Releases, path),
        },
        None => match leading {
            Some(namespace) => (namespace, path.without_first()),
            None if raw_path.contains(SNAPSHOT_MARKER) => (Namespace::Snapshots, path),
            None => (Namespace::Releases, path),
        },
    }
}
