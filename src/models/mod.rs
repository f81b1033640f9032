//! Core data models for the repository proxy.
//!
//! These types describe the virtual file tree (namespaces, paths, entries,
//! file content) and the JSON envelopes exchanged with the remote contents
//! API. None of them are cached; they are built fresh per request.

pub mod content;
pub mod entry;
pub mod namespace;
pub mod path;
pub mod remote;
