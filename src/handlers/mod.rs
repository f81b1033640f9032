//! HTTP handlers: file tree, browse listing, health probes and CORS.

pub mod cors;
pub mod file_handlers;
pub mod health_handlers;
