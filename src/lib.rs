//! Maven-style file repository served from a GitHub repository through its
//! contents API.
//!
//! Requests are resolved to a namespace (`releases` / `snapshots`) by
//! [`services::path_resolver`], then listed, read or committed by
//! [`services::gateway::ContentGateway`].

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::routes::routes;
pub use state::AppState;
