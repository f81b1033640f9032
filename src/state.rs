//! Shared handler state: the gateway, the resolver and response settings.

use crate::{
    config::AppConfig,
    services::{
        gateway::ContentGateway, github_client::GitHubContentsClient,
        path_resolver::PathResolver,
    },
};
use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: ContentGateway,
    pub resolver: PathResolver,

    /// Freshness window attached to file reads, in seconds.
    pub cache_max_age: u32,
}

impl AppState {
    pub fn new(gateway: ContentGateway, resolver: PathResolver, cache_max_age: u32) -> Self {
        Self {
            gateway,
            resolver,
            cache_max_age,
        }
    }

    /// Wire the GitHub transport and gateway from configuration.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = GitHubContentsClient::new(
            &cfg.api_url,
            &cfg.repo,
            cfg.token.clone(),
            &cfg.user_agent,
        )?;
        let gateway = ContentGateway::new(Arc::new(client), cfg.gateway_config());
        let resolver = PathResolver::new(cfg.branch.clone());
        Ok(Self::new(gateway, resolver, cfg.cache_max_age))
    }
}
