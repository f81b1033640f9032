use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, fmt};

use crate::services::gateway::GatewayConfig;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    /// Remote repository as `owner/name`.
    pub repo: String,
    pub branch: String,
    pub cache_max_age: u32,
    pub user_agent: String,
    pub token: Option<String>,
    pub upload_secret: Option<String>,
}

/// Command-line + environment configuration.
///
/// Secrets (`GH_TOKEN`, `UPLOAD_KEY`) are read from the environment only.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Maven-style file repository backed by GitHub contents")]
pub struct Args {
    /// Host to bind to (overrides REPO_PROXY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides REPO_PROXY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Contents API base URL (overrides GH_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Remote repository as owner/name (overrides GH_REPO)
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to read and commit to (overrides GH_BRANCH)
    #[arg(long)]
    pub branch: Option<String>,

    /// Cache-Control max-age for file reads, in seconds (overrides REPO_PROXY_CACHE_MAX_AGE)
    #[arg(long)]
    pub cache_max_age: Option<u32>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_sources(Args::parse(), |key| env::var(key).ok())
    }

    /// Merge parsed args over values looked up with `var`.
    pub fn from_sources(args: Args, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let env_port = match var("REPO_PROXY_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing REPO_PROXY_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_cache = match var("REPO_PROXY_CACHE_MAX_AGE") {
            Some(value) => value
                .parse::<u32>()
                .with_context(|| format!("parsing REPO_PROXY_CACHE_MAX_AGE value `{}`", value))?,
            None => 60,
        };

        let repo = match args.repo.or_else(|| var("GH_REPO")) {
            Some(repo) => repo,
            None => bail!("remote repository not set (use --repo or GH_REPO)"),
        };
        let repo = repo.trim().trim_matches('/').to_string();
        let well_formed = matches!(
            repo.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );
        if !well_formed {
            bail!("remote repository `{}` must look like owner/name", repo);
        }

        let cfg = Self {
            host: args
                .host
                .or_else(|| var("REPO_PROXY_HOST"))
                .unwrap_or_else(|| "0.0.0.0".into()),
            port: args.port.unwrap_or(env_port),
            api_url: args
                .api_url
                .or_else(|| var("GH_API_URL"))
                .unwrap_or_else(|| "https://api.github.com".into()),
            repo,
            branch: args
                .branch
                .or_else(|| var("GH_BRANCH"))
                .unwrap_or_else(|| "main".into()),
            cache_max_age: args.cache_max_age.unwrap_or(env_cache),
            user_agent: format!("repo-proxy/{}", env!("CARGO_PKG_VERSION")),
            token: var("GH_TOKEN"),
            upload_secret: var("UPLOAD_KEY"),
        };

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.branch.clone(), self.upload_secret.clone())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("cache_max_age", &self.cache_max_age)
            .field("token", &redact(&self.token))
            .field("upload_secret", &redact(&self.upload_secret))
            .finish()
    }
}
