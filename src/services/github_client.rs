//! `reqwest` transport for the GitHub contents API.

use crate::{
    models::remote::PutContents,
    services::transport::{ContentsTransport, TransportError, TransportResult, UpstreamResponse},
};
use async_trait::async_trait;
use reqwest::{
    RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

const API_VERSION: &str = "2022-11-28";

#[derive(Clone)]
pub struct GitHubContentsClient {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    token: Option<String>,
}

impl GitHubContentsClient {
    /// `api_base` is e.g. `https://api.github.com`; `repo` is `owner/name`.
    pub fn new(
        api_base: &str,
        repo: &str,
        token: Option<String>,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo: repo.trim_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Absolute contents URL with every path segment percent-encoded.
    fn contents_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/repos/{}/contents/{}", self.api_base, self.repo, encoded)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> TransportResult<UpstreamResponse> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        debug!("upstream replied {} ({} bytes)", status, body.len());
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl ContentsTransport for GitHubContentsClient {
    async fn get_contents(&self, path: &str, reference: &str) -> TransportResult<UpstreamResponse> {
        let url = self.contents_url(path);
        debug!("GET {}?ref={}", url, reference);
        self.send(self.client.get(url).query(&[("ref", reference)]))
            .await
    }

    async fn put_contents(
        &self,
        path: &str,
        body: &PutContents,
    ) -> TransportResult<UpstreamResponse> {
        let url = self.contents_url(path);
        debug!("PUT {} (branch {}, sha {:?})", url, body.branch, body.sha);
        self.send(self.client.put(url).json(body)).await
    }

    async fn download(&self, url: &str) -> TransportResult<UpstreamResponse> {
        debug!("GET {}", url);
        self.send(self.client.get(url).header(ACCEPT, "application/octet-stream"))
            .await
    }

    fn can_write(&self) -> bool {
        self.token.is_some()
    }

    fn describe(&self) -> String {
        format!("{}/repos/{}", self.api_base, self.repo)
    }
}
