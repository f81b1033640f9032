//! In-process stand-in for the GitHub contents API plus helpers to run the
//! proxy against it over real HTTP.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose};
use repo_proxy::{
    AppState,
    config::{AppConfig, Args},
    routes,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

pub const OWNER: &str = "acme";
pub const REPO: &str = "artifacts";
pub const BRANCH: &str = "maven";
pub const TOKEN: &str = "ghp_test_token";
pub const SECRET: &str = "upload-secret";

#[derive(Clone, Debug)]
struct StoredFile {
    bytes: Vec<u8>,
    sha: String,
    /// Served with `encoding: none` and a download url, like files over 1 MB.
    large: bool,
}

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, StoredFile>,
    version: u64,
    mutations: usize,
    requests: usize,
    /// Contents reads that carried an `Authorization` header.
    authorized_reads: usize,
}

/// Shared in-memory repository of the fake API.
#[derive(Clone, Default)]
pub struct FakeGitHub {
    inner: Arc<Mutex<Inner>>,
    base_url: Arc<Mutex<String>>,
}

impl FakeGitHub {
    pub fn base_url(&self) -> String {
        self.base_url.lock().unwrap().clone()
    }

    /// A fake that was never started; connections to it are refused.
    pub fn unreachable() -> Self {
        let fake = FakeGitHub::default();
        *fake.base_url.lock().unwrap() = "http://127.0.0.1:9".into();
        fake
    }

    pub fn seed(&self, path: &str, bytes: &[u8]) {
        self.insert(path, bytes, false);
    }

    pub fn seed_large(&self, path: &str, bytes: &[u8]) {
        self.insert(path, bytes, true);
    }

    fn insert(&self, path: &str, bytes: &[u8], large: bool) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.version += 1;
        let mut hashed = inner.version.to_be_bytes().to_vec();
        hashed.extend_from_slice(bytes);
        let sha = format!("{:x}", md5::compute(hashed));
        inner.files.insert(
            path.to_string(),
            StoredFile {
                bytes: bytes.to_vec(),
                sha: sha.clone(),
                large,
            },
        );
        sha
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|f| f.bytes.clone())
    }

    pub fn sha(&self, path: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|f| f.sha.clone())
    }

    pub fn mutations(&self) -> usize {
        self.inner.lock().unwrap().mutations
    }

    pub fn requests(&self) -> usize {
        self.inner.lock().unwrap().requests
    }

    pub fn authorized_reads(&self) -> usize {
        self.inner.lock().unwrap().authorized_reads
    }

    fn listing(&self, dir: &str) -> Option<Value> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        let inner = self.inner.lock().unwrap();
        let mut seen: Vec<String> = Vec::new();
        let mut items = Vec::new();
        for (key, file) in inner.files.iter().filter(|(k, _)| k.starts_with(&prefix)) {
            let rest = &key[prefix.len()..];
            let (name, kind, sha) = match rest.split_once('/') {
                Some((child, _)) => (child, "dir", "0000"),
                None => (rest, "file", file.sha.as_str()),
            };
            if seen.iter().any(|s| s == name) {
                continue;
            }
            seen.push(name.to_string());
            items.push(json!({
                "name": name,
                "path": format!("{prefix}{name}"),
                "sha": sha,
                "type": kind,
            }));
        }
        (!items.is_empty()).then(|| Value::Array(items))
    }

    /// Start the fake API on an ephemeral port.
    pub async fn spawn() -> Self {
        let fake = FakeGitHub::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        *fake.base_url.lock().unwrap() = format!("http://{}", listener.local_addr().unwrap());

        let app = Router::new()
            .route("/repos/{owner}/{repo}/contents", get(get_root))
            .route(
                "/repos/{owner}/{repo}/contents/{*path}",
                get(get_contents).put(put_contents),
            )
            .route("/raw/{*path}", get(get_raw))
            .with_state(fake.clone());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        fake
    }
}

#[derive(Deserialize)]
struct RefQuery {
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[derive(Deserialize)]
struct PutBody {
    message: String,
    content: String,
    branch: String,
    sha: Option<String>,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Not Found", "status": "404"})),
    )
        .into_response()
}

fn check_repo(owner: &str, repo: &str) -> bool {
    owner == OWNER && repo == REPO
}

async fn get_root(
    State(fake): State<FakeGitHub>,
    Path((owner, repo)): Path<(String, String)>,
    Query(q): Query<RefQuery>,
    headers: HeaderMap,
) -> Response {
    lookup(&fake, &owner, &repo, "", q, &headers)
}

async fn get_contents(
    State(fake): State<FakeGitHub>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    Query(q): Query<RefQuery>,
    headers: HeaderMap,
) -> Response {
    lookup(&fake, &owner, &repo, &path, q, &headers)
}

fn lookup(
    fake: &FakeGitHub,
    owner: &str,
    repo: &str,
    path: &str,
    q: RefQuery,
    headers: &HeaderMap,
) -> Response {
    {
        let mut inner = fake.inner.lock().unwrap();
        inner.requests += 1;
        if headers.contains_key(header::AUTHORIZATION) {
            inner.authorized_reads += 1;
        }
    }
    if !check_repo(owner, repo) || q.reference.as_deref().unwrap_or(BRANCH) != BRANCH {
        return not_found();
    }

    let file = fake.inner.lock().unwrap().files.get(path).cloned();
    if let Some(file) = file {
        let name = path.rsplit('/').next().unwrap_or(path);
        let body = if file.large {
            json!({
                "name": name, "path": path, "sha": file.sha, "type": "file",
                "size": file.bytes.len(), "content": "", "encoding": "none",
                "download_url": format!("{}/raw/{}", fake.base_url(), path),
            })
        } else {
            // Wrap at 60 columns like the real API does.
            let encoded = general_purpose::STANDARD.encode(&file.bytes);
            let wrapped = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect::<Vec<_>>()
                .join("\n");
            json!({
                "name": name, "path": path, "sha": file.sha, "type": "file",
                "size": file.bytes.len(), "content": wrapped, "encoding": "base64",
            })
        };
        return Json(body).into_response();
    }

    match fake.listing(path) {
        Some(listing) => Json(listing).into_response(),
        None => not_found(),
    }
}

async fn put_contents(
    State(fake): State<FakeGitHub>,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<PutBody>,
) -> Response {
    fake.inner.lock().unwrap().requests += 1;
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", TOKEN).as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Bad credentials"})),
        )
            .into_response();
    }
    if !check_repo(&owner, &repo) || body.branch != BRANCH || body.message.is_empty() {
        return not_found();
    }

    match (fake.sha(&path), body.sha.as_deref()) {
        (Some(_), None) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "Invalid request.\n\n\"sha\" wasn't supplied."})),
            )
                .into_response();
        }
        (Some(current), Some(given)) if current != given => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"message": format!("{} does not match {}", path, given)})),
            )
                .into_response();
        }
        _ => {}
    }

    let Ok(bytes) = general_purpose::STANDARD.decode(&body.content) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "content is not valid Base64"})),
        )
            .into_response();
    };
    let created = fake.sha(&path).is_none();
    let sha = fake.insert(&path, &bytes, false);
    fake.inner.lock().unwrap().mutations += 1;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({
            "content": {"name": path.rsplit('/').next(), "path": path, "sha": sha, "type": "file"},
            "commit": {"sha": format!("commit-{}", sha)},
        })),
    )
        .into_response()
}

async fn get_raw(State(fake): State<FakeGitHub>, Path(path): Path<String>) -> Response {
    match fake.file(&path) {
        Some(bytes) => bytes.into_response(),
        None => not_found(),
    }
}

/// Start the proxy against `upstream` with the given credentials and return
/// its base URL.
pub async fn spawn_proxy(upstream: &FakeGitHub, token: Option<&str>, secret: Option<&str>) -> String {
    let args = Args {
        host: Some("127.0.0.1".into()),
        api_url: Some(upstream.base_url()),
        repo: Some(format!("{}/{}", OWNER, REPO)),
        branch: Some(BRANCH.into()),
        ..Default::default()
    };
    let mut vars = HashMap::new();
    if let Some(token) = token {
        vars.insert("GH_TOKEN", token.to_string());
    }
    if let Some(secret) = secret {
        vars.insert("UPLOAD_KEY", secret.to_string());
    }
    let cfg = AppConfig::from_sources(args, |key| vars.get(key).cloned()).unwrap();

    let app = routes().with_state(AppState::from_config(&cfg).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    base
}

/// Fake upstream plus a proxy holding valid credentials.
pub async fn setup() -> (FakeGitHub, String) {
    let upstream = FakeGitHub::spawn().await;
    let proxy = spawn_proxy(&upstream, Some(TOKEN), Some(SECRET)).await;
    (upstream, proxy)
}
