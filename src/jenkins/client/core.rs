use std::future::Future;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Credentials;
use crate::error::{JobStatsError, Result};

/// Retries after the first attempt, so a request is sent at most six times.
const MAX_RETRIES: u32 = 5;

/// Authenticated client for one Jenkins server.
///
/// Requests go out one at a time over a single kept-alive connection. The
/// Basic credentials are encoded once here and sent with every request.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
}

impl JenkinsClient {
    /// Create a client for `server`, given either as `host[:port]` or as a
    /// full `http(s)://` URL.
    pub fn new(server: &str, credentials: &Credentials) -> Result<Self> {
        let base_url = parse_server_url(server)?;

        let mut auth = HeaderValue::from_str(&credentials.basic_auth_header())
            .map_err(|e| JobStatsError::Config(format!("Invalid credentials: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("jobstats/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .pool_max_idle_per_host(1)
            // A redirect (usually to /login) is a failure, not a page to follow.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| JobStatsError::Config(format!("Failed to create HTTP client: {e}")))?;

        debug!(
            "Jenkins client for {} as user {}",
            base_url,
            credentials.user()
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` and return the body as text.
    ///
    /// Connection-level failures are retried up to `MAX_RETRIES` times with no
    /// delay. Any status other than 200 fails straight away. Bytes that are not
    /// valid UTF-8 are replaced rather than rejected.
    pub async fn get(&self, path: &str) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| JobStatsError::Config(format!("Invalid request path {path}: {e}")))?;

        debug!("GET {url}");

        let (response, attempts) = send_with_retries(path, || {
            let request = self.client.get(url.clone());
            async move { request.send().await.map_err(SendError::from) }
        })
        .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(JobStatsError::RequestFailed {
                path: path.to_string(),
                attempts,
                reason: format!("HTTP {status}"),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| JobStatsError::RequestFailed {
                path: path.to_string(),
                attempts,
                reason: format!("Failed to read response body: {e}"),
            })?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GET `path` and decode the body as JSON.
    pub async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.get(path).await?;

        serde_json::from_str(&body).map_err(|source| JobStatsError::MalformedResponse {
            path: path.to_string(),
            source,
        })
    }
}

/// How a single send attempt failed.
#[derive(Debug)]
enum SendError {
    /// The connection could not be made or broke mid-request; worth retrying.
    Transient(String),
    Fatal(String),
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            Self::Transient(e.to_string())
        } else {
            Self::Fatal(e.to_string())
        }
    }
}

/// Run `send` until it succeeds, fails fatally or runs out of retries.
///
/// Returns the value together with the number of attempts it took.
async fn send_with_retries<T, F, Fut>(path: &str, mut send: F) -> Result<(T, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, SendError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match send().await {
            Ok(value) => return Ok((value, attempt)),
            Err(SendError::Transient(reason)) if attempt <= MAX_RETRIES => {
                warn!("Request to {path} failed ({reason}), retrying ({attempt}/{MAX_RETRIES})...");
            }
            Err(SendError::Transient(reason) | SendError::Fatal(reason)) => {
                return Err(JobStatsError::RequestFailed {
                    path: path.to_string(),
                    attempts: attempt,
                    reason,
                });
            }
        }
    }
}

fn parse_server_url(server: &str) -> Result<Url> {
    let server = server.trim();
    if server.is_empty() {
        return Err(JobStatsError::Config("Jenkins URL is empty".into()));
    }

    // A bare `host:port` would otherwise parse with `host` as the scheme.
    let candidate = if server.contains("://") {
        server.to_string()
    } else {
        format!("http://{server}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| JobStatsError::Config(format!("Invalid Jenkins URL {server}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(JobStatsError::Config(format!(
            "Unsupported Jenkins URL: {server}"
        ))),
    }
}
