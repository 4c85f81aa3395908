// Dashboard API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and uniform response
// handling. Endpoint methods live in `nodes.rs` as inherent methods so
// this module stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// How much of an unexpected body to keep in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the node dashboard backend.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct NodesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NodesClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a URL relative to the base root: `{base}/{path}`.
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.root_url(&format!("api/{}", path.trim_start_matches('/')))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let endpoint = url.path().to_owned();
        self.execute(self.http.get(url), endpoint).await
    }

    /// Send a GET request with serialized query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, url: Url, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {}", url);
        let endpoint = url.path().to_owned();
        self.execute(self.http.get(url).query(query), endpoint).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        endpoint: String,
    ) -> Result<T, Error> {
        let resp = builder.send().await.map_err(|source| Error::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        parse_response(resp, &endpoint).await
    }
}

/// Check the status and decode the body.
///
/// Non-2xx statuses become `Error::Http` with the canonical reason phrase;
/// bodies that do not match `T` become `Error::Deserialization` with a
/// short preview of what came back.
async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<T, Error> {
    let status = resp.status();

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            endpoint: endpoint.to_owned(),
        });
    }

    let body = resp.text().await.map_err(|source| Error::Transport {
        endpoint: endpoint.to_owned(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
