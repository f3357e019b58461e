//! Fetch client for the blog content API.
//!
//! [`FetchClient`] is the seam the orchestrator talks to. [`HttpFetchClient`]
//! is the production implementation over `reqwest`; scripted test doubles
//! live in [`crate::mocks`].

use reqwest::{Client, Method};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while fetching or decoding a post list
///
/// `Clone` so a failure can travel inside an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, TLS...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The API answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The body was not valid JSON
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The body was JSON but not a post list
    #[error("Malformed post list: {0}")]
    Malformed(String),
}

/// HTTP method and path of an API endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL
    pub path: &'static str,
}

/// Endpoint listing posts
pub const GET_POST_LIST: Endpoint = Endpoint {
    method: Method::GET,
    path: "/wp/v2/posts",
};

/// Query parameters of a post-list request, with defaults already applied
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostListQuery {
    /// Page number
    pub page: u32,
    /// Page size
    pub per_page: u32,
    /// Post id, when the current route points at one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Endpoint descriptor merged with its query parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Endpoint to call
    pub endpoint: Endpoint,
    /// Query parameters
    pub query: PostListQuery,
}

impl RequestDescriptor {
    /// Descriptor for the post-list endpoint
    #[must_use]
    pub fn post_list(query: PostListQuery) -> Self {
        Self {
            endpoint: GET_POST_LIST,
            query,
        }
    }
}

/// Decoded body and headers of a successful response
///
/// Header names are stored lower-cased and looked up case-insensitively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchResponse {
    /// JSON body
    pub data: serde_json::Value,
    headers: HashMap<String, String>,
}

impl FetchResponse {
    /// Build a response, lower-casing every header name
    pub fn new<I, K, V>(data: serde_json::Value, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            data,
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
                .collect(),
        }
    }

    /// Look up a header regardless of the casing of `name`
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers, keyed by lower-cased name
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// Boxed future returned by [`FetchClient::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<FetchResponse, FetchError>> + Send + 'a>>;

/// Client for the content API
///
/// Implementations must be cheap to share: the environment holds one behind
/// an `Arc` and every fetch effect clones it.
pub trait FetchClient: Send + Sync {
    /// Perform `request` and return its decoded body and headers
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for transport failures, non-success statuses,
    /// timeouts and undecodable bodies.
    fn fetch(&self, request: RequestDescriptor) -> FetchFuture<'_>;
}

/// [`FetchClient`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpFetchClient {
    client: Client,
    base_url: String,
}

impl HttpFetchClient {
    /// Create a client for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path)
    }

    async fn send(&self, request: RequestDescriptor) -> Result<FetchResponse, FetchError> {
        let url = self.url(&request.endpoint);
        tracing::debug!(%url, page = request.query.page, per_page = request.query.per_page, "Fetching");

        let response = self
            .client
            .request(request.endpoint.method.clone(), &url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;
        let data = serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(FetchResponse::new(data, headers))
    }
}

impl FetchClient for HttpFetchClient {
    fn fetch(&self, request: RequestDescriptor) -> FetchFuture<'_> {
        Box::pin(self.send(request))
    }
}
