//! Dependencies injected into the reader's reducers.

use crate::client::{FetchClient, FetchError, HttpFetchClient};
use crate::config::ReaderConfig;
use std::sync::Arc;

/// Page size used when neither the request nor the configuration sets one
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Environment for the reader reducers
#[derive(Clone)]
pub struct ReaderEnvironment {
    /// Content API client
    pub client: Arc<dyn FetchClient>,
    /// Page size applied when a request does not carry one
    pub default_per_page: u32,
}

impl ReaderEnvironment {
    /// Creates a new environment around `client`
    pub fn new(client: Arc<dyn FetchClient>) -> Self {
        Self {
            client,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Override the default page size
    #[must_use]
    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    /// Environment talking HTTP to the API described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ReaderConfig) -> Result<Self, FetchError> {
        let client = HttpFetchClient::new(config.api_base_url.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(client)).with_default_per_page(config.default_per_page))
    }
}

impl std::fmt::Debug for ReaderEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderEnvironment")
            .field("default_per_page", &self.default_per_page)
            .finish_non_exhaustive()
    }
}
