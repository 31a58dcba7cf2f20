//! Network access for the worker

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use super::http::{Request, RequestMode, Response, ResponseType};

/// Errors that can occur while fetching from the network
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The network could not be reached at all
    #[error("Network unreachable: {0}")]
    Unreachable(String),

    /// The request method is not a valid HTTP method
    #[error("Invalid request method: {0}")]
    InvalidMethod(String),
}

/// Performs network fetches on the worker's behalf
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// [`Fetcher`] backed by a `reqwest` client
///
/// Responses are classified relative to `origin`: same-origin responses are
/// [`ResponseType::Basic`], cross-origin `no-cors` responses are masked as
/// opaque, and other cross-origin responses are [`ResponseType::Cors`].
#[derive(Debug, Clone)]
pub struct NetworkFetcher {
    client: Client,
    origin: Url,
}

impl NetworkFetcher {
    pub fn new(origin: Url) -> Self {
        Self::with_client(Client::new(), origin)
    }

    /// Create a NetworkFetcher with a custom HTTP client
    pub fn with_client(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    fn classify(&self, request: &Request) -> ResponseType {
        if request.url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else if request.mode == RequestMode::NoCors {
            ResponseType::Opaque
        } else {
            ResponseType::Cors
        }
    }
}

#[async_trait]
impl Fetcher for NetworkFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let method = reqwest::Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| FetchError::InvalidMethod(request.method.clone()))?;

        let response = self
            .client
            .request(method, request.url.clone())
            .send()
            .await?;

        let response_type = self.classify(request);
        if response_type == ResponseType::Opaque {
            debug!(url = %request.url, "Masking cross-origin no-cors response");
            return Ok(Response::opaque());
        }

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response {
            status,
            response_type,
            headers,
            body,
        })
    }
}
