//! CMS dataset API client.
//!
//! Issues one GET per call against the dataset's `/data` endpoint with
//! optional `size`/`offset` pagination parameters. No retries, no caching:
//! every failure surfaces to the caller as a [`ClientError`].

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Page, Record};

/// Anything that can serve pages of records.
///
/// [`FormularyClient`] is the production source; the batch orchestrator only
/// depends on this trait.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one page. `None` leaves the parameter to the server default.
    async fn fetch(&self, size: Option<u64>, offset: Option<u64>) -> ClientResult<Page>;
}

/// CMS data API client.
#[derive(Clone)]
pub struct FormularyClient {
    /// HTTP client.
    client: Client,

    /// `.../{dataset-id}/data` endpoint.
    endpoint: String,

    /// Request timeout, reported in timeout errors.
    request_timeout: Duration,
}

impl FormularyClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails or the endpoint is not a URL.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let endpoint = config.data_endpoint();
        Url::parse(&endpoint)?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client, endpoint, request_timeout: config.request_timeout })
    }

    /// The dataset endpoint without query parameters.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request URL. Parameters are appended only when provided.
    pub fn data_url(&self, size: Option<u64>, offset: Option<u64>) -> ClientResult<Url> {
        let mut url = Url::parse(&self.endpoint)?;

        if size.is_some() || offset.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(size) = size {
                pairs.append_pair("size", &size.to_string());
            }
            if let Some(offset) = offset {
                pairs.append_pair("offset", &offset.to_string());
            }
        }

        Ok(url)
    }

    /// Fetch one page of records.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-2xx status, or a body that is
    /// not a JSON array of objects.
    pub async fn fetch(&self, size: Option<u64>, offset: Option<u64>) -> ClientResult<Page> {
        let url = self.data_url(size, offset)?;
        tracing::info!(%url, "Fetching data");

        let response = self.client.get(url).send().await.map_err(|e| self.transport_error(e))?;
        let response = Self::handle_response(response).await?;
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        let records: Vec<Record> = serde_json::from_slice(&body)?;
        tracing::debug!(records = records.len(), "Parsed page");

        Ok(records)
    }

    /// Map non-2xx statuses to [`ClientError::Status`].
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let reason = match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => response.text().await.unwrap_or_default(),
        };

        Err(ClientError::status(status.as_u16(), reason))
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() { ClientError::Timeout(self.request_timeout) } else { err.into() }
    }
}

#[async_trait::async_trait]
impl RecordSource for FormularyClient {
    async fn fetch(&self, size: Option<u64>, offset: Option<u64>) -> ClientResult<Page> {
        Self::fetch(self, size, offset).await
    }
}

impl std::fmt::Debug for FormularyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormularyClient").field("endpoint", &self.endpoint).finish()
    }
}
