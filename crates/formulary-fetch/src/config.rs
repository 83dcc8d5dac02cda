//! Configuration for the formulary fetch tools.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the CMS data API dataset endpoints.
    pub const BASE_URL: &str = "https://data.cms.gov/data-api/v1/dataset";

    /// Monthly Prescription Drug Plan Formulary & Pharmacy Network dataset.
    pub const DATASET_ID: &str = "cb2a224f-4d52-4cae-aa55-8c00c671384f";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Identifying User-Agent sent with every request.
    pub const USER_AGENT: &str =
        concat!("formulary-fetch/", env!("CARGO_PKG_VERSION"), " (cms-data-extract)");

    /// Environment variable overriding [`BASE_URL`].
    pub const BASE_URL_ENV: &str = "FORMULARY_API_BASE_URL";

    /// Environment variable overriding [`DATASET_ID`].
    pub const DATASET_ID_ENV: &str = "FORMULARY_DATASET_ID";
}

/// Fixed settings of the Florida MAPD batch extraction.
pub mod batch {
    /// Organization name substrings, matched independently.
    ///
    /// The aliases overlap ("UHC", "United", "UnitedHealthcare"), so a record
    /// can be exported once per alias it matches.
    pub const ORGANIZATIONS: &[&str] =
        &["Devoted", "UHC", "United", "UnitedHealthcare", "Humana", "Wellcare", "Aetna"];

    /// Two-letter state code.
    pub const STATE: &str = "FL";

    /// Records requested per API call.
    pub const PAGE_SIZE: u64 = 1000;

    /// Offset at which paging stops for one organization.
    pub const RECORD_CAP: u64 = 5000;

    /// Output file, relative to the working directory.
    pub const OUTPUT_FILE: &str = "florida_mapd_formulary.csv";
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset endpoint root (overridable for mock servers).
    pub base_url: String,

    /// Dataset identifier appended to the base URL.
    pub dataset_id: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User-Agent header value.
    pub user_agent: String,
}

impl Config {
    /// Create the production configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            dataset_id: api::DATASET_ID.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            user_agent: api::USER_AGENT.to_string(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/data-api/v1/dataset", base_url.trim_end_matches('/')),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Self::new()
        }
    }

    /// Create configuration from the environment (and a `.env` file, if any).
    ///
    /// Empty overrides are ignored.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new();
        if let Some(base_url) = non_empty_var(api::BASE_URL_ENV) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(dataset_id) = non_empty_var(api::DATASET_ID_ENV) {
            config.dataset_id = dataset_id;
        }
        Ok(config)
    }

    /// Replace the base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The `.../{dataset-id}/data` endpoint without query parameters.
    #[must_use]
    pub fn data_endpoint(&self) -> String {
        format!("{}/{}/data", self.base_url, self.dataset_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
