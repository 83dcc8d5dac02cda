//! Batch extraction across several organizations.
//!
//! Each organization is paged through independently and sequentially. A fetch
//! failure abandons only that organization; the outcome of every organization
//! is kept in a [`BatchReport`].

use std::path::PathBuf;

use crate::client::RecordSource;
use crate::config::batch;
use crate::filter::RecordFilter;
use crate::models::Record;

/// Batch run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Organization name substrings, processed in order.
    pub organizations: Vec<String>,

    /// Two-letter state code.
    pub state: String,

    /// Records requested per call.
    pub page_size: u64,

    /// Paging stops once the offset reaches this value.
    ///
    /// Checked after each full page, so when it is not a multiple of
    /// `page_size` the last page overshoots it (cap 2500 with pages of 1000
    /// fetches 3000 records).
    pub record_cap: u64,

    /// CSV destination.
    pub output_path: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            organizations: batch::ORGANIZATIONS.iter().map(|s| (*s).to_string()).collect(),
            state: batch::STATE.to_string(),
            page_size: batch::PAGE_SIZE,
            record_cap: batch::RECORD_CAP,
            output_path: PathBuf::from(batch::OUTPUT_FILE),
        }
    }
}

/// Why paging ended for one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned no records.
    EmptyPage,
    /// The source returned fewer records than requested.
    ShortPage,
    /// The offset reached the record cap.
    LimitReached,
}

impl StopReason {
    /// Returns true if the source ran out of data.
    #[must_use]
    pub const fn is_end_of_data(self) -> bool {
        matches!(self, Self::EmptyPage | Self::ShortPage)
    }
}

/// Outcome for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationStatus {
    /// Paging finished; `records` are the matches in fetch order.
    Completed {
        /// Matching records
        records: Vec<Record>,
        /// Number of fetch calls made
        pages: usize,
        /// Why paging ended
        stop: StopReason,
    },
    /// A fetch failed; partial matches were discarded.
    Failed {
        /// Error message
        reason: String,
        /// Offset of the failed call
        offset: u64,
    },
}

/// One organization's entry in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationReport {
    /// Organization criterion used.
    pub organization: String,
    /// What happened.
    pub status: OrganizationStatus,
}

impl OrganizationReport {
    /// Matching records, empty for failed organizations.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        match &self.status {
            OrganizationStatus::Completed { records, .. } => records,
            OrganizationStatus::Failed { .. } => &[],
        }
    }

    /// Returns true if a fetch failed for this organization.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, OrganizationStatus::Failed { .. })
    }
}

/// Outcome of a whole batch run, in organization order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Per-organization outcomes.
    pub organizations: Vec<OrganizationReport>,
}

impl BatchReport {
    /// All matches: organization order, then fetch order. Not deduplicated.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.organizations.iter().flat_map(|o| o.records().iter().cloned()).collect()
    }

    /// Total number of matches.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.organizations.iter().map(|o| o.records().len()).sum()
    }

    /// Organizations whose fetch failed.
    pub fn failures(&self) -> impl Iterator<Item = &OrganizationReport> {
        self.organizations.iter().filter(|o| o.is_failed())
    }
}

/// Run the batch over every configured organization.
pub async fn run_batch<S>(source: &S, config: &BatchConfig) -> BatchReport
where
    S: RecordSource + ?Sized,
{
    tracing::info!(
        organizations = %config.organizations.join(", "),
        state = %config.state,
        "Fetching formulary data"
    );

    let mut report = BatchReport::default();

    for organization in &config.organizations {
        tracing::info!(organization = %organization, "Fetching organization");
        let status = fetch_organization(source, config, organization).await;

        match &status {
            OrganizationStatus::Completed { records, .. } => {
                tracing::info!(organization = %organization, total = records.len(), "Organization done");
            }
            OrganizationStatus::Failed { reason, offset } => {
                tracing::warn!(organization = %organization, offset, error = %reason, "Error fetching organization, skipping");
            }
        }

        report.organizations.push(OrganizationReport { organization: organization.clone(), status });
    }

    tracing::info!(total = report.total_records(), "Total records found");
    report
}

/// Page through the source for one organization.
async fn fetch_organization<S>(source: &S, config: &BatchConfig, organization: &str) -> OrganizationStatus
where
    S: RecordSource + ?Sized,
{
    if config.page_size == 0 {
        return OrganizationStatus::Failed {
            reason: "page size must be greater than zero".to_string(),
            offset: 0,
        };
    }

    let filter = RecordFilter::new().organization(organization).state(&config.state);
    let mut records = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    let stop = loop {
        let page = match source.fetch(Some(config.page_size), Some(offset)).await {
            Ok(page) => page,
            Err(e) => return OrganizationStatus::Failed { reason: e.to_string(), offset },
        };
        pages += 1;

        if page.is_empty() {
            break StopReason::EmptyPage;
        }

        let matched = filter.apply(&page);
        tracing::info!(batch = pages, matching = matched.len(), "Batch processed");
        records.extend(matched);

        if (page.len() as u64) < config.page_size {
            break StopReason::ShortPage;
        }

        offset += config.page_size;

        if offset >= config.record_cap {
            tracing::info!(limit = config.record_cap, "Reached fetch limit");
            break StopReason::LimitReached;
        }
    };

    OrganizationStatus::Completed { records, pages, stop }
}
