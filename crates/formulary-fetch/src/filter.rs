//! Local record filtering by organization and state.

use crate::models::Record;

/// Organization and state criteria.
///
/// Every provided criterion must match. An empty criterion counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    organization: Option<String>,
    state: Option<String>,
}

impl RecordFilter {
    /// A filter with no criteria (keeps everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `organization_name` to contain `organization`, ignoring case.
    #[must_use]
    pub fn organization(mut self, organization: impl AsRef<str>) -> Self {
        self.organization = normalize(organization.as_ref());
        self
    }

    /// Require `state` to equal `state`, ignoring case.
    #[must_use]
    pub fn state(mut self, state: impl AsRef<str>) -> Self {
        self.state = normalize(state.as_ref());
        self
    }

    /// Returns true if no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.organization.is_none() && self.state.is_none()
    }

    /// Returns true if the record satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(org) = &self.organization {
            match record.organization_name() {
                Some(name) if !name.is_empty() && name.to_lowercase().contains(org) => {}
                _ => return false,
            }
        }

        if let Some(state) = &self.state {
            match record.state() {
                Some(value) if !value.is_empty() && value.to_lowercase() == *state => {}
                _ => return false,
            }
        }

        true
    }

    /// Keep the matching records, preserving input order.
    #[must_use]
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        if self.is_empty() {
            return records.to_vec();
        }
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Lowercased criterion, or `None` when empty.
fn normalize(criterion: &str) -> Option<String> {
    if criterion.is_empty() { None } else { Some(criterion.to_lowercase()) }
}

/// Filter records by organization substring and/or state code.
///
/// Missing criteria are ignored; with neither set the input is returned as is.
#[must_use]
pub fn filter_local(
    records: &[Record],
    organization: Option<&str>,
    state: Option<&str>,
) -> Vec<Record> {
    let mut filter = RecordFilter::new();
    if let Some(org) = organization {
        filter = filter.organization(org);
    }
    if let Some(state) = state {
        filter = filter.state(state);
    }
    filter.apply(records)
}
