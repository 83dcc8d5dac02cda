//! Data models for dataset API records.
//!
//! Records carry no fixed schema; field sets may differ between records.

mod record;

pub use record::{ORGANIZATION_NAME, Page, Record, STATE};
