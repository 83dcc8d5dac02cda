//! CMS Formulary Fetch
//!
//! Retrieves Monthly Prescription Drug Plan Formulary & Pharmacy Network
//! records from the CMS data API, filters them locally by organization and
//! state, and exports them as CSV or JSON.
//!
//! # Components
//!
//! - **client**: one GET per page against the dataset endpoint
//! - **filter**: case-insensitive organization substring / state equality
//! - **export**: CSV with a sorted-union header, or indented JSON
//! - **batch**: per-organization paging with a hard record cap
//!
//! # Example
//!
//! ```no_run
//! use formulary_fetch::{Config, FormularyClient, export, filter::filter_local};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FormularyClient::new(Config::from_env()?)?;
//!
//!     let page = client.fetch(Some(100), Some(0)).await?;
//!     let humana = filter_local(&page, Some("Humana"), Some("FL"));
//!     export::export(&humana, export::ExportFormat::Csv, None)?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;

pub use batch::{BatchConfig, BatchReport, run_batch};
pub use client::{FormularyClient, RecordSource};
pub use config::Config;
pub use error::{ClientError, ExportError};
pub use models::{Page, Record};
