pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{scopus::ScopusClient, storage::LocalStorage};
pub use config::{OutputFormat, ReportConfig};
pub use crate::core::{etl::ReportEngine, pipeline::ScopusPipeline};
pub use domain::model::{PublicationRow, ReportTable, RunSummary};
pub use utils::error::{ReportError, Result};
