//! Filtering and analytics pipeline for technology hub datasets.
//!
//! Raw tabular records are normalized into an immutable [`HubDataset`],
//! narrowed by [`FilterCriteria`], and summarized into
//! [`AnalyticsSnapshot`]s for whichever views render them.

pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::PipelineConfig;
pub use data::analytics::{summarize, AnalyticsSnapshot, CategoryCount};
pub use data::filter::{filter_rows, filtered_indices, FilterCriteria};
pub use data::model::{Facets, GeoPoint, HubDataset, HubRow, RawRecord, RowId};
pub use data::normalize::{normalize_records, NormalizeOptions};
pub use data::region::{Region, RegionTable};
pub use error::{ConfigError, ExportError, LoadError, RegionTableError};
pub use state::Session;
