//! Data layer: ingestion, normalization, classification, filtering, analytics.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  decode file → Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐     ┌──────────┐
//!   │ normalize  │ ──▶ │  region   │  country → region fallback
//!   └───────────┘     └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ HubDataset  │  Vec<HubRow>, search keys, facets
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply criteria → filtered indices
//!   └──────────┘
//!        │
//!        ├──────────────▶ ┌───────────┐
//!        │                │ analytics  │  counts, rankings, distributions
//!        │                └───────────┘
//!        ▼
//!   ┌──────────┐
//!   │  export   │  filtered rows → delimited text
//!   └──────────┘
//! ```

pub mod analytics;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod region;

#[cfg(test)]
pub(crate) mod fixtures;
