//! Error types for loading, configuration, and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::region::Region;

/// Fatal failures while ingesting a dataset.
///
/// A load error is reported once and nothing is retried. A session that
/// already holds a dataset keeps it; a fresh session stays unloaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file extension does not map to a supported reader.
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    /// Failed to open or read the source file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text is structurally malformed.
    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON document could not be parsed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON document parsed but is not a records-oriented array.
    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    /// A JSON record is not an object.
    #[error("record {index} is not a JSON object")]
    RecordNotObject { index: usize },

    /// The Parquet container could not be read.
    #[error("failed to read parquet data: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An Arrow record batch could not be decoded.
    #[error("failed to decode arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Invalid region classification tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionTableError {
    /// A country name appears in more than one curated set.
    #[error("country '{country}' is listed under both {first} and {second}")]
    OverlappingCountry {
        country: String,
        first: Region,
        second: Region,
    },

    /// A curated set or heuristic rule targets the Unknown sentinel.
    #[error("'{entry}' cannot be assigned to the Unknown region")]
    UnknownTarget { entry: String },

    /// A heuristic rule has an empty needle, which would match everything.
    #[error("heuristic rule for {region} has an empty pattern")]
    EmptyHeuristic { region: Region },
}

/// Failures loading a pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures writing an exported subset.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write delimited output: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush delimited output: {0}")]
    Flush(#[from] std::io::Error),
}
