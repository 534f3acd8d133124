//! Pipeline configuration, read from a JSON file.

use std::path::Path;

use serde::Deserialize;

use crate::data::analytics::DEFAULT_TOP_COUNTRIES;
use crate::data::normalize::NormalizeOptions;
use crate::data::region::RegionTable;
use crate::error::ConfigError;

/// Settings for one session's pipeline.
///
/// ```json
/// {
///   "excluded_countries": ["France"],
///   "top_countries": 10,
///   "regions": {
///     "sets": [{ "region": "Eastern Africa", "countries": ["Socotra"] }],
///     "heuristics": [{ "pattern": "zanzibar", "region": "Eastern Africa" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(flatten)]
    pub normalize: NormalizeOptions,
    /// Length of the country ranking in analytics snapshots.
    pub top_countries: usize,
    pub regions: RegionTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            top_countries: DEFAULT_TOP_COUNTRIES,
            regions: RegionTable::builtin(),
        }
    }
}

impl PipelineConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::region::Region;

    #[test]
    fn empty_object_yields_defaults() {
        let config: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert!(config.normalize.excluded_countries.is_empty());
        assert_eq!(config.top_countries, 10);
        assert_eq!(config.regions.classify("Kenya"), Region::EasternAfrica);
    }

    #[test]
    fn reads_exclusions_and_region_extensions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "excluded_countries": ["France"],
                "top_countries": 5,
                "regions": {{ "sets": [{{ "region": "Eastern Africa", "countries": ["Socotra"] }}] }}
            }}"#
        )
        .unwrap();

        let config = PipelineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.normalize.excluded_countries, vec!["France"]);
        assert_eq!(config.top_countries, 5);
        assert_eq!(config.regions.classify("Socotra"), Region::EasternAfrica);
        assert_eq!(config.regions.classify("Ghana"), Region::WesternAfrica);
    }

    #[test]
    fn overlapping_region_sets_fail_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "regions": {{ "sets": [{{ "region": "Southern Africa", "countries": ["Kenya"] }}] }} }}"#
        )
        .unwrap();
        let err = PipelineConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("kenya"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
