use std::path::Path;

use log::{error, info};

use crate::config::PipelineConfig;
use crate::data::analytics::{percent, summarize, AnalyticsSnapshot};
use crate::data::export::export_to_path;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::load_file;
use crate::data::model::{HubDataset, HubRow, RawRecord};
use crate::data::normalize::normalize_records;
use crate::error::{ExportError, LoadError};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one exploration session holds, independent of rendering.
///
/// The caller owns the session and hands it (or pieces of it) to each
/// stage; nothing in the pipeline keeps state of its own.
pub struct Session {
    pub config: PipelineConfig,

    /// Loaded dataset (None until a file is ingested).
    dataset: Option<HubDataset>,

    /// Active filter selections.
    criteria: FilterCriteria,

    /// Indices of rows passing the current criteria (cached).
    visible_indices: Vec<usize>,
}

impl Session {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            dataset: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
        }
    }

    /// Decode and normalize a file, replacing any loaded dataset.
    ///
    /// On failure the error is logged once and returned; any previously
    /// loaded dataset and its criteria stay in place.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(records) => {
                self.ingest(&records);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Normalize already-decoded records into the session's dataset.
    pub fn ingest(&mut self, records: &[RawRecord]) {
        let rows = normalize_records(records, &self.config.normalize, &self.config.regions);
        self.set_dataset(HubDataset::from_rows(rows));
    }

    /// Install a dataset and reset the view to show every row.
    pub fn set_dataset(&mut self, dataset: HubDataset) {
        info!(
            "Loaded {} hubs, {} geocoded",
            dataset.len(),
            dataset.geocoded_count()
        );
        self.criteria = FilterCriteria::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&HubDataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria; rescans only when they actually changed.
    /// Returns whether the visible subset was recomputed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        self.refilter();
        true
    }

    /// Clear every criterion.
    pub fn reset_filters(&mut self) -> bool {
        self.set_criteria(FilterCriteria::default())
    }

    /// Recompute `visible_indices` after a criteria change.
    fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.criteria);
        }
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    /// Rows passing the current criteria, in dataset order.
    pub fn visible_rows(&self) -> Vec<&HubRow> {
        match &self.dataset {
            Some(ds) => {
                let rows = ds.rows();
                self.visible_indices.iter().map(|&i| &rows[i]).collect()
            }
            None => Vec::new(),
        }
    }

    /// Analytics over the visible rows, computed on demand.
    pub fn snapshot(&self) -> Option<AnalyticsSnapshot> {
        let ds = self.dataset.as_ref()?;
        let rows = ds.rows();
        Some(summarize(
            self.visible_indices.iter().map(|&i| &rows[i]),
            self.config.top_countries,
        ))
    }

    /// One-line status: visible count against the whole dataset's coverage.
    pub fn status_line(&self) -> String {
        match &self.dataset {
            Some(ds) => {
                let total = ds.len();
                let geocoded = ds.geocoded_count();
                format!(
                    "Showing {} of {} hubs · Geocoded: {} ({}%)",
                    self.visible_indices.len(),
                    total,
                    geocoded,
                    percent(geocoded, total)
                )
            }
            None => "No dataset loaded.".to_string(),
        }
    }

    /// Write the visible rows to `path`. Returns the number of rows written.
    pub fn export_visible(&self, path: &Path) -> Result<usize, ExportError> {
        export_to_path(path, self.visible_rows())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
