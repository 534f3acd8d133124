use serde::{Deserialize, Serialize};

use super::model::{HubDataset, HubRow};

// ---------------------------------------------------------------------------
// Filter predicate: the active selections
// ---------------------------------------------------------------------------

/// The current selection. A `None` (or blank) criterion places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Exact country, compared case-sensitively.
    pub country: Option<String>,
    /// Exact region label, compared case-sensitively.
    pub region: Option<String>,
    /// Exact hub type, compared case-sensitively.
    pub hub_type: Option<String>,
    /// Case-insensitive substring over name, city, country and type.
    pub query: Option<String>,
}

impl FilterCriteria {
    /// Whether no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        active(&self.country).is_none()
            && active(&self.region).is_none()
            && active(&self.hub_type).is_none()
            && active(&self.query).is_none()
    }

    /// Evaluate the criteria against a single row.
    pub fn matches(&self, row: &HubRow) -> bool {
        self.prepare().matches(row, || row.search_key())
    }

    fn prepare(&self) -> Prepared<'_> {
        Prepared {
            country: active(&self.country),
            region: active(&self.region),
            hub_type: active(&self.hub_type),
            query: active(&self.query).map(str::to_lowercase),
        }
    }
}

/// Trimmed value of a criterion, or `None` when it is blank.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Criteria with blanks removed and the query lowercased once per scan.
struct Prepared<'a> {
    country: Option<&'a str>,
    region: Option<&'a str>,
    hub_type: Option<&'a str>,
    query: Option<String>,
}

impl Prepared<'_> {
    fn matches<K: AsRef<str>>(&self, row: &HubRow, search_key: impl FnOnce() -> K) -> bool {
        if self.country.is_some_and(|c| row.country != c) {
            return false;
        }
        if self.region.is_some_and(|r| row.region != r) {
            return false;
        }
        if self.hub_type.is_some_and(|t| row.hub_type != t) {
            return false;
        }
        match &self.query {
            Some(q) => search_key().as_ref().contains(q.as_str()),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// Return indices of rows that pass every active criterion, in dataset order.
pub fn filtered_indices(dataset: &HubDataset, criteria: &FilterCriteria) -> Vec<usize> {
    let prepared = criteria.prepare();
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(i, row)| prepared.matches(row, || dataset.search_key(*i)))
        .map(|(i, _)| i)
        .collect()
}

/// Return the rows that pass every active criterion, in dataset order.
pub fn filter_rows<'a>(dataset: &'a HubDataset, criteria: &FilterCriteria) -> Vec<&'a HubRow> {
    let rows = dataset.rows();
    filtered_indices(dataset, criteria)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::row;

    fn dataset() -> HubDataset {
        let mut nairobi = row(0, "iHub", "Kenya", "Incubator");
        nairobi.city = "Nairobi".to_string();
        nairobi.region = "Eastern Africa".to_string();
        let mut accra = row(1, "MEST", "Ghana", "Accelerator");
        accra.city = "Accra".to_string();
        accra.region = "Western Africa".to_string();
        let mut lab = row(2, "Nairobi Garage", "Kenya", "Coworking");
        lab.city = "Mombasa".to_string();
        lab.region = "Eastern Africa".to_string();
        let mut other = row(3, "Kumasi Hive", "Ghana", "Incubator");
        other.city = "Kumasi".to_string();
        other.region = "Western Africa".to_string();
        HubDataset::from_rows(vec![nairobi, accra, lab, other])
    }

    fn criteria(
        country: Option<&str>,
        region: Option<&str>,
        hub_type: Option<&str>,
        query: Option<&str>,
    ) -> FilterCriteria {
        FilterCriteria {
            country: country.map(String::from),
            region: region.map(String::from),
            hub_type: hub_type.map(String::from),
            query: query.map(String::from),
        }
    }

    fn query(text: &str) -> FilterCriteria {
        criteria(None, None, None, Some(text))
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let ds = dataset();
        assert!(FilterCriteria::default().is_empty());
        assert_eq!(filtered_indices(&ds, &FilterCriteria::default()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn blank_criteria_are_ignored() {
        let ds = dataset();
        let c = criteria(Some(""), Some("  "), None, Some(" "));
        assert!(c.is_empty());
        assert_eq!(filtered_indices(&ds, &c), vec![0, 1, 2, 3]);
    }

    #[test]
    fn exact_criteria_are_case_sensitive() {
        let ds = dataset();
        let kenya = criteria(Some("Kenya"), None, None, None);
        assert_eq!(filtered_indices(&ds, &kenya), vec![0, 2]);
        let lower = criteria(Some("kenya"), None, None, None);
        assert!(filtered_indices(&ds, &lower).is_empty());
        assert_eq!(
            filtered_indices(&ds, &criteria(None, Some("Western Africa"), None, None)),
            vec![1, 3]
        );
    }

    #[test]
    fn criteria_combine_with_and() {
        let ds = dataset();
        let c = criteria(Some("Ghana"), None, Some("Incubator"), None);
        assert_eq!(filtered_indices(&ds, &c), vec![3]);
        let none = criteria(Some("Ghana"), Some("Eastern Africa"), None, None);
        assert!(filtered_indices(&ds, &none).is_empty());
    }

    #[test]
    fn query_matches_name_or_city_ignoring_case() {
        let ds = dataset();
        let rows = filter_rows(&ds, &query("nairobi"));
        let names: Vec<&str> = rows.iter().map(|r| r.hub_name.as_str()).collect();
        assert_eq!(names, vec!["iHub", "Nairobi Garage"]);

        assert_eq!(filtered_indices(&ds, &query("INCUB")), vec![0, 3]);
        assert_eq!(filtered_indices(&ds, &query("ghana")), vec![1, 3]);
    }

    #[test]
    fn query_spans_joined_fields() {
        let ds = dataset();
        assert_eq!(filtered_indices(&ds, &query("accra ghana")), vec![1]);
    }

    #[test]
    fn query_does_not_search_region() {
        let ds = dataset();
        assert!(filtered_indices(&ds, &query("eastern")).is_empty());
    }

    #[test]
    fn single_row_match_agrees_with_scan() {
        let ds = dataset();
        let c = criteria(Some("Kenya"), None, None, Some("garage"));
        let scanned = filtered_indices(&ds, &c);
        let single: Vec<usize> = ds
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| c.matches(r))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(scanned, single);
        assert_eq!(scanned, vec![2]);
    }

    #[test]
    fn empty_dataset_yields_empty_result() {
        let ds = HubDataset::from_rows(Vec::new());
        assert!(filtered_indices(&ds, &query("x")).is_empty());
    }
}
