use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawRecord – one decoded source row
// ---------------------------------------------------------------------------

/// A source row exactly as decoded: column name → cell text.
/// Null cells are absent keys.
pub type RawRecord = BTreeMap<String, String>;

/// Columns the normalizer understands, in source order.
pub const RECOGNIZED_COLUMNS: [&str; 13] = [
    "hub_name",
    "hub_type",
    "operational_status",
    "street_address",
    "city",
    "country",
    "region",
    "website",
    "email",
    "phone",
    "source",
    "latitude",
    "longitude",
];

// ---------------------------------------------------------------------------
// HubRow – one normalized hub
// ---------------------------------------------------------------------------

/// Stable row identifier, dense from 0 in ingestion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finite latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Pair two optional coordinates; both must be present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Self {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }
}

/// A normalized, immutable hub record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubRow {
    pub id: RowId,
    pub hub_name: String,
    pub hub_type: String,
    pub operational_status: String,
    pub street_address: String,
    pub city: String,
    pub country: String,
    pub region: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    /// Present only when both coordinates parsed to finite numbers.
    pub coordinates: Option<GeoPoint>,
}

impl HubRow {
    /// Whether the row can be placed on a map.
    pub fn is_geocoded(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|p| p.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|p| p.longitude)
    }

    /// Text value of a recognized column; absent coordinates are empty.
    pub fn field(&self, column: &str) -> Option<Cow<'_, str>> {
        let text = match column {
            "hub_name" => &self.hub_name,
            "hub_type" => &self.hub_type,
            "operational_status" => &self.operational_status,
            "street_address" => &self.street_address,
            "city" => &self.city,
            "country" => &self.country,
            "region" => &self.region,
            "website" => &self.website,
            "email" => &self.email,
            "phone" => &self.phone,
            "source" => &self.source,
            "latitude" => return Some(format_coordinate(self.latitude())),
            "longitude" => return Some(format_coordinate(self.longitude())),
            _ => return None,
        };
        Some(Cow::Borrowed(text.as_str()))
    }

    /// Lowercased `"name city country type"`, the free-text search key.
    pub fn search_key(&self) -> String {
        format!(
            "{} {} {} {}",
            self.hub_name, self.city, self.country, self.hub_type
        )
        .to_lowercase()
    }
}

fn format_coordinate(value: Option<f64>) -> Cow<'static, str> {
    match value {
        Some(v) => Cow::Owned(v.to_string()),
        None => Cow::Borrowed(""),
    }
}

// ---------------------------------------------------------------------------
// HubDataset – the canonical row collection
// ---------------------------------------------------------------------------

/// Distinct non-empty values offered as filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub countries: Vec<String>,
    pub regions: Vec<String>,
    pub hub_types: Vec<String>,
}

/// The loaded dataset with pre-computed search keys and facet lists.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct HubDataset {
    rows: Vec<HubRow>,
    search_keys: Vec<String>,
    facets: Facets,
}

impl HubDataset {
    /// Build indices from normalized rows.
    pub fn from_rows(rows: Vec<HubRow>) -> Self {
        let mut countries = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut hub_types = BTreeSet::new();
        let mut search_keys = Vec::with_capacity(rows.len());

        for row in &rows {
            for (set, value) in [
                (&mut countries, &row.country),
                (&mut regions, &row.region),
                (&mut hub_types, &row.hub_type),
            ] {
                if !value.is_empty() {
                    set.insert(value.as_str());
                }
            }
            search_keys.push(row.search_key());
        }

        let facets = Facets {
            countries: sorted_choices(countries),
            regions: sorted_choices(regions),
            hub_types: sorted_choices(hub_types),
        };
        HubDataset {
            rows,
            search_keys,
            facets,
        }
    }

    pub fn rows(&self) -> &[HubRow] {
        &self.rows
    }

    /// Lowercased search key for the row at `index`.
    pub(crate) fn search_key(&self, index: usize) -> &str {
        &self.search_keys[index]
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Number of hubs.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with usable coordinates.
    pub fn geocoded_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_geocoded()).count()
    }
}

/// Case-insensitive ordering with a byte-order tiebreak so the result is total.
fn sorted_choices(values: BTreeSet<&str>) -> Vec<String> {
    let mut out: Vec<String> = values.into_iter().map(str::to_string).collect();
    out.sort_by(|a, b| match a.to_lowercase().cmp(&b.to_lowercase()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    });
    out
}
