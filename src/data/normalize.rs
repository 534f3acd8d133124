use log::{debug, info};
use serde::Deserialize;

use super::model::{GeoPoint, HubRow, RawRecord, RowId};
use super::region::RegionTable;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Dataset-specific cleanup applied while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Rows whose country equals one of these (ignoring case and padding)
    /// are dropped before identifiers are assigned.
    pub excluded_countries: Vec<String>,
}

impl NormalizeOptions {
    /// Blank entries never match, so they cannot drop rows with no country.
    fn is_excluded(&self, country: &str) -> bool {
        let country = country.to_lowercase();
        self.excluded_countries
            .iter()
            .map(|excluded| excluded.trim())
            .filter(|excluded| !excluded.is_empty())
            .any(|excluded| excluded.to_lowercase() == country)
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Convert decoded source rows into canonical hub rows.
///
/// Source order is kept and identifiers are dense from 0 over the rows
/// that survive exclusion. Text is trimmed, missing cells become empty, and
/// unparseable coordinates leave the row kept but not geocoded.
pub fn normalize_records<'a, I>(
    records: I,
    options: &NormalizeOptions,
    regions: &RegionTable,
) -> Vec<HubRow>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut rows = Vec::new();
    let mut excluded = 0usize;

    for (source_index, record) in records.into_iter().enumerate() {
        let country = text(record, "country");
        if options.is_excluded(&country) {
            excluded += 1;
            continue;
        }

        let latitude = parse_number(record.get("latitude").map(String::as_str));
        let longitude = parse_number(record.get("longitude").map(String::as_str));
        let coordinates = GeoPoint::from_parts(latitude, longitude);
        if coordinates.is_none() && (latitude.is_some() || longitude.is_some()) {
            debug!(
                "Source row {source_index}: only one coordinate usable, treating as not geocoded"
            );
        }

        let region = match text(record, "region") {
            r if r.is_empty() => regions.classify(&country).label().to_string(),
            r => r,
        };

        rows.push(HubRow {
            id: RowId(rows.len()),
            hub_name: text(record, "hub_name"),
            hub_type: text(record, "hub_type"),
            operational_status: text(record, "operational_status"),
            street_address: text(record, "street_address"),
            city: text(record, "city"),
            country,
            region,
            website: text(record, "website"),
            email: text(record, "email"),
            phone: text(record, "phone"),
            source: text(record, "source"),
            coordinates,
        });
    }

    info!("Normalized {} hubs ({excluded} excluded by country)", rows.len());
    rows
}

fn text(record: &RawRecord, column: &str) -> String {
    record
        .get(column)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Permissive numeric parse: surrounding whitespace is ignored; empty,
/// malformed, or non-finite input is absent rather than zero.
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
