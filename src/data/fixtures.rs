//! Row builders shared by unit tests.

use super::model::{GeoPoint, HubRow, RowId};

pub(crate) fn row(id: usize, name: &str, country: &str, hub_type: &str) -> HubRow {
    HubRow {
        id: RowId(id),
        hub_name: name.to_string(),
        hub_type: hub_type.to_string(),
        operational_status: String::new(),
        street_address: String::new(),
        city: String::new(),
        country: country.to_string(),
        region: String::new(),
        website: String::new(),
        email: String::new(),
        phone: String::new(),
        source: String::new(),
        coordinates: None,
    }
}

pub(crate) fn located(mut row: HubRow, latitude: f64, longitude: f64) -> HubRow {
    row.coordinates = GeoPoint::from_parts(Some(latitude), Some(longitude));
    row
}
