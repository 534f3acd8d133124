use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Deterministic SplitMix64 stream so repeated runs emit identical files.
struct SampleRng(u64);

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[0, n)`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }

    /// Offset in `[-spread / 2, spread / 2)` for scattering markers around a city.
    fn jitter(&mut self, spread: f64) -> f64 {
        (self.unit() - 0.5) * spread
    }
}

/// (country as written in the source, city, latitude, longitude, region)
const CITIES: &[(&str, &str, f64, f64, &str)] = &[
    ("Kenya", "Nairobi", -1.2921, 36.8219, "Eastern Africa"),
    ("Kenya", "Mombasa", -4.0435, 39.6682, "Eastern Africa"),
    ("Nigeria", "Lagos", 6.5244, 3.3792, "Western Africa"),
    ("Federal Republic of Nigeria", "Abuja", 9.0765, 7.3986, "Western Africa"),
    ("Ghana", "Accra", 5.6037, -0.1870, "Western Africa"),
    ("Côte d’Ivoire", "Abidjan", 5.3600, -4.0083, "Western Africa"),
    ("Egypt", "Cairo", 30.0444, 31.2357, "Northern Africa"),
    ("Maroc", "Casablanca", 33.5731, -7.5898, "Northern Africa"),
    ("South Africa", "Cape Town", -33.9249, 18.4241, "Southern Africa"),
    ("South Africa", "Johannesburg", -26.2041, 28.0473, "Southern Africa"),
    ("Rwanda", "Kigali", -1.9441, 30.0619, "Eastern Africa"),
    ("United Republic of Tanzania", "Dar es Salaam", -6.7924, 39.2083, "Eastern Africa"),
    ("DR Congo", "Kinshasa", -4.4419, 15.2663, "Central Africa"),
    ("Cameroon", "Douala", 4.0511, 9.7679, "Central Africa"),
    ("Senegal", "Dakar", 14.7167, -17.4677, "Western Africa"),
    ("Ethiopia", "Addis Ababa", 9.0300, 38.7400, "Eastern Africa"),
    ("Zambia", "Lusaka", -15.3875, 28.3228, "Eastern Africa"),
    ("Tunisia", "Tunis", 36.8065, 10.1815, "Northern Africa"),
];

const HUB_TYPES: &[&str] = &[
    "Incubator",
    "Accelerator",
    "Coworking Space",
    "Innovation Lab",
    "Maker Space",
    "",
];

const STATUSES: &[&str] = &["Active", "Active", "Active", "Inactive", "Unknown"];

const NAME_PREFIXES: &[&str] = &[
    "Savannah", "Baobab", "Kijiji", "Sahel", "Delta", "Summit", "Harbor",
];
const NAME_SUFFIXES: &[&str] = &["Hub", "Labs", "Works", "Ventures", "Foundry", "Space"];

/// Column-oriented sample data, one `Vec` per output column.
#[derive(Default)]
struct Columns {
    hub_name: Vec<String>,
    hub_type: Vec<String>,
    operational_status: Vec<String>,
    street_address: Vec<String>,
    city: Vec<String>,
    country: Vec<String>,
    region: Vec<String>,
    website: Vec<String>,
    email: Vec<String>,
    phone: Vec<String>,
    source: Vec<String>,
    latitude: Vec<Option<f64>>,
    longitude: Vec<Option<f64>>,
}

impl Columns {
    fn text_columns(&self) -> [(&'static str, &Vec<String>); 11] {
        [
            ("hub_name", &self.hub_name),
            ("hub_type", &self.hub_type),
            ("operational_status", &self.operational_status),
            ("street_address", &self.street_address),
            ("city", &self.city),
            ("country", &self.country),
            ("region", &self.region),
            ("website", &self.website),
            ("email", &self.email),
            ("phone", &self.phone),
            ("source", &self.source),
        ]
    }
}

fn generate(rng: &mut SampleRng, count: usize) -> Columns {
    let mut cols = Columns::default();
    for i in 0..count {
        let &(country, city, lat, lng, region) = rng.pick(CITIES);
        let name = format!("{} {} {}", rng.pick(NAME_PREFIXES), rng.pick(NAME_SUFFIXES), i + 1);
        let slug = name.to_lowercase().replace(' ', "-");

        cols.hub_name.push(name);
        cols.hub_type.push(rng.pick(HUB_TYPES).to_string());
        cols.operational_status.push(rng.pick(STATUSES).to_string());
        cols.street_address
            .push(format!("{} Innovation Road, {city}", 1 + rng.below(200)));
        cols.city.push(city.to_string());
        cols.country.push(country.to_string());
        // Most rows leave region blank so the classifier fills it in.
        cols.region.push(if rng.chance(0.2) {
            region.to_string()
        } else {
            String::new()
        });
        cols.website.push(if rng.chance(0.7) {
            format!("https://{slug}.example.org")
        } else {
            String::new()
        });
        cols.email.push(if rng.chance(0.5) {
            format!("hello@{slug}.example.org")
        } else {
            String::new()
        });
        cols.phone.push(format!("+000 {:07}", rng.below(10_000_000)));
        cols.source.push("https://example.org/hub-directory".to_string());

        if rng.chance(0.85) {
            cols.latitude.push(Some(lat + rng.jitter(0.1)));
            cols.longitude.push(Some(lng + rng.jitter(0.1)));
        } else {
            cols.latitude.push(None);
            cols.longitude.push(None);
        }
    }
    cols
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for (name, values) in cols.text_columns() {
        fields.push(Field::new(name, DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from_iter_values(values)));
    }
    for (name, values) in [("latitude", &cols.latitude), ("longitude", &cols.longitude)] {
        fields.push(Field::new(name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let text = cols.text_columns();

    let mut header: Vec<&str> = text.iter().map(|(name, _)| *name).collect();
    header.extend(["latitude", "longitude"]);
    writer.write_record(&header)?;

    for row in 0..cols.hub_name.len() {
        let mut record: Vec<String> = text.iter().map(|(_, values)| values[row].clone()).collect();
        for coord in [cols.latitude[row], cols.longitude[row]] {
            record.push(coord.map(|v| format!("{v:.4}")).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SampleRng::new(42);
    let cols = generate(&mut rng, 240);

    write_parquet(&cols, "sample_hubs.parquet")?;
    write_csv(&cols, "sample_hubs.csv")?;

    println!(
        "Wrote {} hubs to sample_hubs.parquet and sample_hubs.csv",
        cols.hub_name.len()
    );
    Ok(())
}
