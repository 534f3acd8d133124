use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawRecord, RECOGNIZED_COLUMNS};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode a hub dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`             – comma-delimited with a header row
/// * `.tsv` / `.tab`    – tab-delimited with a header row
/// * `.json`            – `[{ "hub_name": "...", "latitude": 5.6, ... }, ...]`
/// * `.parquet` / `.pq` – any flat schema; every column is read as text
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => read_delimited(open(path)?, b',')?,
        "tsv" | "tab" => read_delimited(open(path)?, b'\t')?,
        "json" => read_json(open(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    info!("Decoded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Delimiter conventionally used for a path's extension.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Read delimited text with a header row.
///
/// Headers are trimmed and blank lines skipped. A row whose field count
/// differs from the header is a structural error.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    warn_missing_columns(&headers);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect(),
        );
    }
    Ok(records)
}

fn warn_missing_columns(headers: &[String]) {
    for column in RECOGNIZED_COLUMNS {
        if column != "region" && !headers.iter().any(|h| h == column) {
            warn!("Column '{column}' not found; values will be empty");
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Read a records-oriented JSON array (the `df.to_json(orient='records')` shape).
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawRecord>, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let items = root.as_array().ok_or(LoadError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<RawRecord, LoadError> {
            let obj = item
                .as_object()
                .ok_or(LoadError::RecordNotObject { index })?;
            Ok(obj
                .iter()
                .filter_map(|(key, val)| json_to_text(val).map(|text| (key.clone(), text)))
                .collect())
        })
        .collect()
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, reading every column of every row as text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();

        for row in 0..batch.num_rows() {
            let mut record = RawRecord::new();
            for (col_idx, name) in names.iter().enumerate() {
                if let Some(text) = cell_to_text(batch.column(col_idx), row)? {
                    record.insert((*name).to_string(), text);
                }
            }
            records.push(record);
        }
    }
    Ok(records)
}

/// Render one Arrow cell as text; nulls are absent.
fn cell_to_text(col: &ArrayRef, row: usize) -> Result<Option<String>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Boolean => col.as_boolean().value(row).to_string(),
        DataType::Int8 => col.as_primitive::<Int8Type>().value(row).to_string(),
        DataType::Int16 => col.as_primitive::<Int16Type>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::UInt8 => col.as_primitive::<UInt8Type>().value(row).to_string(),
        DataType::UInt16 => col.as_primitive::<UInt16Type>().value(row).to_string(),
        DataType::UInt32 => col.as_primitive::<UInt32Type>().value(row).to_string(),
        DataType::UInt64 => col.as_primitive::<UInt64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        _ => array_value_to_string(col, row)?,
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    #[test]
    fn delimited_headers_trimmed_and_blank_lines_skipped() {
        let text = " hub_name , country \niHub,Kenya\n\nMEST,Ghana\n";
        let records = read_delimited(text.as_bytes(), b',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["hub_name"], "iHub");
        assert_eq!(records[1]["country"], "Ghana");
    }

    #[test]
    fn delimited_handles_quotes_and_tabs() {
        let text = "hub_name\tcity\n\"Hub, \"\"One\"\"\"\tLagos\n";
        let records = read_delimited(text.as_bytes(), b'\t').unwrap();
        assert_eq!(records[0]["hub_name"], "Hub, \"One\"");
        assert_eq!(records[0]["city"], "Lagos");
    }

    #[test]
    fn header_only_input_is_an_empty_dataset() {
        let records = read_delimited("hub_name,country\n".as_bytes(), b',').unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn ragged_rows_are_structural_errors() {
        let text = "hub_name,country\niHub,Kenya,extra\n";
        let err = read_delimited(text.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn json_nulls_are_absent_and_numbers_stringified() {
        let text = r#"[{"hub_name": "iHub", "email": null, "latitude": -1.29, "active": true}]"#;
        let records = read_json(text.as_bytes()).unwrap();
        assert_eq!(records[0]["hub_name"], "iHub");
        assert!(!records[0].contains_key("email"));
        assert_eq!(records[0]["latitude"], "-1.29");
        assert_eq!(records[0]["active"], "true");
    }

    #[test]
    fn json_shape_errors() {
        assert!(matches!(read_json("{}".as_bytes()), Err(LoadError::NotAnArray)));
        assert!(matches!(
            read_json("[{}, 3]".as_bytes()),
            Err(LoadError::RecordNotObject { index: 1 })
        ));
        assert!(matches!(read_json("[".as_bytes()), Err(LoadError::Json(_))));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubs.TSV");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "hub_name\tcountry").unwrap();
        writeln!(file, "iHub\tKenya").unwrap();
        drop(file);

        let records = load_file(&path).unwrap();
        assert_eq!(records[0]["country"], "Kenya");
        assert_eq!(delimiter_for(&path), b'\t');
    }

    #[test]
    fn load_file_rejects_unknown_extension_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("hubs.xlsx")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnsupportedFormat { ref extension } if extension == "xlsx"
        ));

        let err = load_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn parquet_columns_read_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubs.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("hub_name", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["iHub", "MEST"])),
                Arc::new(Float64Array::from(vec![Some(-1.29), None])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["hub_name"], "iHub");
        assert_eq!(records[0]["latitude"], "-1.29");
        assert!(!records[1].contains_key("latitude"));
    }
}
