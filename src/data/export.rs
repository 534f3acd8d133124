use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use super::loader::delimiter_for;
use super::model::{HubRow, RECOGNIZED_COLUMNS};
use crate::error::ExportError;

/// Export header: every canonical field except the identifier, alphabetically.
pub fn export_columns() -> Vec<&'static str> {
    let mut columns = RECOGNIZED_COLUMNS.to_vec();
    columns.sort_unstable();
    columns
}

/// Write `rows` as delimited text with a header row.
///
/// Fields containing the delimiter, a quote, or a line break are quoted and
/// embedded quotes doubled.
pub fn write_delimited<'a, W, I>(writer: W, rows: I, delimiter: u8) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a HubRow>,
{
    let columns = export_columns();
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    out.write_record(&columns)?;
    let mut written = 0;
    for row in rows {
        out.write_record(
            columns
                .iter()
                .map(|c| row.field(c).unwrap_or_default().into_owned()),
        )?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Export `rows` to `path`, choosing the delimiter from the extension.
pub fn export_to_path<'a, I>(path: &Path, rows: I) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a HubRow>,
{
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_delimited(file, rows, delimiter_for(path))?;
    info!("Exported {written} hubs to {}", path.display());
    Ok(written)
}
