use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::error::DataError;
use super::model::FundingRecord;

/// Default file name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_funding_data.csv";

/// Flat CSV row: the source columns followed by the derived `year`/`month`.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: Option<String>,
    startup: Option<&'a str>,
    investors: Option<&'a str>,
    vertical: Option<&'a str>,
    city: Option<&'a str>,
    round: Option<&'a str>,
    amount: f64,
    year: Option<i32>,
    month: Option<u32>,
}

impl<'a> From<&'a FundingRecord> for ExportRow<'a> {
    fn from(rec: &'a FundingRecord) -> Self {
        ExportRow {
            date: rec.date.map(|d| d.format("%Y-%m-%d").to_string()),
            startup: rec.startup.as_deref(),
            investors: rec.investors.as_deref(),
            vertical: rec.vertical.as_deref(),
            city: rec.city.as_deref(),
            round: rec.round.as_deref(),
            amount: rec.amount,
            year: rec.year,
            month: rec.month,
        }
    }
}

/// Write records as CSV with a header row. Missing values are empty cells.
pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a FundingRecord>,
    output: W,
) -> Result<usize, DataError> {
    let mut writer = csv::Writer::from_writer(output);
    let mut written = 0;
    for rec in records {
        writer.serialize(ExportRow::from(rec))?;
        written += 1;
    }
    if written == 0 {
        // serde only emits the header alongside the first row.
        writer.write_record([
            "date", "startup", "investors", "vertical", "city", "round", "amount", "year", "month",
        ])?;
    }
    writer.flush()?;
    Ok(written)
}

/// Export to a file, replacing it if present. Returns the row count.
pub fn export_to_path(records: &[FundingRecord], path: &Path) -> Result<usize, DataError> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(records, std::io::BufWriter::new(file))?;
    log::info!("Exported {written} records to {}", path.display());
    Ok(written)
}
