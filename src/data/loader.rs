use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::DataError;
use super::model::{Dataset, FundingRecord};

/// Cell contents treated as missing, matching the usual tabular NA markers.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%d/%m/%Y %H:%M"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a funding dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming date, startup, investors, vertical, city,
///                round and amount (any order, any case)
/// * `.json`    – `[{ "date": "...", "startup": "...", "amount": 12.5, ... }, ...]`
/// * `.parquet` – one column per field; any Arrow type that prints as text
pub fn load_file(path: &Path) -> Result<Dataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path)?)?,
        "json" => load_json(&std::fs::read_to_string(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} funding records from {} ({} dropped)",
        dataset.len(),
        path.display(),
        dataset.rows_dropped()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw rows and cleaning
// ---------------------------------------------------------------------------

/// Text cells of one source row, before any parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub date: Option<String>,
    pub startup: Option<String>,
    pub investors: Option<String>,
    pub vertical: Option<String>,
    pub city: Option<String>,
    pub round: Option<String>,
    pub amount: Option<String>,
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    startup: usize,
    investors: usize,
    vertical: usize,
    city: usize,
    round: usize,
    amount: usize,
}

impl ColumnIndex {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, DataError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name))
                .ok_or(DataError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            date: find("date")?,
            startup: find("startup")?,
            investors: find("investors")?,
            vertical: find("vertical")?,
            city: find("city")?,
            round: find("round")?,
            amount: find("amount")?,
        })
    }

    fn extract(&self, mut cell: impl FnMut(usize) -> Option<String>) -> RawRow {
        RawRow {
            date: cell(self.date),
            startup: cell(self.startup),
            investors: cell(self.investors),
            vertical: cell(self.vertical),
            city: cell(self.city),
            round: cell(self.round),
            amount: cell(self.amount),
        }
    }
}

fn normalize(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !MISSING_MARKERS.contains(&s.as_str()))
}

/// Parse a calendar date; `None` when no known format matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse an amount; `None` when the text is not a number or parses to NaN.
/// Negative and infinite values are kept as parsed.
pub fn parse_amount(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Turn a raw row into a record, or `None` if the amount is unusable.
pub fn clean_row(raw: RawRow) -> Option<FundingRecord> {
    let amount = normalize(raw.amount).as_deref().and_then(parse_amount)?;
    let date = normalize(raw.date).as_deref().and_then(parse_date);

    Some(FundingRecord {
        startup: normalize(raw.startup),
        investors: normalize(raw.investors),
        vertical: normalize(raw.vertical),
        city: normalize(raw.city),
        round: normalize(raw.round),
        ..FundingRecord::new(date, amount)
    })
}

/// Clean every raw row and index the survivors.
pub fn build_dataset(rows: Vec<RawRow>) -> Dataset {
    let rows_read = rows.len();
    let mut records = Vec::with_capacity(rows_read);

    for (row_no, raw) in rows.into_iter().enumerate() {
        let amount_text = raw.amount.clone();
        match clean_row(raw) {
            Some(rec) => records.push(rec),
            None => log::debug!("row {row_no}: dropping record, unusable amount {amount_text:?}"),
        }
    }

    let dropped = rows_read - records.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {rows_read} rows without a usable amount");
    }
    Dataset::from_records(records, rows_read)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV with a header row. Short rows are tolerated; missing cells are null.
pub fn load_csv<R: Read>(input: R) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(index.extract(|i| record.get(i).map(str::to_string)));
    }

    Ok(build_dataset(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: an array of objects keyed by column name.
/// The first object must carry every column; later objects may omit some.
/// An empty array has no columns at all and is rejected like any other
/// source missing them.
pub fn load_json(text: &str) -> Result<Dataset, DataError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(DataError::NotAnArray)?;

    let keys: Vec<&str> = match records.first() {
        Some(first) => first
            .as_object()
            .ok_or(DataError::NotAnObject(0))?
            .keys()
            .map(String::as_str)
            .collect(),
        None => Vec::new(),
    };
    ColumnIndex::resolve(&keys)?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or(DataError::NotAnObject(i))?;
        rows.push(RawRow {
            date: json_cell(obj, "date"),
            startup: json_cell(obj, "startup"),
            investors: json_cell(obj, "investors"),
            vertical: json_cell(obj, "vertical"),
            city: json_cell(obj, "city"),
            round: json_cell(obj, "round"),
            amount: json_cell(obj, "amount"),
        });
    }

    Ok(build_dataset(rows))
}

fn json_cell(obj: &Map<String, JsonValue>, column: &str) -> Option<String> {
    let value = obj
        .iter()
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(column))
        .map(|(_, v)| v)?;
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Each cell is rendered to text and cleaned like CSV,
/// so `Date32`, timestamps, integers and floats all work for their columns.
pub fn load_parquet(path: &Path) -> Result<Dataset, DataError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // Checked against the file schema so that zero-row files are validated too.
    let index = {
        let names: Vec<&str> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        ColumnIndex::resolve(&names)?
    };
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let mut failure = None;
            let raw = index.extract(|col| {
                let array = batch.column(col);
                if array.is_null(row) {
                    return None;
                }
                match array_value_to_string(array, row) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        failure = Some(e);
                        None
                    }
                }
            });
            if let Some(e) = failure {
                return Err(e.into());
            }
            rows.push(raw);
        }
    }

    Ok(build_dataset(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "date,startup,investors,vertical,city,round,amount\n";

    fn csv(body: &str) -> Dataset {
        load_csv(format!("{HEADER}{body}").as_bytes()).unwrap()
    }

    #[test]
    fn keeps_only_rows_with_numeric_amount() {
        let ds = csv(concat!(
            "2019-03-01,Alpha,\"A, B\",Fintech,Mumbai,Seed,12.5\n",
            "2019-04-01,Beta,C,Edtech,Delhi,Seed,undisclosed\n",
            "2019-05-01,Gamma,,Edtech,Delhi,Seed,\n",
            "2019-06-01,Delta,D,Edtech,Delhi,Seed,-3\n",
            "2019-07-01,Eps,E,Edtech,Delhi,Seed,40\n",
        ));

        assert_eq!(ds.rows_read, 5);
        assert_eq!(ds.rows_dropped(), 2);
        let amounts: Vec<f64> = ds.records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![12.5, -3.0, 40.0]);
    }

    #[test]
    fn negative_and_infinite_amounts_are_retained_as_parsed() {
        let ds = csv(concat!(
            "2019-06-01,Delta,D,Edtech,Delhi,Seed,-3\n",
            "2019-06-02,Eps,E,Edtech,Delhi,Seed,inf\n",
            "2019-06-03,Zeta,F,Edtech,Delhi,Seed,5\n",
        ));

        assert_eq!(ds.rows_dropped(), 0);
        let amounts: Vec<f64> = ds.records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![-3.0, f64::INFINITY, 5.0]);
    }

    #[test]
    fn bad_date_is_nulled_but_row_kept() {
        let ds = csv("someday,Alpha,A,Fintech,Mumbai,Seed,7\n");
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.date, None);
        assert_eq!(rec.year, None);
        assert_eq!(rec.month, None);
        assert_eq!(rec.amount, 7.0);
    }

    #[test]
    fn missing_markers_become_none() {
        let ds = csv("2020-01-05,Alpha,NaN,,N/A,Seed,1\n");
        let rec = &ds.records[0];
        assert_eq!(rec.investors, None);
        assert_eq!(rec.vertical, None);
        assert_eq!(rec.city, None);
        assert_eq!(rec.round.as_deref(), Some("Seed"));
    }

    #[test]
    fn text_is_kept_verbatim() {
        let ds = csv("2020-01-05, Alpha ,A,Fintech,mumbai,Seed,1\n");
        let rec = &ds.records[0];
        assert_eq!(rec.startup.as_deref(), Some(" Alpha "));
        assert_eq!(rec.city.as_deref(), Some("mumbai"));
    }

    #[test]
    fn columns_may_be_reordered_and_differently_cased() {
        let text = concat!(
            "Amount,City,Round,Vertical,Investors,Startup,Date,extra\n",
            "3,Pune,Seed,AI,A,Alpha,01/02/2018,x\n",
        );
        let ds = load_csv(text.as_bytes()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.amount, 3.0);
        assert_eq!(rec.startup.as_deref(), Some("Alpha"));
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2018, 2, 1));
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = load_csv("date,startup,amount\n2019-01-01,A,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("investors")));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let text = "amount,date,startup,investors,vertical,city,round\n9,2019-01-01\n";
        let ds = load_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].startup, None);
    }

    #[test]
    fn parses_common_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 3, 14);
        for s in [
            "2019-03-14",
            "14/03/2019",
            "14-03-2019",
            "2019/03/14",
            "14.03.2019",
            "2019-03-14 10:30:00",
            "2019-03-14T10:30:00.000",
            "2019-03-14T10:30:00+05:30",
        ] {
            assert_eq!(parse_date(s), expected, "format {s}");
        }
        assert_eq!(parse_date("31/02/2019"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn amount_parsing_rejects_only_non_numbers() {
        assert_eq!(parse_amount(" 12.75 "), Some(12.75));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount("inf"), Some(f64::INFINITY));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("1,000"), None);
    }

    #[test]
    fn json_records_load_with_numeric_amounts() {
        let text = r#"[
            {"date": "2020-01-10", "startup": "Alpha", "investors": "A, B", "vertical": "AI",
             "city": "Pune", "round": "Seed", "amount": 4.5},
            {"date": null, "startup": "Beta", "amount": "n/a"},
            {"date": "bad", "startup": "Gamma", "amount": 2}
        ]"#;
        let ds = load_json(text).unwrap();
        assert_eq!(ds.rows_read, 3);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].amount, 4.5);
        assert_eq!(ds.records[1].startup.as_deref(), Some("Gamma"));
        assert_eq!(ds.records[1].date, None);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(load_json("{}"), Err(DataError::NotAnArray)));
        assert!(matches!(load_json("[]"), Err(DataError::MissingColumn("date"))));
        assert!(matches!(load_json("[1]"), Err(DataError::NotAnObject(0))));
        assert!(matches!(
            load_json(r#"[{"amount": 1}]"#),
            Err(DataError::MissingColumn(_))
        ));
        assert!(matches!(load_json("not json"), Err(DataError::Json(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("funding.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/funding.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn parquet_round_trip_through_arrow() {
        use std::sync::Arc;

        use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, true),
            Field::new("startup", DataType::Utf8, true),
            Field::new("investors", DataType::Utf8, true),
            Field::new("vertical", DataType::Utf8, true),
            Field::new("city", DataType::Utf8, true),
            Field::new("round", DataType::Utf8, true),
            Field::new("amount", DataType::Float64, true),
        ]));
        // 18000 days after the epoch is 2019-04-14.
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(vec![Some(18000), None])),
            Arc::new(StringArray::from(vec![Some("Alpha"), Some("Beta")])),
            Arc::new(StringArray::from(vec![Some("A, B"), None])),
            Arc::new(StringArray::from(vec![Some("AI"), Some("AI")])),
            Arc::new(StringArray::from(vec![Some("Pune"), None])),
            Arc::new(StringArray::from(vec![Some("Seed"), Some("Seed")])),
            Arc::new(Float64Array::from(vec![Some(3.0), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funding.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.rows_read, 2);
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2019, 4, 14));
        assert_eq!(rec.investors.as_deref(), Some("A, B"));
        assert_eq!(rec.amount, 3.0);
    }

    #[test]
    fn empty_parquet_with_wrong_schema_is_rejected() {
        use std::sync::Arc;

        use arrow::datatypes::{DataType, Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![Field::new("foo", DataType::Utf8, true)]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("date")));
    }
}
