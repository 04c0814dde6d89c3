use thiserror::Error;

/// Fatal problems with a data source. Row-level problems (a bad date, a bad
/// amount) never surface here: the loader nulls or drops those rows instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("record {0} is not a JSON object")]
    NotAnObject(usize),
}
