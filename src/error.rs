use thiserror::Error;

/// Problems found while normalising raw word entries.
///
/// These never leave the ingestion boundary: the offending entry is dropped
/// (or its timer defaulted) and the error is kept in the report for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("entry {index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },
    #[error("entry {index} has an invalid timer duration {value:?}, using the default")]
    TimerConfigInvalid { index: usize, value: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("word store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("word list is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("word list is not valid csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("no bundled preset named {0:?}")]
    NoSuchPreset(String),
    #[error("index {index} is out of range for a list of {len} words")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unsupported word list format {0:?} (expected .json or .csv)")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellError {
    #[error("cell invariant violated at position {position}")]
    InvariantViolation { position: usize },
}
