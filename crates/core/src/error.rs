use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundmapError {
    /// Loading or parsing the input document failed.
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FundmapError>;
