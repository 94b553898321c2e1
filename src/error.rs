use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeysprintError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite Error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store Error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, KeysprintError>;
