use thiserror::Error;

/// Errors that can occur while loading or exporting tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Duplicate column name: {name}")]
    DuplicateColumnName { name: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
