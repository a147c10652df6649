use thiserror::Error;

#[derive(Error, Debug)]
pub enum VendingError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Catalog error: {0}")]
    CatalogError(String),
    #[error("Script error: {0}")]
    ScriptError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, VendingError>;
