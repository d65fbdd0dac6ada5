/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Duplicate indicator: {0}")]
    DuplicateIndicator(String),

    #[error("Invalid result: {0}")]
    InvalidResult(String),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
