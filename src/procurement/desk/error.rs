use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// desk loads, audits, renders, or exports material data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the configuration file is not valid TOML for the schema.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Raised when a configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a cell cannot be converted back into a typed field.
    #[error("invalid value '{value}' in column {column}")]
    InvalidCell { column: String, value: String },

    /// Raised when a material record does not match the expected schema.
    #[error("invalid material record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a lookup by SKU finds nothing.
    #[error("no material with SKU {0}")]
    UnknownSku(String),

    /// Raised when an audit needs more records than the store holds.
    #[error("audit requires at least {required} materials, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// Raised when the LLM endpoint cannot be reached or rejects the call.
    #[error("LLM request failed: {0}")]
    LlmTransport(#[from] reqwest::Error),

    /// Raised when the LLM reply does not carry a text block.
    #[error("unexpected LLM response: {0}")]
    LlmResponse(String),

    /// Raised when the API key environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    /// Raised when a timestamp cannot be formatted.
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
