use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbaError {
    #[error("Config directory not found at {0}. Run 'abafile init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Batch file not found: {0}")]
    BatchFileNotFound(PathBuf),

    #[error("Failed to parse batch file {path}: {reason}")]
    BatchParse { path: PathBuf, reason: String },

    #[error("Unsupported batch file extension for {0} (expected .toml or .json)")]
    UnsupportedBatchFormat(PathBuf),

    #[error("Item '{item}' has non-positive amount {amount} (amounts must be greater than zero cents)")]
    NonPositiveAmount { item: String, amount: i64 },

    #[error("Value '{value}' for {field} does not fit in {width} digits")]
    FieldOverflow {
        field: String,
        value: String,
        width: usize,
    },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AbaError>;
