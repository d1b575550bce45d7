use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    /// Validator found required fields that are empty or out of range.
    #[error("Please fill in all required fields: {}", missing.join(", "))]
    IncompleteInput { missing: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("TOML parsing failed: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization failed: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("Unsupported record format: {path:?} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("PDF compilation failed for {path:?}")]
    Compile { path: PathBuf },
}

impl QuoteError {
    /// Labels reported by the validator, empty for every other error kind.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            QuoteError::IncompleteInput { missing } => missing,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
