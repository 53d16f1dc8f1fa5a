// src/utils/error.rs
use thiserror::Error;

// Document-level malformation never reaches these types; they cover host failures only.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Regular expression error: {0}")]
    RegexError(String),

    #[error("Invalid tag path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unsupported dialect: {family} documents have no {schema} path table")]
    UnsupportedDialect { family: String, schema: String },

    #[error("Failed to read bundle: {0}")]
    Read(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
