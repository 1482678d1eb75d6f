//! Error types shared across crates

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid translation dictionary: {0}")]
    Dictionary(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
