use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrivoxyctError {
    // Network errors
    #[error("Transfer failed for {url}: {reason}")]
    Transfer { url: String, reason: String },

    // Archive errors
    #[error("Failed to extract {}: {reason}", .archive.display())]
    Extraction { archive: PathBuf, reason: String },

    // Categories file errors
    #[error("Categories file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    // Ownership errors (recovered by the pipeline, surfaced as a warning)
    #[error("Could not change ownership of {}: {reason}", .path.display())]
    Ownership { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PrivoxyctError>;
