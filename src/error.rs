//! Error types for fetch operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while resolving and fetching a shared file.
#[derive(Error, Debug)]
pub enum FetchError {
    /// I/O error during file operations.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// HTTP request error during resolution or download.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// General download failure (exhausted retries, empty body, bad status).
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}
