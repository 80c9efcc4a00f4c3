// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

/// Failures on the way from a scanned link to a redirect target.
///
/// A lookup that simply finds nothing is not an error; it comes back as `None`.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Raw CSV text was absent, or the scanned link could not be parsed.
    #[error("input error: {0}")]
    Input(String),

    /// The sheet host answered with something other than 200 OK.
    #[error("error code {0}")]
    Network(StatusCode),

    /// The request never completed (connect, TLS or body read failure).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
