//! Error types for stylesheet localization.

use std::{io, path::PathBuf, result};

use reqwest::StatusCode;

/// Result type for localization operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that abort a run. None of them is recovered from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A URL in the options or the stylesheet could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    /// A font reference points at something other than http(s).
    #[error("unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// The HTTP client could not be set up.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure.
    #[error("failed to fetch {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    /// The stylesheet is not well-formed enough to rewrite.
    #[error("failed to parse stylesheet at {line}:{column}: {message}")]
    Parse { line: u32, column: u32, message: String },

    /// A downloaded font could not be converted.
    #[error("failed to convert {}: {source}", path.display())]
    Conversion { path: PathBuf, source: font_woff::Error },

    /// Creating a directory or writing a file failed.
    #[error("failed to write {}: {source}", path.display())]
    Filesystem { path: PathBuf, source: io::Error },
}
