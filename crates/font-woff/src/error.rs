//! Error types for font container conversion.

use std::result;

use read_fonts::{ReadError, types::Tag};

/// Errors that can occur while repackaging a font.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unrecognized font container (first bytes {0:02x?})")]
    UnknownFormat(Vec<u8>),

    #[error("failed to decode {format}: {message}")]
    Decode { format: &'static str, message: String },

    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("table '{0}' is listed in the table directory but has no data")]
    MissingTable(Tag),
}

pub type Result<T> = result::Result<T, Error>;
