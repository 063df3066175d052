//! WOFF 1.0 packaging for web fonts.
//!
//! Browsers that predate WOFF2 still load WOFF 1.0, so this crate turns
//! whatever a font server hands out (WOFF2, WOFF or a plain TrueType/CFF
//! sfnt) into a WOFF 1.0 file carrying the same tables.
//!
//! # Example
//!
//! ```no_run
//! use font_woff::{Container, convert_to_woff};
//!
//! let woff2 = std::fs::read("fonts/Inter.woff2").unwrap();
//! assert_eq!(Container::detect(&woff2), Some(Container::Woff2));
//! let woff = convert_to_woff(&woff2).unwrap();
//! std::fs::write("fonts/Inter.woff", woff).unwrap();
//! ```

mod error;

use std::borrow::Cow;

use log::debug;
use miniz_oxide::deflate::compress_to_vec_zlib;
use read_fonts::{FontRef, types::Tag};

pub use error::{Error, Result};

/// File extension of the WOFF 1.0 container.
pub const WOFF_EXTENSION: &str = "woff";

const WOFF_SIGNATURE: u32 = 0x774F_4646;
const WOFF_HEADER_LEN: usize = 44;
const WOFF_TABLE_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_TABLE_ENTRY_LEN: usize = 16;

/// zlib level used for table data. Level 9 is what fontTools uses for WOFF.
const COMPRESSION_LEVEL: u8 = 9;

/// Font container formats recognized by their leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Uncompressed TrueType or CFF font.
    Sfnt,
    /// WOFF 1.0.
    Woff,
    /// WOFF 2.0.
    Woff2,
}

impl Container {
    /// Identify the container from the first four bytes of `data`.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data.get(..4)? {
            b"wOF2" => Some(Self::Woff2),
            b"wOFF" => Some(Self::Woff),
            &[0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"typ1" => Some(Self::Sfnt),
            _ => None,
        }
    }
}

/// Decode `data` into a plain sfnt, borrowing it when it already is one.
pub fn to_sfnt(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    match Container::detect(data) {
        Some(Container::Sfnt) => Ok(Cow::Borrowed(data)),
        Some(Container::Woff) => wuff::decompress_woff1(data)
            .map(Cow::Owned)
            .map_err(|e| Error::Decode { format: "WOFF", message: format!("{e:?}") }),
        Some(Container::Woff2) => wuff::decompress_woff2(data)
            .map(Cow::Owned)
            .map_err(|e| Error::Decode { format: "WOFF2", message: format!("{e:?}") }),
        None => Err(Error::UnknownFormat(data.iter().take(4).copied().collect())),
    }
}

/// Convert any supported container into WOFF 1.0.
pub fn convert_to_woff(data: &[u8]) -> Result<Vec<u8>> {
    let sfnt = to_sfnt(data)?;
    encode_woff(&sfnt)
}

struct EncodedTable {
    tag: Tag,
    checksum: u32,
    orig_length: u32,
    payload: Vec<u8>,
}

/// Package an sfnt as WOFF 1.0.
///
/// Each table is zlib-compressed when that makes it smaller and stored as-is
/// otherwise. Tables are written in tag order on 4-byte boundaries. The
/// version fields are left at zero and no metadata or private block is
/// written.
pub fn encode_woff(sfnt: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(sfnt)?;
    let flavor = font.table_directory.sfnt_version();

    let mut tables = Vec::new();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        let data = font.table_data(tag).ok_or(Error::MissingTable(tag))?;
        let data = data.as_bytes();
        let compressed = compress_to_vec_zlib(data, COMPRESSION_LEVEL);
        let payload = if compressed.len() < data.len() { compressed } else { data.to_vec() };
        debug!("{tag}: {} -> {} bytes", data.len(), payload.len());
        tables.push(EncodedTable {
            tag,
            checksum: record.checksum(),
            orig_length: data.len() as u32,
            payload,
        });
    }
    tables.sort_by_key(|table| table.tag);

    let total_sfnt_size = SFNT_HEADER_LEN
        + SFNT_TABLE_ENTRY_LEN * tables.len()
        + tables.iter().map(|table| padded(table.orig_length as usize)).sum::<usize>();

    let mut directory = Vec::with_capacity(WOFF_TABLE_ENTRY_LEN * tables.len());
    let mut body = Vec::new();
    let mut offset = WOFF_HEADER_LEN + WOFF_TABLE_ENTRY_LEN * tables.len();
    for table in &tables {
        directory.extend_from_slice(&table.tag.to_be_bytes());
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(table.payload.len() as u32).to_be_bytes());
        directory.extend_from_slice(&table.orig_length.to_be_bytes());
        directory.extend_from_slice(&table.checksum.to_be_bytes());

        body.extend_from_slice(&table.payload);
        body.resize(padded(body.len()), 0);
        offset += padded(table.payload.len());
    }

    let mut out = Vec::with_capacity(offset);
    out.extend_from_slice(&WOFF_SIGNATURE.to_be_bytes());
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&(offset as u32).to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    // majorVersion, minorVersion, then metaOffset/Length/OrigLength and
    // privOffset/Length, all zero.
    out.extend_from_slice(&[0u8; 4 + 20]);
    out.extend_from_slice(&directory);
    out.extend_from_slice(&body);
    debug_assert_eq!(out.len(), offset);
    Ok(out)
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Container::detect(b"wOF2\0\0"), Some(Container::Woff2));
        assert_eq!(Container::detect(b"wOFF\0\0"), Some(Container::Woff));
        assert_eq!(Container::detect(b"OTTO"), Some(Container::Sfnt));
        assert_eq!(Container::detect(&[0, 1, 0, 0, 0, 4]), Some(Container::Sfnt));
        assert_eq!(Container::detect(b"<htm"), None);
        assert_eq!(Container::detect(b"wO"), None);
    }

    #[test]
    fn test_padded() {
        assert_eq!(padded(0), 0);
        assert_eq!(padded(1), 4);
        assert_eq!(padded(4), 4);
        assert_eq!(padded(13), 16);
    }

    #[test]
    fn test_unknown_format() {
        let err = convert_to_woff(b"<!DOCTYPE html>").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(ref head) if head == b"<!DO"));
    }

    #[test]
    fn test_corrupt_woff2() {
        let err = convert_to_woff(b"wOF2 definitely not a font").unwrap_err();
        assert!(matches!(err, Error::Decode { format: "WOFF2", .. }));
    }
}
