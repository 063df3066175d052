//! Font container conversion seam.

use font_woff::{WOFF_EXTENSION, convert_to_woff};
use log::debug;

/// Repackages downloaded fonts into a fallback container.
pub trait Convert {
    /// Extension of the files this converter produces, without the dot.
    fn extension(&self) -> &str;

    /// Convert `data`. `hint` is the extension of the downloaded file.
    fn convert(&self, data: &[u8], hint: &str) -> font_woff::Result<Vec<u8>>;
}

/// Converts anything `font_woff` understands into WOFF 1.0.
#[derive(Debug, Default, Clone, Copy)]
pub struct WoffConverter;

impl Convert for WoffConverter {
    fn extension(&self) -> &str {
        WOFF_EXTENSION
    }

    fn convert(&self, data: &[u8], hint: &str) -> font_woff::Result<Vec<u8>> {
        debug!("converting {} bytes of {hint} to WOFF", data.len());
        convert_to_woff(data)
    }
}
