//! Configuration for a localfonts run.

use std::path::PathBuf;

/// User agent sent with every request. Font CDNs pick the container they
/// serve from it, and a current Chrome gets WOFF2.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/100.0.4896.12 Safari/537.36";

/// Directory downloaded fonts are written to.
pub const DEFAULT_OUT_DIR: &str = "fonts";

/// Prefix prepended to every local path written into the stylesheet.
pub const DEFAULT_PREFIX: &str = "./";

/// Where the rewritten stylesheet is written.
pub const DEFAULT_STYLESHEET: &str = "stylesheet.css";

/// Extension appended to a stylesheet destination that has none.
pub const STYLESHEET_EXTENSION: &str = "css";

/// Query parameter controlling `font-display` on Google Fonts style requests.
pub const DISPLAY_PARAM: &str = "display";

/// Value of [`DISPLAY_PARAM`] for non-blocking font loading.
pub const DISPLAY_SWAP: &str = "swap";

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Options {
    /// Stylesheet URL, e.g. `https://fonts.googleapis.com/css2?family=Inter`.
    pub url: String,
    pub user_agent: String,
    pub out_dir: PathBuf,
    pub prefix: String,
    pub stylesheet: PathBuf,
    /// Inject `display=swap` into the stylesheet URL before fetching it.
    pub swap: bool,
    /// Also write a WOFF copy of every font that is not WOFF already.
    pub convert: bool,
}

impl Options {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET),
            swap: false,
            convert: true,
        }
    }
}
