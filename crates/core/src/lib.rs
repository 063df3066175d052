//! localfonts core - self-host the web fonts a stylesheet references.

pub mod config;
pub mod convert;
pub mod css;
pub mod error;
pub mod fetch;
pub mod io;
pub mod pipeline;
pub mod rewrite;
pub mod urls;

pub use config::Options;
pub use convert::{Convert, WoffConverter};
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher, Response};
pub use pipeline::{Summary, run, run_with};
pub use rewrite::{Asset, Rewriter, Rewritten};
