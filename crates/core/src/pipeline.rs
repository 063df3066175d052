//! End-to-end run: fetch the stylesheet, localize its fonts, write it out.

use std::path::PathBuf;

use log::info;

use crate::{
    config::{DISPLAY_PARAM, DISPLAY_SWAP, Options},
    convert::{Convert, WoffConverter},
    error::Result,
    fetch::{Fetch, HttpFetcher},
    io::{OutputFile, ensure_dir, stylesheet_destination},
    rewrite::{Asset, Rewriter},
    urls::{ensure_fetchable, parse, with_query_param},
};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct Summary {
    pub stylesheet: PathBuf,
    pub assets: Vec<Asset>,
}

impl Summary {
    pub fn converted_count(&self) -> usize {
        self.assets.iter().filter(|asset| asset.converted.is_some()).count()
    }
}

/// Run over the network with the built-in WOFF converter.
pub fn run(options: &Options) -> Result<Summary> {
    let fetcher = HttpFetcher::new(&options.user_agent)?;
    let converter = WoffConverter;
    run_with(options, &fetcher, options.convert.then_some(&converter as &dyn Convert))
}

/// Run with the given fetcher and converter.
///
/// The stylesheet is written only once every font has been processed, so a
/// failed run leaves no stylesheet behind. Fonts downloaded before the
/// failure stay on disk.
pub fn run_with(
    options: &Options,
    fetcher: &dyn Fetch,
    converter: Option<&dyn Convert>,
) -> Result<Summary> {
    let mut url = parse(&options.url)?;
    ensure_fetchable(&url)?;
    if options.swap {
        url = with_query_param(&url, DISPLAY_PARAM, DISPLAY_SWAP);
    }

    println!("fetching: {url}");
    ensure_dir(&options.out_dir)?;
    let response = fetcher.fetch(&url)?;

    let rewritten = Rewriter::new(fetcher, &options.out_dir, &options.prefix)
        .with_converter(converter)
        .rewrite(&response.text(), &response.url)?;

    let destination = OutputFile::new(stylesheet_destination(&options.stylesheet));
    destination.write(&rewritten.css)?;
    info!("wrote {} ({} bytes)", destination.path().display(), rewritten.css.len());

    Ok(Summary { stylesheet: destination.path().to_path_buf(), assets: rewritten.assets })
}
