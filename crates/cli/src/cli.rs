//! CLI definitions and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use localfonts_core::{
    Options, Summary,
    config::{DEFAULT_OUT_DIR, DEFAULT_PREFIX, DEFAULT_STYLESHEET, DEFAULT_USER_AGENT},
    run,
};

#[derive(Debug, Parser)]
#[command(name = "localfonts")]
#[command(about = "Download the web fonts a stylesheet references and rewrite it to use the local copies")]
pub struct Cli {
    /// Stylesheet URL, e.g. a Google Fonts css2 link
    #[arg(value_name = "URL")]
    pub url: String,

    /// User agent sent with every request
    #[arg(long = "ua", value_name = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Directory for downloaded fonts
    #[arg(short = 'd', long = "dir", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Add display=swap to the stylesheet request
    #[arg(short, long)]
    pub swap: bool,

    /// Prefix for font paths written into the stylesheet
    #[arg(short, long, default_value = DEFAULT_PREFIX, allow_hyphen_values = true)]
    pub prefix: String,

    /// Where to write the rewritten stylesheet (.css is added if it has no extension)
    #[arg(short = 'f', long = "file", default_value = DEFAULT_STYLESHEET)]
    pub stylesheet: PathBuf,

    /// Do not write WOFF copies of the downloaded fonts
    #[arg(long)]
    pub no_convert: bool,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            url: self.url.clone(),
            user_agent: self.user_agent.clone(),
            out_dir: self.out_dir.clone(),
            prefix: self.prefix.clone(),
            stylesheet: self.stylesheet.clone(),
            swap: self.swap,
            convert: !self.no_convert,
        }
    }

    pub fn run(self) -> Result<()> {
        let options = self.options();
        debug!("{options:?}");
        let summary = run(&options).with_context(|| format!("Failed to localize {}", options.url))?;
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &Summary) {
    println!("\nSummary");
    println!("  Fonts:     {}", summary.assets.len());
    println!("  Converted: {}", summary.converted_count());
    println!("  Wrote {}", summary.stylesheet.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["localfonts", "https://fonts.example/css2?family=Inter"]).unwrap();
        let options = cli.options();
        assert_eq!(options.url, "https://fonts.example/css2?family=Inter");
        assert_eq!(options.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(options.out_dir, PathBuf::from("fonts"));
        assert_eq!(options.prefix, "./");
        assert_eq!(options.stylesheet, PathBuf::from("stylesheet.css"));
        assert!(!options.swap);
        assert!(options.convert);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "localfonts",
            "-s",
            "-d",
            "static/fonts",
            "-p",
            "/assets/",
            "-f",
            "fonts",
            "--ua",
            "curl/8",
            "--no-convert",
            "https://fonts.example/css",
        ])
        .unwrap();
        let options = cli.options();
        assert!(options.swap);
        assert!(!options.convert);
        assert_eq!(options.out_dir, PathBuf::from("static/fonts"));
        assert_eq!(options.prefix, "/assets/");
        assert_eq!(options.stylesheet, PathBuf::from("fonts"));
        assert_eq!(options.user_agent, "curl/8");
    }

    #[test]
    fn test_url_required() {
        assert!(Cli::try_parse_from(["localfonts"]).is_err());
    }
}
