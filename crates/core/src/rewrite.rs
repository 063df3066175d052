//! The `@font-face` rewrite pass.
//!
//! Every font referenced from an `@font-face` block is downloaded, optionally
//! converted, and its `url()` replaced by the local copies. All other text of
//! the stylesheet is written back unchanged.

use std::path::{Path, PathBuf};

use log::{debug, info};
use url::Url;

use crate::{
    convert::Convert,
    css::{FontFace, Rule, Token, parse_stylesheet},
    error::{Error, Result},
    fetch::Fetch,
    io::{OutputFile, local_reference, sibling_name},
    urls::{extension, resolve, suggested_filename},
};

/// Separator between the local sources emitted for one reference.
pub const SOURCE_SEPARATOR: &str = ",\n\t";

/// Position of the traversal relative to the last replaced `url("...")`.
///
/// The replacement carries its own format hints, so the `format()` sibling
/// that follows a `url("...")` function is dropped. Whitespace in between is
/// written as read and keeps the state. An unquoted `url(...)` token is
/// replaced without touching any `format()` after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceState {
    #[default]
    Normal,
    AwaitingFormat,
}

/// What to do with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'t> {
    /// Write the token unchanged.
    Keep,
    /// Write local sources for this reference instead of the token.
    Rewrite(&'t str),
    /// Discard the token.
    Drop,
}

impl SourceState {
    pub fn advance<'t>(&mut self, token: &'t Token) -> Step<'t> {
        let (next, step) = match (token, *self) {
            (Token::Url { value, .. }, _) if !value.is_empty() => {
                (Self::Normal, Step::Rewrite(value.as_str()))
            }
            (Token::Function { arguments, .. }, _) if token.is_function("url") => {
                match arguments.first().filter(|reference| !reference.is_empty()) {
                    Some(reference) => (Self::AwaitingFormat, Step::Rewrite(reference.as_str())),
                    None => (Self::Normal, Step::Keep),
                }
            }
            (Token::Function { .. }, Self::AwaitingFormat) if token.is_function("format") => {
                (Self::Normal, Step::Drop)
            }
            (Token::Whitespace(_), state) => (state, Step::Keep),
            _ => (Self::Normal, Step::Keep),
        };
        *self = next;
        step
    }
}

/// A localized font reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub source: Url,
    pub path: PathBuf,
    pub converted: Option<PathBuf>,
}

/// Output of [`Rewriter::rewrite`].
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub css: String,
    /// One entry per reference, in order of appearance.
    pub assets: Vec<Asset>,
}

/// Rewrites stylesheets to point at downloaded copies of their fonts.
pub struct Rewriter<'a> {
    fetcher: &'a dyn Fetch,
    converter: Option<&'a dyn Convert>,
    out_dir: &'a Path,
    prefix: &'a str,
}

impl<'a> Rewriter<'a> {
    /// Fonts are written to `out_dir` and referenced as `prefix` + path.
    pub fn new(fetcher: &'a dyn Fetch, out_dir: &'a Path, prefix: &'a str) -> Self {
        Self { fetcher, converter: None, out_dir, prefix }
    }

    /// Also write a converted copy of fonts not already in the converter's format.
    pub fn with_converter(mut self, converter: Option<&'a dyn Convert>) -> Self {
        self.converter = converter;
        self
    }

    /// Rewrite `css`, resolving relative references against `base`.
    pub fn rewrite(&self, css: &str, base: &Url) -> Result<Rewritten> {
        let rules = parse_stylesheet(css)?;
        debug!("parsed {} top-level rules", rules.len());

        let mut output = String::with_capacity(css.len());
        let mut assets = Vec::new();
        for rule in &rules {
            match rule {
                Rule::Opaque(text) => output.push_str(text),
                Rule::FontFace(font_face) => {
                    self.rewrite_font_face(font_face, base, &mut output, &mut assets)?
                }
            }
        }
        info!("localized {} font references", assets.len());
        Ok(Rewritten { css: output, assets })
    }

    fn rewrite_font_face(
        &self,
        font_face: &FontFace,
        base: &Url,
        output: &mut String,
        assets: &mut Vec<Asset>,
    ) -> Result<()> {
        output.push_str(&font_face.head);
        output.push('{');

        let mut state = SourceState::default();
        for token in &font_face.tokens {
            match state.advance(token) {
                Step::Keep => output.push_str(token.as_css()),
                Step::Rewrite(reference) => assets.push(self.localize(base, reference, output)?),
                Step::Drop => debug!("dropping stale {}", token.as_css()),
            }
        }
        output.push('}');
        Ok(())
    }

    /// Download one reference and write its local sources to `output`.
    fn localize(&self, base: &Url, reference: &str, output: &mut String) -> Result<Asset> {
        let url = resolve(base, reference)?;
        let filename = suggested_filename(&url);
        let file = OutputFile::new(self.out_dir.join(&filename));

        println!("downloading {url} to {}", file.path().display());
        let response = self.fetcher.fetch(&url)?;
        file.write(&response.bytes)?;

        let format = extension(&filename);
        push_source(output, &local_reference(self.prefix, self.out_dir, &filename), format);

        let mut converted = None;
        if let Some(converter) = self.converter
            && format != Some(converter.extension())
        {
            let target_format = converter.extension();
            let target_name = sibling_name(&filename, target_format);
            let target = OutputFile::new(self.out_dir.join(&target_name));

            println!("converting {} to {target_format}", file.path().display());
            let data = converter
                .convert(&response.bytes, format.unwrap_or_default())
                .map_err(|source| Error::Conversion { path: file.path().to_path_buf(), source })?;
            target.write(&data)?;

            output.push_str(SOURCE_SEPARATOR);
            push_source(
                output,
                &local_reference(self.prefix, self.out_dir, &target_name),
                Some(target_format),
            );
            converted = Some(target.path().to_path_buf());
        }

        Ok(Asset { source: url, path: file.path().to_path_buf(), converted })
    }
}

/// Write `url("<reference>") format("<format>")`.
fn push_source(output: &mut String, reference: &str, format: Option<&str>) {
    output.push_str(&format!("url(\"{reference}\")"));
    if let Some(format) = format {
        output.push_str(&format!(" format(\"{format}\")"));
    }
}
