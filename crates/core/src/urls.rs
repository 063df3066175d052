//! URL handling: parsing, resolution, query rewriting and local file names.

use std::path::Path;

use indexmap::IndexMap;
use url::Url;

use crate::error::{Error, Result};

/// Parse an absolute URL.
pub fn parse(text: &str) -> Result<Url> {
    Url::parse(text).map_err(|source| Error::InvalidUrl { url: text.to_string(), source })
}

/// Resolve a reference found in a stylesheet against the stylesheet's URL.
///
/// Only http(s) targets can be downloaded, anything else is rejected.
pub fn resolve(base: &Url, reference: &str) -> Result<Url> {
    let url = base
        .join(reference)
        .map_err(|source| Error::InvalidUrl { url: reference.to_string(), source })?;
    ensure_fetchable(&url)?;
    Ok(url)
}

/// Fail with [`Error::UnsupportedScheme`] unless the URL is http or https.
pub fn ensure_fetchable(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::UnsupportedScheme { url: url.to_string(), scheme: scheme.to_string() }),
    }
}

/// Return a copy of `url` with `key` set to `value` in its query.
///
/// The existing query is reduced to one value per key (the first one wins)
/// and re-encoded. Everything outside the query is left alone.
pub fn with_query_param(url: &Url, key: &str, value: &str) -> Url {
    let mut params: IndexMap<String, String> = IndexMap::new();
    for (k, v) in url.query_pairs() {
        params.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    params.insert(key.to_string(), value.to_string());

    let mut url = url.clone();
    url.query_pairs_mut().clear().extend_pairs(&params);
    url
}

/// File name to store the resource at `url` under.
///
/// This is the last path segment with characters that are unsafe in file
/// names replaced. URLs without a usable segment get a name derived from a
/// checksum of the whole URL.
pub fn suggested_filename(url: &Url) -> String {
    let segment = url.path_segments().and_then(|mut segments| segments.next_back()).unwrap_or("");
    if matches!(segment, "" | "." | "..") {
        return format!("font-{:08x}", crc32fast::hash(url.as_str().as_bytes()));
    }
    segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Extension of a file name, without the dot.
pub fn extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension()?.to_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(text: &str) -> Url {
        Url::parse(text).unwrap()
    }

    #[test]
    fn test_query_param_added() {
        let out = with_query_param(&url("https://fonts.example/css2?family=Inter"), "display", "swap");
        assert_eq!(out.as_str(), "https://fonts.example/css2?family=Inter&display=swap");
    }

    #[test]
    fn test_query_param_replaces_every_occurrence() {
        let out = with_query_param(
            &url("https://fonts.example/css2?display=block&family=Inter&display=auto#top"),
            "display",
            "swap",
        );
        assert_eq!(out.query(), Some("display=swap&family=Inter"));
        let displays: Vec<_> = out.query_pairs().filter(|(k, _)| k == "display").collect();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].1, "swap");
        assert_eq!(out.fragment(), Some("top"));
        assert_eq!(out.scheme(), "https");
        assert_eq!(out.host_str(), Some("fonts.example"));
        assert_eq!(out.path(), "/css2");
    }

    #[test]
    fn test_query_param_keeps_first_value_of_other_keys() {
        let out = with_query_param(&url("http://h/p?a=1&a=2&b=3"), "display", "swap");
        assert_eq!(out.query(), Some("a=1&b=3&display=swap"));
    }

    #[test]
    fn test_query_param_reencodes() {
        let out = with_query_param(
            &url("https://fonts.example/css2?family=Roboto:wght@400;700"),
            "display",
            "swap",
        );
        assert_eq!(out.query(), Some("family=Roboto%3Awght%40400%3B700&display=swap"));
    }

    #[test]
    fn test_query_param_without_query() {
        let out = with_query_param(&url("https://fonts.example/css"), "display", "swap");
        assert_eq!(out.as_str(), "https://fonts.example/css?display=swap");
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename(&url("https://cdn.example/a.woff2")), "a.woff2");
        assert_eq!(
            suggested_filename(&url("https://fonts.gstatic.com/s/inter/v12/UcCO3Fwr.woff2?v=3")),
            "UcCO3Fwr.woff2"
        );
        assert_eq!(suggested_filename(&url("https://cdn.example/x/a%3Ab.ttf")), "a%3Ab.ttf");
        assert_eq!(suggested_filename(&url("https://cdn.example/x/a:b.ttf")), "a_b.ttf");
    }

    #[test]
    fn test_suggested_filename_fallback_is_stable() {
        let a = suggested_filename(&url("https://cdn.example/fonts/"));
        let b = suggested_filename(&url("https://cdn.example/fonts/"));
        let c = suggested_filename(&url("https://cdn.example/other/"));
        assert!(a.starts_with("font-"));
        assert_eq!(a.len(), "font-".len() + 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_resolve_relative_to_stylesheet() {
        let base = url("https://cdn.example/css/fonts.css?family=X");
        assert_eq!(resolve(&base, "../f/a.woff2").unwrap().as_str(), "https://cdn.example/f/a.woff2");
        assert_eq!(resolve(&base, "a.woff2").unwrap().as_str(), "https://cdn.example/css/a.woff2");
        assert_eq!(
            resolve(&base, "//other.example/a.woff").unwrap().as_str(),
            "https://other.example/a.woff"
        );
    }

    #[test]
    fn test_resolve_rejects_other_schemes() {
        let base = url("https://cdn.example/fonts.css");
        let err = resolve(&base, "data:font/woff2;base64,AAAA").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme { ref scheme, .. } if scheme == "data"));
        let err = resolve(&base, "ftp://cdn.example/a.woff").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a.woff2"), Some("woff2"));
        assert_eq!(extension("a.b.ttf"), Some("ttf"));
        assert_eq!(extension("font"), None);
        assert_eq!(extension(".woff"), None);
    }
}
