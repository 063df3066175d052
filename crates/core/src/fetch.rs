//! HTTP access.

use std::borrow::Cow;

use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::error::{Error, Result};

/// A successful response body.
#[derive(Debug, Clone)]
pub struct Response {
    /// Final URL after redirects. Relative references resolve against it.
    pub url: Url,
    pub bytes: Vec<u8>,
}

impl Response {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Something that can GET a URL.
pub trait Fetch {
    /// Fetch `url`, failing on transport errors and non-2xx statuses.
    fn fetch(&self, url: &Url) -> Result<Response>;
}

/// Blocking HTTP client carrying the request headers of a run.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build().map_err(Error::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Response> {
        let network = |source: reqwest::Error| Error::Network { url: url.to_string(), source };

        let response = self.client.get(url.clone()).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { url: url.to_string(), status });
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().map_err(network)?;
        debug!("GET {url} -> {status}, {} bytes", bytes.len());
        Ok(Response { url: final_url, bytes: bytes.to_vec() })
    }
}
