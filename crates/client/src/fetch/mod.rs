//! HTTP fetch pipeline for race card and pedigree pages.
//!
//! - Bounded redirects, request timeout and body size
//! - Non-success status codes are errors
//! - The body is read chunk by chunk and abandoned once it passes `max_bytes`,
//!   with or without a Content-Length header
//! - Bodies are decoded using the response charset, falling back to EUC-JP

pub mod url;

use bytes::BytesMut;
use encoding_rs::{EUC_JP, Encoding};
use reqwest::{Client, StatusCode, Url, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, entrants_url, horse_id, pedigree_url, resolve_horse_url};

use ketto_core::{AppConfig, Error};

/// Charset assumed when a page does not declare one.
pub const DEFAULT_CHARSET: &str = "EUC-JP";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 2MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: 5,
        }
    }
}

/// A fetched and decoded HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Decoded body
    pub html: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP client with size and redirect limits.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch `url` and decode it as text.
    pub async fn fetch_html(&self, url: &Url) -> Result<FetchedPage, Error> {
        let start = Instant::now();

        let mut response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} for {url}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{len} bytes exceeds {}", self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            if body.len() + chunk.len() > self.config.max_bytes {
                return Err(Error::FetchTooLarge(format!("body exceeds {} bytes", self.config.max_bytes)));
            }
            body.extend_from_slice(&chunk);
        }

        let charset = content_type.as_deref().and_then(charset_of).unwrap_or(DEFAULT_CHARSET);
        let html = decode_body(&body, charset);

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!("fetched {} -> {} in {}ms ({} bytes, {})", url, final_url, fetch_ms, body.len(), charset);

        Ok(FetchedPage { url: url.clone(), final_url, status, content_type, html, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// The `charset` parameter of a Content-Type value.
fn charset_of(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decode `body` with the encoding named by `charset`, EUC-JP when unknown.
fn decode_body(body: &[u8], charset: &str) -> String {
    let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(EUC_JP);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!(charset = encoding.name(), "body contained undecodable bytes");
    }
    text.into_owned()
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::FetchTimeout(err.to_string()) } else { Error::HttpError(format!("network error: {err}")) }
}
