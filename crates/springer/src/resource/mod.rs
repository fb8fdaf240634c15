// ABOUTME: Page fetching for the scraper: one HTTP GET per publication page.
// ABOUTME: Handles URL validation, SSRF protection, content-length limits, and charset decoding.

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};
use url::Url;

use crate::error::ParseError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

const OP: &str = "Fetch";

/// Options for fetching a page.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// A fetched page.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the charset from the content-type header if any.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            const V4_BLOCKED: &[&str] = &[
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "127.0.0.0/8",
                "169.254.0.0/16",
            ];
            V4_BLOCKED
                .iter()
                .filter_map(|net| net.parse::<Ipv4Net>().ok())
                .any(|net| net.contains(ip))
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() {
                return true;
            }
            const V6_BLOCKED: &[&str] = &["fc00::/7", "fe80::/10"];
            V6_BLOCKED
                .iter()
                .filter_map(|net| net.parse::<Ipv6Net>().ok())
                .any(|net| net.contains(ip))
        }
    }
}

/// Rejects URLs whose host is, or resolves to, a private address.
async fn ensure_public_host(target: &Url, url: &str, what: &str) -> Result<(), ParseError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    // IPv6 literals come back bracketed from host_str().
    let bare = host.trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = bare.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(ParseError::ssrf(
                url,
                OP,
                Some(anyhow::anyhow!("{} private IP addresses are not allowed", what)),
            ));
        }
        return Ok(());
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((bare, port)).await.map_err(|e| {
        ParseError::fetch(url, OP, Some(anyhow::anyhow!("DNS lookup failed: {}", e)))
    })?;
    for addr in addrs {
        if is_private_ip(&addr.ip()) {
            return Err(ParseError::ssrf(
                url,
                OP,
                Some(anyhow::anyhow!("{} private IP addresses are not allowed", what)),
            ));
        }
    }
    Ok(())
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|cs| cs.trim_matches('"').trim_matches('\'').to_string())
        })
}

fn request_error(url: &str, err: reqwest::Error) -> ParseError {
    if err.is_timeout() {
        ParseError::timeout(url, OP, Some(anyhow::Error::new(err)))
    } else {
        ParseError::fetch(url, OP, Some(anyhow::anyhow!("request failed: {}", err)))
    }
}

/// Fetch a page from the given URL.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ParseError> {
    if url.is_empty() {
        return Err(ParseError::invalid_url(url, OP, None));
    }

    let parsed_url = Url::parse(url).map_err(|e| {
        ParseError::invalid_url(url, OP, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(ParseError::invalid_url(
            url,
            OP,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        ensure_public_host(&parsed_url, url, "requests to").await?;
    }

    let mut request = client.get(parsed_url.clone());
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    tracing::debug!(url, "fetching page");
    let response = request.send().await.map_err(|e| request_error(url, e))?;

    if !opts.allow_private_networks && response.url() != &parsed_url {
        ensure_public_host(response.url(), url, "redirects to").await?;
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ParseError::fetch(
                url,
                OP,
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| request_error(url, e))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ParseError::fetch(
            url,
            OP,
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        return Err(ParseError::fetch(
            url,
            OP,
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    tracing::debug!(url, final_url = %final_url, bytes = body.len(), "fetched page");

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
