// ABOUTME: The Client struct that fetches publication pages and extracts records from them.
// ABOUTME: Provides async parse() for URLs and parse_html() for already-downloaded pages.

use url::Url;

use crate::error::ParseError;
use crate::extractors::loader::load_builtin_selectors;
use crate::extractors::publication::RecordExtractor;
use crate::extractors::select::HtmlDocument;
use crate::options::{ClientBuilder, Options};
use crate::record::PublicationRecord;
use crate::resource::{fetch, FetchOptions};

/// Fetches pages and turns them into publication records.
///
/// A page that is not a recognizable publication yields `Ok(None)`.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    extractor: RecordExtractor,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    ///
    /// # Panics
    ///
    /// Panics if no `http_client` is supplied and the TLS backend cannot be
    /// initialized.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let selectors = opts.selectors.clone().unwrap_or_else(load_builtin_selectors);
        let extractor = RecordExtractor::new(selectors, opts.join.clone());

        Self {
            opts,
            http_client,
            extractor,
        }
    }

    /// The options this client was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// The extractor used for every page.
    pub fn extractor(&self) -> &RecordExtractor {
        &self.extractor
    }

    /// Fetch a page and extract its record.
    ///
    /// The requested `url` (not the post-redirect URL) is the record's source
    /// URL, so book records carry exactly what was asked for.
    pub async fn parse(&self, url: &str) -> Result<Option<PublicationRecord>, ParseError> {
        if url.is_empty() {
            return Err(ParseError::invalid_url(url, "Parse", None));
        }

        if Url::parse(url).is_err() {
            return Err(ParseError::invalid_url(
                url,
                "Parse",
                Some(anyhow::anyhow!("malformed URL")),
            ));
        }

        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };

        let fetched = fetch(&self.http_client, url, &fetch_opts).await?;
        let raw_html = fetched.text();

        Ok(self.extract_from_html(&raw_html, url))
    }

    /// Extract a record from an HTML string, using `url` as its source URL.
    pub fn parse_html(
        &self,
        html: &str,
        url: &str,
    ) -> Result<Option<PublicationRecord>, ParseError> {
        if html.trim().is_empty() {
            return Err(ParseError::extract(
                url,
                "ParseHTML",
                Some(anyhow::anyhow!("empty HTML")),
            ));
        }

        if url.is_empty() {
            return Err(ParseError::invalid_url(url, "ParseHTML", None));
        }

        Url::parse(url).map_err(|_| {
            ParseError::invalid_url(url, "ParseHTML", Some(anyhow::anyhow!("malformed URL")))
        })?;

        Ok(self.extract_from_html(html, url))
    }

    fn extract_from_html(&self, html: &str, url: &str) -> Option<PublicationRecord> {
        let doc = HtmlDocument::parse(html);
        let record = self.extractor.extract(&doc, url);
        if record.is_none() {
            tracing::warn!(url, "page is not a recognized publication, skipping");
        }
        record
    }
}

impl Default for Client {
    fn default() -> Self {
        Client::new(Options::default())
    }
}
