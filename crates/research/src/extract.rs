//! Page fetching and HTML-to-text extraction.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::{ElementRef, Html};
use slidesmith_core::text::{collapse_whitespace, truncate_chars};
use slidesmith_core::{Error, ExtractionLimits, Result, SearchResult, SourceExcerpt};

/// Browser-like user agent; many sites reject default client agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose text never reaches an excerpt.
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Retrieves the HTML body of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher with a per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(limits: &ExtractionLimits) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(limits.fetch_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::extraction(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::extraction(url, format!("HTTP {}", status)));
        }

        response.text().map_err(|e| Error::extraction(url, e))
    }
}

/// Reduce an HTML document to clipped plain text.
///
/// Every text node outside script-like elements is trimmed, joined with
/// single spaces and whitespace-collapsed, then cut to `clip_chars` characters.
pub fn html_to_text(html: &str, clip_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut parts = Vec::new();
    push_text(document.root_element(), &mut parts);

    let text = collapse_whitespace(&parts.join(" "));
    truncate_chars(&text, clip_chars).to_string()
}

fn push_text(element: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child.value().name()) {
                push_text(child, parts);
            }
        }
    }
}

/// Turns ranked candidates into at most `max_excerpts` usable excerpts.
pub struct SourceExtractor<F> {
    fetcher: F,
    limits: ExtractionLimits,
}

impl<F: PageFetcher> SourceExtractor<F> {
    pub fn new(fetcher: F, limits: ExtractionLimits) -> Self {
        Self { fetcher, limits }
    }

    /// Scan candidates in order and keep the first non-empty excerpts.
    ///
    /// Only the first `scan_limit` candidates are considered, and fetching
    /// stops as soon as `max_excerpts` have been kept. Failed pages are
    /// logged and skipped.
    pub fn collect(&self, candidates: &[SearchResult]) -> Vec<SourceExcerpt> {
        let excerpts: Vec<SourceExcerpt> = candidates
            .iter()
            .take(self.limits.scan_limit)
            .filter_map(|candidate| match self.extract(candidate) {
                Ok(excerpt) => excerpt,
                Err(e) => {
                    log::warn!("Error fetching {}: {}", candidate.url, e);
                    None
                }
            })
            .take(self.limits.max_excerpts)
            .collect();

        log::info!(
            "Kept {} excerpts from {} candidates",
            excerpts.len(),
            candidates.len().min(self.limits.scan_limit)
        );
        excerpts
    }

    fn extract(&self, candidate: &SearchResult) -> Result<Option<SourceExcerpt>> {
        let html = self.fetcher.fetch(&candidate.url)?;
        let text = html_to_text(&html, self.limits.clip_chars);
        if text.is_empty() {
            log::debug!("No text extracted from {}", candidate.url);
            return Ok(None);
        }

        Ok(Some(SourceExcerpt {
            title: candidate.title.clone(),
            url: candidate.url.clone(),
            text,
        }))
    }
}
