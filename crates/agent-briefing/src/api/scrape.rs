//! Headlines scraped from the Times of India web pages
//!
//! The pages are tried in order until enough headlines are collected. Each
//! page is matched against a list of headline element patterns, most specific
//! first. Like RSS feeds, the pages carry no category filter or country bias.

use super::article::element_text;
use super::{Headline, NewsRequest, NewsSource, ensure_success, http_client};
use crate::error::{BriefingError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Pages tried in order
pub const DEFAULT_PAGES: [&str; 3] = [
    "https://timesofindia.indiatimes.com/india",
    "https://timesofindia.indiatimes.com/briefs",
    "https://timesofindia.indiatimes.com",
];

/// Most headlines taken from the pages per request
pub const MAX_HEADLINES: usize = 5;

/// Headline elements; the `title` group holds the element's inner HTML
static HEADLINE_ELEMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // `w_tle` title spans used by top stories, headline lists and briefs
        r#"(?is)<(?:span|div|figcaption|a)\s[^>]*class\s*=\s*["'][^"']*\bw_tle\b[^"']*["'][^>]*>(?P<title>.*?)</(?:span|div|figcaption|a)>"#,
        // article boxes, news and story cards
        r"(?is)<h3(?:\s[^>]*)?>(?P<title>.*?)</h3>",
        // generic headline links
        r"(?is)<h2(?:\s[^>]*)?>\s*<a\s[^>]*>(?P<title>.*?)</a>",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("headline pattern is a valid regex"))
    .collect()
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']+)["']"#)
        .expect("href pattern is a valid regex")
});

/// Headline scraper over a fixed list of pages
pub struct HeadlineScraper {
    client: Client,
    pages: Vec<Url>,
}

impl HeadlineScraper {
    pub fn new(timeout: Duration) -> Result<Self> {
        let pages = DEFAULT_PAGES
            .into_iter()
            .map(Url::parse)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            client: http_client(timeout)?,
            pages,
        })
    }

    async fn fetch_page(&self, page: &Url) -> Result<String> {
        let response = self
            .client
            .get(page.clone())
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        Ok(ensure_success(response, "headline page").await?.text().await?)
    }
}

#[async_trait]
impl NewsSource for HeadlineScraper {
    async fn headlines(&self, request: &NewsRequest) -> Result<Vec<Headline>> {
        let wanted = request.limit.min(MAX_HEADLINES);
        let mut headlines: Vec<Headline> = Vec::new();
        let mut last_error: Option<BriefingError> = None;
        let mut fetched_any = false;

        for page in &self.pages {
            if headlines.len() >= wanted {
                break;
            }

            tracing::debug!(url = %page, "Scraping headline page");
            let html = match self.fetch_page(page).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(url = %page, error = %e, "Headline page unavailable");
                    last_error = Some(e);
                    continue;
                }
            };
            fetched_any = true;

            for headline in extract_headlines(&html, page) {
                if headlines.len() >= wanted {
                    break;
                }
                if headlines.iter().all(|h| h.title != headline.title) {
                    headlines.push(headline);
                }
            }
        }

        match last_error {
            Some(err) if !fetched_any => Err(err),
            _ => Ok(headlines),
        }
    }
}

/// Unique headlines of one page in pattern order, links made absolute against `base`
pub fn extract_headlines(html: &str, base: &Url) -> Vec<Headline> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for pattern in HEADLINE_ELEMENTS.iter() {
        for caps in pattern.captures_iter(html) {
            let (Some(element), Some(inner)) = (caps.get(0), caps.name("title")) else {
                continue;
            };
            let title = element_text(inner.as_str());
            if title.is_empty() || !seen.insert(title.clone()) {
                continue;
            }

            let mut headline = Headline::new(title);
            headline.link = first_href(element.as_str())
                .or_else(|| enclosing_href(&html[..element.start()]))
                .and_then(|href| base.join(href).ok())
                .map(String::from);
            found.push(headline);
        }
    }
    found
}

fn first_href(fragment: &str) -> Option<&str> {
    Some(HREF.captures(fragment)?.get(1)?.as_str().trim())
}

/// Link of an anchor opened before the element and not yet closed
fn enclosing_href(before: &str) -> Option<&str> {
    let open = before.rfind("<a ")?;
    if before.rfind("</a>").is_some_and(|close| close > open) {
        return None;
    }
    first_href(&before[open..])
}
