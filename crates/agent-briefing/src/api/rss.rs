//! RSS syndication feed headlines
//!
//! Feeds carry no category filter or country bias; those request fields are
//! ignored and only the limit applies.

use super::{Headline, NewsRequest, NewsSource, ensure_success, http_client};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// BBC News top stories
pub const DEFAULT_FEED_URL: &str = "http://feeds.bbci.co.uk/news/rss.xml";

/// Headlines from an RSS 2.0 feed
pub struct RssFeedClient {
    client: Client,
    feed_url: String,
}

impl RssFeedClient {
    pub fn new(feed_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            feed_url: feed_url.into(),
        })
    }
}

#[async_trait]
impl NewsSource for RssFeedClient {
    async fn headlines(&self, request: &NewsRequest) -> Result<Vec<Headline>> {
        tracing::debug!(url = %self.feed_url, "Fetching RSS feed");

        let response = self.client.get(&self.feed_url).send().await?;
        let body = ensure_success(response, "RSS feed").await?.text().await?;

        Ok(parse_items(&body, request.limit))
    }
}

/// Extract `(title, link)` pairs from the `<item>` elements of a feed
pub fn parse_items(xml: &str, limit: usize) -> Vec<Headline> {
    xml.split("<item")
        .skip(1)
        .filter_map(|block| {
            // `<item>` or `<item attr=...>`, but not `<items>`
            let block = block.strip_prefix('>').or_else(|| {
                block
                    .starts_with(char::is_whitespace)
                    .then(|| block.split_once('>').map_or("", |(_, rest)| rest))
            })?;
            let block = block.split("</item>").next().unwrap_or(block);

            let title = extract_tag(block, "title")?;
            let mut headline = Headline::new(title);
            headline.link = extract_tag(block, "link");
            Some(headline)
        })
        .take(limit)
        .collect()
}

fn extract_tag(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let end = start + text[start..].find(&close)?;

    let value = unwrap_cdata(text[start..end].trim());
    let value = decode_entities(value.trim());
    (!value.is_empty()).then_some(value)
}

fn unwrap_cdata(value: &str) -> &str {
    value
        .strip_prefix("<![CDATA[")
        .and_then(|v| v.strip_suffix("]]>"))
        .unwrap_or(value)
}

/// Decode the handful of XML entities that show up in headlines
pub(crate) fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
