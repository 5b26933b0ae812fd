//! Article page reader used for headline insights

use super::rss::decode_entities;
use super::{ArticleReader, ensure_success, http_client};
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("paragraph pattern is a valid regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is a valid regex"));

/// Fetches an HTML page and pulls out its first paragraphs
pub struct HtmlArticleReader {
    client: Client,
}

impl HtmlArticleReader {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl ArticleReader for HtmlArticleReader {
    async fn leading_paragraphs(&self, url: &str, count: usize) -> Result<Vec<String>> {
        tracing::debug!(url, "Fetching article page");
        let response = self.client.get(url).send().await?;
        let html = ensure_success(response, "article page").await?.text().await?;
        Ok(extract_paragraphs(&html, count))
    }
}

/// Text of the first `count` non-empty `<p>` elements
pub fn extract_paragraphs(html: &str, count: usize) -> Vec<String> {
    PARAGRAPH
        .captures_iter(html)
        .filter_map(|caps| {
            let text = element_text(caps.get(1)?.as_str());
            (!text.is_empty()).then_some(text)
        })
        .take(count)
        .collect()
}

/// Visible text of an element's inner HTML, whitespace collapsed
pub(crate) fn element_text(inner: &str) -> String {
    let text = decode_entities(&TAG.replace_all(inner, " "));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_paragraphs() {
        let html = r#"
            <html><body>
            <nav><p class="menu"></p></nav>
            <article>
              <p>First <b>bold</b> paragraph.</p>
              <p data-x="1">Second &amp; final
                 line.</p>
              <pre>not a paragraph</pre>
              <p>Third.</p>
              <p>Fourth.</p>
            </article>
            </body></html>"#;

        let paragraphs = extract_paragraphs(html, 3);
        assert_eq!(
            paragraphs,
            vec![
                "First bold paragraph.".to_string(),
                "Second & final line.".to_string(),
                "Third.".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_paragraphs() {
        assert!(extract_paragraphs("<div>nothing</div>", 3).is_empty());
    }
}
