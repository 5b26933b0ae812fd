//! NewsAPI.org top-headlines client

use super::{Headline, NewsRequest, NewsSource, http_client};
use crate::error::{BriefingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const TOP_HEADLINES_URL: &str = "https://newsapi.org/v2/top-headlines";

/// NewsAPI top-headlines response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopHeadlinesResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

/// NewsAPI client
pub struct NewsApiClient {
    client: Client,
    api_key: Option<String>,
}

impl NewsApiClient {
    /// Create a new client.
    ///
    /// A missing key is accepted here; requests then fail with a configuration error.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn headlines(&self, request: &NewsRequest) -> Result<Vec<Headline>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BriefingError::Config("NEWS_API_KEY is not set".to_string()))?;

        let params = query_params(request, api_key);

        tracing::debug!(
            category = %request.category,
            country = ?request.country,
            "Requesting top headlines"
        );

        let response = self.client.get(TOP_HEADLINES_URL).query(&params).send().await?;

        // NewsAPI reports bad keys and bad parameters in the JSON body with a 4xx
        // status, so read the body before judging the status.
        let status = response.status();
        let body = response.text().await?;
        let parsed: TopHeadlinesResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                ensure_status(status)?;
                return Err(e.into());
            }
        };

        parse_articles(parsed, request.limit)
    }
}

fn query_params(request: &NewsRequest, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("category", request.category.clone()),
        ("pageSize", request.limit.to_string()),
        ("apiKey", api_key.to_string()),
    ];
    if let Some(country) = &request.country {
        params.push(("country", country.clone()));
    }
    params
}

fn ensure_status(status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(BriefingError::Transport(format!("NewsAPI returned {status}")))
    }
}

fn parse_articles(response: TopHeadlinesResponse, limit: usize) -> Result<Vec<Headline>> {
    if response.status != "ok" {
        return Err(BriefingError::Transport(format!(
            "Error fetching news: {}",
            response.message.as_deref().unwrap_or("Unknown error")
        )));
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.trim().is_empty())?;
            let mut headline = Headline::new(title);
            headline.source = article.source.and_then(|s| s.name);
            headline.link = article.url;
            Some(headline)
        })
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, limit: usize) -> Result<Vec<Headline>> {
        parse_articles(serde_json::from_str(json).unwrap(), limit)
    }

    #[test]
    fn test_parse_ok_response() {
        let json = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {"title": "Sensex climbs", "source": {"id": null, "name": "Mint"}, "url": "https://a"},
                {"title": "", "source": {"name": "Blank"}},
                {"title": "Monsoon arrives early", "source": {"name": "The Hindu"}, "url": null}
            ]
        }"#;

        let headlines = parse(json, 5).unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Sensex climbs");
        assert_eq!(headlines[0].source.as_deref(), Some("Mint"));
        assert_eq!(headlines[1].title, "Monsoon arrives early");
        assert!(headlines[1].link.is_none());
    }

    #[test]
    fn test_limit_applies() {
        let json = r#"{"status": "ok", "articles": [
            {"title": "a"}, {"title": "b"}, {"title": "c"}
        ]}"#;
        assert_eq!(parse(json, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_error_status_carries_message() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let err = parse(json, 5).unwrap_err();
        assert!(err.to_string().contains("Your API key is invalid."));
    }

    #[test]
    fn test_query_asks_for_the_requested_count() {
        let request = NewsRequest {
            category: "business".to_string(),
            country: None,
            limit: 50,
        };

        let params = query_params(&request, "key");
        assert!(params.contains(&("pageSize", "50".to_string())));
        assert!(params.contains(&("category", "business".to_string())));
        assert!(params.iter().all(|(name, _)| *name != "country"));

        let local = NewsRequest {
            country: Some("in".to_string()),
            ..request
        };
        assert!(query_params(&local, "key").contains(&("country", "in".to_string())));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = NewsApiClient::new(None, Duration::from_secs(1)).unwrap();
        let request = NewsRequest {
            category: "general".to_string(),
            country: Some("in".to_string()),
            limit: 5,
        };

        let err = client.headlines(&request).await.unwrap_err();
        assert!(matches!(err, BriefingError::Config(_)));
    }
}
