//! News search client
//!
//! Keyword search for recent headlines, snippets and links. Results feed the
//! AI news report; the client is rate limited because the free tier of the
//! provider is tight.

use crate::error::{AnalystError, Result};
use crate::market::Market;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

/// Articles fetched per search
pub const MAX_ARTICLES: usize = 5;

/// One news search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: String,
}

/// Build the search query for a resolved instrument name.
/// Domestic names search Korean outlook phrasing; foreign names search
/// English analyst phrasing (the report prompt translates).
pub fn news_query(name: &str, market: Market) -> String {
    match market {
        Market::Domestic => format!("{name} 주가 전망"),
        Market::Foreign => format!("{name} stock forecast analysis"),
    }
}

/// News search client with rate limiting
pub struct NewsClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - NewsAPI key
    /// * `rate_limit` - Requests per minute
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(30).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Search recent articles for a keyword, newest first, at most
    /// [`MAX_ARTICLES`] results.
    pub async fn search(&self, query: &str) -> Result<Vec<NewsArticle>> {
        self.rate_limiter.until_ready().await;

        let page_size = MAX_ARTICLES.to_string();
        let response = self
            .client
            .get(NEWS_API_URL)
            .query(&[
                ("q", query),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| AnalystError::News(format!("news request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalystError::News(format!("news API error {status}: {body}")));
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| AnalystError::News(format!("failed to parse news response: {e}")))?;

        Ok(body
            .articles
            .into_iter()
            .take(MAX_ARTICLES)
            .map(|a| NewsArticle {
                title: a.title,
                snippet: a.description.unwrap_or_default(),
                url: a.url,
            })
            .collect())
    }
}

/// Render articles as the numbered digest the report prompt consumes.
pub fn digest(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!("[{}] {}\n{}\nLink: {}\n", i + 1, a.title, a.snippet, a.url)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_query_by_market() {
        assert_eq!(news_query("삼성전자", Market::Domestic), "삼성전자 주가 전망");
        assert_eq!(
            news_query("Apple Inc.", Market::Foreign),
            "Apple Inc. stock forecast analysis"
        );
    }

    #[test]
    fn test_digest_numbering() {
        let articles = vec![
            NewsArticle {
                title: "t1".to_string(),
                snippet: "s1".to_string(),
                url: "u1".to_string(),
            },
            NewsArticle {
                title: "t2".to_string(),
                snippet: "s2".to_string(),
                url: "u2".to_string(),
            },
        ];
        let text = digest(&articles);
        assert!(text.contains("[1] t1"));
        assert!(text.contains("[2] t2"));
        assert!(text.contains("Link: u2"));
    }

    #[test]
    fn test_response_parsing_with_null_description() {
        let json = r#"{
            "articles": [
                {"title": "headline", "description": null, "url": "https://example.com"}
            ]
        }"#;
        let parsed: NewsApiResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.articles.len(), 1);
        assert!(parsed.articles[0].description.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access and NEWS_API_KEY
    async fn test_search() {
        let key = std::env::var("NEWS_API_KEY").expect("NEWS_API_KEY");
        let client = NewsClient::new(key, 30);
        let articles = client.search("samsung electronics").await.expect("search");
        assert!(!articles.is_empty());
    }
}
