//! Configuration for the analyst service

use crate::error::{AnalystError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the analyst service
///
/// Gemini credentials live in [`crate::api::gemini::GeminiConfig`]; this
/// covers everything else.
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// Where the KRX listing snapshot is kept
    pub listing_path: PathBuf,

    /// Directory for downloaded audio files
    pub media_dir: PathBuf,

    /// News search API key (optional; news features fail cleanly without it)
    pub news_api_key: Option<String>,

    /// News requests per minute
    pub news_rate_limit: u32,

    /// TTL for cached price-history windows
    pub history_cache_ttl: Duration,

    /// Maximum polls while waiting for AI file processing
    pub poll_max_attempts: u32,

    /// Interval between those polls
    pub poll_interval: Duration,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            listing_path: PathBuf::from("krx_listing.json"),
            media_dir: PathBuf::from("."),
            news_api_key: None,
            news_rate_limit: 30,
            history_cache_ttl: Duration::from_secs(300), // 5 minutes
            poll_max_attempts: 60,
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load the news API key from the `NEWS_API_KEY` environment variable
    pub fn with_env_news_key(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_max_attempts == 0 {
            return Err(AnalystError::Config(
                "poll_max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.news_rate_limit == 0 {
            return Err(AnalystError::Config(
                "news_rate_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    listing_path: Option<PathBuf>,
    media_dir: Option<PathBuf>,
    news_api_key: Option<String>,
    news_rate_limit: Option<u32>,
    history_cache_ttl: Option<Duration>,
    poll_max_attempts: Option<u32>,
    poll_interval: Option<Duration>,
}

impl AnalystConfigBuilder {
    /// Set the listing snapshot path
    pub fn listing_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.listing_path = Some(path.into());
        self
    }

    /// Set the media download directory
    pub fn media_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(path.into());
        self
    }

    /// Set the news API key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set the news rate limit (requests per minute)
    pub fn news_rate_limit(mut self, limit: u32) -> Self {
        self.news_rate_limit = Some(limit);
        self
    }

    /// Set the history cache TTL
    pub fn history_cache_ttl(mut self, ttl: Duration) -> Self {
        self.history_cache_ttl = Some(ttl);
        self
    }

    /// Set the file-processing poll bound
    pub fn poll_max_attempts(mut self, attempts: u32) -> Self {
        self.poll_max_attempts = Some(attempts);
        self
    }

    /// Set the file-processing poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Load the news API key from the environment
    pub fn with_env_news_key(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            listing_path: self.listing_path.unwrap_or(defaults.listing_path),
            media_dir: self.media_dir.unwrap_or(defaults.media_dir),
            news_api_key: self.news_api_key,
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            history_cache_ttl: self.history_cache_ttl.unwrap_or(defaults.history_cache_ttl),
            poll_max_attempts: self.poll_max_attempts.unwrap_or(defaults.poll_max_attempts),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalystConfig::default();
        assert_eq!(config.poll_max_attempts, 60);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalystConfig::builder()
            .listing_path("/tmp/listing.json")
            .news_api_key("test_key")
            .poll_max_attempts(10)
            .build()
            .expect("build");

        assert_eq!(config.listing_path, PathBuf::from("/tmp/listing.json"));
        assert_eq!(config.news_api_key.as_deref(), Some("test_key"));
        assert_eq!(config.poll_max_attempts, 10);
    }

    #[test]
    fn test_validation_rejects_zero_poll_attempts() {
        let config = AnalystConfig {
            poll_max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_rejects_zero_rate_limit() {
        assert!(AnalystConfig::builder().news_rate_limit(0).build().is_err());
    }
}
