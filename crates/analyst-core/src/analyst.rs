//! Analyst service: composition of resolver, data clients and AI calls
//!
//! One instance per process. The listing table is built explicitly via
//! [`bootstrap_listing`] before the service is constructed, so a provider
//! outage is visible at startup instead of inside the first lookup.

use crate::api::gemini::GeminiClient;
use crate::api::news::{self, NewsClient};
use crate::api::yahoo::{Quote, YahooClient};
use crate::cache::{HistoryCache, HistoryKey};
use crate::config::AnalystConfig;
use crate::error::{AnalystError, Result};
use crate::listing::{ListingProvider, ListingStore, ListingTable};
use crate::media::{self, AudioDownloader};
use crate::prompts::{self, SkillLevel};
use crate::recommend::{self, Recommendation};
use crate::resolver::SymbolResolver;
use crate::session::{NewsReport, SessionState};
use tracing::{info, warn};

/// Default chart window for a resolved instrument
pub const DEFAULT_CHART_RANGE: &str = "6mo";

/// Build (or load) the listing table. Call once at startup; the returned
/// error is the observable failure path for the snapshot build.
pub async fn bootstrap_listing(
    config: &AnalystConfig,
    provider: &dyn ListingProvider,
) -> Result<ListingTable> {
    let store = ListingStore::new(&config.listing_path);
    store.load_or_build(provider).await
}

/// The analyst service
pub struct Analyst {
    config: AnalystConfig,
    resolver: SymbolResolver,
    yahoo: YahooClient,
    gemini: GeminiClient,
    news: Option<NewsClient>,
    downloader: AudioDownloader,
    history_cache: HistoryCache,
}

impl Analyst {
    pub fn new(config: AnalystConfig, gemini: GeminiClient, table: ListingTable) -> Self {
        let yahoo = YahooClient::new();
        let news = config
            .news_api_key
            .as_ref()
            .map(|key| NewsClient::new(key.clone(), config.news_rate_limit));
        let downloader = AudioDownloader::new(&config.media_dir);
        let history_cache = HistoryCache::new(config.history_cache_ttl);
        let resolver = SymbolResolver::new(yahoo.clone(), table);

        Self {
            config,
            resolver,
            yahoo,
            gemini,
            news,
            downloader,
            history_cache,
        }
    }

    /// Resolve a query into a fresh session snapshot. `Ok(None)` means no
    /// instrument matched; any previous snapshot should be discarded either
    /// way.
    pub async fn search(&self, query: &str) -> Result<Option<SessionState>> {
        let record = self.resolver.resolve(query).await?;
        Ok(record.map(|r| {
            info!(symbol = %r.symbol, name = %r.name, "resolved instrument");
            SessionState::new(r)
        }))
    }

    /// Price history for a symbol over a named trailing range, cached.
    pub async fn history(&self, symbol: &str, range: &str) -> Result<Vec<Quote>> {
        let key = HistoryKey::new(symbol, range);
        if let Some(quotes) = self.history_cache.get(&key).await {
            return Ok(quotes);
        }
        let quotes = self.yahoo.history_range(symbol, range).await?;
        self.history_cache.insert(key, quotes.clone()).await;
        Ok(quotes)
    }

    /// Search news for the session's instrument and write an investment
    /// report. Returns a new snapshot; `Ok(None)` when the search produced
    /// zero articles.
    pub async fn news_report(&self, state: &SessionState) -> Result<Option<SessionState>> {
        let news_client = self.news.as_ref().ok_or_else(|| {
            AnalystError::Config("news API key not configured".to_string())
        })?;

        let query = news::news_query(&state.record.name, state.record.market);
        let articles = news_client.search(&query).await?;
        if articles.is_empty() {
            return Ok(None);
        }

        let prompt = prompts::news_report_prompt(&news::digest(&articles), state.record.market);
        let report = self.gemini.generate(&prompt).await?;

        Ok(Some(state.with_news(NewsReport { report, articles })))
    }

    /// Ask the model for six stock picks and parse them into cards, falling
    /// back to the raw response when the format was not honored.
    pub async fn recommend(&self, level: SkillLevel) -> Result<Recommendation> {
        let prompt = prompts::recommendation_prompt(level);
        let text = self.gemini.generate(&prompt).await?;
        Ok(recommend::parse_recommendation(&text))
    }

    /// Download a video's audio track, run it through the model, and return
    /// the Korean briefing. The remote file is deleted afterwards.
    pub async fn audio_brief(&self, url: &str) -> Result<String> {
        let path = self.downloader.download(url).await?;
        let mime = media::mime_for_path(&path);

        let uploaded = self.gemini.upload_file(&path, mime).await?;
        let active = self
            .gemini
            .wait_until_active(
                uploaded,
                self.config.poll_max_attempts,
                self.config.poll_interval,
            )
            .await?;

        let brief = self
            .gemini
            .generate_with_file(&active, &prompts::audio_brief_prompt())
            .await;

        // Cleanup is best-effort on both sides
        if let Err(e) = self.gemini.delete_file(&active.name).await {
            warn!(file = %active.name, error = %e, "failed to delete remote file");
        }
        let _ = tokio::fs::remove_file(&path).await;

        brief
    }
}
