//! AI stock analyst library
//!
//! Looks up a stock by name or ticker, fetches price history and news, and
//! asks a generative model to summarize findings. The pipeline:
//!
//! - Market classification: is the query a domestic name, a foreign ticker,
//!   or a foreign company name?
//! - Symbol resolution: domestic names go through a local KRX listing
//!   snapshot; foreign queries go through the quote/search service.
//! - AI analysis: news digests and stock recommendations are generated by
//!   Gemini, and recommendation text is parsed back into structured cards.
//!
//! Everything is a client of external services; no server is exposed.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_core::{Analyst, AnalystConfig, GeminiClient, KrxListingClient};
//! use analyst_core::analyst::bootstrap_listing;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalystConfig::default().with_env_news_key();
//!     let provider = KrxListingClient::new()?;
//!     let table = bootstrap_listing(&config, &provider).await?;
//!
//!     let analyst = Analyst::new(config, GeminiClient::from_env()?, table);
//!     if let Some(state) = analyst.search("삼성전자").await? {
//!         println!("{} ({})", state.record.name, state.record.symbol);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analyst;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod listing;
pub mod market;
pub mod media;
pub mod poll;
pub mod prompts;
pub mod recommend;
pub mod resolver;
pub mod session;

// Re-export main types for convenience
pub use analyst::Analyst;
pub use api::{GeminiClient, GeminiConfig, KrxListingClient, NewsClient, YahooClient};
pub use config::AnalystConfig;
pub use error::{AnalystError, Result};
pub use listing::{Exchange, ListingEntry, ListingTable};
pub use market::{Market, MarketClass};
pub use prompts::SkillLevel;
pub use recommend::{GroupedCards, Recommendation, StockCard};
pub use resolver::{SymbolRecord, SymbolResolver};
pub use session::SessionState;
