//! Symbol resolution: classified query to canonical trading symbol
//!
//! Three paths, picked by the market classifier:
//! - domestic names go through the local listing table,
//! - foreign tickers are validated against a trailing price-history window,
//! - foreign names run through the quote search service.
//!
//! A miss is `Ok(None)`; only transport and service failures surface as
//! errors, so callers can tell "not found" apart from "provider is down".

use crate::api::yahoo::YahooClient;
use crate::error::{AnalystError, Result};
use crate::listing::ListingTable;
use crate::market::{classify, Market, MarketClass};
use serde::{Deserialize, Serialize};

/// Instrument types accepted by the name-search filter
const PREFERRED_QUOTE_TYPES: [&str; 2] = ["EQUITY", "ETF"];

/// Window used to confirm a ticker actually trades
const VALIDATION_RANGE: &str = "5d";

/// A resolved instrument. Immutable: a new resolution produces a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Fully-qualified trading symbol, e.g. "005930.KS" or "AAPL"
    pub symbol: String,
    /// Human-readable display name
    pub name: String,
    pub market: Market,
}

/// Resolves free-text queries to [`SymbolRecord`]s
pub struct SymbolResolver {
    yahoo: YahooClient,
    table: ListingTable,
}

impl SymbolResolver {
    pub fn new(yahoo: YahooClient, table: ListingTable) -> Self {
        Self { yahoo, table }
    }

    /// Resolve a raw user query. `Ok(None)` means no instrument matched.
    pub async fn resolve(&self, raw_query: &str) -> Result<Option<SymbolRecord>> {
        let classified = classify(raw_query);
        tracing::debug!(query = %classified.query, class = ?classified.class, "resolving query");

        match classified.class {
            MarketClass::DomesticName => Ok(self.resolve_domestic(&classified.query)),
            MarketClass::ForeignTicker => self.validate_ticker(&classified.query).await,
            MarketClass::ForeignName => self.resolve_foreign_name(&classified.query).await,
        }
    }

    /// Substring lookup against the local listing table.
    fn resolve_domestic(&self, query: &str) -> Option<SymbolRecord> {
        let entry = self.table.find_by_name(query)?;
        Some(SymbolRecord {
            symbol: entry.symbol(),
            name: entry.name.clone(),
            market: Market::Domestic,
        })
    }

    /// Confirm an uppercase ticker trades by fetching a short trailing
    /// history window. Invalid symbols surface from the quote service as API
    /// errors, so those map to a miss rather than a failure.
    async fn validate_ticker(&self, ticker: &str) -> Result<Option<SymbolRecord>> {
        let history = match self.yahoo.history_range(ticker, VALIDATION_RANGE).await {
            Ok(quotes) => quotes,
            Err(AnalystError::Yahoo(reason)) => {
                tracing::debug!(ticker, reason, "ticker validation miss");
                return Ok(None);
            },
            Err(e) => return Err(e),
        };
        if history.is_empty() {
            return Ok(None);
        }

        // Name lookup is best-effort: the ticker itself is the fallback
        let name = match self.yahoo.search(ticker, 1).await {
            Ok(hits) => hits
                .first()
                .map(|h| h.display_name(ticker))
                .unwrap_or_else(|| ticker.to_string()),
            Err(_) => ticker.to_string(),
        };

        Ok(Some(SymbolRecord {
            symbol: ticker.to_string(),
            name,
            market: Market::Foreign,
        }))
    }

    /// Search candidates for a Latin company name. Prefers the earliest
    /// equity or ETF hit; falls back to the first candidate of any type.
    async fn resolve_foreign_name(&self, query: &str) -> Result<Option<SymbolRecord>> {
        let hits = self.yahoo.search(query, 5).await?;
        if hits.is_empty() {
            return Ok(None);
        }

        let chosen = hits
            .iter()
            .find(|h| {
                PREFERRED_QUOTE_TYPES
                    .iter()
                    .any(|t| h.quote_type.eq_ignore_ascii_case(t))
            })
            .unwrap_or(&hits[0]);

        Ok(Some(SymbolRecord {
            symbol: chosen.symbol.clone(),
            name: chosen.display_name(query),
            market: Market::Foreign,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Exchange, ListingEntry};

    fn resolver_with_table(entries: Vec<ListingEntry>) -> SymbolResolver {
        SymbolResolver::new(YahooClient::new(), ListingTable::new(entries))
    }

    fn entry(code: &str, name: &str, exchange: Exchange) -> ListingEntry {
        ListingEntry {
            code: code.to_string(),
            name: name.to_string(),
            exchange,
        }
    }

    #[tokio::test]
    async fn test_domestic_shortest_name() {
        let resolver = resolver_with_table(vec![
            entry("005930", "삼성전자", Exchange::Kospi),
            entry("005935", "삼성전자우", Exchange::Kospi),
        ]);

        let record = resolver
            .resolve("삼성전자")
            .await
            .expect("resolve")
            .expect("record");
        assert_eq!(record.symbol, "005930.KS");
        assert_eq!(record.name, "삼성전자");
        assert_eq!(record.market, Market::Domestic);
    }

    #[tokio::test]
    async fn test_domestic_kosdaq_suffix() {
        let resolver = resolver_with_table(vec![
            entry("293490", "카카오게임즈", Exchange::Kosdaq),
        ]);

        let record = resolver
            .resolve("카카오게임즈")
            .await
            .expect("resolve")
            .expect("record");
        assert_eq!(record.symbol, "293490.KQ");
    }

    #[tokio::test]
    async fn test_domestic_miss_is_none() {
        let resolver = resolver_with_table(vec![
            entry("005930", "삼성전자", Exchange::Kospi),
        ]);

        let record = resolver.resolve("현대차").await.expect("resolve");
        assert!(record.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_foreign_ticker_validation() {
        let resolver = resolver_with_table(vec![]);
        let record = resolver
            .resolve("AAPL")
            .await
            .expect("resolve")
            .expect("record");
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.market, Market::Foreign);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_foreign_name_search() {
        let resolver = resolver_with_table(vec![]);
        let record = resolver
            .resolve("Apple")
            .await
            .expect("resolve")
            .expect("record");
        assert_eq!(record.symbol, "AAPL");
    }
}
